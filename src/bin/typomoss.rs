use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "typomoss", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a scene headlessly and write the final frame as a PNG.
    Render(RenderArgs),
    /// Simulate a scene without drawing pixels and print its stats as JSON.
    Stats(StatsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Override the scene seed.
    #[arg(long)]
    seed: Option<u32>,

    /// Simulated frame rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
}

#[derive(Parser, Debug)]
struct StatsArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Override the scene seed.
    #[arg(long)]
    seed: Option<u32>,

    /// Simulated frame rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
}

#[derive(serde::Serialize)]
struct Summary {
    #[serde(flatten)]
    stats: typomoss::Stats,
    fingerprint: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Stats(args) => cmd_stats(args),
    }
}

fn load_scene(path: &std::path::Path, seed: Option<u32>) -> anyhow::Result<typomoss::Scene> {
    let mut scene = typomoss::Scene::from_path(path)?;
    if seed.is_some() {
        scene.engine.seed = seed;
    }
    Ok(scene)
}

fn run<T: typomoss::RenderTarget>(
    target: T,
    scene: &typomoss::Scene,
    scene_path: &std::path::Path,
    ticks: u64,
    fps: f64,
) -> anyhow::Result<typomoss::Engine<T, typomoss::FixedStepClock>> {
    let assets_root = scene_path
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."));

    let mut engine = typomoss::Engine::with_clock(
        target,
        scene.engine.clone(),
        typomoss::FixedStepClock::from_fps(fps),
    )?;
    scene
        .install(&mut engine, assets_root)
        .with_context(|| format!("install scene '{}'", scene_path.display()))?;

    engine.start();
    engine.enable_spawning();
    for _ in 0..ticks {
        engine.tick()?;
    }
    Ok(engine)
}

fn summary<T: typomoss::RenderTarget, C: typomoss::FrameClock>(
    engine: &typomoss::Engine<T, C>,
) -> Summary {
    Summary {
        stats: engine.stats(),
        fingerprint: format!("{:016x}", engine.spawn_fingerprint()),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene, args.seed)?;
    let (w, h) = scene.canvas_size((1920, 1080));
    let canvas = typomoss::CpuCanvas::new(w, h)?;
    let engine = run(canvas, &scene, &args.scene, args.ticks, args.fps)?;
    let summary = summary(&engine);

    let canvas = engine.into_target();
    let (w, h) = typomoss::RenderTarget::size(&canvas);
    let data = canvas.to_rgba8();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &data,
        w,
        h,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} ticks, {} instances, fingerprint {})",
        args.out.display(),
        summary.stats.tick_count,
        summary.stats.instance_count,
        summary.fingerprint
    );
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene, args.seed)?;
    let (w, h) = scene.canvas_size((1920, 1080));
    let target = typomoss::RecordingTarget::new(w, h);
    let engine = run(target, &scene, &args.scene, args.ticks, args.fps)?;

    let json = serde_json::to_string_pretty(&summary(&engine)).context("serialize stats")?;
    println!("{json}");
    Ok(())
}
