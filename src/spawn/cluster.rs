//! Placement bookkeeping for the two accumulating modes.
//!
//! Layered clusters grow in place around a random base until their member cap is reached.
//! Grow stacks enter from a canvas edge and extend edge-to-edge inward. The book only tracks
//! the geometry needed to place the next member; it never reads the instance store, so its
//! decisions depend on the RNG sequence alone.

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::animation::mode::{ClusterId, GrowState, LayeredState, StackId};
use crate::foundation::core::{Canvas, Point, Vec2};
use crate::foundation::rng::Mulberry32;

/// Where the next member of a cluster or stack goes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement<S> {
    /// Canvas position.
    pub position: Point,
    /// Pixel size.
    pub size: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Mode state to store on the instance.
    pub state: S,
}

#[derive(Clone, Copy, Debug)]
struct LayeredCluster {
    geometry: LayeredState,
    size: f64,
    members: u32,
}

#[derive(Clone, Copy, Debug)]
struct GrowStack {
    geometry: GrowState,
    tip: Point,
    members: u32,
}

/// Cluster and stack state per element.
#[derive(Debug, Default)]
pub struct ClusterBook {
    layered: HashMap<String, LayeredCluster>,
    stacks: HashMap<String, Vec<GrowStack>>,
    next_cluster: u32,
    next_stack: u32,
}

impl ClusterBook {
    /// Empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every cluster and stack. Ids keep counting up.
    pub fn clear(&mut self) {
        self.layered.clear();
        self.stacks.clear();
    }

    /// Place the next layered member for `element_id`, starting a new cluster when the current
    /// one is full.
    pub fn place_layered(
        &mut self,
        element_id: &str,
        nominal_size: f64,
        canvas: Canvas,
        rng: &mut Mulberry32,
    ) -> Placement<LayeredState> {
        let next_cluster = &mut self.next_cluster;
        let cluster = self
            .layered
            .entry(element_id.to_owned())
            .or_insert_with(|| open_cluster(next_cluster, nominal_size, canvas, rng));
        if cluster.members >= cluster.geometry.member_cap {
            *cluster = open_cluster(next_cluster, nominal_size, canvas, rng);
        }
        if cluster.members == 0 {
            tracing::debug!(
                element = element_id,
                cluster = ?cluster.geometry.cluster,
                cap = cluster.geometry.member_cap,
                "new layered cluster"
            );
        }

        let g = cluster.geometry;
        let index = cluster.members;
        cluster.members += 1;

        let step = f64::from(index);
        let offset = Vec2::new(g.direction.cos(), g.direction.sin()) * (g.spacing * step);
        Placement {
            position: g.base + offset,
            size: cluster.size,
            rotation: g.base_rotation + g.rotation_step * step,
            state: LayeredState {
                layer_index: index,
                ..g
            },
        }
    }

    /// Place the next grow member for `element_id`.
    ///
    /// The first stack whose tip is still within the canvas (plus a margin of twice `size`)
    /// receives the member; otherwise a new stack opens at a random edge.
    pub fn place_grow(
        &mut self,
        element_id: &str,
        size: f64,
        canvas: Canvas,
        rng: &mut Mulberry32,
    ) -> Placement<GrowState> {
        let stacks = self.stacks.entry(element_id.to_owned()).or_default();
        let margin = size * 2.0;
        if let Some(stack) = stacks
            .iter_mut()
            .find(|s| canvas.contains_with_margin(s.tip, margin))
        {
            let g = stack.geometry;
            let index = stack.members;
            let offset =
                Vec2::new(g.direction.cos(), g.direction.sin()) * (g.spacing * f64::from(index));
            let position = g.base + offset;
            stack.members += 1;
            stack.tip = position;
            return Placement {
                position,
                size,
                rotation: g.direction,
                state: GrowState {
                    layer_index: index,
                    ..g
                },
            };
        }

        let jitter = |rng: &mut Mulberry32| rng.range(-0.4, 0.4);
        let (base, direction) = match rng.below(4) {
            0 => (Point::new(rng.next_f64() * canvas.w(), -size), FRAC_PI_2 + jitter(rng)),
            1 => (Point::new(canvas.w() + size, rng.next_f64() * canvas.h()), PI + jitter(rng)),
            2 => (
                Point::new(rng.next_f64() * canvas.w(), canvas.h() + size),
                -FRAC_PI_2 + jitter(rng),
            ),
            _ => (Point::new(-size, rng.next_f64() * canvas.h()), jitter(rng)),
        };

        let id = StackId(self.next_stack);
        self.next_stack = self.next_stack.wrapping_add(1);
        let geometry = GrowState {
            stack: Some(id),
            layer_index: 0,
            base,
            direction,
            spacing: size,
        };
        stacks.push(GrowStack {
            geometry,
            tip: base,
            members: 1,
        });
        tracing::debug!(element = element_id, stack = id.0, "new grow stack");

        Placement {
            position: base,
            size,
            rotation: direction,
            state: geometry,
        }
    }

    /// Number of stacks opened for an element and not cleared.
    pub fn stack_count(&self, element_id: &str) -> usize {
        self.stacks.get(element_id).map_or(0, Vec::len)
    }
}

fn open_cluster(
    next_cluster: &mut u32,
    nominal_size: f64,
    canvas: Canvas,
    rng: &mut Mulberry32,
) -> LayeredCluster {
    let base = Point::new(rng.next_f64() * canvas.w(), rng.next_f64() * canvas.h());
    let direction = rng.next_f64() * TAU;
    let (degrees, spacing) = if rng.chance(0.4) {
        (rng.range(0.0, 3.0), rng.range(15.0, 20.0))
    } else {
        (rng.range(6.0, 20.0), rng.range(5.0, 10.0))
    };
    let size = rng.jitter(nominal_size, 0.3);
    let member_cap = 5 + rng.below(3) as u32;
    let base_rotation = rng.next_f64() * TAU;

    let id = ClusterId(*next_cluster);
    *next_cluster = next_cluster.wrapping_add(1);

    LayeredCluster {
        geometry: LayeredState {
            cluster: Some(id),
            layer_index: 0,
            member_cap,
            base,
            direction,
            spacing,
            rotation_step: degrees.to_radians(),
            base_rotation,
        },
        size,
        members: 0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spawn/cluster.rs"]
mod tests;
