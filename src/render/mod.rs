pub mod cpu;
pub mod target;
pub mod tint;
