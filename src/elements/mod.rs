pub mod registry;
pub mod shape;
