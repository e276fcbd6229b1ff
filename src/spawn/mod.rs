pub mod cluster;
pub mod factory;
pub mod scheduler;
