pub mod ease;
pub mod mode;
pub mod random;
pub mod state;
