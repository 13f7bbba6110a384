pub mod error;
pub mod geometry;
pub mod height_field;
pub mod math;
pub mod mesh;
pub mod model;
pub mod operations;
pub mod session;
pub mod units;

pub use error::{KernelError, Result};
