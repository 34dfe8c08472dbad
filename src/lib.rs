pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod satellite;

pub use error::{CurvisError, Result};
