pub mod fillet;
pub mod offset;
pub mod units;

pub use fillet::FilletPath;
pub use offset::{FillRule, JoinType, OffsetOutcome, OffsetPath, OffsetStyle, Precision};
pub use units::Unit;
