pub mod arclen;
pub mod path;
pub mod seg;

pub use path::Path;
pub use seg::PathSeg;
