mod ribbon_offset;

pub use ribbon_offset::{RibbonOffset, Stations};
