mod path_from_curve;

pub use path_from_curve::{PathFromCurve, ARC_MATCH_TOLERANCE};
