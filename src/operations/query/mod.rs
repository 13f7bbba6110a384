mod point_at_length;
mod surface_area;

pub use point_at_length::{PathSample, PointAtLength};
pub use surface_area::SurfaceArea;
