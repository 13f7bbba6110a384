mod ribbon_solid;

pub use ribbon_solid::RibbonSolid;
