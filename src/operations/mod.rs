pub mod convert;
pub mod distribute;
pub mod offset;
pub mod query;
pub mod shaping;
