mod distribute_instances;

pub use distribute_instances::{DistributeInstances, DistributeMode, PlacedInstance};
