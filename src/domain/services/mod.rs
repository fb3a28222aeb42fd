mod policy;

pub use policy::{AccessPolicy, DimensionRule};
