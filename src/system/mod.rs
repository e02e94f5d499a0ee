pub mod sampler;
pub mod snapshot;
pub mod source;
pub mod usage;
