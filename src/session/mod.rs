mod scheduler;
pub mod types;
mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use scheduler::{SamplingPolicy, Scheduler};
pub use types::Tracklet;
