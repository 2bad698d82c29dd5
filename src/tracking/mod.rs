mod features;
mod kcf;
mod spectrum;
pub mod types;

pub use kcf::{KcfConfig, KcfTracker};
pub use types::Tracker;

/// Create the default tracker (KCF) with the given template size
pub fn create_default_tracker(template_size: u32) -> Box<dyn Tracker> {
    Box::new(KcfTracker::new(KcfConfig {
        template_size,
        ..KcfConfig::default()
    }))
}
