use crate::geometry::Region;
use anyhow::Result;
use image::RgbImage;

/// Trait for single-object visual trackers
///
/// One instance is reused for many short tracking runs, so `init` must
/// discard everything learned from the previous run.
pub trait Tracker {
    /// Start tracking `seed` in `frame`, resetting all internal state
    fn init(&mut self, seed: Region, frame: &RgbImage) -> Result<()>;

    /// Advance by one frame and return the estimated region
    ///
    /// Fails if called before `init`.
    fn update(&mut self, frame: &RgbImage) -> Result<Region>;

    /// Label identifying the tracking algorithm in output documents
    fn method(&self) -> &str;
}
