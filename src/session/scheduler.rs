use super::types::Tracklet;
use super::window::run_session;
use crate::frames::FrameSource;
use crate::manifest::{FrameLocator, ProposalSet};
use crate::tracking::Tracker;
use anyhow::Result;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};

/// Chooses which proposals seed a tracking session
///
/// A proposal is selected when its frame id leaves a remainder of 1 modulo
/// the period, so a period of 20 selects frames 1, 21, 41, ...
#[derive(Debug, Clone, Copy)]
pub struct SamplingPolicy {
    period: i64,
}

impl SamplingPolicy {
    pub fn new(period: NonZeroU32) -> Self {
        Self {
            period: period.get() as i64,
        }
    }

    #[inline]
    pub fn selects(&self, frame_id: i64) -> bool {
        frame_id % self.period == 1
    }
}

/// Throughput of one scheduler pass
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub selected: usize,
    pub frames_processed: u64,
    pub elapsed: Duration,
}

impl RunStats {
    pub fn fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames_processed as f64 / secs
        } else {
            0.0
        }
    }
}

/// Runs one tracking session per selected proposal
pub struct Scheduler {
    policy: SamplingPolicy,
    window_length: usize,
}

impl Scheduler {
    pub fn new(policy: SamplingPolicy, window_length: NonZeroU32) -> Self {
        Self {
            policy,
            window_length: window_length.get() as usize,
        }
    }

    /// Track every selected proposal in document order with the shared
    /// `tracker`, re-initialized for each session
    ///
    /// Every selected proposal yields exactly one tracklet, possibly empty.
    pub fn run<T, S>(
        &self,
        tracker: &mut T,
        frames: &mut S,
        locator: &FrameLocator,
        proposals: &ProposalSet,
    ) -> Result<(Vec<Tracklet>, RunStats)>
    where
        T: Tracker + ?Sized,
        S: FrameSource + ?Sized,
    {
        let _span = tracing::debug_span!("schedule").entered();

        let mut tracks = Vec::new();
        let mut stats = RunStats::default();
        let start = Instant::now();

        for proposal in &proposals.boxes {
            if !self.policy.selects(proposal.frame_id) {
                continue;
            }

            stats.selected += 1;
            tracing::debug!(
                "Session {} from frame {} seeded with {:?}",
                stats.selected,
                proposal.frame_id,
                proposal.corners
            );

            let (processed, tracklet) = run_session(
                tracker,
                frames,
                locator,
                proposal.frame_id,
                self.window_length,
                proposal.corners,
            )?;

            tracing::debug!("Session {} processed {} frames", stats.selected, processed);

            stats.frames_processed += processed as u64;
            tracks.push(tracklet);
        }

        stats.elapsed = start.elapsed();
        Ok((tracks, stats))
    }
}
