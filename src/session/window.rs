use super::types::{FrameRecord, Tracklet};
use crate::frames::FrameSource;
use crate::geometry::CornerBox;
use crate::manifest::FrameLocator;
use crate::tracking::Tracker;
use anyhow::{Context, Result};

/// Track `seed` for up to `length` frames starting at `start_frame`
///
/// The first frame initializes the tracker and records the seed corners
/// unchanged; every later frame records the tracker's estimate, rounded to
/// whole pixels. The run
/// stops at the first frame that is missing from the video or cannot be
/// decoded, keeping what was tracked so far.
///
/// Returns the number of frames processed together with the tracklet, so
/// `frames_processed == tracklet.len() <= length`.
pub fn run_session<T, S>(
    tracker: &mut T,
    frames: &mut S,
    locator: &FrameLocator,
    start_frame: i64,
    length: usize,
    seed: CornerBox,
) -> Result<(usize, Tracklet)>
where
    T: Tracker + ?Sized,
    S: FrameSource + ?Sized,
{
    let mut tracklet = Tracklet::with_capacity(length);

    for i in 0..length {
        // Ids past i64::MAX cannot be in the video
        let Some(frame_id) = start_frame.checked_add(i as i64) else {
            tracing::debug!("Frame id overflows after {}, session ends after {} frames", start_frame, i);
            return Ok((i, tracklet));
        };

        let Some(path) = locator.resolve(frame_id) else {
            tracing::debug!("Frame {} not in video, session ends after {} frames", frame_id, i);
            return Ok((i, tracklet));
        };

        let frame = match frames.load_frame(path) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!("{:#}, session ends after {} frames", err, i);
                return Ok((i, tracklet));
            }
        };

        let bbox = if i == 0 {
            tracker
                .init(seed.to_region(), &frame)
                .with_context(|| format!("Failed to initialize tracker at frame {}", frame_id))?;
            seed
        } else {
            tracker
                .update(&frame)
                .with_context(|| format!("Failed to update tracker at frame {}", frame_id))?
                .rounded()
                .to_corners()
        };

        tracklet.push(FrameRecord {
            frame_id,
            anchor: i as u32,
            score: 1.0,
            bbox,
        });
    }

    Ok((length, tracklet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{manifest, FakeFrames, FakeTracker};

    #[test]
    fn test_full_window() {
        let locator = FrameLocator::new(&manifest(1..=40));
        let mut tracker = FakeTracker::default();
        let mut frames = FakeFrames::default();
        let seed = CornerBox::new(10.0, 10.0, 50.0, 50.0);

        let (processed, tracklet) =
            run_session(&mut tracker, &mut frames, &locator, 1, 20, seed).unwrap();

        assert_eq!(processed, 20);
        assert_eq!(tracklet.len(), 20);
        assert_eq!(tracklet[0].bbox, seed);
        assert_eq!(tracker.inits, 1);
        assert_eq!(tracker.updates, 19);

        for (i, record) in tracklet.iter().enumerate() {
            assert_eq!(record.anchor, i as u32);
            assert_eq!(record.frame_id, 1 + i as i64);
            assert_eq!(record.score, 1.0);
        }

        // Later frames carry the tracker output, shifted one pixel per update
        assert_eq!(tracklet[1].bbox, CornerBox::new(11.0, 10.0, 51.0, 50.0));
        assert_eq!(tracklet[19].bbox, CornerBox::new(29.0, 10.0, 69.0, 50.0));
    }

    #[test]
    fn test_truncated_by_missing_frame() {
        let locator = FrameLocator::new(&manifest(1..=10));
        let mut tracker = FakeTracker::default();
        let mut frames = FakeFrames::default();

        let (processed, tracklet) = run_session(
            &mut tracker,
            &mut frames,
            &locator,
            1,
            20,
            CornerBox::new(10.0, 10.0, 50.0, 50.0),
        )
        .unwrap();

        assert_eq!(processed, 10);
        assert_eq!(tracklet.len(), 10);
        assert_eq!(tracklet.last().map(|r| r.frame_id), Some(10));
        assert_eq!(frames.loaded, 10);
    }

    #[test]
    fn test_gap_in_frames() {
        let mut video = manifest(1..=40);
        video.frames.retain(|f| f.frame_id != 25);
        let locator = FrameLocator::new(&video);

        let (processed, tracklet) = run_session(
            &mut FakeTracker::default(),
            &mut FakeFrames::default(),
            &locator,
            21,
            20,
            CornerBox::new(0.0, 0.0, 5.0, 5.0),
        )
        .unwrap();

        assert_eq!(processed, 4);
        assert_eq!(tracklet.len(), 4);
    }

    #[test]
    fn test_unresolved_start_frame() {
        let locator = FrameLocator::new(&manifest(1..=10));
        let mut tracker = FakeTracker::default();

        let (processed, tracklet) = run_session(
            &mut tracker,
            &mut FakeFrames::default(),
            &locator,
            41,
            20,
            CornerBox::new(10.0, 10.0, 50.0, 50.0),
        )
        .unwrap();

        assert_eq!(processed, 0);
        assert!(tracklet.is_empty());
        assert_eq!(tracker.inits, 0);
    }

    #[test]
    fn test_undecodable_frame_ends_session() {
        let locator = FrameLocator::new(&manifest(1..=40));
        let mut frames = FakeFrames {
            broken: vec![6],
            ..FakeFrames::default()
        };

        let (processed, tracklet) = run_session(
            &mut FakeTracker::default(),
            &mut frames,
            &locator,
            1,
            20,
            CornerBox::new(10.0, 10.0, 50.0, 50.0),
        )
        .unwrap();

        assert_eq!(processed, 5);
        assert_eq!(tracklet.len(), 5);
    }

    #[test]
    fn test_seed_corners_recorded_exactly() {
        let locator = FrameLocator::new(&manifest(1..=3));
        let seed = CornerBox::new(0.1, 0.7, 100.3, 33.3);
        let mut tracker = FakeTracker::default();

        let (_, tracklet) =
            run_session(&mut tracker, &mut FakeFrames::default(), &locator, 1, 3, seed).unwrap();

        assert_eq!(tracklet[0].bbox, seed);
        assert_eq!(tracker.seeds, vec![seed.to_region()]);
    }

    #[test]
    fn test_tracker_error_is_fatal() {
        let locator = FrameLocator::new(&manifest(1..=40));
        let mut tracker = FakeTracker::failing();

        let result = run_session(
            &mut tracker,
            &mut FakeFrames::default(),
            &locator,
            1,
            20,
            CornerBox::new(10.0, 10.0, 50.0, 50.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_frame_id_overflow_ends_session() {
        let mut video = manifest(1..=2);
        video.frames[0].frame_id = i64::MAX;
        let locator = FrameLocator::new(&video);

        let (processed, tracklet) = run_session(
            &mut FakeTracker::default(),
            &mut FakeFrames::default(),
            &locator,
            i64::MAX,
            2,
            CornerBox::new(10.0, 10.0, 50.0, 50.0),
        )
        .unwrap();

        assert_eq!(processed, 1);
        assert_eq!(tracklet.len(), 1);
        assert_eq!(tracklet[0].frame_id, i64::MAX);
    }

    #[test]
    fn test_tracker_output_rounded_to_pixels() {
        let locator = FrameLocator::new(&manifest(1..=5));
        let mut tracker = FakeTracker::drifting(0.3);
        let seed = CornerBox::new(10.25, 10.5, 50.75, 50.0);

        let (_, tracklet) =
            run_session(&mut tracker, &mut FakeFrames::default(), &locator, 1, 4, seed).unwrap();

        // Seed frame keeps the proposal as given
        assert_eq!(tracklet[0].bbox, seed);
        // x = 10.25 + 0.6 = 10.85 -> 11, width 40.5 -> 41 (half away from zero)
        assert_eq!(tracklet[2].bbox, CornerBox::new(11.0, 11.0, 52.0, 51.0));
        assert!(tracklet[1..].iter().all(|r| {
            let b: [f32; 4] = r.bbox.into();
            b.iter().all(|v| v.fract() == 0.0)
        }));
    }
}
