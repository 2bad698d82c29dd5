mod frames;
mod geometry;
mod manifest;
mod output;
mod session;
mod tracking;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use frames::ImageFileSource;
use manifest::FrameLocator;
use output::{JsonFileOutput, OutputSink, TrackCollection};
use session::{SamplingPolicy, Scheduler};
use std::num::NonZeroU32;
use std::path::PathBuf;

/// KCF tracker for VID: densify per-frame proposals into short tracklets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video manifest (JSON)
    #[arg(long)]
    video: PathBuf,

    /// Proposal file (JSON)
    #[arg(long)]
    proposals: PathBuf,

    /// Output file for the tracklets (JSON)
    #[arg(long)]
    output: PathBuf,

    /// Number of frames tracked from each seed
    #[arg(long, default_value = "20")]
    window_length: NonZeroU32,

    /// Sampling period for seeds; defaults to the window length
    #[arg(long)]
    sample_rate: Option<NonZeroU32>,

    /// KCF template size in pixels
    #[arg(long, default_value_t = 96, value_parser = clap::value_parser!(u32).range(16..=256))]
    template_size: u32,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            // Help is not a successful run
            err.print()?;
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    };

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let sample_rate = args.sample_rate.unwrap_or(args.window_length);

    tracing::info!("Video: {}", args.video.display());
    tracing::info!("Proposals: {}", args.proposals.display());
    tracing::info!(
        "Window length: {}, sampling period: {}",
        args.window_length,
        sample_rate
    );

    let video = manifest::load_manifest(&args.video).context("Failed to load video manifest")?;
    let proposals =
        manifest::load_proposals(&args.proposals).context("Failed to load proposals")?;

    let locator = FrameLocator::new(&video);
    tracing::info!(
        "Loaded video {} with {} frames, {} proposals",
        video.id,
        locator.frame_count(),
        proposals.boxes.len()
    );

    let mut tracker = tracking::create_default_tracker(args.template_size);
    let mut frames = ImageFileSource::new();
    let mut output = JsonFileOutput::new(&args.output);

    let scheduler = Scheduler::new(SamplingPolicy::new(sample_rate), args.window_length);
    let (tracks, stats) = scheduler.run(tracker.as_mut(), &mut frames, &locator, &proposals)?;

    let collection = TrackCollection::assemble(&video.id, tracker.method(), tracks);

    tracing::info!(
        "Write {} tracks to output file: {}",
        stats.selected,
        output.destination().display()
    );
    tracing::info!(
        "Total time: {:.3} s. {:.2} fps.",
        stats.elapsed.as_secs_f64(),
        stats.fps()
    );
    tracing::debug!("Decoded {} frames", frames.decoded());

    output
        .write_tracks(&collection)
        .context("Failed to write tracks")?;

    Ok(())
}
