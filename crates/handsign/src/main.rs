//! Replays recorded hand landmark detections through the gesture pipeline.
//!
//! Input is newline-delimited JSON, one frame per line:
//!
//! ```json
//! {"hands": [{"handedness": "Right", "landmarks": [[0.5, 0.8, 0.0], ...]}]}
//! ```

use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use handsign::{
    config::Config,
    hand::{gesture::ThumbPolarity, landmark::Handedness, tracking::DetectedHand},
};
use itertools::Itertools;
use serde::Deserialize;

/// Static hand gesture recognition on recorded landmark streams.
#[derive(Parser, Debug)]
#[command(name = "handsign", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (TOML).
    #[arg(short, long, global = true, env = "HANDSIGN_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides the OK gesture distance threshold.
    #[arg(long, global = true)]
    threshold: Option<f32>,

    /// Overrides the number of frames landmarks are averaged over.
    #[arg(long, global = true)]
    capacity: Option<usize>,

    /// Treat handedness labels as referring to a mirrored image.
    #[arg(long, global = true)]
    mirrored: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify every hand in a stream of frames.
    Classify {
        /// Input file; reads from stdin if omitted.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Image width used to compute label positions.
        #[arg(long, requires = "height")]
        width: Option<u32>,

        /// Image height used to compute label positions.
        #[arg(long, requires = "width")]
        height: Option<u32>,
    },
    /// Print the effective configuration.
    Config,
}

#[derive(Deserialize)]
struct Frame {
    #[serde(default)]
    hands: Vec<DetectedHand>,
}

fn main() -> anyhow::Result<()> {
    handsign::init_logger!();

    let cli = Cli::parse();
    let config = effective_config(&cli)?;

    match cli.command {
        Command::Classify {
            input,
            width,
            height,
        } => {
            let reader: Box<dyn BufRead> = match &input {
                Some(path) => Box::new(BufReader::new(
                    File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
                )),
                None => Box::new(io::stdin().lock()),
            };
            let size = width.zip(height);
            classify(&config, reader, size, &mut io::stdout().lock())?;
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(threshold) = cli.threshold {
        config.classifier.ok_distance_threshold = threshold;
    }
    if let Some(capacity) = cli.capacity {
        config.smoothing.capacity = capacity;
    }
    if cli.mirrored {
        config.classifier.thumb_polarity = ThumbPolarity::Mirrored;
    }

    config.validate()?;
    Ok(config)
}

fn classify(
    config: &Config,
    reader: impl BufRead,
    size: Option<(u32, u32)>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut tracker = config.tracker()?;
    let mut frames = 0;
    let mut counts = BTreeMap::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        let frame: Frame = serde_json::from_str(&line)
            .with_context(|| format!("invalid frame on line {}", line_no + 1))?;

        for report in tracker.process(&frame.hands) {
            match report.outcome() {
                Ok(gesture) => {
                    let label = gesture.map_or("-", |g| g.label());
                    write!(
                        out,
                        "frame {frames} slot {} {}: {label}",
                        report.slot(),
                        report.handedness().map_or("?", Handedness::as_str)
                    )?;
                    if let Some((x, y)) = size.and_then(|(w, h)| report.label_position(w, h)) {
                        write!(out, " @ ({x}, {y})")?;
                    }
                    writeln!(out)?;
                    *counts.entry(label).or_insert(0usize) += 1;
                }
                Err(e) => writeln!(out, "frame {frames} slot {}: error: {e}", report.slot())?,
            }
        }
        frames += 1;
    }

    log::info!(
        "processed {frames} frames: {}",
        counts
            .iter()
            .map(|(label, count)| format!("{label}={count}"))
            .join(", ")
    );
    Ok(())
}
