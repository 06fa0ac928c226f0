//! Headless progress sweep: feed evenly spaced scroll positions through the
//! mapper and emit one JSON object per sample.
//!
//! Each sample is settled (the idle window is taken to have elapsed) unless
//! `live` is set, in which case frames are reported mid-scroll.

use std::io::Write;
use std::time::{Duration, Instant};

use serde::Serialize;

use spindle_core::catalog::Side;
use spindle_core::config::Config;
use spindle_core::mapper::{ScrollStateMapper, ViewFrame};
use spindle_core::scene::Scene;

#[derive(Debug, Clone, Serialize)]
pub struct TraceRow {
    pub step: usize,
    #[serde(flatten)]
    pub frame: ViewFrame,
    pub side: Side,
    pub track_index_in_side: usize,
    pub tonearm_angle: f64,
    pub title: String,
}

/// Upper bound on samples per sweep.
const MAX_STEPS: usize = 1_000_000;

#[derive(Debug, Clone, Copy)]
pub struct Sweep {
    pub from: f64,
    pub to: f64,
    pub steps: usize,
    pub live: bool,
}

/// Samples actually taken for a requested step count: at least both
/// endpoints, at most `MAX_STEPS`.
fn sample_count(steps: usize) -> usize {
    if steps > MAX_STEPS {
        tracing::warn!("trace: {} steps requested, capped at {}", steps, MAX_STEPS);
    }
    steps.clamp(2, MAX_STEPS)
}

/// Offset of sample `i` from the start of the sweep.
fn sample_offset(spacing: Duration, i: usize) -> Duration {
    spacing.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX))
}

/// Run the sweep against `track_titles.len()` tracks.
pub fn sweep(config: &Config, track_titles: &[String], sweep: Sweep) -> Vec<TraceRow> {
    let window = config.debounce.idle_window();
    let mut mapper = ScrollStateMapper::new(track_titles.len(), config.zones, window);
    let steps = sample_count(sweep.steps);
    // space samples a full window apart so settling is always due
    let spacing = window.saturating_mul(2).max(Duration::from_millis(1));
    let t0 = Instant::now();

    (0..steps)
        .map(|i| {
            let p = sweep.from + (sweep.to - sweep.from) * i as f64 / (steps - 1) as f64;
            let at = t0 + sample_offset(spacing, i);
            let mut frame = mapper.update(p, at);
            if !sweep.live {
                if let Some(settled) = mapper.settle(at + window) {
                    frame = settled;
                }
            }
            let scene = Scene::from_frame(&frame);
            TraceRow {
                step: i,
                frame,
                side: frame.side(),
                track_index_in_side: frame.track_index_in_side(),
                tonearm_angle: scene.tonearm_angle,
                title: track_titles
                    .get(frame.current_track)
                    .cloned()
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Write rows as JSON lines.
pub fn write_rows<W: Write>(rows: &[TraceRow], mut out: W) -> anyhow::Result<()> {
    for row in rows {
        serde_json::to_writer(&mut out, row)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
