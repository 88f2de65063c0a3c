//! Frame-script replay.
//!
//! A script is JSON lines, one tracking frame per line:
//!
//! ```text
//! {"t_ms": 0, "left_smile": 0.0, "right_smile": 0.8, "pucker": 0.0}
//! {"t_ms": 50, "left_smile": 0.0, "right_smile": 0.8, "pucker": 0.0, "calibrate": "back"}
//! ```
//!
//! `t_ms` is milliseconds since the start of the script. The optional
//! `calibrate` field starts a capture for that channel at the frame's time.
//! Blank lines and lines starting with `#` are skipped.

use std::io::Write;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use facetype_core::error::{FacetypeError, Result};
use facetype_core::types::{Channel, ChannelFrame};
use facetype_engine::{EngineEvent, FaceTypeEngine};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FrameLine {
    pub t_ms: u64,
    #[serde(default)]
    pub left_smile: f32,
    #[serde(default)]
    pub right_smile: f32,
    #[serde(default)]
    pub pucker: f32,
    #[serde(default)]
    pub calibrate: Option<Channel>,
}

impl FrameLine {
    pub fn frame(&self) -> ChannelFrame {
        ChannelFrame::new(self.left_smile, self.right_smile, self.pucker)
    }
}

/// Parse one script line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_frame_line(line: &str) -> Result<Option<FrameLine>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

#[derive(Serialize)]
struct EventLine<'a> {
    t_ms: u64,
    #[serde(flatten)]
    event: &'a EngineEvent,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub frames: usize,
    pub skipped: usize,
    pub events: usize,
}

/// Feed every frame of `reader` to `engine`, writing one JSON line per
/// confirmed action to `out`.
///
/// Frames whose timestamp goes backwards are skipped with a warning. A line
/// that fails to parse aborts the replay with its line number.
pub async fn replay<R, W>(
    engine: &mut FaceTypeEngine,
    reader: R,
    out: &mut W,
) -> Result<ReplaySummary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let base = Instant::now();
    let mut summary = ReplaySummary::default();
    let mut last_t_ms: Option<u64> = None;
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let parsed = parse_frame_line(&line)
            .map_err(|e| FacetypeError::Serialization(format!("line {}: {}", line_no, e)))?;
        let Some(frame_line) = parsed else {
            continue;
        };

        if last_t_ms.is_some_and(|last| frame_line.t_ms < last) {
            tracing::warn!(line = line_no, t_ms = frame_line.t_ms, "Out-of-order frame skipped");
            summary.skipped += 1;
            continue;
        }
        last_t_ms = Some(frame_line.t_ms);

        let now = base + Duration::from_millis(frame_line.t_ms);
        if let Some(channel) = frame_line.calibrate {
            engine.begin_calibration(channel, now);
        }
        summary.frames += 1;
        if let Some(event) = engine.on_frame(&frame_line.frame(), now) {
            summary.events += 1;
            let line = EventLine {
                t_ms: frame_line.t_ms,
                event: &event,
            };
            writeln!(out, "{}", serde_json::to_string(&line)?)?;
        }
    }

    tracing::info!(
        frames = summary.frames,
        skipped = summary.skipped,
        events = summary.events,
        "Replay finished"
    );
    Ok(summary)
}
