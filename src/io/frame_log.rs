//! CSV frame logs: recorded capture sequences replayed through a session.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::warn;

use crate::evaluation::{FrameScorer, ScoreError};
use crate::frame::{
    CameraIntrinsics, EulerAngles, Frame, FrameBuilder, FrameId, ImageHandle, SharedFrame,
    SourceId, TrackingQuality,
};
use crate::geometry::{SE3, TimedPose, deg_to_rad};

/// One row of a recorded frame log.
///
/// Angles are in degrees, pose is camera-to-world with a w-first quaternion.
/// An empty `score` means the recording has no score for that frame.
#[derive(Debug, Clone, Deserialize)]
struct FrameRecord {
    timestamp_s: f64,
    source: u32,
    tx: f64,
    ty: f64,
    tz: f64,
    qw: f64,
    qx: f64,
    qy: f64,
    qz: f64,
    pitch_deg: f64,
    yaw_deg: f64,
    roll_deg: f64,
    tracking: String,
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
    score: Option<f64>,
}

/// A replayable frame sequence with the score recorded for each frame.
#[derive(Debug, Clone, Default)]
pub struct FrameLog {
    pub frames: Vec<SharedFrame>,
    scores: HashMap<FrameId, f64>,
}

impl FrameLog {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .comment(Some(b'#'))
            .trim(Trim::All)
            .from_reader(reader);

        let mut log = FrameLog::default();
        let mut last_timestamp = f64::NEG_INFINITY;
        for (idx, rec) in rdr.deserialize::<FrameRecord>().enumerate() {
            let rec = rec.with_context(|| format!("Bad record at row {}", idx + 1))?;
            if rec.timestamp_s < last_timestamp {
                bail!(
                    "Row {}: timestamp {} goes backwards from {}",
                    idx + 1,
                    rec.timestamp_s,
                    last_timestamp
                );
            }
            last_timestamp = rec.timestamp_s;

            let id = idx as u64 + 1;
            let frame = record_to_frame(id, &rec).with_context(|| format!("Row {}", idx + 1))?;
            match rec.score {
                Some(score) => {
                    log.scores.insert(frame.id, score);
                }
                None => warn!("[FrameLog] {} has no recorded score", frame.id),
            }
            log.frames.push(frame.into_shared());
        }
        Ok(log)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn duration_s(&self) -> f64 {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) => last.timestamp_s - first.timestamp_s,
            _ => 0.0,
        }
    }

    /// Camera pose at an arbitrary time inside the log, interpolated between
    /// the two surrounding frames.
    pub fn pose_at(&self, timestamp_s: f64) -> Option<SE3> {
        let idx = self
            .frames
            .partition_point(|f| f.timestamp_s <= timestamp_s);
        if idx == 0 {
            return None;
        }
        let before = &self.frames[idx - 1];
        if before.timestamp_s == timestamp_s {
            return Some(before.pose.clone());
        }
        let after = self.frames.get(idx)?;
        TimedPose::interpolate_at(
            &TimedPose::new(before.timestamp_s, before.pose.clone()),
            &TimedPose::new(after.timestamp_s, after.pose.clone()),
            timestamp_s,
        )
    }

    /// Scorer that answers with the recorded scores.
    pub fn scorer(&self) -> Arc<dyn FrameScorer> {
        Arc::new(RecordedScorer {
            scores: self.scores.clone(),
        })
    }
}

struct RecordedScorer {
    scores: HashMap<FrameId, f64>,
}

impl FrameScorer for RecordedScorer {
    fn score(&self, frame: &Frame) -> Result<f64, ScoreError> {
        self.scores
            .get(&frame.id)
            .copied()
            .ok_or_else(|| ScoreError::Failed(format!("no recorded score for {}", frame.id)))
    }
}

fn record_to_frame(id: u64, rec: &FrameRecord) -> Result<Frame> {
    let tracking: TrackingQuality = rec.tracking.parse().map_err(|e: String| anyhow!(e))?;
    let pose = SE3::from_quaternion(
        rec.qw,
        rec.qx,
        rec.qy,
        rec.qz,
        nalgebra::Vector3::new(rec.tx, rec.ty, rec.tz),
    );
    Ok(FrameBuilder::new(id, rec.timestamp_s)
        .source(SourceId(rec.source))
        .pose(pose)
        .euler(EulerAngles::new(
            deg_to_rad(rec.pitch_deg),
            deg_to_rad(rec.yaw_deg),
            deg_to_rad(rec.roll_deg),
        ))
        .tracking(tracking)
        .intrinsics(CameraIntrinsics::new(rec.fx, rec.fy, rec.cx, rec.cy))
        .image(ImageHandle(id))
        .build())
}
