//! Perception source
//!
//! Frames arrive as JSON lines, one per camera frame:
//!
//! ```text
//! {"label": "Open_Palm", "confidence": 0.92, "landmarks": [[0.5, 0.9, 0.0], ...], "timestamp": 1718000000.25}
//! {"label": "None", "confidence": 0.0}
//! {"error": "camera read failed"}
//! ```
//!
//! `landmarks` may also be a flat `[x0, y0, z0, x1, ...]` array. A line that
//! cannot be parsed, or that reports an `error`, is a transient fault.

use chrono::{DateTime, Utc};
use gmc_common::time::from_unix_seconds;
use gmc_common::Gesture;
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::error::{EngineError, Result};
use crate::fusion::ClassifierHypothesis;
use crate::landmarks::LandmarkPoint;

/// One frame's worth of perception signals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSignal {
    pub classifier: Option<ClassifierHypothesis>,
    pub landmarks: Option<Vec<LandmarkPoint>>,
    /// Capture time, when the producer supplies one
    pub timestamp: Option<DateTime<Utc>>,
}

impl FrameSignal {
    pub fn classifier(label: impl Into<Gesture>, confidence: f32) -> Self {
        Self {
            classifier: Some(ClassifierHypothesis::new(label, confidence)),
            ..Self::default()
        }
    }

    pub fn with_landmarks(mut self, landmarks: Vec<LandmarkPoint>) -> Self {
        self.landmarks = Some(landmarks);
        self
    }
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    landmarks: Option<RawLandmarks>,
    #[serde(default)]
    timestamp: Option<f64>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLandmarks {
    Points(Vec<Vec<f32>>),
    Flat(Vec<f32>),
}

impl RawLandmarks {
    fn into_points(self) -> std::result::Result<Vec<LandmarkPoint>, String> {
        match self {
            RawLandmarks::Flat(values) => {
                if values.len() % 3 != 0 {
                    return Err(format!(
                        "flat landmark array length {} is not a multiple of 3",
                        values.len()
                    ));
                }
                Ok(values
                    .chunks_exact(3)
                    .map(|c| LandmarkPoint { x: c[0], y: c[1], z: c[2] })
                    .collect())
            }
            RawLandmarks::Points(points) => points
                .into_iter()
                .enumerate()
                .map(|(i, p)| match p.as_slice() {
                    [x, y] => Ok(LandmarkPoint::new(*x, *y, 0.0)),
                    [x, y, z] => Ok(LandmarkPoint::new(*x, *y, *z)),
                    _ => Err(format!("landmark {} has {} coordinates", i, p.len())),
                })
                .collect(),
        }
    }
}

/// Parse one JSON line into a frame signal.
pub fn parse_frame_line(line_no: u64, line: &str) -> Result<FrameSignal> {
    let malformed = |reason: String| EngineError::MalformedFrame { line: line_no, reason };

    let raw: RawFrame = serde_json::from_str(line).map_err(|e| malformed(e.to_string()))?;

    if let Some(error) = raw.error {
        return Err(malformed(format!("producer reported: {}", error)));
    }

    let classifier = match raw.label {
        Some(label) => Some(ClassifierHypothesis::new(
            label.as_str(),
            raw.confidence.unwrap_or(0.0),
        )),
        None => None,
    };

    let landmarks = raw
        .landmarks
        .map(RawLandmarks::into_points)
        .transpose()
        .map_err(malformed)?;

    let timestamp = match raw.timestamp {
        Some(secs) => Some(
            from_unix_seconds(secs).ok_or_else(|| malformed(format!("invalid timestamp {}", secs)))?,
        ),
        None => None,
    };

    Ok(FrameSignal {
        classifier,
        landmarks,
        timestamp,
    })
}

/// Reads frame signals from a line-oriented async reader
pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    line_no: u64,
}

impl<R: AsyncBufRead + Unpin> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    /// Next frame, `None` at end of input.
    ///
    /// Blank lines are skipped. Per-line faults come back as transient
    /// errors; I/O failures are fatal.
    pub async fn next_signal(&mut self) -> Option<Result<FrameSignal>> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => return Some(Err(EngineError::Io(e))),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }
            return Some(parse_frame_line(self.line_no, &line));
        }
    }

    pub fn lines_read(&self) -> u64 {
        self.line_no
    }
}
