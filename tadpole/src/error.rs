use thiserror::Error;

use crate::pipeline::Stage;

/// Reasons an input image is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("expected 3 channels, got {channels}")]
    ChannelCount { channels: usize },

    #[error("image has zero area ({width}x{height})")]
    EmptyImage { width: usize, height: usize },

    #[error("sample count {len} does not match {width}x{height}x{channels}")]
    BufferLength {
        len: usize,
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error("non-finite value at ({x}, {y}) channel {channel}")]
    NonFinite { x: usize, y: usize, channel: usize },

    #[error("channel combination produced a non-finite intensity at ({x}, {y})")]
    NonFiniteIntensity { x: usize, y: usize },
}

/// Errors returned by the segmentation pipeline.
///
/// Only malformed input fails. Degenerate thresholds and empty marker sets
/// are valid outcomes that yield zero regions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentError {
    #[error("invalid input detected at {stage} stage: {source}")]
    InvalidInput {
        stage: Stage,
        #[source]
        source: InputError,
    },
}

impl SegmentError {
    pub(crate) fn invalid_input(stage: Stage, source: InputError) -> Self {
        SegmentError::InvalidInput { stage, source }
    }

    /// Stage at which the error was detected.
    pub fn stage(&self) -> Stage {
        match self {
            SegmentError::InvalidInput { stage, .. } => *stage,
        }
    }
}

pub type Result<T> = std::result::Result<T, SegmentError>;
