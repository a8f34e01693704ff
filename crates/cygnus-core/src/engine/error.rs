use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::energy::EnergyParseError;
use crate::core::io::gro::GroError;
use crate::core::io::xvg::XvgError;
use crate::core::models::selection::SelectionError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Selection error: {source}")]
    Selection {
        #[from]
        source: SelectionError,
    },

    #[error("Interaction {interaction} spans {found} frames, expected {expected}")]
    FrameCountMismatch {
        interaction: usize,
        expected: usize,
        found: usize,
    },

    #[error("Cannot combine tables with {left} and {right} columns")]
    ColumnCountMismatch { left: usize, right: usize },

    #[error("Cannot split {frames} frame(s) into {runs} run(s)")]
    RunLayout { frames: usize, runs: usize },

    #[error("Frame {index} is out of range for a trajectory of {n_frames} frame(s)")]
    FrameOutOfRange { index: usize, n_frames: usize },

    #[error("Superposition onto the reference failed for frame {frame}")]
    Superposition { frame: usize },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read coordinates: {0}")]
    Gro(#[from] GroError),

    #[error("Failed to read series: {0}")]
    Xvg(#[from] XvgError),

    #[error("Failed to read energy scan: {0}")]
    Energy(#[from] EnergyParseError),
}
