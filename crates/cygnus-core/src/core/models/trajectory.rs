use super::frame::Frame;
use super::selection::{AtomGroup, SelectionError};
use super::topology::Topology;

/// A trajectory materialized in memory.
///
/// The frames may have been concatenated from several coordinate segments (one per
/// simulation run) and thinned with a stride while loading. Both facts are kept so that
/// analyses can map frame indices back to runs and simulation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    topology: Topology,
    frames: Vec<Frame>,
    n_segments: usize,
    stride: usize,
}

impl Trajectory {
    /// Creates a single-run trajectory with unit stride.
    pub fn new(topology: Topology, frames: Vec<Frame>) -> Self {
        Self {
            topology,
            frames,
            n_segments: 1,
            stride: 1,
        }
    }

    /// Records how many coordinate segments (runs) the frames were concatenated from.
    pub fn with_segments(mut self, n_segments: usize) -> Self {
        self.n_segments = n_segments.max(1);
        self
    }

    /// Records the frame stride that was applied while loading.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride.max(1);
        self
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn n_segments(&self) -> usize {
        self.n_segments
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Resolves a selector string against the trajectory's topology.
    pub fn select_atoms(&self, expression: &str) -> Result<AtomGroup, SelectionError> {
        self.topology.select(expression)
    }

    /// Returns a copy of this trajectory with its frames replaced, keeping the topology and
    /// run bookkeeping.
    pub fn with_frames(&self, frames: Vec<Frame>) -> Self {
        Self {
            topology: self.topology.clone(),
            frames,
            n_segments: self.n_segments,
            stride: self.stride,
        }
    }
}

/// Keeps every `stride`-th frame of a sequence, starting with the first.
pub fn apply_stride(frames: Vec<Frame>, stride: usize) -> Vec<Frame> {
    let stride = stride.max(1);
    frames.into_iter().step_by(stride).collect()
}
