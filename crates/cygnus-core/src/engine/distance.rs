use nalgebra::{DMatrix, Point3};
use tracing::debug;

use super::error::AnalysisError;
use super::progress::{Progress, ProgressReporter, phase};
use crate::core::models::frame::{Frame, PeriodicBox};
use crate::core::models::selection::AtomGroup;
use crate::core::models::trajectory::Trajectory;
use crate::core::utils::geometry::pbc_distance;

/// Computes the `r × s` matrix of minimum-image distances between two position sets.
///
/// Row `i` holds the distances from `reference[i]` to every selection atom. A single
/// reference atom is just the `r = 1` case; nothing special happens for it here.
///
/// # Errors
///
/// Returns [`AnalysisError::Shape`] if either position set is empty.
pub fn distance_array(
    reference: &[Point3<f64>],
    selection: &[Point3<f64>],
    periodic_box: Option<&PeriodicBox>,
) -> Result<DMatrix<f64>, AnalysisError> {
    if reference.is_empty() || selection.is_empty() {
        return Err(AnalysisError::Shape(format!(
            "distance array needs non-empty inputs, got {} reference and {} selection atom(s)",
            reference.len(),
            selection.len()
        )));
    }
    Ok(DMatrix::from_fn(reference.len(), selection.len(), |i, j| {
        pbc_distance(&reference[i], &selection[j], periodic_box)
    }))
}

/// Per-frame distance arrays with singleton dimensions squeezed away.
#[derive(Debug, Clone, PartialEq)]
pub enum DistanceSamples {
    /// One reference and one selection atom: a single distance per frame.
    Series(Vec<f64>),
    /// One side has a single atom: an `F × k` matrix, `k` being the other side's size.
    Columns(DMatrix<f64>),
    /// Several atoms on both sides: one `r × s` matrix per frame.
    Full(Vec<DMatrix<f64>>),
}

impl DistanceSamples {
    pub fn n_frames(&self) -> usize {
        match self {
            DistanceSamples::Series(values) => values.len(),
            DistanceSamples::Columns(matrix) => matrix.nrows(),
            DistanceSamples::Full(frames) => frames.len(),
        }
    }

    /// Collapses each frame to the arithmetic mean of its distances.
    ///
    /// For [`DistanceSamples::Columns`] this is the mean over the `k` equivalent atoms;
    /// for [`DistanceSamples::Full`] the mean runs over all `r × s` entries.
    pub fn mean_per_frame(&self) -> Vec<f64> {
        match self {
            DistanceSamples::Series(values) => values.clone(),
            DistanceSamples::Columns(matrix) => {
                matrix.row_iter().map(|row| row.mean()).collect()
            }
            DistanceSamples::Full(frames) => frames.iter().map(|m| m.mean()).collect(),
        }
    }

    fn squeeze(arrays: Vec<DMatrix<f64>>, n_reference: usize, n_selection: usize) -> Self {
        match (n_reference, n_selection) {
            (1, 1) => DistanceSamples::Series(arrays.iter().map(|m| m[(0, 0)]).collect()),
            (1, k) | (k, 1) => {
                DistanceSamples::Columns(DMatrix::from_fn(arrays.len(), k, |f, j| arrays[f][j]))
            }
            _ => DistanceSamples::Full(arrays),
        }
    }
}

/// Drives [`distance_array`] across a trajectory in a single forward pass.
pub struct DistanceSampler<'a> {
    reference: &'a AtomGroup,
    selection: &'a AtomGroup,
}

impl<'a> DistanceSampler<'a> {
    pub fn new(reference: &'a AtomGroup, selection: &'a AtomGroup) -> Self {
        Self {
            reference,
            selection,
        }
    }

    fn frame_array(&self, index: usize, frame: &Frame) -> Result<DMatrix<f64>, AnalysisError> {
        let missing = |group: &AtomGroup| {
            AnalysisError::Shape(format!(
                "frame {} has {} atom(s), too few for selection '{}'",
                index,
                frame.n_atoms(),
                group.expression()
            ))
        };
        let reference = self
            .reference
            .positions(frame)
            .ok_or_else(|| missing(self.reference))?;
        let selection = self
            .selection
            .positions(frame)
            .ok_or_else(|| missing(self.selection))?;
        distance_array(&reference, &selection, frame.periodic_box.as_ref())
    }

    /// Visits frames `0..F` once, in order, and returns one sample per frame.
    ///
    /// # Errors
    ///
    /// Fails on the first frame that cannot supply positions for both groups.
    pub fn sample(
        &self,
        trajectory: &Trajectory,
        reporter: &ProgressReporter,
    ) -> Result<DistanceSamples, AnalysisError> {
        debug!(
            reference = self.reference.expression(),
            selection = self.selection.expression(),
            frames = trajectory.n_frames(),
            "Sampling distances."
        );
        reporter.start_task(phase::DISTANCE_SAMPLING, trajectory.n_frames());
        let arrays = trajectory.frames().iter().enumerate().try_fold(
            Vec::with_capacity(trajectory.n_frames()),
            |mut acc, (index, frame)| {
                acc.push(self.frame_array(index, frame)?);
                reporter.report(Progress::TaskIncrement);
                Ok::<_, AnalysisError>(acc)
            },
        )?;
        reporter.finish_task();

        Ok(DistanceSamples::squeeze(
            arrays,
            self.reference.len(),
            self.selection.len(),
        ))
    }
}
