use itertools::Itertools;
use nalgebra::{DMatrix, Point3};
use tracing::{debug, info};

use super::error::AnalysisError;
use super::progress::{Progress, ProgressReporter, phase};
use crate::core::models::frame::Frame;
use crate::core::models::selection::AtomGroup;
use crate::core::models::trajectory::Trajectory;
use crate::core::utils::geometry::{calculate_rmsd, superposition};

fn group_positions(
    group: &AtomGroup,
    frame: &Frame,
    index: usize,
) -> Result<Vec<Point3<f64>>, AnalysisError> {
    group.positions(frame).ok_or_else(|| {
        AnalysisError::Shape(format!(
            "frame {} has {} atom(s), too few for selection '{}'",
            index,
            frame.n_atoms(),
            group.expression()
        ))
    })
}

/// Superimposes every frame onto `reference_frame`, fitting on `fit_group` only.
///
/// The fitted transform moves all atoms of a frame, not just the fitted ones. The
/// reference frame itself is transformed too, which leaves it unchanged up to rounding.
///
/// # Errors
///
/// Returns [`AnalysisError::FrameOutOfRange`] for a bad reference index, and
/// [`AnalysisError::Superposition`] if a frame cannot be fitted.
pub fn align_trajectory(
    trajectory: &Trajectory,
    fit_group: &AtomGroup,
    reference_frame: usize,
    reporter: &ProgressReporter,
) -> Result<Trajectory, AnalysisError> {
    let reference = trajectory
        .frame(reference_frame)
        .ok_or(AnalysisError::FrameOutOfRange {
            index: reference_frame,
            n_frames: trajectory.n_frames(),
        })?;
    let target = group_positions(fit_group, reference, reference_frame)?;

    info!(
        frames = trajectory.n_frames(),
        atoms = fit_group.len(),
        reference_frame,
        "Aligning trajectory."
    );
    reporter.start_task(phase::ALIGNMENT, trajectory.n_frames());

    let mut aligned = Vec::with_capacity(trajectory.n_frames());
    for (index, frame) in trajectory.frames().iter().enumerate() {
        let mobile = group_positions(fit_group, frame, index)?;
        let transform =
            superposition(&mobile, &target).ok_or(AnalysisError::Superposition { frame: index })?;
        let positions = frame
            .positions
            .iter()
            .map(|p| transform.transform_point(p))
            .collect();
        aligned.push(Frame {
            positions,
            periodic_box: frame.periodic_box,
            time_ps: frame.time_ps,
        });
        reporter.report(Progress::TaskIncrement);
    }
    reporter.finish_task();

    Ok(trajectory.with_frames(aligned))
}

/// Builds the symmetric `F × F` matrix of RMSD values between all frame pairs.
///
/// No fitting happens here; align the trajectory first. Only the upper triangle is
/// computed, then mirrored, so `M[i][j] == M[j][i]` exactly and the diagonal is zero.
pub fn pairwise_rmsd(
    trajectory: &Trajectory,
    group: &AtomGroup,
    reporter: &ProgressReporter,
) -> Result<DMatrix<f64>, AnalysisError> {
    let n = trajectory.n_frames();
    let coordinates = trajectory
        .frames()
        .iter()
        .enumerate()
        .map(|(index, frame)| group_positions(group, frame, index))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(frames = n, atoms = group.len(), "Computing pairwise RMSD matrix.");
    reporter.start_task(phase::PAIRWISE_RMSD, n * n.saturating_sub(1) / 2);

    let mut matrix = DMatrix::zeros(n, n);
    for (i, j) in (0..n).tuple_combinations() {
        let rmsd = calculate_rmsd(&coordinates[i], &coordinates[j]).ok_or_else(|| {
            AnalysisError::Shape(format!(
                "selection '{}' is empty, cannot compute RMSD",
                group.expression()
            ))
        })?;
        matrix[(i, j)] = rmsd;
        matrix[(j, i)] = rmsd;
        reporter.report(Progress::TaskIncrement);
    }
    reporter.finish_task();

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::topology::Topology;
    use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

    fn base_positions() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(1.5, 1.5, 0.0),
            Point3::new(0.0, 1.5, 1.0),
        ]
    }

    fn topology() -> Topology {
        let mut topology = Topology::new();
        for name in ["N", "CA", "C", "O"] {
            topology.push(name, "ALA", 1);
        }
        topology
    }

    /// Frames that are rigid motions of the same structure, except frame 2 whose last
    /// atom moves.
    fn moving_trajectory() -> Trajectory {
        let frames = (0..4)
            .map(|f| {
                let motion = Isometry3::from_parts(
                    Translation3::new(f as f64, -2.0 * f as f64, 0.5),
                    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.4 * f as f64),
                );
                let mut positions: Vec<Point3<f64>> =
                    base_positions().iter().map(|p| motion * p).collect();
                if f == 2 {
                    positions[3] += motion * Vector3::new(0.0, 0.0, 2.0);
                }
                Frame::new(positions)
            })
            .collect();
        Trajectory::new(topology(), frames)
    }

    #[test]
    fn rigid_motions_are_removed_by_alignment() {
        let trajectory = moving_trajectory();
        let fit = trajectory.select_atoms("name N CA C").unwrap();
        let aligned = align_trajectory(&trajectory, &fit, 0, &ProgressReporter::new()).unwrap();

        let reference = &aligned.frames()[0].positions;
        for f in [1, 3] {
            let rmsd = calculate_rmsd(reference, &aligned.frames()[f].positions).unwrap();
            assert!(rmsd < 1e-9, "frame {} rmsd {}", f, rmsd);
        }
        let rmsd = calculate_rmsd(reference, &aligned.frames()[2].positions).unwrap();
        assert!((rmsd - 1.0).abs() < 1e-9);
    }

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal() {
        let trajectory = moving_trajectory();
        let all = trajectory.select_atoms("all").unwrap();
        let aligned =
            align_trajectory(&trajectory, &all, 0, &ProgressReporter::new()).unwrap();
        let matrix = pairwise_rmsd(&aligned, &all, &ProgressReporter::new()).unwrap();

        assert_eq!(matrix.shape(), (4, 4));
        for i in 0..4 {
            assert_eq!(matrix[(i, i)], 0.0);
            for j in 0..4 {
                assert_eq!(matrix[(i, j)], matrix[(j, i)]);
            }
        }
        assert!(matrix[(0, 2)] > 0.1);
        assert!(matrix[(0, 1)] < 1e-9);
    }

    #[test]
    fn reference_frame_must_exist() {
        let trajectory = moving_trajectory();
        let all = trajectory.select_atoms("all").unwrap();
        let err = align_trajectory(&trajectory, &all, 9, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::FrameOutOfRange {
                index: 9,
                n_frames: 4
            }
        ));
    }

    #[test]
    fn alignment_keeps_metadata() {
        let trajectory = moving_trajectory().with_segments(2).with_stride(5);
        let all = trajectory.select_atoms("all").unwrap();
        let aligned = align_trajectory(&trajectory, &all, 1, &ProgressReporter::new()).unwrap();
        assert_eq!(aligned.n_segments(), 2);
        assert_eq!(aligned.stride(), 5);
        assert_eq!(aligned.n_frames(), 4);
    }
}
