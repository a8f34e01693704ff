use nalgebra::DMatrix;
use tracing::{info, instrument};

use super::Analysis;
use super::figure::{Axis, Figure, Layer, Orientation, Plot, PlotStyle};
use crate::core::models::trajectory::Trajectory;
use crate::engine::alignment::{align_trajectory, pairwise_rmsd};
use crate::engine::config::PairwiseConfig;
use crate::engine::error::AnalysisError;
use crate::engine::progress::ProgressReporter;

/// How the frames of a concatenated trajectory map onto runs and simulation time.
///
/// All divisions truncate. When the run count does not divide the frame count, the
/// leftover frames fall after the last tick and boundary lines sit slightly early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLayout {
    pub n_frames: usize,
    pub n_runs: usize,
    pub frames_per_run: usize,
    pub sim_time_ns: u64,
    pub time_per_run_ns: u64,
}

impl RunLayout {
    /// # Errors
    ///
    /// Returns [`AnalysisError::RunLayout`] when there are no runs or fewer frames than
    /// runs. Every run must hold at least one frame, so `frames_per_run` is never zero.
    pub fn new(
        n_frames: usize,
        n_runs: usize,
        stride: usize,
        timestep_ps: f64,
    ) -> Result<Self, AnalysisError> {
        if n_runs == 0 || n_frames < n_runs {
            return Err(AnalysisError::RunLayout {
                frames: n_frames,
                runs: n_runs,
            });
        }
        let total_ps = n_frames as f64 * stride as f64 * timestep_ps;
        let sim_time_ns = (total_ps / 1000.0).floor().max(0.0) as u64;
        Ok(Self {
            n_frames,
            n_runs,
            frames_per_run: n_frames / n_runs,
            sim_time_ns,
            time_per_run_ns: sim_time_ns / n_runs as u64,
        })
    }

    /// Frame-axis tick positions: `k * frames_per_run` for `k = 0..=R`.
    pub fn frame_ticks(&self) -> Vec<usize> {
        (0..=self.n_runs).map(|k| k * self.frames_per_run).collect()
    }

    /// Time-axis labels in ns: `k * time_per_run` for `k = 0..=R`.
    pub fn time_labels(&self) -> Vec<u64> {
        (0..=self.n_runs as u64)
            .map(|k| k * self.time_per_run_ns)
            .collect()
    }

    /// Frame indices where one run ends and the next begins.
    pub fn boundaries(&self) -> Vec<usize> {
        (self.frames_per_run..self.n_frames)
            .step_by(self.frames_per_run)
            .collect()
    }
}

/// An all-frames RMSD matrix with its run bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralMatrix {
    pub matrix: DMatrix<f64>,
    pub layout: RunLayout,
    pub selection: String,
}

impl Plot for StructuralMatrix {
    fn plot(&self, style: &PlotStyle) -> Figure {
        let mut figure = Figure::styled(style);
        figure.push(Layer::Image {
            data: self.matrix.clone(),
            colormap: style.colormap.clone(),
            colorbar_label: "RMSD (Å)".to_string(),
        });
        for boundary in self.layout.boundaries() {
            for orientation in [Orientation::Vertical, Orientation::Horizontal] {
                figure.push(Layer::Guide {
                    orientation,
                    position: boundary as f64,
                    color: style.boundary_color.clone(),
                });
            }
        }

        let time_axis = || Axis {
            label: Some("Time (ns)".to_string()),
            ticks: self.layout.frame_ticks().iter().map(|&t| t as f64).collect(),
            tick_labels: self
                .layout
                .time_labels()
                .iter()
                .map(|t| t.to_string())
                .collect(),
            limits: None,
        };
        figure.format(
            style,
            Some("Pairwise RMSD".to_string()),
            time_axis(),
            time_axis(),
        )
    }
}

/// Aligns a multi-run trajectory and computes its pairwise RMSD matrix.
pub struct PairwiseRmsd<'a> {
    trajectory: &'a Trajectory,
    config: &'a PairwiseConfig,
    reporter: Option<&'a ProgressReporter<'a>>,
}

impl<'a> PairwiseRmsd<'a> {
    pub fn new(trajectory: &'a Trajectory, config: &'a PairwiseConfig) -> Self {
        Self {
            trajectory,
            config,
            reporter: None,
        }
    }

    pub fn with_reporter(mut self, reporter: &'a ProgressReporter<'a>) -> Self {
        self.reporter = Some(reporter);
        self
    }
}

impl Analysis for PairwiseRmsd<'_> {
    type Output = StructuralMatrix;

    #[instrument(skip_all, name = "pairwise_rmsd")]
    fn process(&self) -> Result<StructuralMatrix, AnalysisError> {
        let silent = ProgressReporter::new();
        let reporter = self.reporter.unwrap_or(&silent);

        let layout = RunLayout::new(
            self.trajectory.n_frames(),
            self.trajectory.n_segments(),
            self.trajectory.stride(),
            self.config.timestep_ps,
        )?;
        info!(
            frames = layout.n_frames,
            runs = layout.n_runs,
            sim_time_ns = layout.sim_time_ns,
            selection = %self.config.selection,
            "Starting pairwise RMSD."
        );

        let group = self.trajectory.select_atoms(&self.config.selection)?;
        let aligned =
            align_trajectory(self.trajectory, &group, self.config.reference_frame, reporter)?;
        let matrix = pairwise_rmsd(&aligned, &group, reporter)?;

        Ok(StructuralMatrix {
            matrix,
            layout,
            selection: self.config.selection.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::frame::Frame;
    use crate::core::models::topology::Topology;
    use crate::engine::config::PairwiseConfigBuilder;
    use nalgebra::Point3;

    fn breathing_trajectory(n_frames: usize, n_runs: usize, stride: usize) -> Trajectory {
        let mut topology = Topology::new();
        for name in ["N", "CA", "C", "O"] {
            topology.push(name, "GLY", 1);
        }
        let frames = (0..n_frames)
            .map(|f| {
                let s = 1.0 + 0.05 * f as f64;
                Frame::new(vec![
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(s, 0.0, 0.0),
                    Point3::new(s, s, 0.0),
                    Point3::new(0.0, s, s),
                ])
            })
            .collect();
        Trajectory::new(topology, frames)
            .with_segments(n_runs)
            .with_stride(stride)
    }

    #[test]
    fn floor_division_identity_holds() {
        for n_frames in 1..40 {
            for n_runs in 1..=n_frames.min(7) {
                let layout = RunLayout::new(n_frames, n_runs, 1, 1.0).unwrap();
                let fpr = layout.frames_per_run;
                assert!(fpr * n_runs <= n_frames);
                assert!(n_frames < fpr * n_runs + n_runs);
            }
        }
    }

    #[test]
    fn simulation_time_truncates_to_whole_nanoseconds() {
        // 2501 frames * stride 2 * 10 ps = 50.02 ns
        let layout = RunLayout::new(2501, 5, 2, 10.0).unwrap();
        assert_eq!(layout.sim_time_ns, 50);
        assert_eq!(layout.time_per_run_ns, 10);
        assert_eq!(layout.frames_per_run, 500);
    }

    #[test]
    fn ticks_and_labels_have_one_point_per_run_edge() {
        let layout = RunLayout::new(10, 3, 1, 1000.0).unwrap();
        assert_eq!(layout.frame_ticks(), vec![0, 3, 6, 9]);
        assert_eq!(layout.time_labels(), vec![0, 3, 6, 9]);
        assert_eq!(layout.boundaries(), vec![3, 6, 9]);
        assert_eq!(layout.frame_ticks().len(), layout.time_labels().len());
    }

    #[test]
    fn fewer_frames_than_runs_is_a_layout_error() {
        assert!(matches!(
            RunLayout::new(2, 3, 1, 1.0),
            Err(AnalysisError::RunLayout { frames: 2, runs: 3 })
        ));
        assert!(matches!(
            RunLayout::new(2, 3, 1, 1000.0),
            Err(AnalysisError::RunLayout { frames: 2, runs: 3 })
        ));
        assert!(matches!(
            RunLayout::new(5, 0, 1, 1000.0),
            Err(AnalysisError::RunLayout { frames: 5, runs: 0 })
        ));
    }

    #[test]
    fn one_frame_per_run_keeps_every_boundary() {
        let layout = RunLayout::new(3, 3, 1, 1000.0).unwrap();
        assert_eq!(layout.frames_per_run, 1);
        assert_eq!(layout.boundaries(), vec![1, 2]);
    }

    #[test]
    fn process_rejects_more_runs_than_frames_before_aligning() {
        let trajectory = breathing_trajectory(2, 3, 1);
        let config = PairwiseConfigBuilder::new()
            .selection("all")
            .timestep_ps(1000.0)
            .build()
            .unwrap();
        let err = PairwiseRmsd::new(&trajectory, &config).process().unwrap_err();
        assert!(matches!(err, AnalysisError::RunLayout { frames: 2, runs: 3 }));
    }

    #[test]
    fn process_builds_symmetric_matrix_and_layout() {
        let trajectory = breathing_trajectory(6, 2, 5);
        let config = PairwiseConfigBuilder::new()
            .selection("backbone")
            .timestep_ps(100.0)
            .build()
            .unwrap();
        let result = PairwiseRmsd::new(&trajectory, &config).process().unwrap();

        assert_eq!(result.matrix.shape(), (6, 6));
        for i in 0..6 {
            assert_eq!(result.matrix[(i, i)], 0.0);
            for j in 0..6 {
                assert_eq!(result.matrix[(i, j)], result.matrix[(j, i)]);
            }
        }
        assert!(result.matrix[(0, 5)] > result.matrix[(0, 1)]);
        assert_eq!(result.layout.sim_time_ns, 3);
        assert_eq!(result.layout.frames_per_run, 3);
    }

    #[test]
    fn plot_marks_run_boundaries_on_both_axes() {
        let trajectory = breathing_trajectory(6, 3, 1);
        let config = PairwiseConfigBuilder::new()
            .selection("all")
            .timestep_ps(1000.0)
            .build()
            .unwrap();
        let figure = PairwiseRmsd::new(&trajectory, &config)
            .process()
            .unwrap()
            .plot(&PlotStyle::default());

        let guides = figure
            .layers
            .iter()
            .filter(|l| matches!(l, Layer::Guide { color, .. } if color == "white"))
            .count();
        assert_eq!(guides, 4);
        assert_eq!(figure.x_axis.ticks, vec![0.0, 2.0, 4.0, 6.0]);
        assert_eq!(figure.y_axis.tick_labels, vec!["0", "2", "4", "6"]);
    }
}
