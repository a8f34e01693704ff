use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use super::Analysis;
use super::figure::{Axis, Figure, Layer, Plot, PlotStyle};
use crate::core::io::traits::SeriesFile;
use crate::core::io::xvg::{XvgFile, XvgTable};
use crate::engine::error::AnalysisError;

/// Window of the smoothing average applied to RMSF profiles.
pub const RMSF_WINDOW: usize = 5;

/// Centered moving average over `values`, in input order.
///
/// The window for position `i` spans `[i - w/2, i - w/2 + w - 1]`. Positions whose window
/// would leave the series have no average and yield `None`, as does every position for a
/// zero window.
pub fn centered_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let half = window / 2;
    (0..values.len())
        .map(|i| {
            if window == 0 || i < half {
                return None;
            }
            let start = i - half;
            let slice = values.get(start..start + window)?;
            Some(slice.iter().sum::<f64>() / window as f64)
        })
        .collect()
}

/// A per-residue fluctuation profile with its smoothed companion column.
#[derive(Debug, Clone, PartialEq)]
pub struct RmsfSeries {
    pub label: String,
    pub residues: Vec<f64>,
    pub values: Vec<f64>,
    pub rolling: Vec<Option<f64>>,
}

impl RmsfSeries {
    /// Smooths the first value column of a table.
    pub fn from_table(table: &XvgTable, label: impl Into<String>) -> Self {
        let values = table.y().to_vec();
        let rolling = centered_moving_average(&values, RMSF_WINDOW);
        Self {
            label: label.into(),
            residues: table.x.clone(),
            values,
            rolling,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Plot for RmsfSeries {
    fn plot(&self, style: &PlotStyle) -> Figure {
        let mut figure = Figure::styled(style);
        figure.push(Layer::Line {
            label: Some("Raw data".to_string()),
            x: self.residues.clone(),
            y: self.values.iter().copied().map(Some).collect(),
            color: style.color(0).to_string(),
            line_width: 1.5,
            alpha: 0.1,
            marker: None,
        });
        figure.push(Layer::Line {
            label: Some("Rolling average".to_string()),
            x: self.residues.clone(),
            y: self.rolling.clone(),
            color: style.color(0).to_string(),
            line_width: 1.5,
            alpha: 1.0,
            marker: None,
        });
        figure.legend = true;
        figure.format(
            style,
            Some(format!("RMSF ({})", self.label)),
            Axis::labelled("Residue number"),
            Axis::labelled("RMSF (nm)"),
        )
    }
}

/// Overlays the raw profiles of several runs on one set of axes.
pub fn compare_rmsf(series: &[RmsfSeries], style: &PlotStyle) -> Figure {
    let mut figure = Figure::styled(style);
    for (i, s) in series.iter().enumerate() {
        figure.push(Layer::line(
            Some(s.label.clone()),
            s.residues.clone(),
            s.values.clone(),
            style.color(i),
        ));
    }
    figure.legend = true;
    figure.format(
        style,
        None,
        Axis::labelled("Residue number"),
        Axis::labelled("RMSF (nm)").with_limits(0.0, 1.0),
    )
}

/// Reads an RMSF `.xvg` file and smooths it.
pub struct RmsfAnalysis {
    path: PathBuf,
    label: String,
}

impl RmsfAnalysis {
    pub fn new(path: impl AsRef<Path>, label: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            label: label.into(),
        }
    }
}

impl Analysis for RmsfAnalysis {
    type Output = RmsfSeries;

    #[instrument(skip_all, name = "rmsf")]
    fn process(&self) -> Result<RmsfSeries, AnalysisError> {
        let table = XvgFile::read_from_path(&self.path)?;
        debug!(path = %self.path.display(), residues = table.len(), "Read RMSF profile.");
        Ok(RmsfSeries::from_table(&table, self.label.clone()))
    }
}
