use std::path::Path;

use super::figure::{Axis, Figure, Layer, Plot, PlotStyle};
use crate::core::io::traits::SeriesFile;
use crate::core::io::xvg::{XvgFile, XvgTable};
use crate::engine::error::AnalysisError;

const XI_LABEL: &str = "ξ (nm)";

/// A potential of mean force along the pulling coordinate ξ, in kcal/mol.
#[derive(Debug, Clone, PartialEq)]
pub struct PmfProfile {
    pub xi: Vec<f64>,
    pub pmf: Vec<f64>,
}

impl PmfProfile {
    /// # Errors
    ///
    /// Returns [`AnalysisError::Shape`] for a table without data.
    pub fn from_table(table: &XvgTable) -> Result<Self, AnalysisError> {
        if table.is_empty() {
            return Err(AnalysisError::Shape("PMF table has no data rows".into()));
        }
        Ok(Self {
            xi: table.x.clone(),
            pmf: table.y().to_vec(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        Self::from_table(&XvgFile::read_from_path(path)?)
    }

    /// `min(PMF) - max(PMF)`: the well depth as a (negative) binding free energy.
    pub fn binding_free_energy(&self) -> f64 {
        let min = self.pmf.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.pmf.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        min - max
    }
}

impl Plot for PmfProfile {
    fn plot(&self, style: &PlotStyle) -> Figure {
        let mut figure = Figure::styled(style);
        figure.push(Layer::line(
            None,
            self.xi.clone(),
            self.pmf.clone(),
            style.color(0),
        ));
        figure.format(
            style,
            None,
            Axis::labelled(XI_LABEL),
            Axis::labelled("PMF (kcal/mol)"),
        )
    }
}

/// Umbrella window histograms from `gmx wham`: one count column per window.
#[derive(Debug, Clone, PartialEq)]
pub struct WhamHistogram {
    pub bins: Vec<f64>,
    pub windows: Vec<Vec<f64>>,
}

impl WhamHistogram {
    pub fn from_table(table: &XvgTable) -> Self {
        Self {
            bins: table.x.clone(),
            windows: table.columns.clone(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        Ok(Self::from_table(&XvgFile::read_from_path(path)?))
    }

    pub fn n_windows(&self) -> usize {
        self.windows.len()
    }
}

impl Plot for WhamHistogram {
    fn plot(&self, style: &PlotStyle) -> Figure {
        let mut figure = Figure::styled(style);
        for (i, counts) in self.windows.iter().enumerate() {
            figure.push(Layer::Density {
                label: format!("Window {}", i + 1),
                x: self.bins.clone(),
                weights: counts.clone(),
                color: style.color(i).to_string(),
            });
        }
        figure.legend = true;
        figure.format(
            style,
            None,
            Axis::labelled(XI_LABEL).with_limits(0.0, 7.0),
            Axis::labelled("Density"),
        )
    }
}
