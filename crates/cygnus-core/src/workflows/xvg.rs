use std::path::Path;

use super::figure::{Axis, Figure, Layer, Plot, PlotStyle};
use crate::core::io::traits::SeriesFile;
use crate::core::io::xvg::{XvgFile, XvgTable};
use crate::engine::error::AnalysisError;

/// How a plain XVG series is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesKind {
    /// Axis labels come from the file's metadata.
    #[default]
    Generic,
    EnergyMinimisation,
    PullForce,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XvgSeries {
    pub kind: SeriesKind,
    pub table: XvgTable,
}

impl XvgSeries {
    pub fn new(kind: SeriesKind, table: XvgTable) -> Self {
        Self { kind, table }
    }

    pub fn load(path: impl AsRef<Path>, kind: SeriesKind) -> Result<Self, AnalysisError> {
        Ok(Self::new(kind, XvgFile::read_from_path(path)?))
    }
}

impl Plot for XvgSeries {
    fn plot(&self, style: &PlotStyle) -> Figure {
        let x = self.table.x.clone();
        let y = self.table.y().to_vec();
        let mut figure = Figure::styled(style);

        let (x_axis, y_axis) = match self.kind {
            SeriesKind::Generic => {
                figure.push(Layer::line(None, x, y, style.color(0)));
                let axis = |label: &Option<String>| Axis {
                    label: label.clone(),
                    ..Axis::default()
                };
                (axis(&self.table.x_label), axis(&self.table.y_label))
            }
            SeriesKind::EnergyMinimisation => {
                figure.push(Layer::line(None, x, y, "black"));
                (
                    Axis::labelled("Steps"),
                    Axis::labelled("Potential Energy (kJ/mol)"),
                )
            }
            SeriesKind::PullForce => {
                let mut line = Layer::line(None, x, y, "black");
                if let Layer::Line { line_width, .. } = &mut line {
                    *line_width = 0.8;
                }
                figure.push(line);
                (Axis::labelled("Time (ps)"), Axis::labelled("Force (kJ/mol/nm)"))
            }
        };
        figure.format(style, self.table.title.clone(), x_axis, y_axis)
    }
}
