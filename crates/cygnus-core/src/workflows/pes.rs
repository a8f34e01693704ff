use std::path::Path;
use tracing::{info, instrument};

use super::Analysis;
use super::figure::{Axis, Figure, Layer, Plot, PlotStyle};
use crate::core::io::energy::EnergyParser;
use crate::core::models::profile::EnergyProfile;
use crate::engine::error::AnalysisError;

impl Plot for EnergyProfile {
    fn plot(&self, style: &PlotStyle) -> Figure {
        let (x, y): (Vec<f64>, Vec<f64>) = self.sorted_points().into_iter().unzip();
        let mut figure = Figure::styled(style);
        figure.push(Layer::Line {
            label: Some(self.label().to_string()),
            x,
            y: y.into_iter().map(Some).collect(),
            color: style.color(0).to_string(),
            line_width: 1.5,
            alpha: 1.0,
            marker: Some('x'),
        });
        figure.legend = true;
        figure.format(
            style,
            None,
            Axis::labelled("Distance (Å)"),
            Axis::labelled("Interaction energy (kcal/mol)"),
        )
    }
}

/// Parses an energy scan file with a chosen dialect.
pub struct EnergyScan<'a> {
    path: &'a Path,
    parser: &'a dyn EnergyParser,
}

impl<'a> EnergyScan<'a> {
    pub fn new(path: &'a Path, parser: &'a dyn EnergyParser) -> Self {
        Self { path, parser }
    }
}

impl Analysis for EnergyScan<'_> {
    type Output = EnergyProfile;

    #[instrument(skip_all, name = "energy_scan")]
    fn process(&self) -> Result<EnergyProfile, AnalysisError> {
        let profile = self.parser.parse_path(self.path)?;
        info!(
            label = profile.label(),
            points = profile.len(),
            "The minimum is at {:.2}, {:.2}",
            profile.min_distance(),
            profile.min_energy()
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::energy::{EnergyDialect, EnergyParseError};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn scan_reads_file_and_finds_minimum() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Distance Energy\n4.0 -1.0\n3.0 -2.0\n3.5 -2.5\n").unwrap();
        let parser = EnergyDialect::Sapt.parser(None, None).unwrap();
        let profile = EnergyScan::new(file.path(), parser.as_ref())
            .process()
            .unwrap();
        assert_eq!(profile.min_distance(), 3.5);
        assert_eq!(profile.minimum().index, 2);
    }

    #[test]
    fn plot_sorts_points_by_distance() {
        let profile =
            EnergyProfile::new("SAPT", vec![4.0, 3.0, 3.5], vec![-1.0, -2.0, -2.5]).unwrap();
        let figure = profile.plot(&PlotStyle::default());
        let Layer::Line { x, y, marker, .. } = &figure.layers[0] else {
            panic!("expected a line layer");
        };
        assert_eq!(x, &vec![3.0, 3.5, 4.0]);
        assert_eq!(y, &vec![Some(-2.0), Some(-2.5), Some(-1.0)]);
        assert_eq!(*marker, Some('x'));
        assert_eq!(profile.distances(), &[4.0, 3.0, 3.5]);
    }

    #[test]
    fn parse_failures_surface_as_energy_errors() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "scan_1.0 x oops 0.1\n").unwrap();
        let parser = EnergyDialect::Counterpoise.parser(None, None).unwrap();
        let err = EnergyScan::new(file.path(), parser.as_ref())
            .process()
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Energy(EnergyParseError::Parse { line: 1, .. })
        ));
    }
}
