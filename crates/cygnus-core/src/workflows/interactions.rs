use tracing::{debug, info, instrument};

use super::Analysis;
use super::figure::{Axis, Figure, Layer, Plot, PlotStyle};
use crate::core::models::trajectory::Trajectory;
use crate::engine::config::DistanceConfig;
use crate::engine::distance::DistanceSampler;
use crate::engine::error::AnalysisError;
use crate::engine::progress::ProgressReporter;

const DISTANCE_LABEL: &str = "Distance (Å)";

/// Per-frame distances for one `(reference, selection)` pair, averaged over
/// equivalent selection atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceSeries {
    /// 1-based column index, in processing order.
    pub interaction: usize,
    pub reference: String,
    pub selection: String,
    pub values: Vec<f64>,
}

/// Distance series that all span the same frames.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionTable {
    label: String,
    columns: Vec<DistanceSeries>,
}

impl InteractionTable {
    /// Builds a table, numbering columns from 1.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::FrameCountMismatch`] if a series differs in length from
    /// the first one.
    pub fn new(
        label: impl Into<String>,
        series: Vec<(String, String, Vec<f64>)>,
    ) -> Result<Self, AnalysisError> {
        let expected = series.first().map(|(_, _, v)| v.len()).unwrap_or(0);
        let columns = series
            .into_iter()
            .enumerate()
            .map(|(i, (reference, selection, values))| {
                if values.len() != expected {
                    return Err(AnalysisError::FrameCountMismatch {
                        interaction: i + 1,
                        expected,
                        found: values.len(),
                    });
                }
                Ok(DistanceSeries {
                    interaction: i + 1,
                    reference,
                    selection,
                    values,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            label: label.into(),
            columns,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn columns(&self) -> &[DistanceSeries] {
        &self.columns
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn n_frames(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Stacks this table on top of `other` in long form, tagging rows with each table's
    /// label. Rows are ordered by interaction, then this table's frames, then `other`'s.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ColumnCountMismatch`] unless both tables have the same
    /// number of columns.
    pub fn compare(&self, other: &InteractionTable) -> Result<LongTable, AnalysisError> {
        if self.n_columns() != other.n_columns() {
            return Err(AnalysisError::ColumnCountMismatch {
                left: self.n_columns(),
                right: other.n_columns(),
            });
        }
        let rows = self
            .columns
            .iter()
            .zip(&other.columns)
            .flat_map(|(mine, theirs)| {
                let tag = |table: &InteractionTable, column: &DistanceSeries| {
                    let category = table.label.clone();
                    let interaction = column.interaction;
                    column.values.clone().into_iter().map(move |value| LongRow {
                        category: category.clone(),
                        interaction,
                        value,
                    })
                };
                tag(self, mine).chain(tag(other, theirs))
            })
            .collect();
        Ok(LongTable {
            categories: [self.label.clone(), other.label.clone()],
            n_interactions: self.n_columns(),
            rows,
        })
    }
}

impl Plot for InteractionTable {
    fn plot(&self, style: &PlotStyle) -> Figure {
        let mut figure = Figure::styled(style);
        for (i, column) in self.columns.iter().enumerate() {
            figure.push(Layer::Violin {
                position: column.interaction,
                label: column.interaction.to_string(),
                values: column.values.clone(),
                color: style.color(i).to_string(),
            });
        }
        figure.format(
            style,
            None,
            Axis::labelled("Interaction"),
            Axis::labelled(DISTANCE_LABEL),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub category: String,
    pub interaction: usize,
    pub value: f64,
}

/// Two interaction tables melted into one row per observation.
#[derive(Debug, Clone, PartialEq)]
pub struct LongTable {
    categories: [String; 2],
    n_interactions: usize,
    rows: Vec<LongRow>,
}

impl LongTable {
    pub fn categories(&self) -> &[String; 2] {
        &self.categories
    }

    pub fn rows(&self) -> &[LongRow] {
        &self.rows
    }

    fn values(&self, category: &str, interaction: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|r| r.interaction == interaction && r.category == category)
            .map(|r| r.value)
            .collect()
    }
}

impl Plot for LongTable {
    fn plot(&self, style: &PlotStyle) -> Figure {
        let [left, right] = &self.categories;
        let mut figure = Figure::styled(style);
        for interaction in 1..=self.n_interactions {
            figure.push(Layer::SplitViolin {
                position: interaction,
                label: interaction.to_string(),
                left: self.values(left, interaction),
                right: self.values(right, interaction),
                left_color: style.color(0).to_string(),
                right_color: style.color(1).to_string(),
            });
        }
        figure.legend = true;
        figure.format(
            style,
            None,
            Axis::labelled("Interaction"),
            Axis::labelled(DISTANCE_LABEL),
        )
    }
}

/// Symmetry-averaged distances for every configured interaction.
pub struct InterAtomDistances<'a> {
    trajectory: &'a Trajectory,
    config: &'a DistanceConfig,
    reporter: Option<&'a ProgressReporter<'a>>,
}

impl<'a> InterAtomDistances<'a> {
    pub fn new(trajectory: &'a Trajectory, config: &'a DistanceConfig) -> Self {
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

impl Analysis for InterAtomDistances<'_> {
    type Output = InteractionTable;

    #[instrument(skip_all, name = "interatomic_distances")]
    fn process(&self) -> Result<InteractionTable, AnalysisError> {
        let silent = ProgressReporter::new();
        let reporter = self.reporter.unwrap_or(&silent);
        info!(
            label = %self.config.label,
            pairs = self.config.n_pairs(),
            frames = self.trajectory.n_frames(),
            "Computing interatomic distances."
        );

        let mut series = Vec::with_capacity(self.config.n_pairs());
        for interaction in &self.config.interactions {
            for (reference, selection) in interaction.pairs() {
                let reference_group = self.trajectory.select_atoms(reference)?;
                let selection_group = self.trajectory.select_atoms(selection)?;
                debug!(
                    reference,
                    selection,
                    equivalent_atoms = selection_group.len(),
                    "Resolved interaction."
                );
                let samples = DistanceSampler::new(&reference_group, &selection_group)
                    .sample(self.trajectory, reporter)?;
                series.push((
                    reference.to_string(),
                    selection.to_string(),
                    samples.mean_per_frame(),
                ));
            }
        }

        InteractionTable::new(self.config.label.clone(), series)
    }
}
