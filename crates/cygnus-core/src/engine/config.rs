use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// One or more selections paired with a single reference selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSpec {
    Single(String),
    /// Ordered alternatives, e.g. one selection per ligand binding pose.
    Alternatives(Vec<String>),
}

impl SelectionSpec {
    pub fn selectors(&self) -> &[String] {
        match self {
            SelectionSpec::Single(selector) => std::slice::from_ref(selector),
            SelectionSpec::Alternatives(selectors) => selectors,
        }
    }
}

impl From<&str> for SelectionSpec {
    fn from(selector: &str) -> Self {
        SelectionSpec::Single(selector.to_string())
    }
}

impl From<String> for SelectionSpec {
    fn from(selector: String) -> Self {
        SelectionSpec::Single(selector)
    }
}

impl From<Vec<String>> for SelectionSpec {
    fn from(selectors: Vec<String>) -> Self {
        SelectionSpec::Alternatives(selectors)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub reference: String,
    pub selection: SelectionSpec,
}

impl Interaction {
    pub fn new(reference: impl Into<String>, selection: impl Into<SelectionSpec>) -> Self {
        Self {
            reference: reference.into(),
            selection: selection.into(),
        }
    }

    /// The `(reference, selection)` pairs in processing order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selection
            .selectors()
            .iter()
            .map(move |selector| (self.reference.as_str(), selector.as_str()))
    }
}

/// Parameters of an interatomic-distance analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceConfig {
    pub label: String,
    pub interactions: Vec<Interaction>,
}

impl DistanceConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            interactions: Vec::new(),
        }
    }

    pub fn interaction(
        mut self,
        reference: impl Into<String>,
        selection: impl Into<SelectionSpec>,
    ) -> Self {
        self.interactions.push(Interaction::new(reference, selection));
        self
    }

    /// Total number of `(reference, selection)` pairs, i.e. table columns.
    pub fn n_pairs(&self) -> usize {
        self.interactions
            .iter()
            .map(|i| i.selection.selectors().len())
            .sum()
    }
}

/// Parameters of a pairwise structural RMSD analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseConfig {
    /// Atoms used both for the fit and for the RMSD.
    pub selection: String,
    /// Time between consecutive frames of the unstrided input, in ps.
    pub timestep_ps: f64,
    /// Index of the frame every other frame is superimposed onto.
    pub reference_frame: usize,
}

#[derive(Default)]
pub struct PairwiseConfigBuilder {
    selection: Option<String>,
    timestep_ps: Option<f64>,
    reference_frame: Option<usize>,
}

impl PairwiseConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = Some(selection.into());
        self
    }
    pub fn timestep_ps(mut self, timestep: f64) -> Self {
        self.timestep_ps = Some(timestep);
        self
    }
    pub fn reference_frame(mut self, index: usize) -> Self {
        self.reference_frame = Some(index);
        self
    }

    pub fn build(self) -> Result<PairwiseConfig, ConfigError> {
        let selection = self
            .selection
            .ok_or(ConfigError::MissingParameter("selection"))?;
        let timestep_ps = self
            .timestep_ps
            .ok_or(ConfigError::MissingParameter("timestep_ps"))?;
        if !(timestep_ps.is_finite() && timestep_ps > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "timestep_ps",
                reason: format!("must be a positive number, got {}", timestep_ps),
            });
        }
        Ok(PairwiseConfig {
            selection,
            timestep_ps,
            reference_frame: self.reference_frame.unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_selection_and_timestep() {
        assert_eq!(
            PairwiseConfigBuilder::new().timestep_ps(10.0).build(),
            Err(ConfigError::MissingParameter("selection"))
        );
        assert_eq!(
            PairwiseConfigBuilder::new().selection("backbone").build(),
            Err(ConfigError::MissingParameter("timestep_ps"))
        );
    }

    #[test]
    fn builder_defaults_reference_frame_to_first() {
        let config = PairwiseConfigBuilder::new()
            .selection("name CA")
            .timestep_ps(100.0)
            .build()
            .unwrap();
        assert_eq!(config.reference_frame, 0);
        assert_eq!(config.selection, "name CA");
    }

    #[test]
    fn builder_rejects_non_positive_timestep() {
        let err = PairwiseConfigBuilder::new()
            .selection("all")
            .timestep_ps(0.0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "timestep_ps",
                ..
            }
        ));
    }

    #[test]
    fn alternatives_expand_to_pairs_in_order() {
        let config = DistanceConfig::new("wt")
            .interaction("resname TMA and name N", "resname TRP and name CZ2")
            .interaction(
                "resname TMA and name N",
                vec!["resname LIG and name O1".to_string(), "resname LIG and name O2".to_string()],
            );
        assert_eq!(config.n_pairs(), 3);
        let pairs: Vec<(&str, &str)> = config.interactions[1].pairs().collect();
        assert_eq!(pairs[1], ("resname TMA and name N", "resname LIG and name O2"));
    }
}
