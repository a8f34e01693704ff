use super::defaults::DefaultsConfig;
use crate::cli::{DistancesArgs, PairwiseArgs};
use crate::error::{CliError, Result};
use cygnus::engine::config as core_config;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Loading configuration from file: {:?}", path);
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Resolves a path from a config file relative to the file's directory.
fn resolve_relative(config_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    config_path
        .parent()
        .map(|dir| dir.join(path))
        .unwrap_or_else(|| path.to_path_buf())
}

/// Trajectory inputs shared by every trajectory-based analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryInputs {
    /// GRO file providing atom names, residues and a fallback frame set.
    pub topology: PathBuf,
    /// One segment per run, as `.gro` or `.xtc` files.
    pub trajectories: Vec<PathBuf>,
    pub stride: usize,
}

impl TrajectoryInputs {
    fn resolve(
        config_path: &Path,
        topology: Option<PathBuf>,
        trajectories: Vec<PathBuf>,
        stride: usize,
    ) -> Result<Self> {
        let topology = topology.ok_or_else(|| {
            CliError::Config("`topology` is required in the config file.".to_string())
        })?;
        if stride == 0 {
            return Err(CliError::Config("`stride` must be at least 1.".to_string()));
        }
        Ok(Self {
            topology: resolve_relative(config_path, &topology),
            trajectories: trajectories
                .iter()
                .map(|p| resolve_relative(config_path, p))
                .collect(),
            stride,
        })
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
enum PartialSelection {
    Single(String),
    Alternatives(Vec<String>),
}

impl From<PartialSelection> for core_config::SelectionSpec {
    fn from(p: PartialSelection) -> Self {
        match p {
            PartialSelection::Single(s) => core_config::SelectionSpec::Single(s),
            PartialSelection::Alternatives(v) => core_config::SelectionSpec::Alternatives(v),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct PartialInteraction {
    reference: String,
    selection: PartialSelection,
}

impl From<PartialInteraction> for core_config::Interaction {
    fn from(p: PartialInteraction) -> Self {
        core_config::Interaction::new(p.reference, p.selection)
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialDistanceConfig {
    label: Option<String>,
    topology: Option<PathBuf>,
    #[serde(default)]
    trajectories: Vec<PathBuf>,
    stride: Option<usize>,
    #[serde(default)]
    interactions: Vec<PartialInteraction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceJob {
    pub inputs: TrajectoryInputs,
    pub config: core_config::DistanceConfig,
}

impl PartialDistanceConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        read_toml(path)
    }

    pub fn merge_with_cli(
        self,
        config_path: &Path,
        args: &DistancesArgs,
        defaults: &DefaultsConfig,
    ) -> Result<DistanceJob> {
        if self.interactions.is_empty() {
            return Err(CliError::Config(
                "At least one `[[interactions]]` entry is required.".to_string(),
            ));
        }
        let inputs = TrajectoryInputs::resolve(
            config_path,
            self.topology,
            self.trajectories,
            args.stride.or(self.stride).unwrap_or(defaults.stride),
        )?;
        let mut config =
            core_config::DistanceConfig::new(self.label.unwrap_or_else(|| defaults.label.clone()));
        config.interactions = self.interactions.into_iter().map(Into::into).collect();
        Ok(DistanceJob { inputs, config })
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialPairwiseConfig {
    topology: Option<PathBuf>,
    #[serde(default)]
    trajectories: Vec<PathBuf>,
    stride: Option<usize>,
    timestep_ps: Option<f64>,
    selection: Option<String>,
    reference_frame: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseJob {
    pub inputs: TrajectoryInputs,
    pub config: core_config::PairwiseConfig,
}

impl PartialPairwiseConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        read_toml(path)
    }

    pub fn merge_with_cli(
        self,
        config_path: &Path,
        args: &PairwiseArgs,
        defaults: &DefaultsConfig,
    ) -> Result<PairwiseJob> {
        let inputs = TrajectoryInputs::resolve(
            config_path,
            self.topology,
            self.trajectories,
            args.stride.or(self.stride).unwrap_or(defaults.stride),
        )?;

        let mut builder = core_config::PairwiseConfigBuilder::new()
            .selection(
                args.selection
                    .clone()
                    .or(self.selection)
                    .unwrap_or_else(|| defaults.selection.clone()),
            )
            .reference_frame(self.reference_frame.unwrap_or(defaults.reference_frame));
        if let Some(timestep) = args.timestep_ps.or(self.timestep_ps) {
            builder = builder.timestep_ps(timestep);
        }
        let config = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(PairwiseJob { inputs, config })
    }
}
