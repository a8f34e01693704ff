use clap::{Args, Parser, Subcommand, ValueEnum};
use cygnus::core::io::energy::EnergyDialect;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Cygnus CLI - post-processing of molecular dynamics trajectories, GROMACS series and interaction-energy scans.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse an interaction-energy scan and report its minimum.
    Pes(PesArgs),
    /// Smooth one or more RMSF profiles with a centered moving average.
    Rmsf(RmsfArgs),
    /// Report the binding free energy of an umbrella-sampling PMF.
    Pmf(PmfArgs),
    /// Compute symmetry-averaged interatomic distances over a trajectory.
    Distances(DistancesArgs),
    /// Compute the pairwise RMSD matrix of a multi-run trajectory.
    Pairwise(PairwiseArgs),
}

/// Energy-scan file formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectArg {
    /// `<tag> ... <dimer> <bsse>` lines with counterpoise correction.
    Counterpoise,
    /// Continuum-solvation lines; the last column is the energy.
    Solvation,
    /// Two-column `distance energy` tables.
    Sapt,
    /// Force-field scans: a `.xvg` path line followed by an energy line.
    ForceField,
}

impl From<DialectArg> for EnergyDialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Counterpoise => EnergyDialect::Counterpoise,
            DialectArg::Solvation => EnergyDialect::Solvation,
            DialectArg::Sapt => EnergyDialect::Sapt,
            DialectArg::ForceField => EnergyDialect::ForceField,
        }
    }
}

/// Arguments for the `pes` subcommand.
#[derive(Args, Debug)]
pub struct PesArgs {
    /// Path to the energy scan file.
    #[arg(required = true, value_name = "FILE")]
    pub file: PathBuf,

    /// Format of the scan file.
    #[arg(short, long, value_enum)]
    pub dialect: DialectArg,

    /// Monomer whose isolated energy is subtracted (force-field scans only).
    #[arg(short, long, value_name = "NAME", required_if_eq("dialect", "force-field"))]
    pub monomer: Option<String>,

    /// Legend label for the profile.
    #[arg(short, long, value_name = "TEXT")]
    pub label: Option<String>,

    /// Write the processed `distance, energy` points to this file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `rmsf` subcommand.
#[derive(Args, Debug)]
pub struct RmsfArgs {
    /// One or more RMSF `.xvg` files; each file stem becomes its label.
    #[arg(required = true, num_args = 1.., value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Write the raw and smoothed profiles as CSV.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `pmf` subcommand.
#[derive(Args, Debug)]
pub struct PmfArgs {
    /// The PMF `.xvg` file written by `gmx wham`.
    #[arg(required = true, value_name = "FILE")]
    pub file: PathBuf,

    /// Optional umbrella histogram file to summarise alongside the PMF.
    #[arg(long, value_name = "PATH")]
    pub histogram: Option<PathBuf>,
}

/// Arguments for the `distances` subcommand.
#[derive(Args, Debug)]
pub struct DistancesArgs {
    /// Path to the distance analysis configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// A second configuration to compare against; switches the output to long form.
    #[arg(long, value_name = "PATH")]
    pub compare: Option<PathBuf>,

    /// Override the frame stride from the config file.
    #[arg(long, value_name = "INT")]
    pub stride: Option<usize>,

    /// Write the resulting table as CSV.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `pairwise` subcommand.
#[derive(Args, Debug)]
pub struct PairwiseArgs {
    /// Path to the pairwise RMSD configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Override the frame stride from the config file.
    #[arg(long, value_name = "INT")]
    pub stride: Option<usize>,

    /// Override the time between saved frames, in ps.
    #[arg(long, value_name = "FLOAT")]
    pub timestep_ps: Option<f64>,

    /// Override the atom selection used for fitting and RMSD.
    #[arg(long, value_name = "SELECTION")]
    pub selection: Option<String>,

    /// Write the RMSD matrix as CSV.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn pes_parses_dialect_and_monomer() {
        let cli = Cli::parse_from([
            "cygnus",
            "pes",
            "scan.txt",
            "--dialect",
            "force-field",
            "--monomer",
            "indole",
        ]);
        let Commands::Pes(args) = cli.command else {
            panic!("Expected 'pes' subcommand");
        };
        assert_eq!(args.dialect, DialectArg::ForceField);
        assert_eq!(args.monomer.as_deref(), Some("indole"));
        assert_eq!(EnergyDialect::from(args.dialect), EnergyDialect::ForceField);
    }

    #[test]
    fn force_field_dialect_requires_monomer() {
        let result = Cli::try_parse_from(["cygnus", "pes", "scan.txt", "-d", "force-field"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["cygnus", "rmsf", "a.xvg", "b.xvg", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Rmsf(args) = cli.command else {
            panic!("Expected 'rmsf' subcommand");
        };
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["cygnus", "-q", "-v", "pmf", "pmf.xvg"]).is_err());
    }

    #[test]
    fn pairwise_overrides_are_optional() {
        let cli = Cli::try_parse_from([
            "cygnus",
            "pairwise",
            "-c",
            "rmsd.toml",
            "--timestep-ps",
            "10",
        ])
        .unwrap();
        let Commands::Pairwise(args) = cli.command else {
            panic!("Expected 'pairwise' subcommand");
        };
        assert_eq!(args.timestep_ps, Some(10.0));
        assert_eq!(args.stride, None);
    }
}
