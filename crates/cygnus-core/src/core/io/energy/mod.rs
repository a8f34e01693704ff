//! Parsers for tabulated interaction-energy scans.
//!
//! Each dialect is a strategy implementing [`EnergyParser`]; the dialect is chosen by
//! constructing the matching parser, never by sniffing file content. Dialects only
//! extract `(distance, energy)` pairs; the minimum search is shared and happens when
//! the [`EnergyProfile`] is built.

mod counterpoise;
mod forcefield;
mod sapt;
mod solvation;

pub use counterpoise::CounterpoiseParser;
pub use forcefield::{ForceFieldParser, KJ_PER_KCAL, TMA_ENERGY, monomer_energy};
pub use sapt::SaptParser;
pub use solvation::SolvationParser;

use crate::core::models::profile::{EnergyProfile, ProfileError};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnergyParseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: EnergyParseErrorKind,
    },
    #[error("Unknown monomer '{0}'")]
    UnknownMonomer(String),
    #[error("Distance on line {0} has no matching energy line")]
    Unpaired(usize),
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnergyParseErrorKind {
    #[error("Expected at least {expected} tokens, found {found}")]
    MissingTokens { expected: usize, found: usize },
    #[error("Invalid number '{0}'")]
    InvalidFloat(String),
    #[error("No distance found in tag '{0}'")]
    MissingDistance(String),
    #[error("Energy line without a preceding distance line")]
    MissingDistanceLine,
}

/// A strategy that turns the text of one energy scan into an [`EnergyProfile`].
pub trait EnergyParser {
    /// The legend label attached to parsed profiles.
    fn label(&self) -> &str;

    /// Extracts parallel distance and energy lists in input order.
    ///
    /// # Errors
    ///
    /// Returns an error on the first malformed line; no partial result is produced.
    fn extract(&self, text: &str) -> Result<(Vec<f64>, Vec<f64>), EnergyParseError>;

    /// Parses a whole scan and locates its minimum.
    fn parse_str(&self, text: &str) -> Result<EnergyProfile, EnergyParseError> {
        let (distances, energies) = self.extract(text)?;
        Ok(EnergyProfile::new(self.label(), distances, energies)?)
    }

    /// Reads and parses a scan file. The file is closed before this returns.
    fn parse_path(&self, path: &Path) -> Result<EnergyProfile, EnergyParseError> {
        let text = fs::read_to_string(path)?;
        self.parse_str(&text)
    }
}

/// The supported scan dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyDialect {
    Counterpoise,
    Solvation,
    Sapt,
    ForceField,
}

impl EnergyDialect {
    pub fn default_label(self) -> &'static str {
        match self {
            EnergyDialect::Counterpoise => "Counterpoise-corrected",
            EnergyDialect::Solvation => "CPCM",
            EnergyDialect::Sapt => "SAPT",
            EnergyDialect::ForceField => forcefield::DEFAULT_LABEL,
        }
    }

    /// Builds the parser for this dialect.
    ///
    /// # Errors
    ///
    /// The force-field dialect needs a known monomer and fails with
    /// [`EnergyParseError::UnknownMonomer`] otherwise; a missing monomer is reported the
    /// same way with an empty name.
    pub fn parser(
        self,
        label: Option<&str>,
        monomer: Option<&str>,
    ) -> Result<Box<dyn EnergyParser>, EnergyParseError> {
        let label = label.unwrap_or(self.default_label()).to_string();
        let parser: Box<dyn EnergyParser> = match self {
            EnergyDialect::Counterpoise => Box::new(CounterpoiseParser::new(label)),
            EnergyDialect::Solvation => Box::new(SolvationParser::new(label)),
            EnergyDialect::Sapt => Box::new(SaptParser::new(label)),
            EnergyDialect::ForceField => {
                Box::new(ForceFieldParser::new(monomer.unwrap_or_default())?.with_label(label))
            }
        };
        Ok(parser)
    }
}

impl fmt::Display for EnergyDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnergyDialect::Counterpoise => "counterpoise",
            EnergyDialect::Solvation => "solvation",
            EnergyDialect::Sapt => "sapt",
            EnergyDialect::ForceField => "force-field",
        };
        f.write_str(name)
    }
}

impl FromStr for EnergyDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "counterpoise" | "cp" => Ok(EnergyDialect::Counterpoise),
            "solvation" | "cpcm" => Ok(EnergyDialect::Solvation),
            "sapt" => Ok(EnergyDialect::Sapt),
            "force-field" | "forcefield" | "amber" => Ok(EnergyDialect::ForceField),
            other => Err(format!("unknown energy dialect '{}'", other)),
        }
    }
}

/// Yields `(line_number, trimmed_line)` for every non-blank line, numbered from 1.
pub(super) fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

pub(super) fn parse_float(token: &str, line: usize) -> Result<f64, EnergyParseError> {
    token.parse::<f64>().map_err(|_| EnergyParseError::Parse {
        line,
        kind: EnergyParseErrorKind::InvalidFloat(token.to_string()),
    })
}

pub(super) fn require_tokens<'a>(
    line: &'a str,
    expected: usize,
    line_num: usize,
) -> Result<Vec<&'a str>, EnergyParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < expected {
        return Err(EnergyParseError::Parse {
            line: line_num,
            kind: EnergyParseErrorKind::MissingTokens {
                expected,
                found: tokens.len(),
            },
        });
    }
    Ok(tokens)
}

/// Parses a tag fragment as a number, retrying without a trailing file extension.
pub(super) fn parse_tag_number(fragment: &str) -> Option<f64> {
    fragment.parse::<f64>().ok().or_else(|| {
        fragment
            .rsplit_once('.')
            .and_then(|(stem, _)| stem.parse::<f64>().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn tag_numbers_tolerate_extensions() {
        assert_eq!(parse_tag_number("150"), Some(150.0));
        assert_eq!(parse_tag_number("150.out"), Some(150.0));
        assert_eq!(parse_tag_number("3.5.log"), Some(3.5));
        assert_eq!(parse_tag_number("scan"), None);
    }

    #[test]
    fn dialects_parse_from_cli_names() {
        for dialect in [
            EnergyDialect::Counterpoise,
            EnergyDialect::Solvation,
            EnergyDialect::Sapt,
            EnergyDialect::ForceField,
        ] {
            assert_eq!(dialect.to_string().parse::<EnergyDialect>(), Ok(dialect));
        }
        assert!("dft".parse::<EnergyDialect>().is_err());
    }

    #[test]
    fn force_field_dialect_requires_a_known_monomer() {
        let err = EnergyDialect::ForceField.parser(None, Some("pyrrole")).err();
        assert!(matches!(err, Some(EnergyParseError::UnknownMonomer(name)) if name == "pyrrole"));
        assert!(EnergyDialect::ForceField.parser(None, None).is_err());
        assert!(EnergyDialect::ForceField.parser(None, Some("Indole")).is_ok());
    }

    #[test]
    fn labels_default_per_dialect() {
        let parser = EnergyDialect::ForceField.parser(None, Some("benzene")).unwrap();
        assert_eq!(parser.label(), "AMBER99sb-ILDN");
        let parser = EnergyDialect::Sapt.parser(Some("SAPT0/jun-cc-pVDZ"), None).unwrap();
        assert_eq!(parser.label(), "SAPT0/jun-cc-pVDZ");
    }

    #[test]
    fn parsing_a_file_twice_is_deterministic() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "scan_3.5.out x -4.0 0.2\nscan_4.0.out x -5.0 0.1\n").unwrap();
        let parser = EnergyDialect::Counterpoise.parser(None, None).unwrap();
        let first = parser.parse_path(file.path()).unwrap();
        let second = parser.parse_path(file.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.min_distance(), 4.0);
    }

    #[test]
    fn empty_scans_are_rejected() {
        let parser = EnergyDialect::Sapt.parser(None, None).unwrap();
        assert!(matches!(
            parser.parse_str("distance energy\n"),
            Err(EnergyParseError::Profile(ProfileError::Empty))
        ));
    }
}
