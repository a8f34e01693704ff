use super::{
    EnergyParseError, EnergyParseErrorKind, EnergyParser, data_lines, parse_float,
    require_tokens,
};
use phf::{Map, phf_map};

pub(super) const DEFAULT_LABEL: &str = "AMBER99sb-ILDN";

/// Conversion factor from kJ/mol to kcal/mol.
pub const KJ_PER_KCAL: f64 = 4.184;

/// Energy of the isolated tetramethylammonium cation, in kJ/mol.
pub const TMA_ENERGY: f64 = 385.581;

/// Energies of the isolated aromatic monomers, in kJ/mol.
static MONOMER_ENERGIES: Map<&'static str, f64> = phf_map! {
    "indole" => 58.634,
    "benzene" => 27.138,
};

/// Looks up a monomer energy by case-insensitive name.
pub fn monomer_energy(name: &str) -> Option<f64> {
    MONOMER_ENERGIES
        .get(name.to_ascii_lowercase().as_str())
        .copied()
}

/// Force-field scans exported from GROMACS energy runs.
///
/// Points span two lines: a path whose second `_`-field begins with the distance in nm
/// (`run_2.50A.xvg`), then a line whose second column is the total energy in kJ/mol.
/// Energies are reported in kcal/mol relative to the separated monomer and cation.
#[derive(Debug, Clone)]
pub struct ForceFieldParser {
    label: String,
    monomer: String,
    separated_energy: f64,
}

impl ForceFieldParser {
    /// # Errors
    ///
    /// Returns [`EnergyParseError::UnknownMonomer`] if the monomer is not tabulated.
    pub fn new(monomer: &str) -> Result<Self, EnergyParseError> {
        let monomer_kj = monomer_energy(monomer)
            .ok_or_else(|| EnergyParseError::UnknownMonomer(monomer.to_string()))?;
        Ok(Self {
            label: DEFAULT_LABEL.to_string(),
            monomer: monomer.to_ascii_lowercase(),
            separated_energy: (monomer_kj + TMA_ENERGY) / KJ_PER_KCAL,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn monomer(&self) -> &str {
        &self.monomer
    }

    /// The reference energy of the separated fragments, in kcal/mol.
    pub fn separated_energy(&self) -> f64 {
        self.separated_energy
    }

    fn parse_distance(line: &str, line_num: usize) -> Result<f64, EnergyParseError> {
        let missing = || EnergyParseError::Parse {
            line: line_num,
            kind: EnergyParseErrorKind::MissingDistance(line.to_string()),
        };
        let field = line.split('_').nth(1).ok_or_else(missing)?;
        let prefix: String = field.chars().take(4).collect();
        let nm = prefix.parse::<f64>().map_err(|_| missing())?;
        Ok(nm * 10.0)
    }
}

impl EnergyParser for ForceFieldParser {
    fn label(&self) -> &str {
        &self.label
    }

    fn extract(&self, text: &str) -> Result<(Vec<f64>, Vec<f64>), EnergyParseError> {
        let mut distances = Vec::new();
        let mut energies = Vec::new();
        let mut pending: Option<(usize, f64)> = None;

        for (line_num, line) in data_lines(text) {
            if line.contains(".xvg") {
                if let Some((previous, _)) = pending {
                    return Err(EnergyParseError::Unpaired(previous));
                }
                pending = Some((line_num, Self::parse_distance(line, line_num)?));
                continue;
            }

            let Some((_, distance)) = pending.take() else {
                return Err(EnergyParseError::Parse {
                    line: line_num,
                    kind: EnergyParseErrorKind::MissingDistanceLine,
                });
            };
            let tokens = require_tokens(line, 2, line_num)?;
            let total = parse_float(tokens[1], line_num)?;
            distances.push(distance);
            energies.push(total / KJ_PER_KCAL - self.separated_energy);
        }

        if let Some((line_num, _)) = pending {
            return Err(EnergyParseError::Unpaired(line_num));
        }

        Ok((distances, energies))
    }
}
