use super::{EnergyParseError, EnergyParser, data_lines, parse_float, require_tokens};

/// Two-column SAPT scans (`distance energy`), with non-numeric header lines skipped.
#[derive(Debug, Clone)]
pub struct SaptParser {
    label: String,
}

impl SaptParser {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl EnergyParser for SaptParser {
    fn label(&self) -> &str {
        &self.label
    }

    fn extract(&self, text: &str) -> Result<(Vec<f64>, Vec<f64>), EnergyParseError> {
        let mut distances = Vec::new();
        let mut energies = Vec::new();

        for (line_num, line) in data_lines(text) {
            let first = line.split_whitespace().next().unwrap_or_default();
            let Ok(distance) = first.parse::<f64>() else {
                continue;
            };
            let tokens = require_tokens(line, 2, line_num)?;
            distances.push(distance);
            energies.push(parse_float(tokens[1], line_num)?);
        }

        Ok((distances, energies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::energy::EnergyParseErrorKind;

    #[test]
    fn header_lines_are_skipped() {
        let text = "\
Distance  E_int
(A)       (kcal/mol)
3.0 -1.5
3.5 -2.5
4.0 -2.0
";
        let profile = SaptParser::new("SAPT").parse_str(text).unwrap();
        assert_eq!(profile.distances(), &[3.0, 3.5, 4.0]);
        assert_eq!(profile.min_distance(), 3.5);
        assert_eq!(profile.min_energy(), -2.5);
    }

    #[test]
    fn numeric_line_without_energy_is_an_error() {
        let err = SaptParser::new("SAPT").extract("3.0\n").unwrap_err();
        assert!(matches!(
            err,
            EnergyParseError::Parse {
                line: 1,
                kind: EnergyParseErrorKind::MissingTokens { .. }
            }
        ));
    }

    #[test]
    fn malformed_energy_is_an_error() {
        assert!(SaptParser::new("SAPT").extract("3.0 n/a\n").is_err());
    }
}
