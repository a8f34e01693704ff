use super::{
    EnergyParseError, EnergyParseErrorKind, EnergyParser, data_lines, parse_float,
    parse_tag_number, require_tokens,
};

/// Continuum-solvation (CPCM) scans.
///
/// The distance is the first `_`-separated tag field that reads as a number; the energy
/// is the last token of the line, used as is.
#[derive(Debug, Clone)]
pub struct SolvationParser {
    label: String,
}

impl SolvationParser {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl EnergyParser for SolvationParser {
    fn label(&self) -> &str {
        &self.label
    }

    fn extract(&self, text: &str) -> Result<(Vec<f64>, Vec<f64>), EnergyParseError> {
        let mut distances = Vec::new();
        let mut energies = Vec::new();

        for (line_num, line) in data_lines(text) {
            let tokens = require_tokens(line, 2, line_num)?;
            let tag = tokens[0];
            let distance = tag
                .split('_')
                .find_map(parse_tag_number)
                .ok_or_else(|| EnergyParseError::Parse {
                    line: line_num,
                    kind: EnergyParseErrorKind::MissingDistance(tag.to_string()),
                })?;
            let energy = parse_float(tokens[tokens.len() - 1], line_num)?;

            distances.push(distance);
            energies.push(energy);
        }

        Ok((distances, energies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_numeric_field_wins() {
        let parser = SolvationParser::new("CPCM");
        let (d, e) = parser
            .extract("tma_indole_3.5_4.0_cpcm.out -12.0 0.7 -6.25\n")
            .unwrap();
        assert_eq!(d, vec![3.5]);
        assert_eq!(e, vec![-6.25]);
    }

    #[test]
    fn extension_on_the_distance_field_is_tolerated() {
        let (d, _) = SolvationParser::new("CPCM")
            .extract("scan_150.out -1.0\n")
            .unwrap();
        assert_eq!(d, vec![150.0]);
    }

    #[test]
    fn tag_without_any_number_is_an_error() {
        let err = SolvationParser::new("CPCM")
            .extract("scan_final.out -1.0\n")
            .unwrap_err();
        assert!(matches!(
            err,
            EnergyParseError::Parse {
                kind: EnergyParseErrorKind::MissingDistance(_),
                ..
            }
        ));
    }

    #[test]
    fn no_correction_is_subtracted() {
        let profile = SolvationParser::new("CPCM")
            .parse_str("a_4.0 -1.0 9.0\na_3.0 -2.0 9.0\n")
            .unwrap();
        assert_eq!(profile.energies(), &[9.0, 9.0]);
        assert_eq!(profile.min_distance(), 4.0);
    }
}
