use super::{
    EnergyParseError, EnergyParseErrorKind, EnergyParser, data_lines, parse_float,
    parse_tag_number, require_tokens,
};

/// Counterpoise-corrected scans.
///
/// Each line reads `<tag> ... <dimer_energy> <bsse_correction>`, with the scan
/// coordinate as the second `_`-separated field of the tag (`scan_150.out`). The
/// reported energy is the dimer energy minus the BSSE correction.
#[derive(Debug, Clone)]
pub struct CounterpoiseParser {
    label: String,
}

impl CounterpoiseParser {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl EnergyParser for CounterpoiseParser {
    fn label(&self) -> &str {
        &self.label
    }

    fn extract(&self, text: &str) -> Result<(Vec<f64>, Vec<f64>), EnergyParseError> {
        let mut distances = Vec::new();
        let mut energies = Vec::new();

        for (line_num, line) in data_lines(text) {
            let tokens = require_tokens(line, 3, line_num)?;
            let tag = tokens[0];
            let distance = tag
                .split('_')
                .nth(1)
                .and_then(parse_tag_number)
                .ok_or_else(|| EnergyParseError::Parse {
                    line: line_num,
                    kind: EnergyParseErrorKind::MissingDistance(tag.to_string()),
                })?;
            let dimer = parse_float(tokens[tokens.len() - 2], line_num)?;
            let bsse = parse_float(tokens[tokens.len() - 1], line_num)?;

            distances.push(distance);
            energies.push(dimer - bsse);
        }

        Ok((distances, energies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtracts_bsse_correction() {
        let parser = CounterpoiseParser::new("CP");
        let (d, e) = parser.extract("scan_150.out ... -10.0 0.5\n").unwrap();
        assert_eq!(d, vec![150.0]);
        assert_eq!(e, vec![-10.5]);
    }

    #[test]
    fn finds_minimum_across_lines() {
        let text = "\
scan_3.0.out E= -2.0 0.1
scan_3.5.out E= -4.0 0.2

scan_4.0.out E= -3.0 0.1
";
        let profile = CounterpoiseParser::new("CP").parse_str(text).unwrap();
        assert_eq!(profile.len(), 3);
        assert_eq!(profile.min_distance(), 3.5);
        assert!((profile.min_energy() + 4.2).abs() < 1e-12);
    }

    #[test]
    fn tag_without_distance_is_an_error() {
        let err = CounterpoiseParser::new("CP")
            .extract("scan.out x -1.0 0.1\n")
            .unwrap_err();
        assert!(matches!(
            err,
            EnergyParseError::Parse {
                line: 1,
                kind: EnergyParseErrorKind::MissingDistance(_)
            }
        ));
    }

    #[test]
    fn short_lines_are_errors() {
        let err = CounterpoiseParser::new("CP")
            .extract("scan_1.0 -1.0\n")
            .unwrap_err();
        assert!(matches!(
            err,
            EnergyParseError::Parse {
                kind: EnergyParseErrorKind::MissingTokens {
                    expected: 3,
                    found: 2
                },
                ..
            }
        ));
    }

    #[test]
    fn non_numeric_energies_are_errors() {
        let err = CounterpoiseParser::new("CP")
            .extract("scan_1.0 x abc 0.1\n")
            .unwrap_err();
        assert!(matches!(
            err,
            EnergyParseError::Parse {
                kind: EnergyParseErrorKind::InvalidFloat(ref t),
                ..
            } if t == "abc"
        ));
    }
}
