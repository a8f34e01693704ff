use crate::core::io::traits::SeriesFile;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XvgError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XvgParseErrorKind },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum XvgParseErrorKind {
    #[error("Invalid number '{0}'")]
    InvalidFloat(String),
    #[error("Data line needs at least two columns")]
    MissingColumns,
    #[error("Expected {expected} columns, found {found}")]
    ColumnCountChanged { expected: usize, found: usize },
}

/// A numeric table read from a GROMACS `.xvg` file.
///
/// The first column is the abscissa; every remaining column is a series sharing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XvgTable {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub x: Vec<f64>,
    pub columns: Vec<Vec<f64>>,
}

impl XvgTable {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// The first value column, or an empty slice for a table without data.
    pub fn y(&self) -> &[f64] {
        self.columns.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

fn quoted(text: &str) -> Option<String> {
    let start = text.find('"')?;
    let end = text.rfind('"')?;
    (end > start).then(|| text[start + 1..end].to_string())
}

fn apply_metadata(table: &mut XvgTable, directive: &str) {
    let mut words = directive.split_whitespace();
    match (words.next(), words.next()) {
        (Some("title"), _) => table.title = quoted(directive),
        (Some("xaxis"), Some("label")) => table.x_label = quoted(directive),
        (Some("yaxis"), Some("label")) => table.y_label = quoted(directive),
        _ => {}
    }
}

/// Reader for `.xvg` files: `#` lines are comments, `@` lines are Grace directives of
/// which the title and axis labels are kept.
pub struct XvgFile;

impl SeriesFile for XvgFile {
    type Output = XvgTable;
    type Error = XvgError;

    fn read_from(reader: &mut impl BufRead) -> Result<XvgTable, XvgError> {
        let mut table = XvgTable::default();
        let mut n_columns: Option<usize> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if let Some(directive) = trimmed.strip_prefix('@') {
                apply_metadata(&mut table, directive.trim());
                continue;
            }

            let values: Vec<f64> = trimmed
                .split_whitespace()
                .map(|token| {
                    token.parse::<f64>().map_err(|_| XvgError::Parse {
                        line: line_num,
                        kind: XvgParseErrorKind::InvalidFloat(token.into()),
                    })
                })
                .collect::<Result<_, _>>()?;

            if values.len() < 2 {
                return Err(XvgError::Parse {
                    line: line_num,
                    kind: XvgParseErrorKind::MissingColumns,
                });
            }
            match n_columns {
                None => {
                    n_columns = Some(values.len());
                    table.columns = vec![Vec::new(); values.len() - 1];
                }
                Some(expected) if expected != values.len() => {
                    return Err(XvgError::Parse {
                        line: line_num,
                        kind: XvgParseErrorKind::ColumnCountChanged {
                            expected,
                            found: values.len(),
                        },
                    });
                }
                Some(_) => {}
            }

            table.x.push(values[0]);
            for (column, value) in table.columns.iter_mut().zip(&values[1..]) {
                column.push(*value);
            }
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const RMSF_XVG: &str = r#"# This file was created by gmx rmsf
# Command line:
#   gmx rmsf -f traj.xtc -res
@    title "RMS fluctuation"
@    xaxis  label "Residue"
@    yaxis  label "(nm)"
@TYPE xy
   1    0.1795
   2    0.1321
   3    0.0968
"#;

    #[test]
    fn reads_labels_and_two_columns() {
        let table = XvgFile::read_from(&mut Cursor::new(RMSF_XVG)).unwrap();
        assert_eq!(table.title.as_deref(), Some("RMS fluctuation"));
        assert_eq!(table.x_label.as_deref(), Some("Residue"));
        assert_eq!(table.y_label.as_deref(), Some("(nm)"));
        assert_eq!(table.x, vec![1.0, 2.0, 3.0]);
        assert_eq!(table.y(), &[0.1795, 0.1321, 0.0968]);
    }

    #[test]
    fn reads_multiple_value_columns() {
        let content = "@ title \"histo\"\n0.5 1 2 3\n0.6 4 5 6\n";
        let table = XvgFile::read_from(&mut Cursor::new(content)).unwrap();
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[2], vec![3.0, 6.0]);
    }

    #[test]
    fn changing_column_count_is_an_error() {
        let content = "1 2\n3 4 5\n";
        let err = XvgFile::read_from(&mut Cursor::new(content)).unwrap_err();
        assert!(matches!(
            err,
            XvgError::Parse {
                line: 2,
                kind: XvgParseErrorKind::ColumnCountChanged {
                    expected: 2,
                    found: 3
                }
            }
        ));
    }

    #[test]
    fn non_numeric_tokens_are_errors() {
        let err = XvgFile::read_from(&mut Cursor::new("1 abc\n")).unwrap_err();
        assert!(matches!(
            err,
            XvgError::Parse {
                line: 1,
                kind: XvgParseErrorKind::InvalidFloat(_)
            }
        ));
    }

    #[test]
    fn single_column_lines_are_errors() {
        let err = XvgFile::read_from(&mut Cursor::new("1\n")).unwrap_err();
        assert!(matches!(
            err,
            XvgError::Parse {
                kind: XvgParseErrorKind::MissingColumns,
                ..
            }
        ));
    }
}
