//! CSV writers for analysis results.

use crate::error::Result;
use cygnus::workflows::interactions::{InteractionTable, LongTable};
use cygnus::workflows::pairwise::StructuralMatrix;
use cygnus::workflows::rmsf::RmsfSeries;
use std::io::Write;
use tracing::info;

/// Writes one row per frame: `frame,1,2,...,N`.
pub fn write_interaction_table<W: Write>(writer: W, table: &InteractionTable) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut header = vec!["frame".to_string()];
    header.extend(table.columns().iter().map(|c| c.interaction.to_string()));
    csv.write_record(&header)?;

    for frame in 0..table.n_frames() {
        let mut record = vec![frame.to_string()];
        record.extend(table.columns().iter().map(|c| c.values[frame].to_string()));
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes the melted comparison: `category,interaction,value`.
pub fn write_long_table<W: Write>(writer: W, table: &LongTable) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["category", "interaction", "value"])?;
    for row in table.rows() {
        csv.write_record([
            row.category.clone(),
            row.interaction.to_string(),
            row.value.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes `label,residue,rmsf,rolling`, leaving `rolling` empty where no average exists.
pub fn write_rmsf<W: Write>(writer: W, series: &[RmsfSeries]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["label", "residue", "rmsf", "rolling"])?;
    for s in series {
        for ((residue, value), rolling) in s.residues.iter().zip(&s.values).zip(&s.rolling) {
            csv.write_record([
                s.label.clone(),
                residue.to_string(),
                value.to_string(),
                rolling.map(|r| r.to_string()).unwrap_or_default(),
            ])?;
        }
    }
    csv.flush()?;
    Ok(())
}

/// Writes the `F × F` matrix as headerless rows.
pub fn write_matrix<W: Write>(writer: W, result: &StructuralMatrix) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for row in result.matrix.row_iter() {
        csv.write_record(row.iter().map(|v| format!("{:.6}", v)))?;
    }
    csv.flush()?;
    info!(
        frames = result.matrix.nrows(),
        "Wrote pairwise RMSD matrix."
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cygnus::core::io::xvg::XvgTable;

    fn table(label: &str, columns: Vec<Vec<f64>>) -> InteractionTable {
        InteractionTable::new(
            label,
            columns
                .into_iter()
                .map(|c| ("ref".to_string(), "sel".to_string(), c))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn wide_table_has_one_row_per_frame() {
        let mut out = Vec::new();
        write_interaction_table(&mut out, &table("WT", vec![vec![1.5, 2.0], vec![3.0, 4.25]]))
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "frame,1,2\n0,1.5,3\n1,2,4.25\n"
        );
    }

    #[test]
    fn long_table_lists_every_observation() {
        let wt = table("WT", vec![vec![1.0]]);
        let mutant = table("MUT", vec![vec![2.0]]);
        let mut out = Vec::new();
        write_long_table(&mut out, &wt.compare(&mutant).unwrap()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "category,interaction,value\nWT,1,1\nMUT,1,2\n"
        );
    }

    #[test]
    fn undefined_rolling_values_are_empty_cells() {
        let xvg = XvgTable {
            x: (1..=5).map(f64::from).collect(),
            columns: vec![vec![1.0, 2.0, 3.0, 4.0, 5.0]],
            ..XvgTable::default()
        };
        let series = RmsfSeries::from_table(&xvg, "run1");
        let mut out = Vec::new();
        write_rmsf(&mut out, &[series]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "run1,1,1,");
        assert_eq!(lines[3], "run1,3,3,3");
    }
}
