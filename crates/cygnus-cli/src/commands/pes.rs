use crate::cli::PesArgs;
use crate::error::Result;
use cygnus::core::io::energy::EnergyDialect;
use cygnus::engine::error::AnalysisError;
use cygnus::workflows::Analysis;
use cygnus::workflows::pes::EnergyScan;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::info;

pub fn run(args: PesArgs) -> Result<()> {
    let dialect = EnergyDialect::from(args.dialect);
    info!(%dialect, file = %args.file.display(), "Parsing energy scan.");
    let parser = dialect
        .parser(args.label.as_deref(), args.monomer.as_deref())
        .map_err(AnalysisError::from)?;

    let profile = EnergyScan::new(&args.file, parser.as_ref()).process()?;
    println!(
        "{}: minimum at {:.2} Å, {:.2} kcal/mol ({} points)",
        profile.label(),
        profile.min_distance(),
        profile.min_energy(),
        profile.len()
    );

    if let Some(output) = &args.output {
        let mut writer = BufWriter::new(File::create(output)?);
        profile.write_to(&mut writer)?;
        writer.flush()?;
        println!("✓ Processed data written to: {}", output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DialectArg;
    use crate::error::CliError;
    use std::fs;

    #[test]
    fn writes_processed_points() {
        let dir = tempfile::tempdir().unwrap();
        let scan = dir.path().join("scan.txt");
        fs::write(&scan, "run_0.40nm.xvg\n0 -1700.0\nrun_0.45nm.xvg\n0 -1720.0\n").unwrap();
        let output = dir.path().join("processed.txt");

        run(PesArgs {
            file: scan,
            dialect: DialectArg::ForceField,
            monomer: Some("benzene".into()),
            label: None,
            output: Some(output.clone()),
        })
        .unwrap();

        let written = fs::read_to_string(output).unwrap();
        let first: Vec<&str> = written.lines().next().unwrap().split(", ").collect();
        assert_eq!(first[0], "4.00");
        assert_eq!(written.lines().count(), 2);
    }

    #[test]
    fn unknown_monomer_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let scan = dir.path().join("scan.txt");
        fs::write(&scan, "run_0.40nm.xvg\n0 -1700.0\n").unwrap();
        let err = run(PesArgs {
            file: scan,
            dialect: DialectArg::ForceField,
            monomer: Some("phenol".into()),
            label: None,
            output: None,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Analysis(AnalysisError::Energy(_))));
    }
}
