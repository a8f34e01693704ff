use crate::cli::RmsfArgs;
use crate::error::Result;
use crate::export;
use cygnus::workflows::Analysis;
use cygnus::workflows::rmsf::{RMSF_WINDOW, RmsfAnalysis};
use std::fs::File;
use tracing::info;

pub fn run(args: RmsfArgs) -> Result<()> {
    let mut all_series = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let series = RmsfAnalysis::new(path, label).process()?;
        let smoothed = series.rolling.iter().flatten().count();
        println!(
            "{}: {} residue(s), {} with a {}-point average",
            series.label,
            series.len(),
            smoothed,
            RMSF_WINDOW
        );
        all_series.push(series);
    }

    if let Some(output) = &args.output {
        export::write_rmsf(File::create(output)?, &all_series)?;
        info!(path = %output.display(), "Wrote RMSF table.");
        println!("✓ RMSF table written to: {}", output.display());
    }
    Ok(())
}
