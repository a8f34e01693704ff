use crate::cli::DistancesArgs;
use crate::config::defaults::DefaultsConfig;
use crate::config::file::{DistanceJob, PartialDistanceConfig};
use crate::error::Result;
use crate::export;
use crate::utils::progress::CliProgressHandler;
use cygnus::core::io::gro::load_trajectory;
use cygnus::engine::error::AnalysisError;
use cygnus::engine::progress::ProgressReporter;
use cygnus::workflows::Analysis;
use cygnus::workflows::interactions::{InterAtomDistances, InteractionTable};
use std::fs::File;
use std::path::Path;
use tracing::info;

fn load_job(config_path: &Path, args: &DistancesArgs) -> Result<DistanceJob> {
    PartialDistanceConfig::from_file(config_path)?.merge_with_cli(
        config_path,
        args,
        &DefaultsConfig::default(),
    )
}

fn compute_table(job: &DistanceJob, reporter: &ProgressReporter) -> Result<InteractionTable> {
    info!("Loading trajectory from {:?}", &job.inputs.topology);
    let trajectory = load_trajectory(
        &job.inputs.topology,
        &job.inputs.trajectories,
        job.inputs.stride,
    )
    .map_err(AnalysisError::from)?;

    let table = InterAtomDistances::new(&trajectory, &job.config)
        .with_reporter(reporter)
        .process()?;
    Ok(table)
}

fn print_summary(table: &InteractionTable) {
    println!(
        "{}: {} interaction(s) over {} frame(s)",
        table.label(),
        table.n_columns(),
        table.n_frames()
    );
    for column in table.columns() {
        let n = column.values.len().max(1) as f64;
        let mean = column.values.iter().sum::<f64>() / n;
        println!(
            "  {:>3}  {:<30} -> {:<30} mean {:.2} Å",
            column.interaction, column.reference, column.selection, mean
        );
    }
}

pub fn run(args: DistancesArgs) -> Result<()> {
    let progress_handler = CliProgressHandler::new();
    let reporter = progress_handler.reporter();

    let job = load_job(&args.config, &args)?;
    let table = compute_table(&job, &reporter)?;
    print_summary(&table);

    let Some(other_path) = &args.compare else {
        if let Some(output) = &args.output {
            export::write_interaction_table(File::create(output)?, &table)?;
            println!("✓ Distance table written to: {}", output.display());
        }
        return Ok(());
    };

    let other_job = load_job(other_path, &args)?;
    let other = compute_table(&other_job, &reporter)?;
    print_summary(&other);
    let long = table.compare(&other)?;
    info!(rows = long.rows().len(), "Built long-form comparison.");

    if let Some(output) = &args.output {
        export::write_long_table(File::create(output)?, &long)?;
        println!("✓ Comparison table written to: {}", output.display());
    }
    Ok(())
}
