use crate::cli::PairwiseArgs;
use crate::config::defaults::DefaultsConfig;
use crate::config::file::PartialPairwiseConfig;
use crate::error::Result;
use crate::export;
use crate::utils::progress::CliProgressHandler;
use cygnus::core::io::gro::load_trajectory;
use cygnus::engine::error::AnalysisError;
use cygnus::workflows::Analysis;
use cygnus::workflows::pairwise::PairwiseRmsd;
use std::fs::File;
use tracing::info;

pub fn run(args: PairwiseArgs) -> Result<()> {
    let job = PartialPairwiseConfig::from_file(&args.config)?.merge_with_cli(
        &args.config,
        &args,
        &DefaultsConfig::default(),
    )?;

    info!("Loading trajectory from {:?}", &job.inputs.topology);
    let trajectory = load_trajectory(
        &job.inputs.topology,
        &job.inputs.trajectories,
        job.inputs.stride,
    )
    .map_err(AnalysisError::from)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = progress_handler.reporter();
    let result = PairwiseRmsd::new(&trajectory, &job.config)
        .with_reporter(&reporter)
        .process()?;

    let layout = &result.layout;
    println!(
        "Pairwise RMSD over {} frame(s) in {} run(s): {} frame(s)/run, {} ns total, {} ns/run",
        layout.n_frames,
        layout.n_runs,
        layout.frames_per_run,
        layout.sim_time_ns,
        layout.time_per_run_ns
    );
    println!("  frame ticks: {:?}", layout.frame_ticks());
    println!("  time labels (ns): {:?}", layout.time_labels());

    if let Some(output) = &args.output {
        export::write_matrix(File::create(output)?, &result)?;
        println!("✓ RMSD matrix written to: {}", output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn run_segment(scales: &[f64]) -> String {
        scales
            .iter()
            .map(|s| {
                format!(
                    "run\n    3\n    1ALA      N    1   0.000   0.000   0.000\n    1ALA     CA    2{:>8.3}   0.000   0.000\n    1ALA      C    3{:>8.3}{:>8.3}   0.000\n   0.00000   0.00000   0.00000\n",
                    0.15 * s,
                    0.15 * s,
                    0.15 * s
                )
            })
            .collect()
    }

    #[test]
    fn writes_square_matrix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("top.gro"), run_segment(&[1.0])).unwrap();
        fs::write(dir.path().join("r1.gro"), run_segment(&[1.0, 1.1])).unwrap();
        fs::write(dir.path().join("r2.gro"), run_segment(&[1.2, 1.3])).unwrap();
        let config = dir.path().join("rmsd.toml");
        fs::write(
            &config,
            "topology = \"top.gro\"\ntrajectories = [\"r1.gro\", \"r2.gro\"]\ntimestep-ps = 500.0\n",
        )
        .unwrap();
        let output = dir.path().join("matrix.csv");

        run(PairwiseArgs {
            config,
            stride: None,
            timestep_ps: None,
            selection: None,
            output: Some(output.clone()),
        })
        .unwrap();

        let written = fs::read_to_string(output).unwrap();
        let rows: Vec<Vec<f64>> = written
            .lines()
            .map(|l| l.split(',').map(|v| v.parse().unwrap()).collect())
            .collect();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.len() == 4));
        assert_eq!(rows[0][0], 0.0);
        assert_eq!(rows[1][3], rows[3][1]);
    }
}
