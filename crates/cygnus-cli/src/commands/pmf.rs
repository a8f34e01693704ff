use crate::cli::PmfArgs;
use crate::error::Result;
use cygnus::workflows::umbrella::{PmfProfile, WhamHistogram};
use tracing::info;

pub fn run(args: PmfArgs) -> Result<()> {
    let pmf = PmfProfile::load(&args.file)?;
    let dg = pmf.binding_free_energy();
    info!(points = pmf.xi.len(), dg, "Computed binding free energy.");
    println!("Calculated dG value is {:.2} kcal/mol", dg);

    if let Some(path) = &args.histogram {
        let histogram = WhamHistogram::load(path)?;
        println!(
            "{} umbrella window(s) over {} bin(s)",
            histogram.n_windows(),
            histogram.bins.len()
        );
    }
    Ok(())
}
