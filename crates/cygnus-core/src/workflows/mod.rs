//! # Workflows Module
//!
//! The public analyses. Each one gathers its inputs, runs the engines from
//! [`crate::engine`] and returns an immutable result that knows how to describe itself
//! as a [`figure::Figure`].
//!
//! - **Interatomic distances** ([`interactions`]) - Symmetry-averaged distance tables and
//!   their long-form comparison
//! - **Pairwise RMSD** ([`pairwise`]) - All-frames structural matrix with run layout
//! - **RMSF** ([`rmsf`]) - Centered moving averages of per-residue fluctuations
//! - **Energy scans** ([`pes`]) - Potential-energy surfaces from the scan dialects
//! - **Umbrella sampling** ([`umbrella`]) - PMF profiles and WHAM histograms
//! - **Generic series** ([`xvg`]) - Minimisation, pull-force and other XVG series
//! - **Figures** ([`figure`]) - Plot styling and renderer-agnostic chart descriptions

pub mod figure;
pub mod interactions;
pub mod pairwise;
pub mod pes;
pub mod rmsf;
pub mod umbrella;
pub mod xvg;

use crate::engine::error::AnalysisError;
use figure::Plot;

/// A computation that produces a plottable result.
///
/// `process` does all the work in one call; the returned value is owned by the caller and
/// never recomputed.
pub trait Analysis {
    type Output: Plot;

    fn process(&self) -> Result<Self::Output, AnalysisError>;
}
