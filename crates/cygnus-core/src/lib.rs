//! # Cygnus Core Library
//!
//! Post-processing for molecular-dynamics and quantum-chemistry outputs: raw trajectory
//! frames, scalar series exported by GROMACS (`.xvg`), and tabulated interaction-energy
//! scans. Every analysis turns a heterogeneous dump into a comparable scalar, series, or
//! matrix summary ready for visualization.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout so that numerical code never depends on
//! presentation concerns.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Topology`, `Frame`,
//!   `Trajectory`, `EnergyProfile`), the atom selection language, file readers for GRO,
//!   XVG and the energy-scan dialects, and pure geometry helpers.
//!
//! - **[`engine`]: The Numerical Core.** Minimum-image distance arrays, the single-pass
//!   trajectory sampler, rigid-body alignment and the all-pairs RMSD matrix, together with
//!   the error taxonomy, configuration builders and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Complete analyses (interatomic distances with
//!   symmetry averaging, pairwise RMSD with run bookkeeping, RMSF smoothing, energy scans,
//!   umbrella-sampling profiles) and the renderer-agnostic [`workflows::figure::Figure`]
//!   they produce.

pub mod core;
pub mod engine;
pub mod workflows;
