//! # Core Module
//!
//! Data models, file formats and geometry shared by every analysis.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, topologies, frames, periodic boxes,
//!   trajectories, atom selections and energy profiles
//! - **File I/O** ([`io`]) - GRO coordinate files, XVG series files and the
//!   interaction-energy scan dialects
//! - **Geometry** ([`utils`]) - Minimum-image displacements, least-squares superposition
//!   and RMSD
//!
//! Nothing in this module holds state between calls; every reader opens, consumes and
//! releases its input before returning.

pub mod io;
pub mod models;
pub mod utils;
