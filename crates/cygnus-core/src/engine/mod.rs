//! # Engine Module
//!
//! The numerical engines behind the analyses. Everything here consumes materialized
//! trajectories and atom groups from [`crate::core`] and produces plain numeric arrays;
//! presentation concerns live in [`crate::workflows`].
//!
//! - **Distances** ([`distance`]) - Minimum-image distance arrays for one frame and the
//!   single-pass sampler that drives them across a trajectory
//! - **Alignment** ([`alignment`]) - Least-squares superposition of every frame onto a
//!   reference frame and the all-pairs RMSD matrix
//! - **Configuration** ([`config`]) - Analysis parameters and their builders
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - The analysis error taxonomy

pub mod alignment;
pub mod config;
pub mod distance;
pub mod error;
pub mod progress;
