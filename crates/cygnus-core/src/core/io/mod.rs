//! Provides input functionality for the formats consumed by the analyses.
//!
//! GRO files carry topology and coordinates, XTC files carry compressed coordinate
//! segments described by a GRO topology, XVG files carry scalar series written by
//! GROMACS tools, and the [`energy`] module parses the interaction-energy scan dialects.
//! Readers share the [`traits::SeriesFile`], [`traits::CoordinateFile`] and
//! [`traits::SegmentFile`] interfaces.

pub mod energy;
pub mod gro;
pub mod traits;
pub mod xtc;
pub mod xvg;
