pub mod distances;
pub mod pairwise;
pub mod pes;
pub mod pmf;
pub mod rmsf;
