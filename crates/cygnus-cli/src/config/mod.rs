pub mod defaults;
pub mod file;
