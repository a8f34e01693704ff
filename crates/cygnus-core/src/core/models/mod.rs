//! Molecular and numerical data models.

pub mod atom;
pub mod frame;
pub mod profile;
pub mod selection;
pub mod topology;
pub mod trajectory;
