use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Profile has {distances} distance(s) but {energies} energies")]
    LengthMismatch { distances: usize, energies: usize },
    #[error("Profile contains no points")]
    Empty,
}

/// The lowest-energy point of a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyMinimum {
    /// Position of the point in input order.
    pub index: usize,
    pub distance: f64,
    pub energy: f64,
}

/// Returns the index of the smallest value, keeping the first occurrence on ties.
///
/// A single linear scan; the input order is never changed.
pub fn find_minimum(values: &[f64]) -> Option<usize> {
    let mut iter = values.iter().enumerate();
    let (mut best_index, mut best_value) = iter.next().map(|(i, &v)| (i, v))?;
    for (i, &value) in iter {
        if value < best_value {
            best_index = i;
            best_value = value;
        }
    }
    Some(best_index)
}

/// Interaction energy as a function of a scan coordinate.
///
/// Points are stored in input order, which is also the order the minimum search walks.
/// Sorting by distance happens only when points are requested for plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyProfile {
    label: String,
    distances: Vec<f64>,
    energies: Vec<f64>,
    minimum: EnergyMinimum,
}

impl EnergyProfile {
    /// Builds a profile from parallel distance and energy lists.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::LengthMismatch`] if the lists differ in length and
    /// [`ProfileError::Empty`] if they are empty.
    pub fn new(
        label: impl Into<String>,
        distances: Vec<f64>,
        energies: Vec<f64>,
    ) -> Result<Self, ProfileError> {
        if distances.len() != energies.len() {
            return Err(ProfileError::LengthMismatch {
                distances: distances.len(),
                energies: energies.len(),
            });
        }
        let index = find_minimum(&energies).ok_or(ProfileError::Empty)?;
        let minimum = EnergyMinimum {
            index,
            distance: distances[index],
            energy: energies[index],
        };
        Ok(Self {
            label: label.into(),
            distances,
            energies,
            minimum,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn minimum(&self) -> EnergyMinimum {
        self.minimum
    }

    pub fn min_distance(&self) -> f64 {
        self.minimum.distance
    }

    pub fn min_energy(&self) -> f64 {
        self.minimum.energy
    }

    /// Returns `(distance, energy)` pairs ordered by distance, for plotting.
    ///
    /// The sort is stable, so points sharing a distance keep their input order.
    pub fn sorted_points(&self) -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> = self
            .distances
            .iter()
            .copied()
            .zip(self.energies.iter().copied())
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points
    }

    /// Writes `distance, energy` lines with two decimals, in input order.
    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        for (distance, energy) in self.distances.iter().zip(&self.energies) {
            writeln!(writer, "{:.2}, {:.2}", distance, energy)?;
        }
        Ok(())
    }
}
