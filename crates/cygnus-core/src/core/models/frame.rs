use nalgebra::{Point3, Vector3};

/// An orthorhombic periodic simulation cell.
///
/// Edge lengths are in Angstroms. An axis with a non-positive length is treated as
/// non-periodic, so a box of all zeros reduces minimum-image distances to plain
/// Euclidean distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicBox {
    lengths: Vector3<f64>,
}

impl PeriodicBox {
    pub fn new(lx: f64, ly: f64, lz: f64) -> Self {
        Self {
            lengths: Vector3::new(lx, ly, lz),
        }
    }

    pub fn lengths(&self) -> &Vector3<f64> {
        &self.lengths
    }

    /// Returns `true` if at least one axis is periodic.
    pub fn is_periodic(&self) -> bool {
        self.lengths.iter().any(|&l| l > 0.0)
    }

    /// Applies the minimum-image convention to a displacement vector.
    pub fn minimum_image(&self, delta: Vector3<f64>) -> Vector3<f64> {
        let mut wrapped = delta;
        for axis in 0..3 {
            let length = self.lengths[axis];
            if length > 0.0 {
                wrapped[axis] -= (wrapped[axis] / length).round() * length;
            }
        }
        wrapped
    }
}

/// One snapshot of atomic positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Atom positions in Angstroms, in topology order.
    pub positions: Vec<Point3<f64>>,
    /// The periodic cell of this frame, if the input provided one.
    pub periodic_box: Option<PeriodicBox>,
    /// Simulation time of the frame in picoseconds, if known.
    pub time_ps: Option<f64>,
}

impl Frame {
    pub fn new(positions: Vec<Point3<f64>>) -> Self {
        Self {
            positions,
            periodic_box: None,
            time_ps: None,
        }
    }

    pub fn with_box(mut self, periodic_box: PeriodicBox) -> Self {
        self.periodic_box = Some(periodic_box);
        self
    }

    pub fn with_time(mut self, time_ps: f64) -> Self {
        self.time_ps = Some(time_ps);
        self
    }

    pub fn n_atoms(&self) -> usize {
        self.positions.len()
    }

    /// Gathers the positions of the given atom indices, in the order given.
    ///
    /// Returns `None` if any index is out of range.
    pub fn gather(&self, indices: &[usize]) -> Option<Vec<Point3<f64>>> {
        indices
            .iter()
            .map(|&i| self.positions.get(i).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_image_wraps_long_displacements() {
        let pbc = PeriodicBox::new(10.0, 10.0, 10.0);
        let wrapped = pbc.minimum_image(Vector3::new(9.0, -6.0, 4.0));
        assert!((wrapped.x - -1.0).abs() < 1e-12);
        assert!((wrapped.y - 4.0).abs() < 1e-12);
        assert!((wrapped.z - 4.0).abs() < 1e-12);
    }

    #[test]
    fn zero_length_axis_is_not_periodic() {
        let pbc = PeriodicBox::new(0.0, 0.0, 0.0);
        assert!(!pbc.is_periodic());
        let delta = Vector3::new(25.0, -30.0, 12.5);
        assert_eq!(pbc.minimum_image(delta), delta);
    }

    #[test]
    fn gather_returns_positions_in_requested_order() {
        let frame = Frame::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ]);
        let gathered = frame.gather(&[2, 0]).unwrap();
        assert_eq!(gathered, vec![Point3::new(2.0, 0.0, 0.0), Point3::origin()]);
        assert!(frame.gather(&[3]).is_none());
    }
}
