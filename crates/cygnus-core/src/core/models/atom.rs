/// Represents one atom of a topology.
///
/// Atoms are identified by their position in the topology (`index`, 0-based) and carry the
/// naming information the selection language matches against. Positions are not stored
/// here; they live in each [`Frame`](super::frame::Frame) so that a single topology can be
/// shared by every frame of a trajectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// Zero-based position of the atom in its topology.
    pub index: usize,
    /// The name of the atom (e.g., "CA", "OE1").
    pub name: String,
    /// The name of the parent residue (e.g., "GLU", "SOL").
    pub resname: String,
    /// The residue sequence number as written in the input file.
    pub resid: i32,
}

impl Atom {
    /// Creates a new `Atom`.
    ///
    /// # Arguments
    ///
    /// * `index` - Zero-based position of the atom in its topology.
    /// * `name` - The atom name.
    /// * `resname` - The residue name.
    /// * `resid` - The residue sequence number.
    pub fn new(index: usize, name: &str, resname: &str, resid: i32) -> Self {
        Self {
            index,
            name: name.to_string(),
            resname: resname.to_string(),
            resid,
        }
    }

    /// Returns the one-based serial number used by `bynum` selections.
    pub fn serial(&self) -> usize {
        self.index + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_stores_all_fields() {
        let atom = Atom::new(4, "OE1", "GLU", 12);
        assert_eq!(atom.index, 4);
        assert_eq!(atom.name, "OE1");
        assert_eq!(atom.resname, "GLU");
        assert_eq!(atom.resid, 12);
    }

    #[test]
    fn serial_is_one_based() {
        assert_eq!(Atom::new(0, "N", "ALA", 1).serial(), 1);
        assert_eq!(Atom::new(9, "C", "ALA", 2).serial(), 10);
    }
}
