use super::atom::Atom;
use super::selection::{AtomGroup, Selection, SelectionError};

/// The ordered list of atoms shared by every frame of a trajectory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    atoms: Vec<Atom>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an atom, assigning it the next index.
    pub fn push(&mut self, name: &str, resname: &str, resid: i32) -> usize {
        let index = self.atoms.len();
        self.atoms.push(Atom::new(index, name, resname, resid));
        index
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Resolves a selector string to the group of matching atoms.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Syntax`] for malformed expressions and
    /// [`SelectionError::Empty`] when nothing matches.
    pub fn select(&self, expression: &str) -> Result<AtomGroup, SelectionError> {
        Selection::parse(expression)?.resolve(self)
    }
}

impl FromIterator<Atom> for Topology {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        let mut topology = Topology::new();
        for atom in iter {
            topology.push(&atom.name, &atom.resname, atom.resid);
        }
        topology
    }
}
