use crate::core::models::frame::Frame;
use crate::core::models::topology::Topology;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading coordinate file formats.
///
/// A coordinate file yields the topology it describes together with every frame it
/// contains, in file order. Implementors handle format-specific parsing; the trait supplies
/// path-based convenience methods that open, fully consume and release the file.
pub trait CoordinateFile {
    /// The error type for I/O and parsing failures.
    type Error: Error + From<io::Error>;

    /// Reads a topology and all frames from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    ///
    /// # Return
    ///
    /// Returns the topology of the first frame and the frames in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the frames disagree on their atom count.
    fn read_from(reader: &mut impl BufRead) -> Result<(Topology, Vec<Frame>), Self::Error>;

    /// Reads a topology and all frames from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<(Topology, Vec<Frame>), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

/// Defines the interface for reading tabulated series formats.
pub trait SeriesFile {
    /// The parsed representation of the file.
    type Output;

    /// The error type for I/O and parsing failures.
    type Error: Error + From<io::Error>;

    /// Reads a series from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if a data line is malformed.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error>;

    /// Reads a series from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Output, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

/// Defines the interface for coordinate-only trajectory segments.
///
/// A segment carries no atom names or residues; its atoms are described by a separately
/// loaded topology. Implementors report the atom count stored in the file so callers can
/// check it against that topology.
pub trait SegmentFile {
    /// The error type for I/O and decoding failures.
    type Error: Error;

    /// Reads every frame of the segment at `path`, in file order.
    ///
    /// # Return
    ///
    /// Returns the atom count recorded in the file and the decoded frames.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or a frame cannot be decoded.
    fn read_segment(path: &Path) -> Result<(usize, Vec<Frame>), Self::Error>;
}
