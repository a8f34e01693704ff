use crate::core::io::traits::SegmentFile;
use crate::core::models::frame::{Frame, PeriodicBox};
use nalgebra::Point3;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use xdrfile::{Trajectory, XTCTrajectory};

const NM_TO_ANGSTROM: f64 = 10.0;
const OFF_DIAGONAL_TOLERANCE: f32 = 1e-5;

#[derive(Debug, Error)]
pub enum XtcError {
    #[error("Failed to decode XTC file '{path}': {message}", path = path.display())]
    Decode { path: PathBuf, message: String },
    #[error("Frame {frame} of '{path}' has a triclinic box, which is not supported", path = path.display())]
    TriclinicBox { path: PathBuf, frame: usize },
    #[error("XTC file '{path}' contains no frames", path = path.display())]
    Empty { path: PathBuf },
}

fn decode_err(path: &Path, err: xdrfile::Error) -> XtcError {
    XtcError::Decode {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Converts an XTC box (nm, row vectors) into an orthorhombic box in Angstroms.
///
/// Returns `Ok(None)` for a zero box, which GROMACS writes for non-periodic systems.
fn convert_box(
    box_vector: &[[f32; 3]; 3],
    path: &Path,
    frame: usize,
) -> Result<Option<PeriodicBox>, XtcError> {
    let off_diagonal = (0..3)
        .flat_map(|i| (0..3).filter(move |&j| j != i).map(move |j| (i, j)))
        .any(|(i, j)| box_vector[i][j].abs() >= OFF_DIAGONAL_TOLERANCE);
    if off_diagonal {
        return Err(XtcError::TriclinicBox {
            path: path.to_path_buf(),
            frame,
        });
    }
    let pbc = PeriodicBox::new(
        f64::from(box_vector[0][0]) * NM_TO_ANGSTROM,
        f64::from(box_vector[1][1]) * NM_TO_ANGSTROM,
        f64::from(box_vector[2][2]) * NM_TO_ANGSTROM,
    );
    Ok(pbc.is_periodic().then_some(pbc))
}

/// Reader for GROMACS compressed `.xtc` trajectory segments.
///
/// Coordinates and box lengths are converted from nanometres to Angstroms and the frame
/// time is kept in picoseconds.
pub struct XtcFile;

impl SegmentFile for XtcFile {
    type Error = XtcError;

    fn read_segment(path: &Path) -> Result<(usize, Vec<Frame>), Self::Error> {
        let mut traj = XTCTrajectory::open_read(path).map_err(|e| decode_err(path, e))?;
        let n_atoms = traj.get_num_atoms().map_err(|e| decode_err(path, e))?;
        let mut raw = xdrfile::Frame::with_len(n_atoms);

        let mut frames = Vec::new();
        loop {
            match traj.read(&mut raw) {
                Ok(()) => {}
                Err(err) if err.is_eof() => break,
                Err(err) => return Err(decode_err(path, err)),
            }
            let positions = raw
                .coords
                .iter()
                .map(|c| {
                    Point3::new(f64::from(c[0]), f64::from(c[1]), f64::from(c[2]))
                        * NM_TO_ANGSTROM
                })
                .collect();
            let mut frame = Frame::new(positions).with_time(f64::from(raw.time));
            if let Some(pbc) = convert_box(&raw.box_vector, path, frames.len())? {
                frame = frame.with_box(pbc);
            }
            frames.push(frame);
        }

        if frames.is_empty() {
            return Err(XtcError::Empty {
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), n_atoms, n_frames = frames.len(), "Decoded XTC segment.");
        Ok((n_atoms, frames))
    }
}
