use crate::core::io::traits::{CoordinateFile, SegmentFile};
use crate::core::io::xtc::{XtcError, XtcFile};
use crate::core::models::frame::{Frame, PeriodicBox};
use crate::core::models::topology::Topology;
use crate::core::models::trajectory::{Trajectory, apply_stride};
use nalgebra::Point3;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const NM_TO_ANGSTROM: f64 = 10.0;
const COORDINATE_START: usize = 20;
const DEFAULT_COORDINATE_WIDTH: usize = 8;

#[derive(Debug, Error)]
pub enum GroError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: GroParseErrorKind },
    #[error("Frame {frame} has {found} atoms, expected {expected}")]
    FrameAtomCount {
        frame: usize,
        expected: usize,
        found: usize,
    },
    #[error("Segment '{path}' has {found} atoms but the topology has {expected}", path = path.display())]
    AtomCountMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
    #[error("File contains no frames")]
    Empty,
    #[error(transparent)]
    Xtc(#[from] XtcError),
}

#[derive(Debug, Error)]
pub enum GroParseErrorKind {
    #[error("Invalid atom count '{0}'")]
    InvalidAtomCount(String),
    #[error("Invalid integer in columns {columns} (value: '{value}')")]
    InvalidInt { columns: &'static str, value: String },
    #[error("Invalid float in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Atom line is too short (must be at least {required} chars)")]
    LineTooShort { required: usize },
    #[error("Invalid box line '{0}'")]
    InvalidBox(String),
    #[error("Triclinic boxes are not supported")]
    TriclinicBox,
    #[error("Unexpected end of file")]
    UnexpectedEof,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_err(line: usize, kind: GroParseErrorKind) -> GroError {
    GroError::Parse { line, kind }
}

/// Reads the `t=` value GROMACS writes into frame titles.
fn parse_title_time(title: &str) -> Option<f64> {
    let (_, rest) = title.split_once("t=")?;
    rest.split_whitespace().next()?.parse().ok()
}

fn parse_box(line: &str, line_num: usize) -> Result<Option<PeriodicBox>, GroError> {
    let values: Vec<f64> = line
        .split_whitespace()
        .map(|v| v.parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| parse_err(line_num, GroParseErrorKind::InvalidBox(line.trim().into())))?;

    match values.len() {
        3 => {}
        9 if values[3..].iter().all(|&v| v == 0.0) => {}
        9 => return Err(parse_err(line_num, GroParseErrorKind::TriclinicBox)),
        _ => {
            return Err(parse_err(
                line_num,
                GroParseErrorKind::InvalidBox(line.trim().into()),
            ));
        }
    }
    let pbc = PeriodicBox::new(
        values[0] * NM_TO_ANGSTROM,
        values[1] * NM_TO_ANGSTROM,
        values[2] * NM_TO_ANGSTROM,
    );
    Ok(pbc.is_periodic().then_some(pbc))
}

struct GroAtomLine<'a> {
    resid: i32,
    resname: &'a str,
    name: &'a str,
    position: Point3<f64>,
}

/// Infers the width of the coordinate fields from the spacing of their decimal points.
///
/// Files written with `gmx trjconv -ndec N` use `N + 5` columns per coordinate instead of
/// the default 8.
fn coordinate_width(line: &str) -> usize {
    let Some(fields) = line.get(COORDINATE_START..) else {
        return DEFAULT_COORDINATE_WIDTH;
    };
    let mut dots = fields.match_indices('.').map(|(i, _)| i);
    match (dots.next(), dots.next()) {
        (Some(first), Some(second)) => second - first,
        _ => DEFAULT_COORDINATE_WIDTH,
    }
}

fn parse_atom_line(
    line: &str,
    line_num: usize,
    width: usize,
) -> Result<GroAtomLine<'_>, GroError> {
    let required = COORDINATE_START + 3 * width;
    if line.len() < required {
        return Err(parse_err(line_num, GroParseErrorKind::LineTooShort { required }));
    }
    let resid_str = slice_and_trim(line, 0, 5);
    let resid: i32 = resid_str.parse().map_err(|_| {
        parse_err(
            line_num,
            GroParseErrorKind::InvalidInt {
                columns: "1-5",
                value: resid_str.into(),
            },
        )
    })?;

    let coordinate = |axis: usize| {
        let start = COORDINATE_START + axis * width;
        let value = slice_and_trim(line, start, start + width);
        value.parse::<f64>().map_err(|_| {
            parse_err(
                line_num,
                GroParseErrorKind::InvalidFloat {
                    columns: format!("{}-{}", start + 1, start + width),
                    value: value.into(),
                },
            )
        })
    };
    let position = Point3::new(coordinate(0)?, coordinate(1)?, coordinate(2)?);

    Ok(GroAtomLine {
        resid,
        resname: slice_and_trim(line, 5, 10),
        name: slice_and_trim(line, 10, 15),
        position: position * NM_TO_ANGSTROM,
    })
}

/// Reader for (multi-frame) GROMACS `.gro` coordinate files.
///
/// Coordinates and box lengths are converted from nanometres to Angstroms. The coordinate
/// field width is taken from the first atom line of each frame, so higher-precision output
/// is read without truncation.
pub struct GroFile;

impl CoordinateFile for GroFile {
    type Error = GroError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Topology, Vec<Frame>), Self::Error> {
        let mut lines = reader.lines().enumerate().map(|(i, l)| (i + 1, l));
        let mut next_line = |after: usize| -> Result<(usize, String), GroError> {
            match lines.next() {
                Some((n, line)) => Ok((n, line?)),
                None => Err(parse_err(after + 1, GroParseErrorKind::UnexpectedEof)),
            }
        };

        let mut topology = Topology::new();
        let mut frames = Vec::new();
        let mut last_line = 0;

        loop {
            let (title_num, title) = match next_line(last_line) {
                Ok(line) => line,
                Err(GroError::Parse {
                    kind: GroParseErrorKind::UnexpectedEof,
                    ..
                }) => break,
                Err(e) => return Err(e),
            };
            last_line = title_num;
            if title.trim().is_empty() {
                continue;
            }

            let (count_num, count_line) = next_line(last_line)?;
            let n_atoms: usize = count_line.trim().parse().map_err(|_| {
                parse_err(
                    count_num,
                    GroParseErrorKind::InvalidAtomCount(count_line.trim().into()),
                )
            })?;
            last_line = count_num;

            let is_first = frames.is_empty();
            if !is_first && n_atoms != topology.n_atoms() {
                return Err(GroError::FrameAtomCount {
                    frame: frames.len(),
                    expected: topology.n_atoms(),
                    found: n_atoms,
                });
            }

            let mut positions = Vec::with_capacity(n_atoms);
            let mut frame_width = None;
            for _ in 0..n_atoms {
                let (atom_num, atom_line) = next_line(last_line)?;
                last_line = atom_num;
                let width = *frame_width.get_or_insert_with(|| coordinate_width(&atom_line));
                let atom = parse_atom_line(&atom_line, atom_num, width)?;
                if is_first {
                    topology.push(atom.name, atom.resname, atom.resid);
                }
                positions.push(atom.position);
            }

            let (box_num, box_line) = next_line(last_line)?;
            last_line = box_num;

            let mut frame = Frame::new(positions);
            if let Some(pbc) = parse_box(&box_line, box_num)? {
                frame = frame.with_box(pbc);
            }
            if let Some(time) = parse_title_time(&title) {
                frame = frame.with_time(time);
            }
            frames.push(frame);
        }

        if frames.is_empty() {
            return Err(GroError::Empty);
        }
        debug!(
            n_atoms = topology.n_atoms(),
            n_frames = frames.len(),
            "Parsed GRO input."
        );
        Ok((topology, frames))
    }
}

impl SegmentFile for GroFile {
    type Error = GroError;

    fn read_segment(path: &Path) -> Result<(usize, Vec<Frame>), Self::Error> {
        let (topology, frames) = GroFile::read_from_path(path)?;
        Ok((topology.n_atoms(), frames))
    }
}

/// Reads one segment, choosing the decoder from the file extension.
///
/// `.xtc` files (any case) go through [`XtcFile`]; everything else is read as GRO text.
fn read_segment(path: &Path) -> Result<(usize, Vec<Frame>), GroError> {
    let is_xtc = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xtc"));
    if is_xtc {
        Ok(XtcFile::read_segment(path)?)
    } else {
        GroFile::read_segment(path)
    }
}

/// Builds an in-memory trajectory from a topology file and zero or more coordinate segments.
///
/// The topology always comes from the GRO file at `topology_path`. Each segment is one
/// simulation run, stored either as GRO text or as a compressed `.xtc` file. Segments are
/// concatenated in the order given and the stride is applied over the concatenation.
/// Without segments, the frames of the topology file itself form a single-run trajectory.
///
/// # Errors
///
/// Returns a [`GroError`] if any file fails to parse or a segment's atom count differs
/// from the topology's.
pub fn load_trajectory<P: AsRef<Path>>(
    topology_path: P,
    segment_paths: &[PathBuf],
    stride: usize,
) -> Result<Trajectory, GroError> {
    let (topology, topology_frames) = GroFile::read_from_path(topology_path.as_ref())?;

    let (frames, n_segments) = if segment_paths.is_empty() {
        (topology_frames, 1)
    } else {
        let mut frames = Vec::new();
        for path in segment_paths {
            let (n_atoms, segment_frames) = read_segment(path)?;
            if n_atoms != topology.n_atoms() {
                return Err(GroError::AtomCountMismatch {
                    path: path.clone(),
                    expected: topology.n_atoms(),
                    found: n_atoms,
                });
            }
            debug!(path = %path.display(), n_frames = segment_frames.len(), "Loaded segment.");
            frames.extend(segment_frames);
        }
        (frames, segment_paths.len())
    };

    let frames = apply_stride(frames, stride);
    info!(
        n_atoms = topology.n_atoms(),
        n_frames = frames.len(),
        n_segments,
        stride,
        "Trajectory loaded into memory."
    );
    Ok(Trajectory::new(topology, frames)
        .with_segments(n_segments)
        .with_stride(stride))
}
