//! Occupancy-grid map and its binary codec.
//!
//! ### Wire format
//! * big-endian `u16` row count
//! * big-endian `u16` column count
//! * `rows * cols` cell codes (`u8`) in row-major order
//!
//! Cell code **0** is walkable floor; any nonzero code is a wall variant
//! whose texture the renderer picks per code.

use byteorder::{BigEndian as BE, ReadBytesExt, WriteBytesExt};
use glam::Vec2;
use std::{
    fs::File,
    io::{self, Read, Write},
    path::Path,
};
use thiserror::Error;

/// Discrete map coordinate as `(row, col)`.
pub type Cell = (usize, usize);

/// Errors that can be encountered while decoding a map.
#[derive(Error, Debug)]
pub enum MapError {
    /// Underlying I/O failure – propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Header promises more cells than the stream actually holds.
    #[error("truncated map: header declares {expected} cells, stream holds {got}")]
    Truncated { expected: usize, got: usize },
}

/// Static 2-D occupancy grid.  Immutable for the whole play session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl GridMap {
    /// Build a map from row-major cell codes.
    ///
    /// Panics if `cells.len() != rows * cols`; this constructor is for
    /// in-code maps (tests, generated levels), not untrusted data.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<u8>) -> Self {
        assert_eq!(cells.len(), rows * cols, "cell count must match shape");
        Self { rows, cols, cells }
    }

    /// All-walkable map, useful as a canvas.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    // ---------------------------------------------------------------------
    // Codec
    // ---------------------------------------------------------------------

    /// Decode a map from `stream`.
    pub fn decode<R: Read>(stream: &mut R) -> Result<Self, MapError> {
        let rows = stream.read_u16::<BE>()? as usize;
        let cols = stream.read_u16::<BE>()? as usize;

        let expected = rows * cols;
        let mut cells = Vec::with_capacity(expected);
        let got = stream.take(expected as u64).read_to_end(&mut cells)?;
        if got < expected {
            return Err(MapError::Truncated { expected, got });
        }

        Ok(Self { rows, cols, cells })
    }

    /// Encode the map onto `stream` in the wire format above.
    pub fn encode<W: Write>(&self, stream: &mut W) -> Result<(), MapError> {
        stream.write_u16::<BE>(self.rows as u16)?;
        stream.write_u16::<BE>(self.cols as u16)?;
        stream.write_all(&self.cells)?;
        Ok(())
    }

    /// Convenience: decode straight from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        Self::decode(&mut File::open(path)?)
    }

    /// Convenience: encode straight into a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), MapError> {
        self.encode(&mut File::create(path)?)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Cell code at `(row, col)`.  Caller guarantees bounds.
    #[inline]
    pub fn code(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.cols + col]
    }

    /// `true` when the cell exists and carries code 0.
    #[inline]
    pub fn is_walkable(&self, row: i32, col: i32) -> bool {
        self.in_bounds(row, col) && self.code(row as usize, col as usize) == 0
    }

    /// Cell containing a continuous point: `(floor(y), floor(x))`.
    #[inline]
    pub fn cell_of(p: Vec2) -> Cell {
        (p.y.max(0.0) as usize, p.x.max(0.0) as usize)
    }

    /// Centre of a cell in map units: `(col + 0.5, row + 0.5)`.
    #[inline]
    pub fn cell_centre(cell: Cell) -> Vec2 {
        Vec2::new(cell.1 as f32 + 0.5, cell.0 as f32 + 0.5)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
