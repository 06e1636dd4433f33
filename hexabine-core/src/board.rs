//! Hex board geometry with odd-r offset coordinates
//!
//! Cells are addressed by plain (row, col) pairs. Odd rows are drawn shifted
//! half a tile to the right, which changes the column offset of the four
//! diagonal neighbors depending on row parity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grid cell in offset coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if this cell is on a `height` x `width` board
    pub fn in_bounds(&self, height: usize, width: usize) -> bool {
        self.row < height && self.col < width
    }

    /// Neighbor in `dir`, or `None` when it falls off the board
    pub fn neighbor(&self, dir: Direction, height: usize, width: usize) -> Option<Cell> {
        let (dr, dc) = dir.offset(self.row);
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        let next = Cell::new(row, col);
        next.in_bounds(height, width).then_some(next)
    }

    /// All in-bounds neighbors, in `Direction::ALL` order
    pub fn neighbors(&self, height: usize, width: usize) -> impl Iterator<Item = Cell> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor(dir, height, width))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Movement direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    L,
    R,
    UL,
    UR,
    DL,
    DR,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::L,
        Direction::R,
        Direction::UL,
        Direction::UR,
        Direction::DL,
        Direction::DR,
    ];

    /// Direction for index 0-5 (`ALL` order).
    ///
    /// Panics on any other index: the direction set is closed, so an
    /// unknown index is a caller bug.
    pub fn from_index(index: u8) -> Direction {
        match Direction::ALL.get(index as usize) {
            Some(&dir) => dir,
            None => panic!("invalid direction index {index}, expected 0-5"),
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// (row, col) step from a cell on `row`
    pub fn offset(self, row: usize) -> (isize, isize) {
        let even = row % 2 == 0;
        match self {
            Direction::L => (0, -1),
            Direction::R => (0, 1),
            Direction::UL => (-1, if even { -1 } else { 0 }),
            Direction::UR => (-1, if even { 0 } else { 1 }),
            Direction::DL => (1, if even { -1 } else { 0 }),
            Direction::DR => (1, if even { 0 } else { 1 }),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::L => Direction::R,
            Direction::R => Direction::L,
            Direction::UL => Direction::DR,
            Direction::UR => Direction::DL,
            Direction::DL => Direction::UR,
            Direction::DR => Direction::UL,
        }
    }

    pub fn is_diagonal(self) -> bool {
        !matches!(self, Direction::L | Direction::R)
    }

    /// Source cells in the order a shift toward `self` visits them.
    ///
    /// Cells nearest the target edge come first so every tile's destination
    /// is settled before the tiles behind it move. The edge line itself is
    /// skipped since nothing there can advance.
    pub fn scan_order(self, height: usize, width: usize) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(height * width);
        match self {
            Direction::L => {
                for row in 0..height {
                    cells.extend((1..width).map(|col| Cell::new(row, col)));
                }
            }
            Direction::R => {
                for row in 0..height {
                    cells.extend((0..width.saturating_sub(1)).rev().map(|col| Cell::new(row, col)));
                }
            }
            Direction::UL | Direction::UR => {
                for row in 1..height {
                    cells.extend((0..width).map(|col| Cell::new(row, col)));
                }
            }
            Direction::DL | Direction::DR => {
                for row in (0..height.saturating_sub(1)).rev() {
                    cells.extend((0..width).map(|col| Cell::new(row, col)));
                }
            }
        }
        cells
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::L => "left",
            Direction::R => "right",
            Direction::UL => "up-left",
            Direction::UR => "up-right",
            Direction::DL => "down-left",
            Direction::DR => "down-right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized direction text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction '{0}' (expected one of l, r, ul, ur, dl, dr)")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => Ok(Direction::L),
            "r" | "right" => Ok(Direction::R),
            "ul" | "up-left" => Ok(Direction::UL),
            "ur" | "up-right" => Ok(Direction::UR),
            "dl" | "down-left" => Ok(Direction::DL),
            "dr" | "down-right" => Ok(Direction::DR),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}
