use crate::error::EnvironmentError;
use pathfinding::matrix::Matrix;
use std::fmt;

/// A grid cell address as (row, column).
///
/// Coordinates are signed so that neighbours of border cells can be formed
/// and looked up without special cases; such positions are simply out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    pub fn manhattan(&self, other: &Position) -> u64 {
        u64::from(self.row.abs_diff(other.row)) + u64::from(self.col.abs_diff(other.col))
    }

    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.manhattan(other) == 1
    }

    /// The cardinal neighbours in up, down, left, right order. Offsets that
    /// would overflow `i32` are left out.
    pub fn neighbours(&self) -> Vec<Position> {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter_map(|(dr, dc)| {
                Some(Position::new(self.row.checked_add(dr)?, self.col.checked_add(dc)?))
            })
            .collect()
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Position::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Traversal cost of a cell or a path. `Infinite` orders after every finite cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cost {
    Finite(u64),
    Infinite,
}

impl Cost {
    pub const ZERO: Cost = Cost::Finite(0);

    pub fn is_finite(&self) -> bool {
        matches!(self, Cost::Finite(_))
    }

    pub fn finite(&self) -> Option<u64> {
        match self {
            Cost::Finite(c) => Some(*c),
            Cost::Infinite => None,
        }
    }

    /// Adds another cost, saturating to `Infinite`.
    pub fn plus(self, other: Cost) -> Cost {
        match (self, other) {
            (Cost::Finite(a), Cost::Finite(b)) => Cost::Finite(a.saturating_add(b)),
            _ => Cost::Infinite,
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(c) => write!(f, "{}", c),
            Cost::Infinite => write!(f, "inf"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Traversable cell with its terrain cost (always >= 1).
    Open(u32),
    Wall,
}

/// Raw map value marking a permanently blocked cell.
pub const WALL_SENTINEL: i64 = -1;

/// Immutable terrain grid.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Matrix<Cell>,
}

impl Grid {
    /// Builds a grid from raw map values: `0` becomes cost 1, positive values
    /// are costs and [`WALL_SENTINEL`] marks a wall.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, EnvironmentError> {
        let expected = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(EnvironmentError::EmptyGrid),
        };

        let mut cells = Vec::with_capacity(rows.len());
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != expected {
                return Err(EnvironmentError::RaggedGrid {
                    row: r,
                    expected,
                    found: row.len(),
                });
            }
            let converted = row
                .into_iter()
                .enumerate()
                .map(|(c, value)| match value {
                    WALL_SENTINEL => Ok(Cell::Wall),
                    0 => Ok(Cell::Open(1)),
                    v if v > 0 && v <= i64::from(u32::MAX) => Ok(Cell::Open(v as u32)),
                    v => Err(EnvironmentError::InvalidCost { row: r, col: c, value: v }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            cells.push(converted);
        }

        let cells = Matrix::from_rows(cells).map_err(|_| EnvironmentError::RaggedGrid {
            row: 0,
            expected,
            found: 0,
        })?;
        Ok(Grid { cells })
    }

    pub fn rows(&self) -> usize {
        self.cells.rows
    }

    pub fn cols(&self) -> usize {
        self.cells.columns
    }

    pub fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index(pos).and_then(|idx| self.cells.get(idx)).copied()
    }

    /// Terrain cost of a cell; `Infinite` for walls and out-of-bounds positions.
    pub fn cost(&self, pos: Position) -> Cost {
        match self.cell(pos) {
            Some(Cell::Open(c)) => Cost::Finite(u64::from(c)),
            Some(Cell::Wall) | None => Cost::Infinite,
        }
    }

    fn index(&self, pos: Position) -> Option<(usize, usize)> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        (row < self.rows() && col < self.cols()).then_some((row, col))
    }
}
