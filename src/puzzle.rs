use rand::{thread_rng, Rng};
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use crate::error::PuzzleError;

/// Direction the blank travels when a tile slides into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Neighbor generation order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// An immutable n-by-n sliding tile board. `0` is the blank.
///
/// Both heuristics are computed once at construction. The twin and the
/// neighbor list are computed on first access and then shared for the
/// lifetime of the board.
#[derive(Clone)]
pub struct PuzzleState {
    size: usize,
    tiles: Vec<u32>,
    blank: usize,
    hamming: usize,
    manhattan: usize,
    twin: OnceCell<Rc<PuzzleState>>,
    neighbors: OnceCell<Vec<Rc<PuzzleState>>>,
}

impl PuzzleState {
    /// Builds a board from rows of tiles, copying them.
    ///
    /// The grid must be square with `n >= 2` and hold every value in
    /// `0..n*n` exactly once.
    pub fn new(grid: &[Vec<u32>]) -> Result<Self, PuzzleError> {
        let size = grid.len();
        if size == 0 {
            return Err(PuzzleError::EmptyGrid);
        }
        let cells = Self::cell_count(size)?;

        let mut tiles = Vec::with_capacity(cells);
        for (row, values) in grid.iter().enumerate() {
            if values.len() != size {
                return Err(PuzzleError::RaggedRow {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            tiles.extend_from_slice(values);
        }

        Self::from_flat(size, tiles)
    }

    /// Builds a board from `n*n` row-major tiles.
    pub fn from_flat(size: usize, tiles: Vec<u32>) -> Result<Self, PuzzleError> {
        if size == 0 || tiles.is_empty() {
            return Err(PuzzleError::EmptyGrid);
        }
        let cells = Self::cell_count(size)?;
        if tiles.len() != cells {
            return Err(PuzzleError::TileCount {
                expected: cells,
                found: tiles.len(),
            });
        }

        let mut seen = vec![false; tiles.len()];
        for &value in &tiles {
            let slot = seen
                .get_mut(value as usize)
                .ok_or(PuzzleError::TileOutOfRange { value, size })?;
            if *slot {
                return Err(PuzzleError::DuplicateTile(value));
            }
            *slot = true;
        }

        Ok(Self::from_valid(size, tiles))
    }

    /// The solved board: `1..n*n` in row-major order, blank last.
    pub fn goal(size: usize) -> Result<Self, PuzzleError> {
        let cells = Self::cell_count(size)? as u32;
        let tiles = (1..cells).chain(std::iter::once(0)).collect();
        Ok(Self::from_valid(size, tiles))
    }

    /// `n*n`, provided every tile value fits in a `u32`.
    fn cell_count(size: usize) -> Result<usize, PuzzleError> {
        if size < 2 {
            return Err(PuzzleError::DimensionTooSmall(size));
        }
        size
            .checked_mul(size)
            .filter(|&cells| u32::try_from(cells).is_ok())
            .ok_or(PuzzleError::DimensionTooLarge(size))
    }

    /// A copy sharing nothing with `self`: tiles and heuristics only, with
    /// empty twin and neighbor caches.
    pub(crate) fn detached(&self) -> Self {
        Self {
            size: self.size,
            tiles: self.tiles.clone(),
            blank: self.blank,
            hamming: self.hamming,
            manhattan: self.manhattan,
            twin: OnceCell::new(),
            neighbors: OnceCell::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn has_cached_neighbors(&self) -> bool {
        self.neighbors.get().is_some()
    }

    /// Random walk of `steps` moves away from the goal. The walk never
    /// immediately undoes its previous move, so the result is always
    /// solvable in at most `steps` moves.
    pub fn scrambled<R: Rng>(size: usize, steps: usize, rng: &mut R) -> Result<Self, PuzzleError> {
        let mut current = Self::goal(size)?;
        let mut last: Option<Move> = None;

        for _ in 0..steps {
            let options: Vec<Move> = Move::ALL
                .iter()
                .copied()
                .filter(|m| last.map_or(true, |l| *m != l.opposite()))
                .filter(|m| current.target_of(*m).is_some())
                .collect();
            let dir = options[rng.gen_range(0..options.len())];
            if let Some(next) = current.apply(dir) {
                current = next;
                last = Some(dir);
            }
        }

        Ok(current)
    }

    fn from_valid(size: usize, tiles: Vec<u32>) -> Self {
        let blank = tiles.iter().position(|&t| t == 0).unwrap_or(0);
        let hamming = Self::count_misplaced(&tiles);
        let manhattan = Self::manhattan_distance(size, &tiles);

        Self {
            size,
            tiles,
            blank,
            hamming,
            manhattan,
            twin: OnceCell::new(),
            neighbors: OnceCell::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.size
    }

    /// Row-major tiles.
    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    /// `(row, col)` of the blank.
    pub fn blank(&self) -> (usize, usize) {
        (self.blank / self.size, self.blank % self.size)
    }

    /// Number of non-blank tiles out of place.
    pub fn hamming(&self) -> usize {
        self.hamming
    }

    /// Sum of the Manhattan distances of non-blank tiles to their goal cells.
    pub fn manhattan(&self) -> usize {
        self.manhattan
    }

    pub fn is_goal(&self) -> bool {
        self.hamming == 0
    }

    /// A board with two distinct non-blank tiles swapped, picked uniformly
    /// at random. Memoized: every call returns the same twin.
    pub fn twin(&self) -> Rc<PuzzleState> {
        self.twin_with(&mut thread_rng())
    }

    /// Like [`twin`](Self::twin), drawing from `rng` if the twin has not
    /// been computed yet.
    pub fn twin_with<R: Rng>(&self, rng: &mut R) -> Rc<PuzzleState> {
        Rc::clone(self.twin.get_or_init(|| Rc::new(self.find_twin(rng))))
    }

    /// Boards one slide away, in `Move::ALL` order. Memoized.
    pub fn neighbors(&self) -> &[Rc<PuzzleState>] {
        self.neighbors.get_or_init(|| {
            Move::ALL
                .iter()
                .filter_map(|&dir| self.apply(dir))
                .map(Rc::new)
                .collect()
        })
    }

    /// The board after moving the blank in `dir`, or `None` at the edge.
    pub fn apply(&self, dir: Move) -> Option<Self> {
        let target = self.target_of(dir)?;
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target);
        Some(Self::from_valid(self.size, tiles))
    }

    /// The move that turns `self` into `next`, if they are one slide apart.
    pub fn move_towards(&self, next: &PuzzleState) -> Option<Move> {
        if next.size != self.size {
            return None;
        }
        Move::ALL.iter().copied().find(|&dir| {
            self.target_of(dir) == Some(next.blank) && self.apply(dir).as_ref() == Some(next)
        })
    }

    /// Closed-form solvability from inversion parity.
    pub fn has_solvable_parity(&self) -> bool {
        let inversions = Self::count_inversions(&self.tiles);
        let (blank_row, _) = self.blank();

        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            // Even width: the blank's row counted from the bottom flips the parity.
            (inversions + self.size - blank_row) % 2 == 1
        }
    }

    fn target_of(&self, dir: Move) -> Option<usize> {
        let (dr, dc) = dir.as_offset();
        let (row, col) = self.blank();

        let new_row = row as isize + dr;
        let new_col = col as isize + dc;
        let bound = self.size as isize;

        if new_row >= 0 && new_row < bound && new_col >= 0 && new_col < bound {
            Some(new_row as usize * self.size + new_col as usize)
        } else {
            None
        }
    }

    fn find_twin<R: Rng>(&self, rng: &mut R) -> PuzzleState {
        let cells = self.tiles.len();

        let first = loop {
            let i = rng.gen_range(0..cells);
            if self.tiles[i] != 0 {
                break i;
            }
        };
        let second = loop {
            let i = rng.gen_range(0..cells);
            if self.tiles[i] != 0 && i != first {
                break i;
            }
        };

        let mut tiles = self.tiles.clone();
        tiles.swap(first, second);
        Self::from_valid(self.size, tiles)
    }

    fn count_misplaced(tiles: &[u32]) -> usize {
        tiles
            .iter()
            .enumerate()
            .filter(|&(i, &value)| value != 0 && value as usize != i + 1)
            .count()
    }

    fn manhattan_distance(size: usize, tiles: &[u32]) -> usize {
        tiles
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value != 0)
            .map(|(i, &value)| {
                let goal = value as usize - 1;
                (i / size).abs_diff(goal / size) + (i % size).abs_diff(goal % size)
            })
            .sum()
    }

    fn count_inversions(tiles: &[u32]) -> usize {
        tiles
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != 0)
            .map(|(i, &val)| {
                tiles[i + 1..]
                    .iter()
                    .filter(|&&next| next != 0 && next < val)
                    .count()
            })
            .sum()
    }
}

impl PartialEq for PuzzleState {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.tiles == other.tiles
    }
}

impl Eq for PuzzleState {}

impl fmt::Debug for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PuzzleState")
            .field("size", &self.size)
            .field("tiles", &self.tiles)
            .field("hamming", &self.hamming)
            .field("manhattan", &self.manhattan)
            .finish()
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.size)?;
        for row in self.tiles.chunks(self.size) {
            for &val in row {
                write!(f, "{:2} ", val)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
