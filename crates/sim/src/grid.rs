use pixelsand_common::CellCoord;

use crate::simulation::SimError;

/// Cells packed into each bitmap word.
pub const CELLS_PER_WORD: u32 = 32;

/// One bit per cell occupancy bitmap.
///
/// Words are stored row-major, `width / 32` words per row. A set bit means
/// the cell holds a particle (or an obstacle); no colour or velocity lives
/// here so collision checks stay a single mask test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: u32,
    height: u32,
    words: Vec<u32>,
}

impl OccupancyGrid {
    /// Create an empty grid. Both dimensions must be non-zero multiples of 32.
    pub fn new(width: u32, height: u32) -> Result<Self, SimError> {
        if width == 0 || height == 0 || width % CELLS_PER_WORD != 0 || height % CELLS_PER_WORD != 0
        {
            return Err(SimError::InvalidDimensions { width, height });
        }
        let words_per_row = (width / CELLS_PER_WORD) as usize;
        Ok(Self {
            width,
            height,
            words: vec![0; words_per_row * height as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    fn locate(&self, cell: CellCoord) -> Option<(usize, u32)> {
        if !self.contains(cell) {
            return None;
        }
        let words_per_row = self.width / CELLS_PER_WORD;
        let word = cell.y * words_per_row + cell.x / CELLS_PER_WORD;
        Some((word as usize, 1 << (cell.x % CELLS_PER_WORD)))
    }

    /// Whether the cell is occupied. Out-of-bounds cells read as empty.
    pub fn is_set(&self, cell: CellCoord) -> bool {
        self.locate(cell)
            .is_some_and(|(word, mask)| self.words[word] & mask != 0)
    }

    /// Mark a cell occupied. Out-of-bounds writes are ignored.
    pub fn set(&mut self, cell: CellCoord) {
        if let Some((word, mask)) = self.locate(cell) {
            self.words[word] |= mask;
        }
    }

    /// Mark a cell empty. Out-of-bounds writes are ignored.
    pub fn clear(&mut self, cell: CellCoord) {
        if let Some((word, mask)) = self.locate(cell) {
            self.words[word] &= !mask;
        }
    }

    pub fn clear_all(&mut self) {
        self.words.fill(0);
    }

    /// Number of occupied cells.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Occupied cells in row-major order.
    pub fn iter_set(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let words_per_row = self.width / CELLS_PER_WORD;
        self.words
            .iter()
            .enumerate()
            .flat_map(move |(i, &word)| {
                let i = i as u32;
                let y = i / words_per_row;
                let base_x = (i % words_per_row) * CELLS_PER_WORD;
                (0..CELLS_PER_WORD)
                    .filter(move |&bit| word & (1 << bit) != 0)
                    .map(move |bit| CellCoord::new(base_x + bit, y))
            })
    }
}
