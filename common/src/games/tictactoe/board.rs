use std::fmt;
use std::str::FromStr;

use super::types::{BOARD_SIDE, CELL_COUNT, Cell, Mark};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Cells are written once; overwriting a marked cell is rejected.
    pub fn place(&mut self, index: usize, mark: Mark) -> Result<(), String> {
        match self.cells.get_mut(index) {
            None => Err(format!(
                "Cell index {} out of bounds (expected 0..{})",
                index,
                CELL_COUNT - 1
            )),
            Some(cell) if !cell.is_empty() => Err(format!("Cell {} is already marked", index)),
            Some(cell) => {
                *cell = mark.into();
                Ok(())
            }
        }
    }

    pub(crate) fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    pub fn available_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    pub fn count(&self, mark: Mark) -> usize {
        let target = Cell::from(mark);
        self.cells.iter().filter(|&&cell| cell == target).count()
    }
}

impl FromStr for Board {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != CELL_COUNT {
            return Err(format!(
                "Board must have exactly {} cells, got {}",
                CELL_COUNT,
                chars.len()
            ));
        }

        let mut cells = [Cell::Empty; CELL_COUNT];
        for (index, ch) in chars.into_iter().enumerate() {
            cells[index] = match ch {
                'X' | 'x' => Cell::X,
                'O' | 'o' => Cell::O,
                '_' | '.' | '-' | ' ' => Cell::Empty,
                other => {
                    return Err(format!("Invalid cell '{}' at index {}", other, index));
                }
            };
        }

        Ok(Self { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(BOARD_SIDE).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in chunk {
                write!(f, "{}", cell.as_char())?;
            }
        }
        Ok(())
    }
}
