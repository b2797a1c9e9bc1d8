//! DCPU-16 memory subsystem.
//!
//! The DCPU-16 has 0x10000 words of RAM. Addresses are plain words, so
//! every access is in range and address arithmetic simply wraps.

use crate::word::{Word, ADDRESS_SPACE};
use thiserror::Error;

/// DCPU-16 memory: 65536 sixteen-bit cells.
#[derive(Clone)]
pub struct Memory {
    cells: Vec<Word>,
}

impl Memory {
    /// Create a new memory with all cells zeroed.
    pub fn new() -> Self {
        Self {
            cells: vec![0; ADDRESS_SPACE],
        }
    }

    /// Read a cell.
    #[inline]
    pub fn get_word(&self, addr: Word) -> Word {
        self.cells[addr as usize]
    }

    /// Write a cell.
    #[inline]
    pub fn set_word(&mut self, addr: Word, value: Word) {
        self.cells[addr as usize] = value;
    }

    /// Read-only view of the cells `lo..=hi`.
    ///
    /// The view never wraps: `lo > hi` yields an empty slice.
    pub fn get_slice(&self, lo: Word, hi: Word) -> &[Word] {
        if lo > hi {
            return &[];
        }
        &self.cells[lo as usize..=hi as usize]
    }

    /// Clear all memory to zeros.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Copy `program` into memory starting at `offset`, wrapping past 0xffff.
    ///
    /// With `expect_clean`, every target cell must be zero beforehand; if one
    /// isn't, nothing is written.
    pub fn load_program(
        &mut self,
        program: &[Word],
        offset: Word,
        expect_clean: bool,
    ) -> Result<(), LoadError> {
        if program.len() > ADDRESS_SPACE {
            return Err(LoadError::ProgramTooLarge {
                size: program.len(),
            });
        }

        let addresses = (0..program.len()).map(|i| offset.wrapping_add(i as Word));

        if expect_clean {
            if let Some(addr) = addresses.clone().find(|&addr| self.get_word(addr) != 0) {
                return Err(LoadError::RegionNotClean {
                    addr,
                    found: self.get_word(addr),
                });
            }
        }

        for (addr, &word) in addresses.zip(program) {
            self.set_word(addr, word);
        }

        Ok(())
    }

    /// Number of cells holding a non-zero value.
    pub fn non_zero_cells(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != 0).count()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("non_zero_cells", &self.non_zero_cells())
            .field("total_cells", &ADDRESS_SPACE)
            .finish()
    }
}

/// Errors that can occur while loading a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// A target cell was already in use and a clean region was requested.
    #[error("target region is not clean: [{addr:#06x}] = {found:#06x}")]
    RegionNotClean { addr: Word, found: Word },

    /// Program doesn't fit into the address space.
    #[error("program of {size} words exceeds the 65536-word address space")]
    ProgramTooLarge { size: usize },
}
