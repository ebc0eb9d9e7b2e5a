//! Load/Store Unit (LSU) and Data Memory.
//!
//! Data memory is a flat array of words addressed by word index. The LSU
//! forms effective addresses in 64-bit arithmetic so that an out-of-range
//! base plus offset is reported instead of wrapping back into range.

use crate::common::Word;

/// Flat, word-addressed data memory.
#[derive(Clone, Debug)]
pub struct DataMemory {
    words: Vec<Word>,
}

impl DataMemory {
    /// Creates a zero-filled data memory.
    ///
    /// # Arguments
    ///
    /// * `size` - Number of words.
    pub fn new(size: usize) -> Self {
        Self {
            words: vec![0; size],
        }
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if data memory has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Converts an effective address into a word index, if it is in range.
    pub fn index(&self, address: i64) -> Option<usize> {
        usize::try_from(address)
            .ok()
            .filter(|&idx| idx < self.words.len())
    }

    /// Reads the word at `address`.
    ///
    /// # Returns
    ///
    /// `None` if the address lies outside data memory.
    pub fn read(&self, address: i64) -> Option<Word> {
        self.index(address).map(|idx| self.words[idx])
    }

    /// Writes `val` to `address`.
    ///
    /// # Returns
    ///
    /// `None` if the address lies outside data memory; memory is unchanged.
    pub fn write(&mut self, address: i64, val: Word) -> Option<()> {
        let idx = self.index(address)?;
        self.words[idx] = val;
        Some(())
    }

    /// All words, in address order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }
}

/// Load/Store Unit address generation.
pub struct Lsu;

impl Lsu {
    /// Computes `base + offset` without wrapping.
    ///
    /// # Arguments
    ///
    /// * `base` - Base register value
    /// * `offset` - Immediate or index register value
    pub fn effective_address(base: Word, offset: Word) -> i64 {
        i64::from(base) + i64::from(offset)
    }
}
