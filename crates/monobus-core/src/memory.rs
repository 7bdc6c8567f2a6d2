//! Two-phase latched memory banks and the program store
//!
//! Only one value crosses the bus per instruction, so memory access is
//! split across instructions through a pair of latch registers per bank:
//! one instruction sets the address latch, a later instruction samples the
//! data through the bus multiplexer (a read) or sets the data latch and
//! then commits it (a write). Addresses always wrap modulo the bank
//! length; out-of-range addresses alias, they never fault.

/// Program store capacity in 24-bit instruction words.
pub const PROGRAM_WORDS: usize = 65_536;

/// Cache capacity in 32-bit words.
pub const CACHE_WORDS: usize = 131_072;

/// DRAM capacity in 32-bit words.
pub const DRAM_WORDS: usize = 33_554_432;

/// A word-addressed memory bank with an address latch and a data latch.
#[derive(Debug, Clone)]
pub struct MemoryBank {
    cells: Vec<u32>,
    addr: u32,
    latch: u32,
}

impl MemoryBank {
    /// Create a zero-filled bank of `len` words.
    pub fn new(len: usize) -> Self {
        Self {
            cells: vec![0; len],
            addr: 0,
            latch: 0,
        }
    }

    /// Latch a new address.
    pub fn set_addr(&mut self, addr: u32) {
        self.addr = addr;
    }

    /// Increment the address latch, wrapping at 2^32. Used for sequential
    /// access patterns without re-driving the bus.
    pub fn incr_addr(&mut self) {
        self.addr = self.addr.wrapping_add(1);
    }

    /// The current address latch.
    pub fn addr(&self) -> u32 {
        self.addr
    }

    /// Latch a value to be committed by a later write.
    pub fn set_latch(&mut self, value: u32) {
        self.latch = value;
    }

    /// The current data latch.
    pub fn latch(&self) -> u32 {
        self.latch
    }

    /// Commit the data latch to the cell at the latched address.
    pub fn commit(&mut self) {
        let index = self.addr as usize % self.cells.len();
        self.cells[index] = self.latch;
    }

    /// Read the cell at the latched address.
    pub fn read(&self) -> u32 {
        self.cells[self.addr as usize % self.cells.len()]
    }

    /// Bank length in words.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the bank has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The program store: a fixed array of 24-bit instruction words, read-only
/// at run time, indexed by the 16-bit program counter.
#[derive(Debug, Clone)]
pub struct ProgramMemory {
    words: Vec<u32>,
}

impl ProgramMemory {
    /// An empty (all-zero) program store.
    pub fn new() -> Self {
        Self {
            words: vec![0; PROGRAM_WORDS],
        }
    }

    /// Build a program store from loaded words. Callers guarantee
    /// `words.len() == PROGRAM_WORDS`; see [`crate::program`].
    pub(crate) fn from_words(words: Vec<u32>) -> Self {
        debug_assert_eq!(words.len(), PROGRAM_WORDS);
        Self { words }
    }

    /// Fetch the instruction word at `pc`.
    pub fn fetch(&self, pc: u16) -> u32 {
        self.words[pc as usize]
    }
}

impl Default for ProgramMemory {
    fn default() -> Self {
        Self::new()
    }
}
