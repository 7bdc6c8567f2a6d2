//! Program image parsing
//!
//! A program image is a flat sequence of 3-byte little-endian instruction
//! words: byte 0 holds bits 0-7, byte 1 bits 8-15, byte 2 bits 16-23. A
//! trailing partial word is silently dropped. Images longer than the
//! program store are rejected; unfilled words stay zero. Reading the file
//! itself is the frontend's job, the core only parses bytes.

use crate::memory::{ProgramMemory, PROGRAM_WORDS};

/// Bytes per packed instruction word.
pub const WORD_BYTES: usize = 3;

/// A parsed program image, ready to load into the machine.
#[derive(Debug, Clone)]
pub struct Program {
    memory: ProgramMemory,
    word_count: usize,
}

impl Program {
    /// Parse a packed program image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProgramError> {
        let word_count = bytes.len() / WORD_BYTES;
        if word_count > PROGRAM_WORDS {
            return Err(ProgramError::TooLarge {
                words: word_count,
                capacity: PROGRAM_WORDS,
            });
        }

        let mut words = vec![0u32; PROGRAM_WORDS];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(WORD_BYTES)) {
            *word = u32::from(chunk[0])
                | (u32::from(chunk[1]) << 8)
                | (u32::from(chunk[2]) << 16);
        }

        Ok(Self {
            memory: ProgramMemory::from_words(words),
            word_count,
        })
    }

    /// Build a program directly from instruction words (used by tests and
    /// tooling that assembles in memory).
    pub fn from_words(instructions: &[u32]) -> Result<Self, ProgramError> {
        if instructions.len() > PROGRAM_WORDS {
            return Err(ProgramError::TooLarge {
                words: instructions.len(),
                capacity: PROGRAM_WORDS,
            });
        }
        let mut words = vec![0u32; PROGRAM_WORDS];
        words[..instructions.len()].copy_from_slice(instructions);
        Ok(Self {
            memory: ProgramMemory::from_words(words),
            word_count: instructions.len(),
        })
    }

    /// Number of words the image actually supplied.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Take the backing program store.
    pub fn into_memory(self) -> ProgramMemory {
        self.memory
    }
}

/// Program image errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramError {
    /// The image holds more instruction words than the program store.
    TooLarge { words: usize, capacity: usize },
}

impl std::fmt::Display for ProgramError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgramError::TooLarge { words, capacity } => write!(
                f,
                "program image holds {} words but the program store fits {}",
                words, capacity
            ),
        }
    }
}

impl std::error::Error for ProgramError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_packing() {
        let program = Program::from_bytes(&[0x34, 0x12, 0x05]).unwrap();
        assert_eq!(program.word_count(), 1);
        assert_eq!(program.into_memory().fetch(0), 0x05_1234);
    }

    #[test]
    fn test_trailing_partial_word_dropped() {
        let program = Program::from_bytes(&[0x34, 0x12, 0x05, 0xAA, 0xBB]).unwrap();
        assert_eq!(program.word_count(), 1);
        let memory = program.into_memory();
        assert_eq!(memory.fetch(0), 0x05_1234);
        assert_eq!(memory.fetch(1), 0);
    }

    #[test]
    fn test_empty_image() {
        let program = Program::from_bytes(&[]).unwrap();
        assert_eq!(program.word_count(), 0);
        assert_eq!(program.into_memory().fetch(0), 0);
    }

    #[test]
    fn test_oversized_image_rejected() {
        let bytes = vec![0u8; (PROGRAM_WORDS + 1) * WORD_BYTES];
        let err = Program::from_bytes(&bytes).unwrap_err();
        assert_eq!(
            err,
            ProgramError::TooLarge {
                words: PROGRAM_WORDS + 1,
                capacity: PROGRAM_WORDS,
            }
        );
    }

    #[test]
    fn test_exactly_full_image_accepted() {
        let bytes = vec![0u8; PROGRAM_WORDS * WORD_BYTES];
        assert!(Program::from_bytes(&bytes).is_ok());
    }
}
