//! Bus multiplexer source selection
//!
//! One 32-bit value crosses the bus per instruction. A persistent 4-bit
//! selector picks which source feeds it:
//!
//! | # | source | bus value |
//! |----|--------------|--------------------------------|
//! | 0 | Literal | literal register |
//! | 1 | State | literal register |
//! | 2 | DramData | `dram[dram_addr mod len]` |
//! | 3 | DramAddr | `dram_addr` |
//! | 4 | CacheData | `cache[cache_addr mod len]` |
//! | 5 | ShiftLeftA | `a << 1` |
//! | 6 | ShiftRightA | `a >> 1` |
//! | 7 | AAndB | `a & b` |
//! | 8 | AOrB | bitwise OR of a and b |
//! | 9 | AXorB | `a ^ b` |
//! | 10 | APlusB | `a + b + carry_in` (wrapping) |
//! | 11 | Uart | literal register (placeholder) |
//! | 12 | Keyboard | literal register (placeholder) |
//! | 13 | Rtc | literal register (placeholder) |
//! | 14 | DriveSerial | literal register (placeholder) |
//! | 15 | Unused | literal register (placeholder) |
//!
//! The numbering is part of the contract with assembled programs. The
//! device selectors (11-15) are read-back placeholders until those
//! peripherals can drive the bus; they return the literal register.

/// Bus source selector.
///
/// The selector persists across instructions until the set-bus-source
/// opcode changes it; the machine starts with [`BusSource::Literal`]
/// selected. Construction goes through [`BusSource::from_index`], which
/// masks to 4 bits, so every representable selector is a defined source
/// and the unknown-selector fault is unreachable by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BusSource {
    /// Literal register (the default source)
    Literal = 0,
    /// Machine state read-back; currently the literal register
    State = 1,
    /// DRAM data at the current DRAM address
    DramData = 2,
    /// The DRAM address latch itself
    DramAddr = 3,
    /// Cache data at the current cache address
    CacheData = 4,
    /// A shifted left one bit
    ShiftLeftA = 5,
    /// A shifted right one bit (logical)
    ShiftRightA = 6,
    /// Bitwise A AND B
    AAndB = 7,
    /// Bitwise A OR B
    AOrB = 8,
    /// Bitwise A XOR B
    AXorB = 9,
    /// A + B + carry-in, wrapping
    APlusB = 10,
    /// UART read-back placeholder
    Uart = 11,
    /// Keyboard read-back placeholder
    Keyboard = 12,
    /// RTC read-back placeholder
    Rtc = 13,
    /// Drive serial read-back placeholder
    DriveSerial = 14,
    /// Reserved
    Unused = 15,
}

impl BusSource {
    /// Build a selector from the low 4 bits of `index`.
    ///
    /// Masking happens here, at the point of assignment, so a selector
    /// stored in the machine is always one of the sixteen defined values.
    pub fn from_index(index: u8) -> BusSource {
        match index & 0x0F {
            0 => BusSource::Literal,
            1 => BusSource::State,
            2 => BusSource::DramData,
            3 => BusSource::DramAddr,
            4 => BusSource::CacheData,
            5 => BusSource::ShiftLeftA,
            6 => BusSource::ShiftRightA,
            7 => BusSource::AAndB,
            8 => BusSource::AOrB,
            9 => BusSource::AXorB,
            10 => BusSource::APlusB,
            11 => BusSource::Uart,
            12 => BusSource::Keyboard,
            13 => BusSource::Rtc,
            14 => BusSource::DriveSerial,
            _ => BusSource::Unused,
        }
    }

    /// The selector's 4-bit index.
    pub fn index(self) -> u8 {
        self as u8
    }
}

impl Default for BusSource {
    fn default() -> Self {
        BusSource::Literal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index_round_trip() {
        for index in 0u8..16 {
            assert_eq!(BusSource::from_index(index).index(), index);
        }
    }

    #[test]
    fn test_from_index_masks_to_4_bits() {
        assert_eq!(BusSource::from_index(0x10), BusSource::Literal);
        assert_eq!(BusSource::from_index(0xFA), BusSource::APlusB);
        assert_eq!(BusSource::from_index(0xFF), BusSource::Unused);
    }

    #[test]
    fn test_default_is_literal() {
        assert_eq!(BusSource::default(), BusSource::Literal);
    }
}
