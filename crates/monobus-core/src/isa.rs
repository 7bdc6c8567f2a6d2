//! Instruction word layout and the opcode space
//!
//! An instruction is a 24-bit word: bits 16-23 hold the opcode type byte,
//! bits 0-15 hold a 16-bit immediate. The immediate is folded into the low
//! half of the literal register on every instruction; the one exception is
//! set-literal-high, whose immediate lands in the high half so that two
//! consecutive instructions can compose an arbitrary 32-bit constant.

/// Width of the immediate field in bits.
pub const IMMEDIATE_BITS: u32 = 16;

/// Bit position of the opcode type byte within the instruction word.
pub const TYPE_SHIFT: u32 = 16;

/// Opcode type byte, one per instruction.
///
/// The space is three banks of sixteen. Bank A (0x00-0x0F) covers the bus,
/// registers, DRAM, and primary control flow; bank B (0x10-0x1F) covers
/// UART, cache, and the remaining conditional jumps; bank C (0x20-0x2F)
/// covers timers, the serial drive, and the VGA text surface. Type bytes
/// 0x14, 0x25, 0x26 and everything at or above 0x30 are unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    // Bank A
    SetDramData = 0x00,
    SetCarryIn = 0x01,
    Return = 0x02,
    JumpLessOrEqual = 0x03,
    JumpGreaterOrEqual = 0x04,
    Jump = 0x05,
    IncDramAddr = 0x06,
    SetDramAddr = 0x07,
    JumpNotEqual = 0x08,
    SetA = 0x09,
    SetLiteralHigh = 0x0A,
    WriteDram = 0x0B,
    SetBusSource = 0x0C,
    Call = 0x0D,
    SetB = 0x0E,
    SetAluFlags = 0x0F,

    // Bank B
    TimerSpeakerInterval = 0x10,
    UartBaud = 0x11,
    UartConfig = 0x12,
    UartTransmit = 0x13,
    KeyboardTransmit = 0x15,
    RtcDataAddr = 0x16,
    ParallelOut = 0x17,
    JumpLess = 0x18,
    TimerSpeakerFunction = 0x19,
    JumpGreater = 0x1A,
    JumpEqual = 0x1B,
    SetCacheData = 0x1C,
    SetCacheAddr = 0x1D,
    AtxPower = 0x1E,
    WriteCache = 0x1F,

    // Bank C
    Timer = 0x20,
    Time = 0x21,
    DriveSerialData = 0x22,
    DriveSerialAddr = 0x23,
    DriveSerialFunction = 0x24,
    VgaTextColor = 0x27,
    VgaWriteVram = 0x28,
    VgaFunction = 0x29,
    VgaTextBlink = 0x2A,
    VgaPixelColor = 0x2B,
    VgaTextWrite = 0x2C,
    VgaTextChar = 0x2D,
    VgaPixelPos = 0x2E,
    VgaTextPos = 0x2F,
}

impl Opcode {
    /// Decode a type byte to its opcode, or `None` for an unassigned byte.
    pub fn decode(type_byte: u8) -> Option<Opcode> {
        match type_byte {
            0x00 => Some(Opcode::SetDramData),
            0x01 => Some(Opcode::SetCarryIn),
            0x02 => Some(Opcode::Return),
            0x03 => Some(Opcode::JumpLessOrEqual),
            0x04 => Some(Opcode::JumpGreaterOrEqual),
            0x05 => Some(Opcode::Jump),
            0x06 => Some(Opcode::IncDramAddr),
            0x07 => Some(Opcode::SetDramAddr),
            0x08 => Some(Opcode::JumpNotEqual),
            0x09 => Some(Opcode::SetA),
            0x0A => Some(Opcode::SetLiteralHigh),
            0x0B => Some(Opcode::WriteDram),
            0x0C => Some(Opcode::SetBusSource),
            0x0D => Some(Opcode::Call),
            0x0E => Some(Opcode::SetB),
            0x0F => Some(Opcode::SetAluFlags),
            0x10 => Some(Opcode::TimerSpeakerInterval),
            0x11 => Some(Opcode::UartBaud),
            0x12 => Some(Opcode::UartConfig),
            0x13 => Some(Opcode::UartTransmit),
            0x15 => Some(Opcode::KeyboardTransmit),
            0x16 => Some(Opcode::RtcDataAddr),
            0x17 => Some(Opcode::ParallelOut),
            0x18 => Some(Opcode::JumpLess),
            0x19 => Some(Opcode::TimerSpeakerFunction),
            0x1A => Some(Opcode::JumpGreater),
            0x1B => Some(Opcode::JumpEqual),
            0x1C => Some(Opcode::SetCacheData),
            0x1D => Some(Opcode::SetCacheAddr),
            0x1E => Some(Opcode::AtxPower),
            0x1F => Some(Opcode::WriteCache),
            0x20 => Some(Opcode::Timer),
            0x21 => Some(Opcode::Time),
            0x22 => Some(Opcode::DriveSerialData),
            0x23 => Some(Opcode::DriveSerialAddr),
            0x24 => Some(Opcode::DriveSerialFunction),
            0x27 => Some(Opcode::VgaTextColor),
            0x28 => Some(Opcode::VgaWriteVram),
            0x29 => Some(Opcode::VgaFunction),
            0x2A => Some(Opcode::VgaTextBlink),
            0x2B => Some(Opcode::VgaPixelColor),
            0x2C => Some(Opcode::VgaTextWrite),
            0x2D => Some(Opcode::VgaTextChar),
            0x2E => Some(Opcode::VgaPixelPos),
            0x2F => Some(Opcode::VgaTextPos),
            _ => None,
        }
    }

    /// The type byte for this opcode.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Every assigned opcode, in type-byte order. Used by round-trip tests
    /// and by tooling that wants to enumerate the space.
    pub fn all() -> impl Iterator<Item = Opcode> {
        (0u8..=0x2F).filter_map(Opcode::decode)
    }
}

/// Split an instruction word into its type byte and immediate.
pub fn split(word: u32) -> (u8, u16) {
    (((word >> TYPE_SHIFT) & 0xFF) as u8, (word & 0xFFFF) as u16)
}

/// Assemble an instruction word from an opcode and immediate.
pub fn encode(opcode: Opcode, immediate: u16) -> u32 {
    (u32::from(opcode.code()) << TYPE_SHIFT) | u32::from(immediate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_encode_round_trip() {
        for opcode in Opcode::all() {
            for immediate in [0x0000u16, 0x0001, 0x1234, 0xFFFF] {
                let word = encode(opcode, immediate);
                let (ty, data) = split(word);
                assert_eq!(Opcode::decode(ty), Some(opcode));
                assert_eq!(data, immediate);
                assert_eq!(encode(Opcode::decode(ty).unwrap(), data), word);
            }
        }
    }

    #[test]
    fn test_unassigned_type_bytes() {
        assert_eq!(Opcode::decode(0x14), None);
        assert_eq!(Opcode::decode(0x25), None);
        assert_eq!(Opcode::decode(0x26), None);
        for ty in 0x30u8..=0xFF {
            assert_eq!(Opcode::decode(ty), None);
        }
    }

    #[test]
    fn test_split_masks_high_byte() {
        // Only the low 24 bits of a word are meaningful
        let (ty, data) = split(0xFF05_1234);
        assert_eq!(ty, 0x05);
        assert_eq!(data, 0x1234);
    }

    #[test]
    fn test_bank_boundaries() {
        assert_eq!(Opcode::SetDramData.code(), 0x00);
        assert_eq!(Opcode::SetAluFlags.code(), 0x0F);
        assert_eq!(Opcode::TimerSpeakerInterval.code(), 0x10);
        assert_eq!(Opcode::WriteCache.code(), 0x1F);
        assert_eq!(Opcode::Timer.code(), 0x20);
        assert_eq!(Opcode::VgaTextPos.code(), 0x2F);
    }
}
