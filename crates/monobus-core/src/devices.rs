//! Device adapter seams (console, UART, peripheral hooks)
//!
//! Devices sit at the end of the handler chain: they receive bus-derived
//! values and never drive the bus back. The core owns the bit-field
//! decoding (UART framing, VGA color/position fields); the traits here are
//! the seam where a frontend plugs in rendering and I/O. Most peripheral
//! opcodes on the real machine are still unimplemented, so their hooks
//! default to no-ops rather than inventing behavior - future opcodes stay
//! wireable without touching the dispatcher.

/// Text console surface, the VGA text mode seen by programs.
pub trait Console {
    /// Called once before the machine starts executing.
    fn init(&mut self) {}
    /// Called once when the machine stops.
    fn shutdown(&mut self) {}
    /// Select foreground and background color for subsequent writes.
    fn set_text_color(&mut self, fg: u8, bg: u8);
    /// Write one character at the cursor.
    fn write_char(&mut self, byte: u8);
    /// Move the cursor. Row is 5 bits, column 7 bits.
    fn set_cursor(&mut self, row: u8, col: u8);
    /// Flush pending output; invoked on the display refresh cadence.
    fn present(&mut self);

    // Unimplemented VGA opcodes land here so a fuller display can pick
    // them up later.

    /// VRAM write (unimplemented on the reference hardware).
    fn write_vram(&mut self, _value: u32) {}
    /// Display function select (unimplemented).
    fn set_function(&mut self, _value: u32) {}
    /// Text blink mode (unimplemented).
    fn set_blink(&mut self, _value: u32) {}
    /// Pixel color (unimplemented).
    fn set_pixel_color(&mut self, _value: u32) {}
    /// Glyph definition (unimplemented).
    fn define_char(&mut self, _value: u32) {}
    /// Pixel position (unimplemented).
    fn set_pixel_pos(&mut self, _value: u32) {}
}

/// A console that swallows everything. Default for headless runs and
/// tests.
#[derive(Debug, Default)]
pub struct NullConsole;

impl Console for NullConsole {
    fn set_text_color(&mut self, _fg: u8, _bg: u8) {}
    fn write_char(&mut self, _byte: u8) {}
    fn set_cursor(&mut self, _row: u8, _col: u8) {}
    fn present(&mut self) {}
}

/// Non-display peripherals. Every method defaults to a no-op; frontends
/// override what they care about.
pub trait Peripherals {
    /// UART line configuration changed.
    fn uart_configure(&mut self, _config: UartConfig) {}
    /// UART transmitted a frame of `data_bits` bits.
    fn uart_transmit(&mut self, _frame: u16, _data_bits: u8) {}
    /// UART baud rate changed (bits per second; 0 if the divisor was 0).
    fn uart_baud(&mut self, _bps: u32) {}
    /// Parallel debug port output.
    fn parallel_out(&mut self, _value: u32) {}
    /// Keyboard transmit (unimplemented on the reference hardware).
    fn keyboard_transmit(&mut self, _value: u32) {}
    /// RTC data/address (unimplemented).
    fn rtc_data_addr(&mut self, _value: u32) {}
    /// Timer/speaker interval (unimplemented).
    fn timer_speaker_interval(&mut self, _value: u32) {}
    /// Timer/speaker function (unimplemented).
    fn timer_speaker_function(&mut self, _value: u32) {}
    /// Timer (unimplemented).
    fn timer(&mut self, _value: u32) {}
    /// Time-of-day (unimplemented).
    fn time(&mut self, _value: u32) {}
    /// ATX power control (unimplemented).
    fn atx_power(&mut self, _value: u32) {}
    /// Serial drive data (unimplemented).
    fn drive_serial_data(&mut self, _value: u32) {}
    /// Serial drive address (unimplemented).
    fn drive_serial_addr(&mut self, _value: u32) {}
    /// Serial drive function (unimplemented).
    fn drive_serial_function(&mut self, _value: u32) {}
}

/// Peripherals sink that ignores everything.
#[derive(Debug, Default)]
pub struct NullPeripherals;

impl Peripherals for NullPeripherals {}

/// UART reference clock in Hz; the baud opcode divides this by the bus
/// value.
pub const UART_CLOCK_HZ: u32 = 24_000_000;

/// Decoded UART line configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    /// Parity bit appended to each frame.
    pub parity_enabled: bool,
    /// Odd parity when enabled, even otherwise.
    pub parity_odd: bool,
    /// Data bits per frame, 6 through 9.
    pub data_bits: u8,
    /// Stop bits per frame.
    pub stop_bits: u8,
}

impl UartConfig {
    /// Decode a configuration word from the bus. Field layout:
    /// bit 16 parity-odd, bits 17-18 data bits minus 6, bit 19
    /// parity-enable, bits 20+ stop bits minus 1 (truncated to a byte, as
    /// the hardware register would).
    pub fn from_word(word: u32) -> Self {
        Self {
            parity_odd: (word >> 16) & 1 != 0,
            data_bits: 6 + ((word >> 17) & 0b11) as u8,
            parity_enabled: (word >> 19) & 1 != 0,
            stop_bits: (1 + (word >> 20)) as u8,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            parity_enabled: false,
            parity_odd: false,
            data_bits: 8,
            stop_bits: 1,
        }
    }
}

/// UART transmitter state held by the machine.
#[derive(Debug, Clone)]
pub struct Uart {
    data_bits: u8,
}

impl Uart {
    /// A UART at the power-on default of 8 data bits.
    pub fn new() -> Self {
        Self { data_bits: 8 }
    }

    /// Apply a configuration word and return the decoded configuration.
    pub fn configure(&mut self, word: u32) -> UartConfig {
        let config = UartConfig::from_word(word);
        self.data_bits = config.data_bits;
        config
    }

    /// Current data-bit count.
    pub fn data_bits(&self) -> u8 {
        self.data_bits
    }

    /// Mask a bus value to the configured frame width.
    pub fn mask(&self, value: u32) -> u16 {
        let mask = (1u32 << self.data_bits) - 1;
        (value & mask) as u16
    }

    /// Convert a divisor from the bus into bits per second against the
    /// 24 MHz reference clock. A zero divisor yields 0 bps rather than a
    /// fault.
    pub fn baud(&self, divisor: u32) -> u32 {
        if divisor == 0 {
            0
        } else {
            UART_CLOCK_HZ / divisor
        }
    }
}

impl Default for Uart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_field_extraction() {
        // parity-odd, 8 data bits, parity on, 2 stop bits
        let word = (1 << 16) | (0b10 << 17) | (1 << 19) | (1 << 20);
        let config = UartConfig::from_word(word);
        assert!(config.parity_odd);
        assert!(config.parity_enabled);
        assert_eq!(config.data_bits, 8);
        assert_eq!(config.stop_bits, 2);
    }

    #[test]
    fn test_config_defaults_from_zero_word() {
        let config = UartConfig::from_word(0);
        assert!(!config.parity_odd);
        assert!(!config.parity_enabled);
        assert_eq!(config.data_bits, 6);
        assert_eq!(config.stop_bits, 1);
    }

    #[test]
    fn test_data_bit_range() {
        for bits in 0u32..4 {
            let config = UartConfig::from_word(bits << 17);
            assert_eq!(config.data_bits, 6 + bits as u8);
        }
    }

    #[test]
    fn test_transmit_masking() {
        let mut uart = Uart::new();
        assert_eq!(uart.mask(0xFFFF_FFFF), 0x00FF);

        uart.configure(0b11 << 17); // 9 data bits
        assert_eq!(uart.data_bits(), 9);
        assert_eq!(uart.mask(0xFFFF_FFFF), 0x01FF);

        uart.configure(0); // 6 data bits
        assert_eq!(uart.mask(0xFFFF_FFFF), 0x003F);
    }

    #[test]
    fn test_baud_conversion() {
        let uart = Uart::new();
        assert_eq!(uart.baud(2500), 9600);
        assert_eq!(uart.baud(208), 115_384);
        assert_eq!(uart.baud(0), 0);
    }
}
