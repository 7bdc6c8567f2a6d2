//! Terminal-backed device adapters
//!
//! `TermConsole` renders the machine's VGA text surface straight onto the
//! controlling terminal with ANSI escapes: cursor addressing for text
//! position, 256-color SGR for the text color opcode, and a flush on each
//! display refresh. `LogPeripherals` reports UART and parallel-port
//! activity on stdout, one line per event.

use monobus_core::devices::{Console, Peripherals, UartConfig};
use std::io::{self, BufWriter, Stdout, Write};

/// ANSI-terminal console.
pub struct TermConsole {
    out: BufWriter<Stdout>,
}

impl TermConsole {
    pub fn new() -> Self {
        Self {
            out: BufWriter::new(io::stdout()),
        }
    }
}

impl Default for TermConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TermConsole {
    fn init(&mut self) {
        // Clear the screen and home the cursor
        let _ = write!(self.out, "\x1b[2J\x1b[H");
        let _ = self.out.flush();
    }

    fn shutdown(&mut self) {
        // Reset attributes and park the cursor on the last line
        let _ = write!(self.out, "\x1b[0m\x1b[999;1H\n");
        let _ = self.out.flush();
    }

    fn set_text_color(&mut self, fg: u8, bg: u8) {
        let _ = write!(self.out, "\x1b[38;5;{}m\x1b[48;5;{}m", fg, bg);
    }

    fn write_char(&mut self, byte: u8) {
        let ch = if byte.is_ascii_graphic() || byte == b' ' {
            byte as char
        } else {
            ' '
        };
        let _ = write!(self.out, "{}", ch);
    }

    fn set_cursor(&mut self, row: u8, col: u8) {
        // ANSI rows and columns are 1-based
        let _ = write!(self.out, "\x1b[{};{}H", row as u16 + 1, col as u16 + 1);
    }

    fn present(&mut self) {
        let _ = self.out.flush();
    }
}

/// Peripherals sink that reports activity on stdout.
#[derive(Debug, Default)]
pub struct LogPeripherals;

impl Peripherals for LogPeripherals {
    fn uart_configure(&mut self, config: UartConfig) {
        let parity = if config.parity_enabled {
            if config.parity_odd {
                "ODD"
            } else {
                "EVEN"
            }
        } else {
            "OFF"
        };
        println!(
            "UART CONFIG: databits={} parity={} stopbits={}",
            config.data_bits, parity, config.stop_bits
        );
    }

    fn uart_transmit(&mut self, frame: u16, data_bits: u8) {
        if data_bits <= 8 {
            println!("UART TX: ({} bits) {}", data_bits, (frame as u8) as char);
        } else {
            println!("UART TX: ({} bits) {:x}", data_bits, frame);
        }
    }

    fn uart_baud(&mut self, bps: u32) {
        println!("UART BAUD: {} bps", bps);
    }

    fn parallel_out(&mut self, value: u32) {
        println!("OUT PARALLEL {}", value);
    }
}
