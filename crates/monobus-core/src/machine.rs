//! The machine itself: registers, dispatch loop, run loop
//!
//! All state lives in one [`Machine`] value: the literal register, the bus
//! selector, the A/B operands, carry-in, the ALU-flags latch, the program
//! counter, the single return-address slot, and the three memory spaces.
//! The dispatch loop fetches a word, folds its immediate into the literal,
//! and runs exactly one handler; handlers query the bus multiplexer and
//! mutate state or call out to the device adapters. There is no halt
//! instruction on this architecture - the loop runs until a fatal decode
//! error or a cooperative halt request.

use crate::alu::AluFlags;
use crate::bus::BusSource;
use crate::devices::{Console, NullConsole, NullPeripherals, Peripherals, Uart};
use crate::isa::{self, Opcode};
use crate::memory::{MemoryBank, ProgramMemory, CACHE_WORDS, DRAM_WORDS};
use crate::program::Program;

/// Display refresh cadence in executed instructions:
/// 4 MHz base clock / 4 clocks per instruction / 60 Hz refresh.
pub const INSTRUCTIONS_PER_REFRESH: u32 = 16_666;

/// The complete machine state plus its attached devices.
pub struct Machine {
    literal: u32,
    bus_source: BusSource,
    a: u32,
    b: u32,
    carry_in: bool,
    alu_flags: AluFlags,
    pc: u16,
    return_slot: u16,
    program: ProgramMemory,
    cache: MemoryBank,
    dram: MemoryBank,
    uart: Uart,
    console: Box<dyn Console>,
    peripherals: Box<dyn Peripherals>,
    halt_requested: bool,
    executed: u64,
}

impl Machine {
    /// A powered-on machine with empty memory and null devices.
    pub fn new() -> Self {
        Self::with_devices(Box::new(NullConsole), Box::new(NullPeripherals))
    }

    /// A powered-on machine wired to the given device adapters.
    pub fn with_devices(console: Box<dyn Console>, peripherals: Box<dyn Peripherals>) -> Self {
        Self {
            literal: 0,
            bus_source: BusSource::default(),
            a: 0,
            b: 0,
            carry_in: false,
            alu_flags: AluFlags::default(),
            pc: 0,
            return_slot: 0,
            program: ProgramMemory::new(),
            cache: MemoryBank::new(CACHE_WORDS),
            dram: MemoryBank::new(DRAM_WORDS),
            uart: Uart::new(),
            console,
            peripherals,
            halt_requested: false,
            executed: 0,
        }
    }

    /// Load a parsed program image, replacing the program store.
    pub fn load_program(&mut self, program: Program) {
        self.program = program.into_memory();
    }

    /// The value currently on the bus, from whichever source the selector
    /// picks. Reading the bus never mutates state.
    pub fn bus(&self) -> u32 {
        match self.bus_source {
            BusSource::Literal
            | BusSource::State
            | BusSource::Uart
            | BusSource::Keyboard
            | BusSource::Rtc
            | BusSource::DriveSerial
            | BusSource::Unused => self.literal,
            BusSource::DramData => self.dram.read(),
            BusSource::DramAddr => self.dram.addr(),
            BusSource::CacheData => self.cache.read(),
            BusSource::ShiftLeftA => self.a << 1,
            BusSource::ShiftRightA => self.a >> 1,
            BusSource::AAndB => self.a & self.b,
            BusSource::AOrB => self.a | self.b,
            BusSource::AXorB => self.a ^ self.b,
            BusSource::APlusB => self
                .a
                .wrapping_add(self.b)
                .wrapping_add(u32::from(self.carry_in)),
        }
    }

    /// Execute one instruction: fetch at the program counter, advance it,
    /// fold the immediate into the literal's low half, then dispatch.
    pub fn step(&mut self) -> Result<(), MachineError> {
        let word = self.program.fetch(self.pc);
        self.pc = self.pc.wrapping_add(1);

        let (type_byte, data) = isa::split(word);
        let opcode =
            Opcode::decode(type_byte).ok_or(MachineError::UnknownOpcode(type_byte))?;

        // Every instruction rewrites the low half of the literal - except
        // set-literal-high, whose immediate lands in the high half while
        // the low half keeps the previous instruction's immediate. That is
        // what lets two consecutive instructions compose an arbitrary
        // 32-bit constant.
        if opcode != Opcode::SetLiteralHigh {
            self.literal = (self.literal & 0xFFFF_0000) | u32::from(data);
        }
        self.execute(opcode, data);
        self.executed += 1;
        Ok(())
    }

    fn execute(&mut self, opcode: Opcode, data: u16) {
        match opcode {
            Opcode::SetDramData => {
                let value = self.bus();
                self.dram.set_latch(value);
            }
            Opcode::SetCarryIn => {
                // Bit 3 of the bus carries the flag
                self.carry_in = self.bus() & 0x8 != 0;
            }
            Opcode::Return => self.pc = self.return_slot,
            Opcode::JumpLessOrEqual => {
                if self.alu_flags.less_or_equal() {
                    self.pc = data;
                }
            }
            Opcode::JumpGreaterOrEqual => {
                if self.alu_flags.greater_or_equal() {
                    self.pc = data;
                }
            }
            Opcode::Jump => self.pc = data,
            Opcode::IncDramAddr => self.dram.incr_addr(),
            Opcode::SetDramAddr => {
                let value = self.bus();
                self.dram.set_addr(value);
            }
            Opcode::JumpNotEqual => {
                if self.alu_flags.not_equal() {
                    self.pc = data;
                }
            }
            Opcode::SetA => self.a = self.bus(),
            Opcode::SetLiteralHigh => {
                self.literal = (self.literal & 0xFFFF) | (u32::from(data) << 16);
            }
            Opcode::WriteDram => self.dram.commit(),
            Opcode::SetBusSource => {
                // Masked to 4 bits at the point of assignment, so the
                // stored selector is always a defined source.
                self.bus_source = BusSource::from_index(data as u8);
            }
            Opcode::Call => {
                // One slot, not a stack: a nested call clobbers the outer
                // return address. The target comes from the bus, so calls
                // can be computed.
                self.return_slot = self.pc;
                self.pc = self.bus() as u16;
            }
            Opcode::SetB => self.b = self.bus(),
            Opcode::SetAluFlags => self.alu_flags = AluFlags::new(self.bus()),

            Opcode::TimerSpeakerInterval => {
                let value = self.bus();
                self.peripherals.timer_speaker_interval(value);
            }
            Opcode::UartBaud => {
                let bps = self.uart.baud(self.bus());
                self.peripherals.uart_baud(bps);
            }
            Opcode::UartConfig => {
                let config = self.uart.configure(self.bus());
                self.peripherals.uart_configure(config);
            }
            Opcode::UartTransmit => {
                let frame = self.uart.mask(self.bus());
                self.peripherals.uart_transmit(frame, self.uart.data_bits());
            }
            Opcode::KeyboardTransmit => {
                let value = self.bus();
                self.peripherals.keyboard_transmit(value);
            }
            Opcode::RtcDataAddr => {
                let value = self.bus();
                self.peripherals.rtc_data_addr(value);
            }
            Opcode::ParallelOut => {
                let value = self.bus();
                self.peripherals.parallel_out(value);
            }
            Opcode::JumpLess => {
                if self.alu_flags.less_than() {
                    self.pc = data;
                }
            }
            Opcode::TimerSpeakerFunction => {
                let value = self.bus();
                self.peripherals.timer_speaker_function(value);
            }
            Opcode::JumpGreater => {
                if self.alu_flags.greater_than() {
                    self.pc = data;
                }
            }
            Opcode::JumpEqual => {
                if self.alu_flags.equal() {
                    self.pc = data;
                }
            }
            Opcode::SetCacheData => {
                let value = self.bus();
                self.cache.set_latch(value);
            }
            Opcode::SetCacheAddr => {
                let value = self.bus();
                self.cache.set_addr(value);
            }
            Opcode::AtxPower => {
                let value = self.bus();
                self.peripherals.atx_power(value);
            }
            Opcode::WriteCache => self.cache.commit(),

            Opcode::Timer => {
                let value = self.bus();
                self.peripherals.timer(value);
            }
            Opcode::Time => {
                let value = self.bus();
                self.peripherals.time(value);
            }
            Opcode::DriveSerialData => {
                let value = self.bus();
                self.peripherals.drive_serial_data(value);
            }
            Opcode::DriveSerialAddr => {
                let value = self.bus();
                self.peripherals.drive_serial_addr(value);
            }
            Opcode::DriveSerialFunction => {
                let value = self.bus();
                self.peripherals.drive_serial_function(value);
            }
            Opcode::VgaTextColor => {
                let value = self.bus();
                let fg = ((value >> 16) & 0xFF) as u8;
                let bg = ((value >> 24) & 0xFF) as u8;
                self.console.set_text_color(fg, bg);
            }
            Opcode::VgaWriteVram => {
                let value = self.bus();
                self.console.write_vram(value);
            }
            Opcode::VgaFunction => {
                let value = self.bus();
                self.console.set_function(value);
            }
            Opcode::VgaTextBlink => {
                let value = self.bus();
                self.console.set_blink(value);
            }
            Opcode::VgaPixelColor => {
                let value = self.bus();
                self.console.set_pixel_color(value);
            }
            Opcode::VgaTextWrite => {
                let byte = (self.bus() & 0xFF) as u8;
                self.console.write_char(byte);
            }
            Opcode::VgaTextChar => {
                let value = self.bus();
                self.console.define_char(value);
            }
            Opcode::VgaPixelPos => {
                let value = self.bus();
                self.console.set_pixel_pos(value);
            }
            Opcode::VgaTextPos => {
                let value = self.bus();
                let row = ((value >> 7) & 0x1F) as u8;
                let col = (value & 0x7F) as u8;
                self.console.set_cursor(row, col);
            }
        }
    }

    /// Run until a fatal error or a halt request, presenting the console
    /// on the refresh cadence. The architecture has no halt instruction,
    /// so without a request this only returns on error.
    pub fn run(&mut self) -> Result<(), MachineError> {
        self.run_bounded(None)
    }

    /// Run at most `steps` instructions. Used by tests and by frontends
    /// that want a bounded execution window.
    pub fn run_steps(&mut self, steps: u64) -> Result<(), MachineError> {
        self.run_bounded(Some(steps))
    }

    fn run_bounded(&mut self, limit: Option<u64>) -> Result<(), MachineError> {
        self.console.init();
        let mut remaining = limit;
        let mut refresh = 0u32;
        let result = loop {
            if self.halt_requested {
                break Ok(());
            }
            if let Some(ref mut n) = remaining {
                if *n == 0 {
                    break Ok(());
                }
                *n -= 1;
            }
            if let Err(fault) = self.step() {
                break Err(fault);
            }
            refresh += 1;
            if refresh >= INSTRUCTIONS_PER_REFRESH {
                self.console.present();
                refresh = 0;
            }
        };
        self.console.shutdown();
        result
    }

    /// Ask the run loop to stop before the next instruction.
    pub fn request_halt(&mut self) {
        self.halt_requested = true;
    }

    /// The literal register.
    pub fn literal(&self) -> u32 {
        self.literal
    }

    /// The current bus selector.
    pub fn bus_source(&self) -> BusSource {
        self.bus_source
    }

    /// Register A.
    pub fn a(&self) -> u32 {
        self.a
    }

    /// Register B.
    pub fn b(&self) -> u32 {
        self.b
    }

    /// The carry-in flag.
    pub fn carry_in(&self) -> bool {
        self.carry_in
    }

    /// The ALU-flags latch.
    pub fn alu_flags(&self) -> AluFlags {
        self.alu_flags
    }

    /// The program counter.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// The single return-address slot.
    pub fn return_slot(&self) -> u16 {
        self.return_slot
    }

    /// The cache bank.
    pub fn cache(&self) -> &MemoryBank {
        &self.cache
    }

    /// The DRAM bank.
    pub fn dram(&self) -> &MemoryBank {
        &self.dram
    }

    /// The UART transmitter state.
    pub fn uart(&self) -> &Uart {
        &self.uart
    }

    /// Total instructions executed.
    pub fn executed(&self) -> u64 {
        self.executed
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Fatal machine faults. These halt execution; there is no recovery on a
/// single-core device with no supervisor. An unknown-bus-selector fault
/// has no representation here: the selector enum is closed and its
/// constructor masks to 4 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineError {
    /// The decoded opcode type byte has no handler.
    UnknownOpcode(u8),
}

impl std::fmt::Display for MachineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MachineError::UnknownOpcode(ty) => {
                write!(f, "unknown opcode type 0x{:02X}", ty)
            }
        }
    }
}

impl std::error::Error for MachineError {}
