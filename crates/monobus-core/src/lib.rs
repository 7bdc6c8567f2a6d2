//! Monobus Core - Pure Rust emulator library for a single-bus 32-bit CPU
//!
//! The emulated machine routes everything through one shared 32-bit data bus:
//! a 16-way multiplexer selects among the literal register, memory latches,
//! and combinational ALU outputs, and a flat microcoded opcode space drives
//! control flow, two-phase memory access, and memory-mapped peripherals.
//! This crate contains only the emulation logic; file I/O and rendering live
//! in the frontend crates.

#![forbid(unsafe_code)]

/// Instruction word layout and the opcode space
pub mod isa;
/// Bus multiplexer source selection
pub mod bus;
/// ALU condition-flag latch and comparison predicates
pub mod alu;
/// Two-phase latched memory banks and the program store
pub mod memory;
/// Program image parsing
pub mod program;
/// Device adapter seams (console, UART, peripheral hooks)
pub mod devices;
/// The machine itself: registers, dispatch loop, run loop
pub mod machine;
