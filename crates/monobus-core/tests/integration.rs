//! End-to-end scenarios driving the machine through its public API

use monobus_core::isa::{encode, Opcode};
use monobus_core::machine::{Machine, MachineError};
use monobus_core::memory::CACHE_WORDS;
use monobus_core::program::Program;

fn machine_with(instructions: &[u32]) -> Machine {
    let mut machine = Machine::new();
    machine.load_program(Program::from_words(instructions).unwrap());
    machine
}

#[test]
fn test_literal_load_loop_keeps_a_at_5() {
    // set-bus-to-literal, set-A-from-bus with immediate 5, jump back to 0.
    // The loop never terminates; A is reloaded to 5 on every pass.
    let mut machine = machine_with(&[
        encode(Opcode::SetBusSource, 0),
        encode(Opcode::SetA, 5),
        encode(Opcode::Jump, 0),
    ]);

    machine.run_steps(3 * 1000).unwrap();
    assert_eq!(machine.a(), 5);
    assert_eq!(machine.executed(), 3000);
    assert!(machine.pc() <= 2);
}

#[test]
fn test_unknown_opcode_halts_with_offending_byte() {
    // A 2-word image whose first word carries an unassigned type byte
    let image = [0x00u8, 0x00, 0x30, 0x00, 0x00, 0x05];
    let program = Program::from_bytes(&image).unwrap();
    let mut machine = Machine::new();
    machine.load_program(program);

    assert_eq!(machine.run(), Err(MachineError::UnknownOpcode(0x30)));
    assert_eq!(machine.executed(), 0);
}

#[test]
fn test_dram_round_trip_through_the_bus() {
    // Two-phase write of 42 at address 10, then read it back through the
    // multiplexer: three instructions to store, two to re-address and load.
    let mut machine = machine_with(&[
        encode(Opcode::SetBusSource, 0), // literal feeds the bus
        encode(Opcode::SetDramAddr, 10),
        encode(Opcode::SetDramData, 42),
        encode(Opcode::WriteDram, 0),
        encode(Opcode::SetDramAddr, 10),
        encode(Opcode::SetBusSource, 2), // DRAM data feeds the bus
        encode(Opcode::SetA, 0),
    ]);

    machine.run_steps(7).unwrap();
    assert_eq!(machine.a(), 42);
}

#[test]
fn test_cache_addresses_alias_modulo_bank_length() {
    // Store at address 3, then read at 3 + bank length. The high half of
    // the second address comes from set-literal-high.
    let wrapped = 3 + CACHE_WORDS as u32;
    let high = (wrapped >> 16) as u16;
    let low = (wrapped & 0xFFFF) as u16;

    let mut machine = machine_with(&[
        encode(Opcode::SetBusSource, 0),
        encode(Opcode::SetCacheAddr, 3),
        encode(Opcode::SetCacheData, 99),
        encode(Opcode::WriteCache, 0),
        encode(Opcode::SetLiteralHigh, high),
        encode(Opcode::SetCacheAddr, low),
        encode(Opcode::SetBusSource, 4), // cache data feeds the bus
        encode(Opcode::SetA, 0),
    ]);

    machine.run_steps(8).unwrap();
    assert_eq!(machine.a(), 99);
}

#[test]
fn test_computed_comparison_and_branch() {
    // Compare 7 against 7 by building 7 - 7 through the adder
    // (B = !7, carry-in = 1), latch the flags, then take a jump-equal.
    let not_7_low = (!7u32 & 0xFFFF) as u16;
    let not_7_high = (!7u32 >> 16) as u16;

    let mut machine = machine_with(&[
        encode(Opcode::SetBusSource, 0),
        encode(Opcode::SetA, 7),
        encode(Opcode::SetLiteralHigh, not_7_high),
        encode(Opcode::SetB, not_7_low),
        encode(Opcode::SetLiteralHigh, 0),
        encode(Opcode::SetCarryIn, 8), // bit 3 set
        encode(Opcode::SetBusSource, 10), // adder feeds the bus
        encode(Opcode::SetAluFlags, 0),
        encode(Opcode::JumpEqual, 100),
    ]);

    machine.run_steps(9).unwrap();
    assert!(machine.alu_flags().equal());
    assert_eq!(machine.pc(), 100);
}

#[test]
fn test_call_return_round_trip() {
    // call lands on a return; execution resumes right after the call
    let mut program = vec![0u32; 8];
    program[0] = encode(Opcode::SetBusSource, 0);
    program[1] = encode(Opcode::Call, 6);
    program[6] = encode(Opcode::Return, 0);
    let mut machine = machine_with(&program);

    machine.run_steps(3).unwrap();
    assert_eq!(machine.pc(), 2);
}
