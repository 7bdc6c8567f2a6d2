//! Monobus CLI - load a program image and run the machine

mod term;

use clap::Parser;
use monobus_core::machine::Machine;
use monobus_core::program::Program;
use std::fs;
use std::path::PathBuf;
use term::{LogPeripherals, TermConsole};

/// Monobus emulator
#[derive(Parser, Debug)]
#[command(name = "monobus")]
#[command(about = "Emulator for the Monobus single-bus 32-bit CPU", long_about = None)]
struct Args {
    /// Path to the packed program image
    #[arg(default_value = "program.bin")]
    program: PathBuf,

    /// Stop after this many instructions instead of running forever
    #[arg(short, long)]
    steps: Option<u64>,

    /// Dump machine state after execution
    #[arg(short, long)]
    dump: bool,

    /// Run without the terminal display
    #[arg(long)]
    headless: bool,
}

fn main() {
    // Legacy help spellings, kept for compatibility
    if let Some(first) = std::env::args().nth(1) {
        if first == "/?" || first == "-H" {
            println!("usage: monobus [-h] [program.bin]");
            return;
        }
    }

    let args = Args::parse();

    let image = match fs::read(&args.program) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("could not read program file {}: {}", args.program.display(), e);
            std::process::exit(1);
        }
    };

    let program = match Program::from_bytes(&image) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("could not load {}: {}", args.program.display(), e);
            std::process::exit(1);
        }
    };

    println!(
        "loaded {} ({} instruction words)",
        args.program.display(),
        program.word_count()
    );

    let mut machine = if args.headless {
        Machine::new()
    } else {
        Machine::with_devices(Box::new(TermConsole::new()), Box::new(LogPeripherals))
    };
    machine.load_program(program);

    let result = match args.steps {
        Some(steps) => machine.run_steps(steps),
        None => machine.run(),
    };

    if let Err(fault) = result {
        eprintln!("machine fault after {} instructions: {}", machine.executed(), fault);
        if args.dump {
            dump_machine_state(&machine);
        }
        std::process::exit(1);
    }

    if args.dump {
        dump_machine_state(&machine);
    }
}

fn dump_machine_state(machine: &Machine) {
    println!("\nMachine state:");
    println!("  PC:      ${:04X}", machine.pc());
    println!("  return:  ${:04X}", machine.return_slot());
    println!("  literal: ${:08X}", machine.literal());
    println!("  A:       ${:08X}", machine.a());
    println!("  B:       ${:08X}", machine.b());
    println!("  carry:   {}", machine.carry_in());
    println!("  flags:   ${:08X}", machine.alu_flags().raw());
    println!("  bus:     {:?}", machine.bus_source());
    println!("  dram @:  ${:08X}", machine.dram().addr());
    println!("  cache @: ${:08X}", machine.cache().addr());
    println!("  executed: {}", machine.executed());
}
