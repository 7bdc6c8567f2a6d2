//! Sustained dispatch-loop throughput

use criterion::{criterion_group, criterion_main, Criterion};
use monobus_core::isa::{encode, Opcode};
use monobus_core::machine::Machine;
use monobus_core::program::Program;

fn bench_step(c: &mut Criterion) {
    let program = Program::from_words(&[
        encode(Opcode::SetBusSource, 0),
        encode(Opcode::SetA, 5),
        encode(Opcode::Jump, 0),
    ])
    .unwrap();

    let mut machine = Machine::new();
    machine.load_program(program);

    c.bench_function("step_literal_load_loop", |b| {
        b.iter(|| {
            machine.run_steps(1_000).unwrap();
        })
    });
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
