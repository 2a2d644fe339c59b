// DFA Performance Benchmarks
//
// Measures construction and simulation cost for growing inputs and automata.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fsm_engine::{chars, Dfa, DfaBuilder};
use std::hint::black_box;

/// Counts input length modulo `modulus` over the alphabet {a, b}
fn modulo_counter(modulus: usize) -> Dfa {
    let mut builder = DfaBuilder::new()
        .symbols(["a", "b"])
        .start("r0")
        .accept("r0");
    for r in 0..modulus {
        let state = format!("r{}", r);
        let next = format!("r{}", (r + 1) % modulus);
        builder = builder
            .state(state.clone())
            .transition(state.clone(), "a", next.clone())
            .transition(state, "b", next);
    }
    builder.build().unwrap()
}

fn bench_accept(c: &mut Criterion) {
    let mut group = c.benchmark_group("accept");
    let dfa = modulo_counter(7);

    for len in [16usize, 256, 4096].iter() {
        let input: String = (0..*len).map(|i| if i % 3 == 0 { 'a' } else { 'b' }).collect();
        group.throughput(Throughput::Elements(*len as u64));

        group.bench_with_input(BenchmarkId::new("chars", len), &input, |b, input| {
            b.iter(|| black_box(dfa.accept_str(black_box(input))));
        });

        let symbols: Vec<&str> = chars(&input).collect();
        group.bench_with_input(BenchmarkId::new("tokens", len), &symbols, |b, symbols| {
            b.iter(|| black_box(dfa.accept(black_box(symbols.iter()))));
        });
    }

    group.finish();
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for states in [8usize, 64, 512].iter() {
        let definition = modulo_counter(*states).to_definition();
        group.bench_with_input(BenchmarkId::new("validate", states), &definition, |b, def| {
            b.iter(|| black_box(Dfa::new(def.clone()).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_accept, bench_construction);
criterion_main!(benches);
