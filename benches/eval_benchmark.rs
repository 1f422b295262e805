use assay::board::Position;
use assay::eval::tables::BASELINE;
use assay::eval::{evaluate, evaluate_fen};
use assay::params;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::str::FromStr;

const TEST_FENS: [&str; 4] = [
    // Starting position
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    // Kiwipete middlegame
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    // Closed middlegame
    "r1bq1rk1/pp2ppbp/2np1np1/8/2PPP3/2N2N2/PP2BPPP/R1BQ1RK1 b - - 4 8",
    // Rook endgame
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
];

fn benchmark_evaluate(c: &mut Criterion) {
    let positions: Vec<Position> = TEST_FENS
        .iter()
        .map(|fen| Position::from_str(fen).expect("valid FEN"))
        .collect();

    c.bench_function("evaluate_with_trace", |b| {
        b.iter(|| {
            for pos in &positions {
                black_box(evaluate(black_box(pos), &BASELINE));
            }
        })
    });

    let startpos = Position::startpos();
    c.bench_function("evaluate_startpos", |b| {
        b.iter(|| black_box(evaluate(black_box(&startpos), &BASELINE)))
    });
}

fn benchmark_pipeline(c: &mut Criterion) {
    c.bench_function("evaluate_fen_pipeline", |b| {
        b.iter(|| {
            for fen in TEST_FENS {
                black_box(evaluate_fen(black_box(fen)).expect("valid FEN"));
            }
        })
    });

    c.bench_function("fen_parse_only", |b| {
        b.iter(|| {
            for fen in TEST_FENS {
                black_box(Position::from_str(black_box(fen)).expect("valid FEN"));
            }
        })
    });

    // Flattening alone, on a fixed middlegame trace.
    let pos = Position::from_str(TEST_FENS[1]).expect("valid FEN");
    let (_, trace) = evaluate(&pos, &BASELINE);
    c.bench_function("coefficients_flatten", |b| {
        b.iter(|| black_box(params::coefficients(black_box(&trace))))
    });
}

criterion_group!(benches, benchmark_evaluate, benchmark_pipeline);
criterion_main!(benches);
