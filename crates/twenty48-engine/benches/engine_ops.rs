use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::StdRng};
use std::hint::black_box;
use twenty48_engine::{Board, Game, Move};

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut boards = Vec::new();
    // Empty and two-tile starts
    boards.push(Board::EMPTY);
    let mut b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    boards.push(b);
    // Derive a variety of densities deterministically
    for i in 0..60 {
        let dir = Move::ALL[i % Move::ALL.len()];
        let nb = b.shift(dir).board;
        if nb != b {
            b = nb.with_random_tile(&mut rng);
        }
        boards.push(b);
    }
    boards
}

fn bench_shift(c: &mut Criterion) {
    let boards = corpus();
    for dir in Move::ALL {
        c.bench_function(&format!("shift/{dir}"), |bch| {
            bch.iter(|| {
                let mut acc = 0u64;
                for &bd in &boards {
                    acc = acc.wrapping_add(bd.shift(dir).score);
                }
                black_box(acc)
            })
        });
    }
}

fn bench_spawn_and_terminal(c: &mut Criterion) {
    let boards = corpus();
    c.bench_function("with_random_tile", |bch| {
        let mut rng = StdRng::seed_from_u64(7);
        bch.iter(|| {
            for &bd in &boards {
                black_box(bd.with_random_tile(&mut rng));
            }
        })
    });
    c.bench_function("is_game_over", |bch| {
        bch.iter(|| boards.iter().filter(|b| b.is_game_over()).count())
    });
}

fn bench_game(c: &mut Criterion) {
    c.bench_function("game/100_moves", |bch| {
        bch.iter_batched(
            || Game::from_seed(1),
            |mut game| {
                for i in 0..100 {
                    game.make_move(Move::ALL[i % 4]);
                }
                black_box(game.score())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_shift, bench_spawn_and_terminal, bench_game);
criterion_main!(benches);
