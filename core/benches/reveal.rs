use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use msgame_core::*;
use std::hint::black_box;

fn first_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_reveal");
    for level in Level::ALL {
        let config = level.preset();
        let center = (config.size.0 / 2, config.size.1 / 2);
        let mut seed = 0u64;
        group.bench_function(level.name(), |b| {
            b.iter_batched(
                || {
                    seed += 1;
                    PlayEngine::with_seed(config, seed).unwrap()
                },
                |mut engine| black_box(engine.reveal_tile(black_box(center))),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn mark_and_check_win(c: &mut Criterion) {
    let mut engine = PlayEngine::with_seed(Level::Master.preset(), 42).unwrap();
    engine.reveal_tile((12, 15));
    let mines: Vec<Coord2> = iter_coords(engine.size())
        .filter(|&coords| engine.tile_at(coords).is_some_and(|tile| tile.mine))
        .collect();

    c.bench_function("mark_all_master", |b| {
        b.iter_batched(
            || engine.clone(),
            |mut engine| {
                for &coords in &mines {
                    engine.toggle_mark_tile(coords);
                }
                black_box(engine.check_win())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, first_reveal, mark_and_check_win);
criterion_main!(benches);
