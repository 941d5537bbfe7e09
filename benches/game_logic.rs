use criterion::{black_box, criterion_group, criterion_main, Criterion};
use autumn_burst::core::{
    find_all_clusters, find_cluster, settle, EngineConfig, Game, GameSnapshot, Grid, SeededTokens,
    TokenSource,
};
use autumn_burst::types::GameAction;

fn full_board(seed: u32) -> Grid {
    let mut grid = Grid::new(8, 8).unwrap();
    grid.fill_from(&mut SeededTokens::new(seed), 4);
    grid
}

fn bench_find_cluster(c: &mut Criterion) {
    let grid = full_board(12345);
    c.bench_function("find_cluster_8x8", |b| {
        b.iter(|| find_cluster(black_box(&grid), black_box(3), black_box(4)))
    });
}

fn bench_find_all_clusters(c: &mut Criterion) {
    let grid = full_board(12345);
    c.bench_function("find_all_clusters_8x8", |b| {
        b.iter(|| find_all_clusters(black_box(&grid), 4))
    });
}

fn bench_settle(c: &mut Criterion) {
    let mut tokens = SeededTokens::new(7);
    c.bench_function("settle_refill_8_columns", |b| {
        b.iter(|| {
            let mut grid = full_board(12345);
            for row in 2..6 {
                for col in 0..8 {
                    let _ = grid.set(row, col, None);
                }
            }
            settle(
                &mut grid,
                &[0, 1, 2, 3, 4, 5, 6, 7],
                Some(&mut tokens as &mut dyn TokenSource),
                4,
            )
        })
    });
}

fn bench_burst_and_resolve(c: &mut Criterion) {
    let config = EngineConfig::burst().with_seed(12345).with_cascade_delay(0);
    let base = Game::new(config).unwrap();
    let target = find_all_clusters(base.grid(), 4)
        .first()
        .map(|cluster| cluster[0]);

    c.bench_function("activate_full_cascade", |b| {
        b.iter(|| {
            let mut game = base.clone();
            if let Some(at) = target {
                let _ = game.activate(at.row, at.col);
            }
            game.score()
        })
    });
}

fn bench_drop_tick(c: &mut Criterion) {
    let mut game = Game::new(EngineConfig::drop().with_seed(12345)).unwrap();

    c.bench_function("drop_tick_16ms", |b| {
        b.iter(|| {
            if game.game_over() {
                game.apply_action(GameAction::Restart);
            }
            game.tick(black_box(16));
        })
    });
}

fn bench_snapshot_into(c: &mut Criterion) {
    let game = Game::new(EngineConfig::burst().with_seed(12345)).unwrap();
    let mut snap = GameSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            game.snapshot_into(&mut snap);
            snap.board_hash
        })
    });
}

criterion_group!(
    benches,
    bench_find_cluster,
    bench_find_all_clusters,
    bench_settle,
    bench_burst_and_resolve,
    bench_drop_tick,
    bench_snapshot_into
);
criterion_main!(benches);
