//! Settlement throughput
//!
//! Run: cargo bench --bench settlement_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use wager_vault::common::traits::{Ledger, RandomnessSource};
use wager_vault::games::{odds, SeededRandomness, VrfRandomness};
use wager_vault::{AccountId, BroadcastEventSink, InMemoryLedger, SettlementEngine, WagerConfig};

fn funded_engine(randomness: Arc<dyn RandomnessSource>) -> (SettlementEngine, AccountId, AccountId) {
    let config = WagerConfig::testing();
    let asset = config.primary_asset();
    let ledger = Arc::new(InMemoryLedger::new());
    let house = AccountId::new("house");
    let player = AccountId::new("player");
    for account in [&house, &player] {
        ledger.open_account(account, &asset).unwrap();
        ledger.credit(account, &asset, u64::MAX / 4).unwrap();
    }

    let engine = SettlementEngine::new(config, ledger, randomness, Arc::new(BroadcastEventSink::new(16))).unwrap();
    engine.create_vault(&house).unwrap();
    engine.vaults().add_coins(&house, &house, u64::MAX / 8).unwrap();
    (engine, house, player)
}

fn bench_odds(c: &mut Criterion) {
    let mut group = c.benchmark_group("odds");
    group.bench_function("amount_with_fee", |b| {
        b.iter(|| odds::amount_with_fee(black_box(1_000_000), black_box(250)))
    });
    for chosen in [1usize, 6, 18, 37] {
        group.bench_with_input(BenchmarkId::new("roulette_payout", chosen), &chosen, |b, &chosen| {
            b.iter(|| odds::roulette_payout(black_box(1_000), 36, chosen))
        });
    }
    group.finish();
}

fn bench_settlement(c: &mut Criterion) {
    let mut group = c.benchmark_group("settlement");
    group.throughput(Throughput::Elements(1));

    let (engine, house, player) = funded_engine(Arc::new(SeededRandomness::new(1)));
    let asset = engine.config().primary_asset();
    group.bench_function("coin_flip_seeded", |b| {
        b.iter(|| engine.play(&player, black_box(100), &house).unwrap())
    });
    group.bench_function("roulette_seeded", |b| {
        b.iter(|| {
            engine
                .play_roulette(&player, black_box(100), &[1, 2, 3], &house, &asset)
                .unwrap()
        })
    });

    let vrf = Arc::new(VrfRandomness::new_random("bench"));
    let (vrf_engine, house, player) = funded_engine(vrf.clone());
    group.bench_function("coin_flip_vrf", |b| {
        b.iter(|| {
            vrf_engine.play(&player, black_box(100), &house).unwrap();
            vrf.take_proofs()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_odds, bench_settlement);
criterion_main!(benches);
