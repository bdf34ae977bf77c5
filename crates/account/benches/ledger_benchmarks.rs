use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tradeledger_account::{Ledger, SharedLedger, StaticPriceTable};
use tradeledger_core::Amount;

fn funded_ledger() -> Ledger {
    Ledger::open("Bench", Amount::from(1_000_000_000), StaticPriceTable::reference()).unwrap()
}

fn bench_trade_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("trade_latency");
    group.sample_size(1000);

    group.bench_function("deposit", |b| {
        let mut ledger = funded_ledger();
        b.iter(|| {
            ledger.deposit(black_box(Amount::from(10))).unwrap();
        });
    });

    // Buy immediately followed by a sell keeps holdings bounded; history grows.
    group.bench_function("buy_sell_cycle", |b| {
        let mut ledger = funded_ledger();
        b.iter(|| {
            ledger.buy_shares(black_box("AAPL"), 3).unwrap();
            ledger.sell_shares(black_box("AAPL"), 3).unwrap();
        });
    });

    group.bench_function("rejected_overdraft", |b| {
        let mut ledger = Ledger::open("Bench", Amount::from(10), StaticPriceTable::reference())
            .unwrap();
        b.iter(|| {
            let _ = black_box(ledger.buy_shares("GOOGL", 1));
        });
    });

    group.finish();
}

fn bench_portfolio_valuation(c: &mut Criterion) {
    let mut group = c.benchmark_group("portfolio_valuation");

    for symbols in [3usize, 30, 300] {
        let mut prices = StaticPriceTable::new();
        let mut ledger = funded_ledger();
        for i in 0..symbols {
            let symbol = format!("SYM{i}");
            prices
                .insert(symbol.parse().unwrap(), Amount::from(i as i64 + 1))
                .unwrap();
        }
        *ledger.oracle_mut() = prices;
        for i in 0..symbols {
            ledger.buy_shares(format!("SYM{i}"), 10).unwrap();
        }

        group.throughput(Throughput::Elements(symbols as u64));
        group.bench_with_input(
            BenchmarkId::new("portfolio_value", symbols),
            &ledger,
            |b, ledger| b.iter(|| black_box(ledger.portfolio_value().unwrap())),
        );
        group.bench_with_input(
            BenchmarkId::new("statement", symbols),
            &ledger,
            |b, ledger| b.iter(|| black_box(ledger.statement().unwrap())),
        );
    }

    group.finish();
}

fn bench_shared_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared_ledger");

    for threads in [1usize, 4] {
        group.throughput(Throughput::Elements(threads as u64 * 100));
        group.bench_with_input(
            BenchmarkId::new("parallel_deposits", threads),
            &threads,
            |b, &threads| {
                let shared = SharedLedger::new(funded_ledger());
                b.iter(|| {
                    std::thread::scope(|scope| {
                        for _ in 0..threads {
                            let shared = shared.clone();
                            scope.spawn(move || {
                                for _ in 0..100 {
                                    shared.deposit(Amount::from(1)).unwrap();
                                }
                            });
                        }
                    });
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_trade_latency,
    bench_portfolio_valuation,
    bench_shared_contention
);
criterion_main!(benches);
