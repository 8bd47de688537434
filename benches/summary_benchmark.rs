use criterion::{black_box, criterion_group, criterion_main, Criterion};
use expense_settlement::core::mode::SettlementMode;
use expense_settlement::report::summary::SummaryAssembler;
use expense_settlement::settlement::options::{EngineOptions, TransferAccounting};
use expense_settlement::simulation::random_ledger::{generate_random_ledger, LedgerConfig};

fn bench_summary(c: &mut Criterion, participants: usize, expenses: usize) {
    let config = LedgerConfig {
        participant_count: participants,
        expense_count: expenses,
        transfer_count: participants / 2,
        ..Default::default()
    };
    let ledger = generate_random_ledger(&config);
    let assembler = SummaryAssembler::new(
        EngineOptions::default().with_transfer_accounting(TransferAccounting::BothParties),
    );

    c.bench_function(&format!("simplify_{}_participants", participants), |b| {
        b.iter(|| assembler.assemble(black_box(&ledger), SettlementMode::Simplify))
    });
    c.bench_function(&format!("itemized_{}_participants", participants), |b| {
        b.iter(|| assembler.assemble(black_box(&ledger), SettlementMode::Itemized))
    });
}

fn bench_summary_10_participants(c: &mut Criterion) {
    bench_summary(c, 10, 50);
}

fn bench_summary_100_participants(c: &mut Criterion) {
    bench_summary(c, 100, 1_000);
}

fn bench_summary_1000_participants(c: &mut Criterion) {
    bench_summary(c, 1000, 10_000);
}

criterion_group!(
    benches,
    bench_summary_10_participants,
    bench_summary_100_participants,
    bench_summary_1000_participants
);
criterion_main!(benches);
