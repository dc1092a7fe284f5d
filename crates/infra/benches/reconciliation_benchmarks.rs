use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use stocktake_core::{CodeSource, ItemCode};
use stocktake_events::InMemoryEventBus;
use stocktake_infra::{InMemoryStore, RecordsSource, ReconciliationEngine, SnapshotPersister};
use stocktake_inventory::{
    Inventory, InventoryCommand, InventoryItem, InventorySnapshot, RecordCode, ReplaceCollection, ReplaceOrigin,
};

const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn codes(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("B{:07}", 1_000_000 + i)).collect()
}

fn inventory_of(n: usize) -> Inventory {
    let mut inventory = Inventory::empty();
    inventory
        .execute(&InventoryCommand::ReplaceCollection(ReplaceCollection {
            items: codes(n)
                .iter()
                .map(|c| InventoryItem::pending(ItemCode::manual(c).unwrap()))
                .collect(),
            origin: ReplaceOrigin::Baseline,
        }))
        .unwrap();
    inventory
}

/// Linear search over the collection, no index.
fn naive_position(items: &[InventoryItem], code: &ItemCode) -> Option<usize> {
    items.iter().position(|item| &item.code == code)
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("code_lookup");

    for &n in &SIZES {
        let inventory = inventory_of(n);
        // Worst case for the linear scan: the last item.
        let target = ItemCode::manual(&codes(n)[n - 1]).unwrap();

        group.bench_with_input(BenchmarkId::new("indexed", n), &n, |b, _| {
            b.iter(|| inventory.position(black_box(&target)))
        });
        group.bench_with_input(BenchmarkId::new("linear_scan", n), &n, |b, _| {
            b.iter(|| naive_position(inventory.items(), black_box(&target)))
        });
    }

    group.finish();
}

fn bench_record_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_code");
    group.throughput(Throughput::Elements(1));

    for &n in &SIZES {
        let base = inventory_of(n);
        let hit = RecordCode {
            code: ItemCode::manual(&codes(n)[n / 2]).unwrap(),
            source: CodeSource::Decoder,
        };

        group.bench_with_input(BenchmarkId::new("domain_only", n), &n, |b, _| {
            let mut inventory = base.clone();
            b.iter(|| inventory.execute(black_box(&InventoryCommand::RecordCode(hit.clone()))).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("engine_with_persistence", n), &n, |b, _| {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let mut engine = ReconciliationEngine::new(InMemoryStore::new(), InMemoryEventBus::<InventorySnapshot>::new());
            runtime
                .block_on(engine.load_baseline(&RecordsSource::from_codes(codes(n))))
                .unwrap();
            let raw = codes(n)[n / 2].clone();

            b.iter(|| {
                runtime
                    .block_on(engine.process_code(black_box(&raw), CodeSource::Decoder))
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_restore(c: &mut Criterion) {
    let mut group = c.benchmark_group("restore");

    for &n in &SIZES {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let persister = SnapshotPersister::new(InMemoryStore::new());
        runtime.block_on(persister.save(&inventory_of(n))).unwrap();

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("load_and_index", n), &n, |b, _| {
            b.iter(|| {
                let items = runtime.block_on(persister.load());
                Inventory::from_items(items)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lookup, bench_record_code, bench_restore);
criterion_main!(benches);
