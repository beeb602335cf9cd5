use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, Utc};
use doorx_core::{PropertyId, TenantId, VendorId};
use doorx_events::{EventEnvelope, InMemoryEventBus};
use doorx_infra::{
    AggregateStore, CommandDispatcher, InMemoryWorkOrderStore, Repository, UnitOfWork,
};
use doorx_work_orders::{
    Money, Priority, ServiceCategory, VendorBid, WorkOrder, WorkOrderEvent, WorkOrderStatus,
};

fn reported() -> WorkOrder {
    WorkOrder::create(
        TenantId::new(),
        PropertyId::new(),
        "Dishwasher leaking",
        ServiceCategory::Appliance,
        Priority::Normal,
        None,
    )
    .unwrap()
}

/// Pure domain cost of a full lifecycle (no storage, no bus).
fn bench_lifecycle_in_memory(c: &mut Criterion) {
    let mut group = c.benchmark_group("domain_lifecycle");

    group.bench_function("create_to_close", |b| {
        b.iter(|| {
            let vendor_id = VendorId::new();
            let mut order = reported();
            order.transition_to(WorkOrderStatus::Categorized).unwrap();
            order.transition_to(WorkOrderStatus::VendorSearch).unwrap();
            order.transition_to(WorkOrderStatus::Bidding).unwrap();
            order
                .add_bid(VendorBid::create(vendor_id, Money::usd(12000).unwrap(), None, None))
                .unwrap();
            order
                .assign_vendor(vendor_id, Utc::now() + Duration::days(1))
                .unwrap();
            order.start_work().unwrap();
            order.complete_work().unwrap();
            order.close().unwrap();
            black_box(order)
        });
    });

    group.finish();
}

/// Snapshot store commit throughput for growing batches.
fn bench_store_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_commit");

    for batch_size in [1usize, 10, 100].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            batch_size,
            |b, &size| {
                let orders: Vec<WorkOrder> = (0..size).map(|_| reported()).collect();
                b.iter(|| {
                    let store = InMemoryWorkOrderStore::new();
                    let mut session = store.begin();
                    for order in &orders {
                        session.add(order).unwrap();
                    }
                    black_box(session.commit().unwrap())
                });
            },
        );
    }

    group.finish();
}

/// Load → operate → commit → publish through the dispatcher.
fn bench_dispatcher_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatcher");
    group.sample_size(1000);

    group.bench_function("update_priority", |b| {
        let dispatcher = CommandDispatcher::new(
            InMemoryWorkOrderStore::new(),
            InMemoryEventBus::<EventEnvelope<WorkOrderEvent>>::new(),
        );
        let id = dispatcher.create(reported()).unwrap().id_typed();
        let mut flip = false;

        b.iter(|| {
            flip = !flip;
            let priority = if flip { Priority::High } else { Priority::Normal };
            black_box(
                dispatcher
                    .execute(id, |o: &mut WorkOrder| o.update_priority(priority))
                    .unwrap(),
            )
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lifecycle_in_memory,
    bench_store_commit,
    bench_dispatcher_execute
);
criterion_main!(benches);
