//! Benchmarks for MBO replay and MBP-10 rendering.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use csv::ByteRecord;
use mbp_reconstructor::decoder::decode_line;
use mbp_reconstructor::{Action, MbpBook, MboEvent, Side, SnapshotFormatter, MBP_FIELDS};

fn create_test_events(count: usize) -> Vec<MboEvent> {
    let mut events = Vec::with_capacity(count);
    let base_price: i64 = 1_000_000; // 100.0000

    for i in 0..count {
        let order_id = (i + 1) as u64;
        let is_bid = i % 2 == 0;
        let price_offset = ((i % 20) as i64) * 100; // 0.01 increments
        let price = if is_bid {
            base_price - price_offset
        } else {
            base_price + 100 + price_offset
        };
        let side = if is_bid { Side::Bid } else { Side::Ask };

        // Every fourth event cancels the order added two events earlier.
        let event = if i % 4 == 3 {
            MboEvent::new(order_id - 2, Action::Cancel, side, price, 1)
        } else {
            MboEvent::new(order_id, Action::Add, side, price, ((i % 100) + 1) as i64)
        };
        events.push(event.with_timestamp(i as i64));
    }

    events
}

fn bench_book(c: &mut Criterion) {
    let events = create_test_events(10_000);

    let mut group = c.benchmark_group("book");
    group.throughput(Throughput::Elements(events.len() as u64));

    group.bench_function("apply", |b| {
        b.iter(|| {
            let mut book = MbpBook::new();
            for event in &events {
                black_box(book.apply(event));
            }
        })
    });

    group.bench_function("apply_and_render", |b| {
        let mut formatter = SnapshotFormatter::new();
        let mut record = ByteRecord::with_capacity(512, MBP_FIELDS);
        b.iter(|| {
            let mut book = MbpBook::new();
            for event in &events {
                if book.apply(event).emits() {
                    formatter.render(event.ts_event, &book, &mut record);
                    black_box(&record);
                }
            }
        })
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let line = "1752739503360677248,1752739503360677248,160,2,1108,A,B,5.510000000,100,0,817593,130,165200,851012,ARL";

    c.bench_function("decode_line", |b| b.iter(|| black_box(decode_line(black_box(line)))));
}

criterion_group!(benches, bench_book, bench_decode);
criterion_main!(benches);
