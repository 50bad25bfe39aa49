use criterion::{Criterion, criterion_group, criterion_main};
use dsr_core::option::{Alignment, RoutingOption};
use dsr_core::{NodeAddress, RoutingHeader};

fn make_routing_header() -> RoutingHeader {
    let mut header = RoutingHeader::new(17, NodeAddress::new(1), NodeAddress::new(2));
    header
        .add_option(&RoutingOption::new(
            96,
            vec![0xAA; 10],
            Alignment::new(4, 0),
        ))
        .unwrap();
    header
        .add_option(&RoutingOption::new(97, vec![0xBB; 6], Alignment::new(2, 0)))
        .unwrap();
    header
}

fn bench_wire(c: &mut Criterion) {
    let mut group = c.benchmark_group("wire");

    let mut header = make_routing_header();
    let raw = header.serialize().unwrap();

    group.bench_function("serialize_routing_header", |b| {
        b.iter(|| make_routing_header().serialize().unwrap());
    });

    group.bench_function("parse_routing_header", |b| {
        b.iter(|| RoutingHeader::parse(&raw).unwrap());
    });

    group.bench_function("walk_options", |b| {
        let (parsed, _) = RoutingHeader::parse(&raw).unwrap();
        b.iter(|| parsed.options().options().count());
    });

    group.finish();
}

criterion_group!(benches, bench_wire);
criterion_main!(benches);
