use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sitekit_engine::{build_arena, resolve_root};
use sitekit_model::BlockInstance;

fn chain(len: usize) -> Vec<BlockInstance> {
    (0..len)
        .map(|i| {
            let mut block = BlockInstance::new("page_home", "hero", "centered", i as i64);
            block.instance_id = format!("block_{}", i);
            if i + 1 < len {
                block.instance = Some(format!("block_{}", i + 1));
            }
            block
        })
        .collect()
}

fn bench_resolution(c: &mut Criterion) {
    let blocks = chain(64);
    let arena = build_arena(&blocks);

    c.bench_function("resolve_root_chain_64", |b| {
        b.iter(|| resolve_root(black_box(&arena), black_box(&blocks[0])))
    });

    let shallow = chain(2);
    let shallow_arena = build_arena(&shallow);
    c.bench_function("resolve_root_shallow", |b| {
        b.iter(|| resolve_root(black_box(&shallow_arena), black_box(&shallow[0])))
    });
}

criterion_group!(benches, bench_resolution);
criterion_main!(benches);
