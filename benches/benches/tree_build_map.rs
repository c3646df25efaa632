// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use multi_item::{Item, LeafKinds, Path, Shape, TreeMapper, build_tree, lens};
use serde_json::{Value, json};

fn gen_pages(pages: usize, blocks: usize) -> Item<u32, u32, ()> {
    Item::List(
        (0..pages)
            .map(|p| {
                Item::List(
                    (0..blocks)
                        .map(|b| Item::Content((p * blocks + b) as u32))
                        .collect(),
                )
            })
            .collect(),
    )
}

fn bench_build(c: &mut Criterion) {
    let shape = Shape::array(Shape::array(Shape::Content));
    let mut group = c.benchmark_group("build_tree");
    for &n in &[8usize, 32, 128] {
        let item = gen_pages(n, n);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("pages_n{}", n), |b| {
            b.iter(|| {
                let tree = build_tree(black_box(&item), &shape).ok();
                black_box(tree.map(|t| t.leaf_count(LeafKinds::CONTENT)));
            })
        });
    }
    group.finish();
}

fn bench_map(c: &mut Criterion) {
    let shape = Shape::array(Shape::array(Shape::Content));
    let mut group = c.benchmark_group("map_tree");
    for &n in &[8usize, 32, 128] {
        let item = gen_pages(n, n);
        let Ok(tree) = build_tree(&item, &shape) else {
            continue;
        };
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("identity_n{}", n), |b| {
            b.iter(|| black_box(TreeMapper::identity().map_tree(&tree, &shape).ok()))
        });
        group.bench_function(format!("to_state_n{}", n), |b| {
            b.iter(|| {
                let mapped = TreeMapper::new(
                    |n: &&u32, _: &Path| json!({ "n": **n }),
                    |_: &&u32, _: &Path| Value::Null,
                    |_: &&(), _: &Path| Value::Null,
                )
                .array(|children, _, _, _| children)
                .map_tree(&tree, &shape);
                black_box(mapped.map(lens::from_tree).ok())
            })
        });
    }
    group.finish();
}

fn bench_lens(c: &mut Criterion) {
    let n = 64usize;
    let mut state = Value::Null;
    for p in 0..n {
        for b in 0..n {
            lens::set(&mut state, &Path::from(vec![p, b]), json!(p * n + b));
        }
    }
    let paths: Vec<Path> = (0..n)
        .flat_map(|p| (0..n).map(move |b| Path::from(vec![p, b])))
        .collect();
    let mut group = c.benchmark_group("lens");
    group.throughput(Throughput::Elements(paths.len() as u64));
    group.bench_function("get_all_n64", |b| {
        b.iter(|| {
            let found = paths
                .iter()
                .filter(|path| lens::get(&state, path).is_some())
                .count();
            black_box(found)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_map, bench_lens);
criterion_main!(benches);
