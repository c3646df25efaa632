// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use multi_item::{Item, Shape};
use multi_item_renderer::{Completion, ElementFactory, Leaf, LeafHandle, MultiRenderer, Score};
use serde_json::{Value, json};

struct Counter {
    id: u32,
    value: Cell<u32>,
}

impl Leaf for Counter {
    type Widget = u32;
    type Guess = u32;
    type Criterion = u32;

    fn find_internal_widgets(&self, modulus: &u32) -> Vec<u32> {
        if self.id % modulus == 0 {
            vec![self.id]
        } else {
            Vec::new()
        }
    }

    fn score(&self) -> Score {
        Score::points(u32::from(self.value.get() == self.id), 1)
    }

    fn user_input(&self) -> u32 {
        self.value.get()
    }

    fn serialized_state(&self) -> Value {
        json!(self.value.get())
    }

    fn restore_serialized_state(&self, state: Value, done: Completion) {
        if let Some(v) = state.as_u64().and_then(|v| u32::try_from(v).ok()) {
            self.value.set(v);
        }
        done.complete();
    }
}

struct Handles;

impl ElementFactory for Handles {
    type Content = u32;
    type Hint = ();
    type Tags = ();
    type Leaf = Counter;
    type Element = LeafHandle<Counter>;

    fn content(&mut self, _: &u32, handle: LeafHandle<Counter>) -> Self::Element {
        handle
    }

    fn hint(&mut self, _: &(), handle: LeafHandle<Counter>) -> Self::Element {
        handle
    }
}

type Question = Item<u32, (), ()>;

fn gen_question(n: usize) -> Rc<Question> {
    Rc::new(Item::List(
        (0..n)
            .map(|p| Item::List((0..n).map(|b| Item::Content((p * n + b) as u32)).collect()))
            .collect(),
    ))
}

fn mounted(n: usize) -> (MultiRenderer<Handles>, Vec<Rc<Counter>>) {
    let renderer = MultiRenderer::new(
        Handles,
        gen_question(n),
        Shape::array(Shape::array(Shape::Content)),
    );
    let leaves = renderer
        .handles()
        .iter()
        .zip(0u32..)
        .map(|(handle, id)| {
            let leaf = Rc::new(Counter {
                id,
                value: Cell::new(id % 3),
            });
            handle.mount(&leaf);
            leaf
        })
        .collect();
    (renderer, leaves)
}

fn bench_rebuild(c: &mut Criterion) {
    let shape = Shape::array(Shape::array(Shape::Content));
    let mut group = c.benchmark_group("rebuild");
    for &n in &[8usize, 32] {
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("fresh_item_n{}", n), |b| {
            b.iter_batched(
                || (MultiRenderer::new(Handles, gen_question(n), shape.clone()), gen_question(n)),
                |(mut renderer, next)| black_box(renderer.rebuild(&next, &shape)),
                BatchSize::SmallInput,
            )
        });
        let (mut renderer, _leaves) = mounted(n);
        let same = Rc::clone(renderer.item());
        group.bench_function(format!("same_item_n{}", n), |b| {
            b.iter(|| black_box(renderer.rebuild(&same, &shape)))
        });
    }
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for &n in &[8usize, 32] {
        let (renderer, _leaves) = mounted(n);
        let state = renderer.serialized_state();
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("score_n{}", n), |b| {
            b.iter(|| black_box(renderer.score().score))
        });
        group.bench_function(format!("serialized_state_n{}", n), |b| {
            b.iter(|| black_box(renderer.serialized_state()))
        });
        group.bench_function(format!("restore_n{}", n), |b| {
            b.iter(|| black_box(renderer.restore_serialized_state(&state, || {})))
        });
        group.bench_function(format!("discovery_n{}", n), |b| {
            let caller = renderer.handles()[0].clone();
            b.iter(|| black_box(renderer.find_external_widgets(&caller, &7).len()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rebuild, bench_aggregate);
criterion_main!(benches);
