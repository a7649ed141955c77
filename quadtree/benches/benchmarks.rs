use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quadtree::shapes::{Circle, ShapeEnum};
use quadtree::{EntryId, QuadTree, Region, UpdateRequest};
use rand::prelude::*;

fn filled_tree(rng: &mut impl Rng, count: u32) -> (QuadTree<u32>, Vec<EntryId>) {
    let mut quadtree = QuadTree::new(Region::new(50.0, 50.0, 50.0).unwrap(), 8).unwrap();
    let ids = (0..count)
        .map(|i| {
            quadtree
                .insert(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0), i)
                .unwrap()
        })
        .collect();
    (quadtree, ids)
}

fn insert_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let mut quadtree = QuadTree::new(Region::new(50.0, 50.0, 50.0).unwrap(), 8).unwrap();

    c.bench_function("quadtree_insert", |b| {
        b.iter(|| {
            let x = rng.gen_range(0.0..100.0);
            let y = rng.gen_range(0.0..100.0);
            quadtree.insert(black_box(x), black_box(y), ()).unwrap();
        })
    });
}

fn remove_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let (mut quadtree, mut ids) = filled_tree(&mut rng, 1000);

    c.bench_function("quadtree_remove", |b| {
        b.iter(|| {
            // Reinsert right away so the tree keeps its size across iterations.
            let index = rng.gen_range(0..ids.len());
            let (x, y) = quadtree.position(ids[index]).unwrap();
            let payload = quadtree.remove(black_box(ids[index])).unwrap();
            ids[index] = quadtree.insert(x, y, payload).unwrap();
        })
    });
}

fn update_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let (mut quadtree, ids) = filled_tree(&mut rng, 1000);
    let requests: Vec<_> = ids
        .iter()
        .map(|&id| UpdateRequest {
            id,
            x: rng.gen_range(0.0..100.0),
            y: rng.gen_range(0.0..100.0),
        })
        .collect();

    c.bench_function("quadtree_update_batch", |b| {
        b.iter(|| {
            quadtree.update_batch(black_box(&requests)).unwrap();
        })
    });
}

fn range_query_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let (quadtree, _) = filled_tree(&mut rng, 1000);
    let query_shape = ShapeEnum::Circle(Circle::new(50.0, 50.0, 10.0));

    c.bench_function("quadtree_query_rect", |b| {
        b.iter(|| {
            let found: Vec<_> = quadtree
                .query_rect(black_box(40.0), black_box(40.0), 20.0, 20.0)
                .unwrap()
                .map(|entry| entry.id)
                .collect();
            found
        })
    });

    c.bench_function("quadtree_query_shape", |b| {
        b.iter(|| quadtree.query_shape(black_box(&query_shape)).unwrap().count())
    });
}

fn nearest_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let (quadtree, _) = filled_tree(&mut rng, 1000);

    c.bench_function("quadtree_query_nearest", |b| {
        b.iter(|| {
            let x = rng.gen_range(0.0..100.0);
            let y = rng.gen_range(0.0..100.0);
            quadtree
                .query_nearest(black_box(x), black_box(y), 8, None)
                .unwrap()
                .len()
        })
    });
}

criterion_group!(
    quadtree_benchmarks,
    insert_benchmark,
    remove_benchmark,
    update_benchmark,
    range_query_benchmark,
    nearest_benchmark
);
criterion_main!(quadtree_benchmarks);
