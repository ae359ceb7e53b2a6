use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::thread;
use std::time::Duration;
use ts_hashmap::{ConcurrentMap, LockedCounters, MapConfig};

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> i32 {
    (n >> 33) as i32
}

fn bench_put_10k(c: &mut Criterion) {
    c.bench_function("ts_hashmap_put_10k", |b| {
        b.iter_batched(
            || ConcurrentMap::<i32, i32>::with_capacity(1024).unwrap(),
            |m| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    m.put(key(x), i as i32).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("ts_hashmap_get_hit", |b| {
        let m = ConcurrentMap::<i32, i32>::with_capacity(1024).unwrap();
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            m.put(*k, i as i32).unwrap();
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(*k));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("ts_hashmap_get_miss", |b| {
        let m = ConcurrentMap::<i32, i32>::with_capacity(1024).unwrap();
        for (i, x) in lcg(11).take(10_000).enumerate() {
            m.put(key(x), i as i32).unwrap();
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| black_box(m.get(key(miss.next().unwrap()))))
    });
}

// Four threads doing mixed ops; compares the two counter block flavors.
fn contended<C: ts_hashmap::Counters>(m: &ConcurrentMap<i32, i32, C>) {
    thread::scope(|s| {
        for t in 0..4u64 {
            s.spawn(move || {
                for x in lcg(t + 1).take(5_000) {
                    let k = key(x) % 4096;
                    match x % 3 {
                        0 => {
                            let _ = m.put(k, 1);
                        }
                        1 => {
                            black_box(m.get(k));
                        }
                        _ => {
                            m.delete(k);
                        }
                    }
                }
            });
        }
    });
}

fn bench_contended(c: &mut Criterion) {
    c.bench_function("ts_hashmap_contended_atomic_counters", |b| {
        let m = ConcurrentMap::<i32, i32>::with_capacity(256).unwrap();
        b.iter(|| contended(&m))
    });
    c.bench_function("ts_hashmap_contended_locked_counters", |b| {
        let m = ConcurrentMap::<i32, i32, LockedCounters>::with_config(MapConfig::new(256)).unwrap();
        b.iter(|| contended(&m))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_put_10k, bench_get_hit, bench_get_miss, bench_contended
}
criterion_main!(benches);
