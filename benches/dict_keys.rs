use std::collections::BTreeMap;

use cell_value::{VDict, Value};
use divan::{Bencher, black_box};

fn main() {
    divan::main();
}

/// Short keys stay inside the value's inline string buffer; long keys
/// force a heap block per key.
#[derive(Clone, Copy)]
enum KeyShape {
    InlineFriendly,
    HeapOnly,
}

fn make_keys(shape: KeyShape, entries: usize) -> Vec<String> {
    (0..entries)
        .map(|i| match shape {
            KeyShape::InlineFriendly => format!("k{i:04}"),
            KeyShape::HeapOnly => format!("benchmark-key-with-a-long-tail-{i:08}"),
        })
        .collect()
}

// --- Insert benchmarks -----------------------------------------------------

#[divan::bench(args = [16, 64, 256, 1024])]
fn insert_vdict_short_keys(bencher: Bencher, entries: usize) {
    let keys = make_keys(KeyShape::InlineFriendly, entries);
    bencher.bench(|| {
        let mut dict = VDict::new();
        for (i, key) in keys.iter().enumerate() {
            dict.set(black_box(key.as_str()), i as i64);
        }
        dict
    });
}

#[divan::bench(args = [16, 64, 256, 1024])]
fn insert_btreemap_short_keys(bencher: Bencher, entries: usize) {
    let keys = make_keys(KeyShape::InlineFriendly, entries);
    bencher.bench(|| {
        let mut map = BTreeMap::new();
        for (i, key) in keys.iter().enumerate() {
            map.insert(black_box(key.clone()), i as i64);
        }
        map
    });
}

#[divan::bench(args = [16, 64, 256, 1024])]
fn insert_vdict_long_keys(bencher: Bencher, entries: usize) {
    let keys = make_keys(KeyShape::HeapOnly, entries);
    bencher.bench(|| {
        let mut dict = VDict::new();
        for (i, key) in keys.iter().enumerate() {
            dict.set(black_box(key.as_str()), i as i64);
        }
        dict
    });
}

#[divan::bench(args = [16, 64, 256, 1024])]
fn insert_vdict_ordered(bencher: Bencher, entries: usize) {
    let keys = make_keys(KeyShape::InlineFriendly, entries);
    bencher.bench(|| {
        let mut dict = VDict::with_order_tracking();
        for (i, key) in keys.iter().enumerate() {
            dict.set(black_box(key.as_str()), i as i64);
        }
        dict
    });
}

// --- Lookup benchmarks -----------------------------------------------------

#[divan::bench(args = [16, 64, 256, 1024])]
fn lookup_vdict_short_keys(bencher: Bencher, entries: usize) {
    let keys = make_keys(KeyShape::InlineFriendly, entries);
    let mut dict = VDict::new();
    for (i, key) in keys.iter().enumerate() {
        dict.set(key.as_str(), i as i64);
    }

    bencher.bench(|| {
        let mut sum = 0i64;
        for key in &keys {
            sum += dict.get(black_box(key.as_str())).map_or(0, Value::as_i64);
        }
        sum
    });
}

#[divan::bench(args = [16, 64, 256, 1024])]
fn lookup_btreemap_short_keys(bencher: Bencher, entries: usize) {
    let keys = make_keys(KeyShape::InlineFriendly, entries);
    let mut map = BTreeMap::new();
    for (i, key) in keys.iter().enumerate() {
        map.insert(key.clone(), i as i64);
    }

    bencher.bench(|| {
        let mut sum = 0i64;
        for key in &keys {
            sum += map.get(black_box(key.as_str())).copied().unwrap_or(0);
        }
        sum
    });
}

// --- Iteration benchmarks --------------------------------------------------

#[divan::bench(args = [64, 1024])]
fn iterate_vdict_sorted(bencher: Bencher, entries: usize) {
    let keys = make_keys(KeyShape::InlineFriendly, entries);
    let mut dict = VDict::new();
    for (i, key) in keys.iter().enumerate() {
        dict.set(key.as_str(), i as i64);
    }

    bencher.bench(|| dict.iter().map(|(_, v)| v.as_i64()).sum::<i64>());
}

#[divan::bench(args = [64, 1024])]
fn iterate_vdict_insertion_order(bencher: Bencher, entries: usize) {
    let keys = make_keys(KeyShape::InlineFriendly, entries);
    let mut dict = VDict::with_order_tracking();
    for (i, key) in keys.iter().enumerate() {
        dict.set(key.as_str(), i as i64);
    }

    bencher.bench(|| {
        dict.iter_ordered()
            .map(|it| it.map(|(_, v)| v.as_i64()).sum::<i64>())
            .unwrap_or(0)
    });
}
