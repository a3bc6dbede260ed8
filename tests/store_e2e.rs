use pretty_assertions::assert_eq;
use std::time::Instant;
use vstore::{Metric, StoreConfig, StoreError, VectorStore};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic embedding: seeds a simple LCG from the text bytes
fn hash_embedding(text: &str) -> Vec<f32> {
    let mut state = text.bytes()
        .fold(1469598103934665603u64, |h, b| (h ^ b as u64).wrapping_mul(1099511628211));
    (0..16)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            // Map to [-1.0, 1.0]
            ((state >> 33) as f32) / (u32::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}

/// Store with dimension 3 whose texts map to [1,0,0], [0,1,0], [1,1,0]
fn axis_store() -> VectorStore {
    let mut store = VectorStore::with_embedding(3, |text: &str| match text {
        "first" => vec![1.0, 0.0, 0.0],
        "second" => vec![0.0, 1.0, 0.0],
        "third" => vec![1.0, 1.0, 0.0],
        _ => Vec::new(),
    }).unwrap();
    store.add_text("first");
    store.add_text("second");
    store.add_text("third");
    store
}

#[test]
fn test_cosine_end_to_end() {
    init_logger();
    let store = axis_store();
    let query = [1.0, 0.0, 0.0];

    assert_eq!(store.find_nearest(&query, "cosine").unwrap(), Some(0));
    assert_eq!(store.top_k_nearest(&query, 2, "cosine").unwrap(), vec![0, 2]);

    let diagonal = store.cosine_similarity(&query, store.get_vector(2).unwrap());
    assert!((diagonal - 1.0 / 2f64.sqrt()).abs() < 1e-6);
    assert_eq!(store.cosine_similarity(&query, store.get_vector(1).unwrap()), 0.0);
}

#[test]
fn test_euclidean_ties_end_to_end() {
    init_logger();
    let mut store = VectorStore::with_embedding(3, |text: &str| match text {
        "a" => vec![1.0, 0.0, 0.0],
        "b" => vec![0.0, 1.0, 0.0],
        _ => vec![0.0, 0.0, -1.0],
    }).unwrap();
    store.add_text("a");
    store.add_text("b");
    store.add_text("c");
    let origin = [0.0, 0.0, 0.0];

    for i in 0..3 {
        assert!((store.l2_distance(&origin, store.get_vector(i).unwrap()) - 1.0).abs() < 1e-9);
    }
    assert_eq!(store.find_nearest(&origin, "euclidean").unwrap(), Some(0));
    assert_eq!(store.top_k_nearest(&origin, 3, "euclidean").unwrap(), vec![0, 1, 2]);
    assert_eq!(store.top_k_nearest(&origin, 3, "manhattan").unwrap(), vec![0, 1, 2]);
}

#[test]
fn test_stored_text_and_dimension() {
    init_logger();
    let mut store = VectorStore::with_embedding(8, hash_embedding).unwrap();
    let texts = ["alpha", "", "a somewhat longer sentence", "ünïcødé"];

    for text in texts {
        store.add_text(text);
        let last = store.len() - 1;
        assert_eq!(store.get_raw_text(last).unwrap(), text);
        assert_eq!(store.get_raw_length(last).unwrap(), text.len());
        assert_eq!(store.get_vector(last).unwrap().len(), 8);
        // 16 raw values truncated to the first 8
        assert_eq!(store.get_vector(last).unwrap(), &hash_embedding(text)[..8]);
    }
}

#[test]
fn test_padding_and_truncation() {
    init_logger();
    let dimension = 5;
    let long: Vec<f32> = (1..=dimension + 3).map(|x| x as f32).collect();
    let short: Vec<f32> = (1..=dimension - 2).map(|x| x as f32).collect();

    let long_clone = long.clone();
    let mut store = VectorStore::with_embedding(dimension, move |_: &str| long_clone.clone()).unwrap();
    store.add_text("long");
    assert_eq!(store.get_vector(0).unwrap(), &long[..dimension]);

    let short_clone = short.clone();
    store.set_embedding_function(move |_: &str| short_clone.clone());
    store.add_text("short");
    assert_eq!(store.get_vector(1).unwrap(), &[1.0, 2.0, 3.0, 0.0, 0.0]);

    // First record is untouched by the swap
    assert_eq!(store.get_vector(0).unwrap(), &long[..dimension]);
}

#[test]
fn test_remove_never_reuses_ids() {
    init_logger();
    let mut store = VectorStore::with_embedding(16, hash_embedding).unwrap();
    for i in 0..10 {
        store.add_text(format!("text {}", i));
    }

    for index in [9, 0, 4, 0] {
        let before = store.len();
        let removed = store.remove_at(index).unwrap();
        assert_eq!(store.len(), before - 1);
        if index < store.len() {
            assert!(store.get_id(index).unwrap() != removed.id());
        }
        let new_id = store.add_text("replacement");
        assert!(new_id > removed.id());
        store.remove_at(store.len() - 1).unwrap();
    }

    let ids: Vec<usize> = store.records().map(|r| r.id()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids not increasing: {:?}", ids);
}

#[test]
fn test_invalid_metric_leaves_store_unchanged() {
    init_logger();
    let store = axis_store();
    let before: Vec<(usize, String)> = store.records()
        .map(|r| (r.id(), r.raw_text().to_string()))
        .collect();

    assert!(matches!(
        store.find_nearest(&[1.0, 0.0, 0.0], "bogus"),
        Err(StoreError::InvalidMetric(_))
    ));
    assert!(matches!(
        store.top_k_nearest(&[1.0, 0.0, 0.0], 2, "bogus"),
        Err(StoreError::InvalidMetric(_))
    ));

    let after: Vec<(usize, String)> = store.records()
        .map(|r| (r.id(), r.raw_text().to_string()))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_empty_store_and_invalid_k() {
    init_logger();
    let mut store = VectorStore::from_config(&StoreConfig::from_json(r#"{"dimension": 3}"#).unwrap()).unwrap();
    for metric in ["cosine", "euclidean", "manhattan"] {
        assert_eq!(store.find_nearest(&[0.0, 0.0, 1.0], metric).unwrap(), None);
    }

    store.add_text("one");
    store.add_text("two");
    let count = store.len();
    assert!(matches!(
        store.top_k_nearest(&[0.0, 0.0, 1.0], 0, "cosine"),
        Err(StoreError::InvalidK { .. })
    ));
    assert!(matches!(
        store.top_k_nearest(&[0.0, 0.0, 1.0], count + 1, "cosine"),
        Err(StoreError::InvalidK { .. })
    ));
}

#[test]
fn test_update_then_search() {
    init_logger();
    let mut store = axis_store();

    // Turn "first" into the diagonal, now records 0 and 2 tie for cosine
    store.update_text(0, "third").unwrap();
    assert_eq!(store.get_id(0).unwrap(), 1);
    assert_eq!(store.find_nearest(&[1.0, 1.0, 0.0], "cosine").unwrap(), Some(0));
    assert_eq!(store.top_k(&[1.0, 1.0, 0.0], 3, Metric::Cosine).unwrap(), vec![0, 2, 1]);

    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.find_nearest(&[1.0, 1.0, 0.0], "cosine").unwrap(), None);
}

#[test]
fn test_top_k_ordering_on_larger_store() {
    init_logger();
    let num_texts = 2_000;
    let num_queries = 20;
    let k = 10;

    let start = Instant::now();
    let mut store = VectorStore::with_embedding(16, hash_embedding).unwrap();
    for i in 0..num_texts {
        store.add_text(format!("document {}", i));
    }
    println!("Inserted {} texts in {:.3}s", num_texts, start.elapsed().as_secs_f64());

    for q in 0..num_queries {
        let query = hash_embedding(&format!("query {}", q));
        for metric in [Metric::Cosine, Metric::Euclidean, Metric::Manhattan] {
            let top = store.top_k(&query, k, metric).unwrap();
            assert_eq!(top.len(), k);
            assert_eq!(Some(top[0]), store.nearest(&query, metric));

            // Scores must be best-first
            let scores: Vec<f64> = top.iter()
                .map(|&i| metric.score(&query, store.get_vector(i).unwrap()))
                .collect();
            for w in scores.windows(2) {
                if metric == Metric::Cosine {
                    assert!(w[0] >= w[1], "Results not sorted by score");
                } else {
                    assert!(w[0] <= w[1], "Results not sorted by score");
                }
            }
        }
    }
}
