//! Tests for Engine
//!
//! These tests verify:
//! - Basic insert/search/delete operations
//! - Read-through caching and delete invalidation
//! - Dump and load (round trip, duplicates, malformed input, I/O failure)
//! - Configuration validation
//! - Concurrent access patterns

use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use skipkv::config::Config;
use skipkv::engine::Engine;
use skipkv::{InsertStatus, SkipKvError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_engine(max_level: usize) -> Engine<i64, String> {
    let config = Config::builder()
        .max_level(max_level)
        .level_seed(42)
        .cache_sweep_interval(Duration::from_secs(3600))
        .build();
    Engine::open(config).unwrap()
}

fn setup_engine_with_store(temp_dir: &TempDir) -> Engine<i64, String> {
    let config = Config::builder()
        .max_level(8)
        .level_seed(7)
        .store_path(temp_dir.path().join("store").join("dumpFile"))
        .build();
    Engine::open(config).unwrap()
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_reference_scenario() {
    let engine = setup_engine(6);

    assert_eq!(engine.insert(1, "A".to_string()), InsertStatus::Inserted);
    assert_eq!(engine.insert(3, "B".to_string()), InsertStatus::Inserted);
    assert_eq!(engine.insert(3, "C".to_string()), InsertStatus::AlreadyExists);
    assert_eq!(engine.search(&3), Some("B".to_string()));

    engine.delete(&1);
    assert_eq!(engine.search(&1), None);
    assert_eq!(engine.size(), 1);
}

#[test]
fn test_inserted_keys_are_found() {
    let engine = setup_engine(12);
    for key in 0..1_000 {
        engine.insert(key, format!("value_{}", key));
    }

    assert_eq!(engine.size(), 1_000);
    for key in 0..1_000 {
        assert_eq!(engine.search(&key), Some(format!("value_{}", key)));
    }
}

#[test]
fn test_search_never_inserted_key() {
    let engine = setup_engine(6);
    engine.insert(1, "A".to_string());

    assert_eq!(engine.search(&2), None);
    assert_eq!(engine.search(&-1), None);
}

#[test]
fn test_delete_absent_key_is_noop() {
    let engine = setup_engine(6);
    engine.insert(1, "A".to_string());

    assert!(!engine.delete(&2));
    assert_eq!(engine.size(), 1);
}

#[test]
fn test_delete_then_reinsert() {
    let engine = setup_engine(6);
    engine.insert(5, "old".to_string());
    assert_eq!(engine.search(&5), Some("old".to_string()));

    assert!(engine.delete(&5));
    assert_eq!(engine.insert(5, "new".to_string()), InsertStatus::Inserted);
    assert_eq!(engine.search(&5), Some("new".to_string()));
}

#[test]
fn test_entries_are_sorted() {
    let engine = setup_engine(6);
    for key in [9, 2, 7, 4] {
        engine.insert(key, key.to_string());
    }

    let keys: Vec<i64> = engine.entries().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![2, 4, 7, 9]);
}

#[test]
fn test_display_lists_level_zero() {
    let engine = setup_engine(0);
    engine.insert(1, "A".to_string());
    engine.insert(3, "B".to_string());

    assert_eq!(engine.display(), "*****Skip List*****\nLevel 0: 1:A;3:B;\n");
}

// =============================================================================
// Cache Interaction Tests
// =============================================================================

#[test]
fn test_search_populates_cache() {
    let engine = setup_engine(6);
    engine.insert(1, "A".to_string());
    assert!(engine.cache().is_empty());

    engine.search(&1);
    assert_eq!(engine.cache().keys(), vec![1]);

    engine.search(&1);
    assert_eq!(engine.cache().stats().hits, 1);
}

#[test]
fn test_miss_does_not_populate_cache() {
    let engine = setup_engine(6);
    engine.search(&1);
    assert!(engine.cache().is_empty());
}

#[test]
fn test_insert_does_not_populate_cache() {
    let engine = setup_engine(6);
    engine.insert(1, "A".to_string());
    assert!(engine.cache().is_empty());
}

#[test]
fn test_delete_invalidates_cache() {
    let engine = setup_engine(6);
    engine.insert(1, "A".to_string());
    engine.search(&1);
    assert_eq!(engine.cache().len(), 1);

    engine.delete(&1);
    assert!(engine.cache().is_empty());
    assert_eq!(engine.search(&1), None);
}

#[test]
fn test_cache_hit_skips_index() {
    let engine = setup_engine(6);
    engine.insert(1, "A".to_string());
    engine.search(&1);

    // A value placed only in the cache is served as long as it is live
    engine.cache().put(1, "cached".to_string(), Duration::from_secs(60));
    assert_eq!(engine.search(&1), Some("cached".to_string()));
}

#[test]
fn test_cache_entry_expires_after_read_ttl() {
    let config = Config::builder()
        .read_ttl(Duration::from_millis(30))
        .cache_sweep_interval(Duration::from_secs(3600))
        .build();
    let engine: Engine<i64, String> = Engine::open(config).unwrap();
    engine.insert(1, "A".to_string());
    engine.search(&1);

    thread::sleep(Duration::from_millis(80));

    // Expired copy is dropped; the index still answers and re-caches
    assert_eq!(engine.search(&1), Some("A".to_string()));
    assert_eq!(engine.cache().stats().expired_on_read, 1);
    assert_eq!(engine.cache().len(), 1);
}

#[test]
fn test_cache_capacity_bounds_read_through() {
    let config = Config::builder().cache_capacity(3).build();
    let engine: Engine<i64, String> = Engine::open(config).unwrap();
    for key in 0..10 {
        engine.insert(key, key.to_string());
        engine.search(&key);
    }

    assert_eq!(engine.cache().len(), 3);
    assert_eq!(engine.cache().keys(), vec![9, 8, 7]);
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_dump_writes_sorted_lines() {
    let temp = TempDir::new().unwrap();
    let engine = setup_engine_with_store(&temp);
    engine.insert(3, "B".to_string());
    engine.insert(1, "A".to_string());
    engine.insert(2, "x:y".to_string());

    assert_eq!(engine.dump().unwrap(), 3);

    let text = fs::read_to_string(temp.path().join("store").join("dumpFile")).unwrap();
    assert_eq!(text, "1:A\n2:x:y\n3:B\n");
}

#[test]
fn test_dump_then_load_round_trip() {
    let temp = TempDir::new().unwrap();
    let engine = setup_engine_with_store(&temp);
    for key in [5, 1, 9, 3] {
        engine.insert(key, format!("v{}", key));
    }
    engine.delete(&9);
    engine.dump().unwrap();

    let restored = setup_engine_with_store(&temp);
    let stats = restored.load().unwrap();

    assert_eq!(stats.inserted, 3);
    assert_eq!(restored.entries(), engine.entries());
    assert_eq!(restored.size(), 3);
}

#[test]
fn test_load_keeps_first_duplicate() {
    let temp = TempDir::new().unwrap();
    let engine = setup_engine_with_store(&temp);
    let path = engine.config().store_path.clone();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "1:first\n2:two\n1:second\n").unwrap();

    let stats = engine.load().unwrap();

    assert_eq!(stats.inserted, 2);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(engine.search(&1), Some("first".to_string()));
}

#[test]
fn test_load_skips_malformed_lines() {
    let temp = TempDir::new().unwrap();
    let engine = setup_engine_with_store(&temp);
    let path = temp.path().join("mixed");
    fs::write(&path, "1:one\nnope\n:x\n2:\nabc:def\n2:two\n").unwrap();

    let stats = engine.load_from_path(&path).unwrap();

    assert_eq!(stats.skipped, 4);
    assert_eq!(engine.size(), 2);
    assert_eq!(engine.search(&2), Some("two".to_string()));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let engine = setup_engine_with_store(&temp);

    let result = engine.load();
    assert!(matches!(result, Err(SkipKvError::Io(_))));
    assert!(engine.is_empty());
}

#[test]
fn test_dump_to_unwritable_path_is_io_error() {
    let temp = TempDir::new().unwrap();
    let engine = setup_engine_with_store(&temp);
    engine.insert(1, "A".to_string());

    // A regular file where the parent directory should be
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "").unwrap();

    let result = engine.dump_to_path(&blocker.join("dumpFile"));
    assert!(matches!(result, Err(SkipKvError::Io(_))));
}

#[test]
fn test_custom_delimiter() {
    let config = Config::builder().delimiter("|").build();
    let engine: Engine<i64, String> = Engine::open(config).unwrap();
    engine.insert(1, "a:b".to_string());

    let mut out = Vec::new();
    engine.dump_to(&mut out).unwrap();
    assert_eq!(String::from_utf8(out.clone()).unwrap(), "1|a:b\n");

    let fresh: Engine<i64, String> =
        Engine::open(Config::builder().delimiter("|").build()).unwrap();
    fresh.load_from(out.as_slice()).unwrap();
    assert_eq!(fresh.search(&1), Some("a:b".to_string()));
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_open_rejects_invalid_config() {
    let cases = vec![
        Config::builder().cache_capacity(0).build(),
        Config::builder().cache_sweep_interval(Duration::ZERO).build(),
        Config::builder().delimiter("").build(),
        Config::builder().delimiter("\n").build(),
        Config::builder().max_level(64).build(),
    ];

    for config in cases {
        let result: Result<Engine<i64, String>, _> = Engine::open(config);
        assert!(matches!(result, Err(SkipKvError::Config(_))));
    }
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_disjoint_inserts() {
    let engine = Arc::new(setup_engine(16));
    let threads = 4;
    let per_thread = 2_500;
    let mut handles = vec![];

    for t in 0..threads {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            let start = t * per_thread;
            for key in start..start + per_thread {
                assert_eq!(
                    engine.insert(key, format!("value_{}", key)),
                    InsertStatus::Inserted
                );
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.size(), (threads * per_thread) as usize);
    for key in 0..threads * per_thread {
        assert_eq!(engine.search(&key), Some(format!("value_{}", key)));
    }
}

#[test]
fn test_concurrent_search_and_delete() {
    let engine = Arc::new(setup_engine(12));
    for key in 0..2_000 {
        engine.insert(key, key.to_string());
    }

    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for key in (0..2_000).step_by(2) {
                assert!(engine.delete(&key));
            }
        })
    };

    let mut readers = vec![];
    for _ in 0..3 {
        let engine = Arc::clone(&engine);
        readers.push(thread::spawn(move || {
            for key in 0..2_000 {
                if let Some(value) = engine.search(&key) {
                    assert_eq!(value, key.to_string());
                }
            }
        }));
    }

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(engine.size(), 1_000);
    for key in 0..2_000 {
        let expected = if key % 2 == 0 { None } else { Some(key.to_string()) };
        assert_eq!(engine.search(&key), expected);
    }
}
