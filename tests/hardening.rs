//! Hardening tests for adversarial inputs, concurrency, and recovery.
//!
//! These verify the cache degrades to empty instead of panicking, and that
//! concurrent users of one handle see consistent state.

mod support;

use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;

use proptest::prelude::*;
use sealcache::{CacheFile, CacheKey, LoadSource, Protector, SecretsCache, Ttl};
use support::*;

// ============================================================================
// Key encoding
// ============================================================================

fn field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.@/-]{1,24}"
}

proptest! {
    #[test]
    fn prop_three_part_key_round_trips(h in field(), id in field(), v in field()) {
        let key = CacheKey::new(h, id, v);
        let parsed: CacheKey = key.to_string().parse().unwrap();
        prop_assert_eq!(parsed, key);
    }

    #[test]
    fn prop_five_part_key_round_trips(
        c in field(), cid in field(), h in field(), id in field(), v in field()
    ) {
        let key = CacheKey::with_context(c, cid, h, id, v);
        let parsed: CacheKey = key.to_string().parse().unwrap();
        prop_assert_eq!(parsed, key);
    }

    #[test]
    fn prop_wrong_part_count_rejected(parts in prop::collection::vec(field(), 1..8)) {
        prop_assume!(parts.len() != 3 && parts.len() != 5);
        let raw = parts.join(":");
        prop_assert!(raw.parse::<CacheKey>().is_err());
    }
}

// ============================================================================
// Protector
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_protector_round_trips(data in prop::collection::vec(any::<u8>(), 0..2048)) {
        let p = protector("m1", "alice");
        let blob = p.encrypt(&data).unwrap();
        prop_assert_eq!(blob.len(), data.len() + 28);
        let plain = p.decrypt(&blob).unwrap();
        prop_assert_eq!(plain.as_slice(), data.as_slice());
    }
}

#[test]
fn test_protector_hello_scenario() {
    let alice = protector("m1", "alice");
    let blob = alice.encrypt(b"hello").unwrap();
    assert_eq!(alice.decrypt(&blob).unwrap().as_slice(), b"hello");

    let bob = protector("m1", "bob");
    assert!(bob.decrypt(&blob).is_err());
    let other_machine = protector("m2", "alice");
    assert!(other_machine.decrypt(&blob).is_err());
}

// ============================================================================
// Malformed files
// ============================================================================

#[test]
fn test_garbage_files_load_empty() {
    let inputs: Vec<Vec<u8>> = vec![
        Vec::new(),
        b"   \n".to_vec(),
        b"{".to_vec(),
        b"[1, 2, 3]".to_vec(),
        b"{\"secrets\": 5}".to_vec(),
        vec![0u8; 64],
        (0..=255u8).collect(),
    ];

    for input in inputs {
        let t = Test::new();
        fs::write(t.cache_path(), &input).unwrap();

        let cache = t.cache();
        assert!(
            matches!(cache.load_source(), LoadSource::Empty | LoadSource::Failed),
            "unexpected {:?} for {:?}",
            cache.load_source(),
            input
        );
        assert!(cache.secrets().is_empty());
        assert!(cache.session().get().is_none());
    }
}

#[test]
fn test_truncated_encrypted_file_loads_empty() {
    let t = Test::new();
    {
        let cache = t.cache();
        cache.session().set(session("s-1"));
    }
    let raw = fs::read(t.cache_path()).unwrap();
    fs::write(t.cache_path(), &raw[..raw.len() / 2]).unwrap();

    let cache = t.cache();
    assert_eq!(cache.load_source(), LoadSource::Failed);
    assert!(cache.session().get().is_none());
}

#[test]
fn test_invalid_keys_skipped_on_load() {
    let t = Test::new();
    t.write_legacy(
        r#"{"secrets":{
            "bad": {"bytes": "AQ==", "flags": 0},
            "a:b:c:d": {"bytes": "AQ==", "flags": 0},
            "svc:user1:token": {"bytes": "AQ==", "flags": 9}
        }}"#,
    );

    let cache = t.cache();
    assert_eq!(cache.load_source(), LoadSource::Legacy);
    assert_eq!(cache.secrets().len(), 1);
    let flags = cache
        .secrets()
        .try_use(&CacheKey::new("svc", "user1", "token"), (), |_, _, f| f);
    assert_eq!(flags, Some(9));
}

// ============================================================================
// Concurrent access
// ============================================================================

#[test]
fn test_concurrent_writers_and_readers() {
    let t = Test::new();
    let cache = Arc::new(t.cache());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8u8)
        .map(|i| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let key = CacheKey::new("svc", format!("user{}", i), "token");
                for round in 0..50u8 {
                    cache.secrets().set(key.clone(), &[i, round], i, Ttl::Infinite);
                    let seen = cache.secrets().try_use(&key, (), |_, b, f| (b[0], f));
                    assert_eq!(seen, Some((i, i)));
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(cache.secrets().len(), 8);

    cache.save().unwrap();
    drop(cache);

    let reopened = t.cache();
    let last = reopened
        .secrets()
        .try_use(&CacheKey::new("svc", "user3", "token"), (), |_, b, _| b.to_vec());
    assert_eq!(last, Some(vec![3, 49]));
}

#[test]
fn test_concurrent_saves_persist_every_key() {
    for _ in 0..5 {
        let t = Test::new();
        let cache = Arc::new(t.cache_as("m1", "alice"));
        cache.session().set(session("s-1"));
        let barrier = Arc::new(Barrier::new(6));

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.secrets().set(
                        CacheKey::new("svc", "user1", format!("k{}", i)),
                        b"v",
                        0,
                        Ttl::Infinite,
                    );
                    cache.save().unwrap();
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        // Read the file while the handle is still alive, before its final save.
        let on_disk = CacheFile::new(t.cache_path(), protector("m1", "alice"));
        assert_eq!(on_disk.load(), LoadSource::Encrypted);
        assert_eq!(on_disk.with_state(|s| s.secrets.len()), 6);
        assert!(on_disk.with_state(|s| s.session.is_some()));

        drop(cache);
    }
}
