//! Concurrent storage access tests
//!
//! Several processes (CLI invocations) can share one data directory. Each
//! thread here opens its own store instance over the same directory, which
//! is what separate processes do.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::sync::{Arc, Barrier};
use std::thread;

use tempfile::TempDir;

use aura_core::adapters::JsonFileStore;
use aura_core::domain::{CollectionEdit, Edit, ExperienceField};
use aura_core::ports::{keys, KeyValueStore, KeyValueStoreExt};
use aura_core::services::{ContentStore, IdentityRegistry, PersistContent};
use aura_core::{User, WebsiteContent};

/// Number of concurrent threads for stress tests
const THREAD_COUNT: usize = 6;

/// Number of iterations per thread
const ITERATIONS_PER_THREAD: usize = 20;

/// Writers on separate instances never leave a torn or missing value
#[test]
fn test_concurrent_writers_same_key() {
    let temp_dir = TempDir::new().unwrap();
    let dir = Arc::new(temp_dir.path().to_path_buf());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|t| {
            let dir = Arc::clone(&dir);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let store = JsonFileStore::new(&dir).unwrap();
                barrier.wait();
                for i in 0..ITERATIONS_PER_THREAD {
                    let value = serde_json::json!({ "thread": t, "iteration": i }).to_string();
                    store.set(keys::CURRENT_USER, &value).unwrap();

                    let read = store.get(keys::CURRENT_USER).unwrap().expect("value present");
                    let parsed: serde_json::Value =
                        serde_json::from_str(&read).expect("never torn");
                    assert!(parsed.get("thread").is_some());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    let store = JsonFileStore::new(&dir).unwrap();
    let last: serde_json::Value = store.get_json(keys::CURRENT_USER).unwrap().unwrap();
    assert_eq!(last["iteration"], ITERATIONS_PER_THREAD - 1);
}

/// Writers on distinct keys do not disturb each other
#[test]
fn test_concurrent_writers_distinct_keys() {
    let temp_dir = TempDir::new().unwrap();
    let dir = Arc::new(temp_dir.path().to_path_buf());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|t| {
            let dir = Arc::clone(&dir);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let store = JsonFileStore::new(&dir).unwrap();
                barrier.wait();
                for i in 0..ITERATIONS_PER_THREAD {
                    store.set(&format!("key_{}", t), &i.to_string()).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    let store = JsonFileStore::new(&dir).unwrap();
    let keys = store.keys().unwrap();
    assert_eq!(keys.len(), THREAD_COUNT);
    for t in 0..THREAD_COUNT {
        let value = store.get(&format!("key_{}", t)).unwrap();
        assert_eq!(value, Some((ITERATIONS_PER_THREAD - 1).to_string()));
    }
}

/// Edits from many threads on one shared store are all kept, and the saved
/// document matches memory once they finish
#[test]
fn test_shared_content_store_applies_every_edit() {
    let temp_dir = TempDir::new().unwrap();
    let storage: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(temp_dir.path()).unwrap());
    let store = Arc::new(ContentStore::load(storage.as_ref()));
    store.subscribe(Arc::new(PersistContent::new(Arc::clone(&storage), None)));
    let before = store.get().experiences.len();
    let today = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..ITERATIONS_PER_THREAD {
                    store.apply(|content| {
                        let outcome = Edit::Experience(CollectionEdit::Append).apply(content, today);
                        let id = outcome.created_id.expect("append creates a record");
                        Edit::Experience(CollectionEdit::update(
                            id,
                            ExperienceField::Company(format!("t{}-{}", t, i)),
                        ))
                        .apply(content, today);
                    });
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("editor thread panicked");
    }

    let content = store.get();
    assert_eq!(
        content.experiences.len(),
        before + THREAD_COUNT * ITERATIONS_PER_THREAD
    );
    let mut ids: Vec<&str> = content.experiences.iter().map(|e| e.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), content.experiences.len());

    let saved: WebsiteContent = storage.get_json(keys::CONTENT).unwrap().unwrap();
    assert_eq!(saved, content);
}

/// Signups from separate store instances never lose an identity, and only
/// one of several racing signups for the same email gets in
#[test]
fn test_concurrent_signups_keep_every_identity() {
    let temp_dir = TempDir::new().unwrap();
    let dir = Arc::new(temp_dir.path().to_path_buf());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|t| {
            let dir = Arc::clone(&dir);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let storage: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&dir).unwrap());
                let registry = IdentityRegistry::new(storage);
                barrier.wait();

                for i in 0..ITERATIONS_PER_THREAD {
                    let email = format!("user{}-{}@example.com", t, i);
                    let id = format!("{}-{}", t, i);
                    assert!(registry
                        .register(User::new(id, "", "", "", "", &email, None))
                        .unwrap());
                }
                let shared =
                    User::new(format!("shared-{}", t), "", "", "", "", "same@example.com", None);
                usize::from(registry.register(shared).unwrap())
            })
        })
        .collect();

    let shared_wins: usize = handles
        .into_iter()
        .map(|h| h.join().expect("signup thread panicked"))
        .sum();
    assert_eq!(shared_wins, 1);

    let storage: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&dir).unwrap());
    let registry = IdentityRegistry::new(storage);
    assert_eq!(
        registry.count().unwrap(),
        THREAD_COUNT * ITERATIONS_PER_THREAD + 1
    );
}
