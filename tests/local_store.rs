//! Local persistence of settings, favorites, history and counters.

use namegen::clock::ManualClock;
use namegen::storage::{FileStore, KeyValueStore, LocalStore, MemoryStore};
use namegen::{NameCategory, Settings, Theme};
use std::sync::Arc;
use std::time::Duration;

fn memory_store() -> (Arc<ManualClock>, LocalStore) {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let store = LocalStore::new(Arc::new(MemoryStore::new()), clock.clone()).unwrap();
    (clock, store)
}

#[test]
fn test_history_is_capped_newest_first() {
    let (clock, store) = memory_store();
    for i in 0..51 {
        store
            .add_history(format!("prompt {}", i), vec![format!("N{}", i)], NameCategory::Place)
            .unwrap();
        clock.advance(Duration::from_millis(1));
    }

    let history = store.get_history().unwrap();
    assert_eq!(history.len(), 50);
    assert_eq!(history[0].prompt, "prompt 50");
    assert_eq!(history[49].prompt, "prompt 1");
    assert!(history.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    assert_eq!(store.get_analytics().unwrap().generated_names, 51);
}

#[test]
fn test_set_history_truncates() {
    let (_, store) = memory_store();
    let item = store
        .add_history("x", vec!["A".into()], NameCategory::Item)
        .unwrap();
    store.set_history(&vec![item; 60]).unwrap();
    assert_eq!(store.get_history().unwrap().len(), 50);
}

#[test]
fn test_favorites_round_trip_without_duplicates() {
    let (_, store) = memory_store();
    assert!(store.add_favorite("Nova").unwrap());
    assert!(store.add_favorite("Vega").unwrap());
    let before = store.get_favorites().unwrap();

    assert!(store.add_favorite("Lyra").unwrap());
    assert!(!store.add_favorite("Lyra").unwrap());
    assert!(store.remove_favorite("Lyra").unwrap());

    assert_eq!(store.get_favorites().unwrap(), before);
    assert_eq!(store.get_analytics().unwrap().favorites, 2);
}

#[test]
fn test_concurrent_mutations_are_not_lost() {
    let (_, store) = memory_store();
    std::thread::scope(|scope| {
        for t in 0..8 {
            let store = &store;
            scope.spawn(move || {
                for i in 0..25 {
                    store.add_favorite(&format!("T{}-{}", t, i)).unwrap();
                    store
                        .add_history(format!("t{}", t), vec!["N".into()], NameCategory::Custom)
                        .unwrap();
                    store.record_api_call().unwrap();
                }
            });
        }
    });

    let analytics = store.get_analytics().unwrap();
    assert_eq!(store.get_favorites().unwrap().len(), 200);
    assert_eq!(analytics.favorites, 200);
    assert_eq!(analytics.api_calls, 200);
    assert_eq!(analytics.generated_names, 200);
    assert_eq!(store.get_history().unwrap().len(), 50);
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(42));

    {
        let backend = Arc::new(FileStore::open(dir.path()).unwrap());
        let store = LocalStore::new(backend, clock.clone()).unwrap();
        store
            .set_settings(&Settings::default().with_theme(Theme::Light).with_num_names(8))
            .unwrap();
        store.toggle_favorite("Orbit").unwrap();
        store
            .add_history("space", vec!["Orbit".into()], NameCategory::Place)
            .unwrap();
        store.record_export().unwrap();
    }

    let backend = Arc::new(FileStore::open(dir.path()).unwrap());
    let store = LocalStore::new(backend.clone(), clock).unwrap();
    let settings = store.get_settings().unwrap().unwrap();
    assert_eq!(settings.theme, Theme::Light);
    assert_eq!(settings.num_names, 8);
    assert_eq!(store.get_favorites().unwrap(), vec!["Orbit"]);
    assert_eq!(store.get_history().unwrap()[0].timestamp, 42);
    assert_eq!(store.get_analytics().unwrap().exports, 1);

    let raw = backend.get("settings").unwrap().unwrap();
    assert!(raw.contains("\"numNames\":8"));
    assert!(raw.contains("\"namesPerPage\":8"));
}

#[test]
fn test_partial_settings_blob_fills_defaults() {
    let backend = Arc::new(MemoryStore::new());
    backend
        .set("settings", r#"{"theme":"light","namesPerPage":5}"#)
        .unwrap();
    let store = LocalStore::new(backend.clone(), Arc::new(ManualClock::new(0))).unwrap();

    let settings = store.get_settings().unwrap().unwrap();
    assert_eq!(settings.theme, Theme::Light);
    assert_eq!(settings.names_per_page, 5);
    assert_eq!(settings.category, NameCategory::Custom);
    assert_eq!(settings.num_names, Settings::default().num_names);

    backend
        .set("settings", r#"{"numNames":3,"namesPerPage":12}"#)
        .unwrap();
    let settings = store.get_settings().unwrap().unwrap();
    assert_eq!(settings.num_names, 3);
    assert_eq!(settings.names_per_page, 3);
}

#[test]
fn test_malformed_settings_blob_is_an_error() {
    let backend = Arc::new(MemoryStore::new());
    backend.set("settings", "{\"theme\":").unwrap();
    let store = LocalStore::new(backend, Arc::new(ManualClock::new(0))).unwrap();

    let err = store.get_settings().unwrap_err();
    assert_eq!(err.kind(), namegen::ErrorKind::Serialization);
}

#[test]
fn test_clear_operations() {
    let (_, store) = memory_store();
    store.add_favorite("A").unwrap();
    store
        .add_history("p", vec!["A".into()], NameCategory::Character)
        .unwrap();
    store.clear_favorites().unwrap();
    store.clear_history().unwrap();
    assert!(store.get_favorites().unwrap().is_empty());
    assert!(store.get_history().unwrap().is_empty());
}
