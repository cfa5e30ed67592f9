//! End-to-end lifecycle tests: create, find, save, destroy, enumerate
//!
//! Exercises the public facade the way an embedding application would,
//! against the in-memory backend.

use std::sync::Arc;
use warren::{
    attributes, Attributes, Error, FindOptions, MemoryStore, Model, PropertyOptions, SaveOptions,
    Schema, ScanOptions, Store, StoreContext, Value,
};

fn article_model() -> (Arc<MemoryStore>, Model) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let schema = Schema::builder("article")
        .property("title", PropertyOptions::new().default_value("(Unknown)"))
        .property("created", PropertyOptions::new())
        .property(
            "views",
            PropertyOptions::new().default_value(0i64).family("counters"),
        )
        .build();
    let store = Arc::new(MemoryStore::new());
    let model = Model::new(schema, StoreContext::new(store.clone()));
    (store, model)
}

#[test]
fn new_record_is_not_persisted() {
    let (_, model) = article_model();
    let record = model.new_record(Attributes::new()).unwrap();
    assert!(record.id().is_none());
    assert!(!record.is_persisted().unwrap());
}

#[test]
fn save_and_find_round_trip() {
    let (_, model) = article_model();
    model
        .create(attributes([("id", Value::Int(1)), ("title", Value::from("One"))]))
        .unwrap();

    let found = model.find(1, &FindOptions::new()).unwrap().unwrap();
    assert_eq!(found.get("title").unwrap(), &Value::from("One"));
}

#[test]
fn auto_increment_ids_start_at_one_and_grow() {
    let (_, model) = article_model();
    let mut ids = Vec::new();
    for _ in 0..5 {
        let record = model.create(Attributes::new()).unwrap();
        ids.push(record.id().unwrap().as_int().unwrap());
    }
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn explicit_id_skips_allocation() {
    let (store, model) = article_model();
    model
        .create(attributes([("id", Value::from("draft-7"))]))
        .unwrap();
    assert!(store.exists("articles:draft-7").unwrap());
    // Counter untouched: the next auto id is still 1
    let auto = model.create(Attributes::new()).unwrap();
    assert_eq!(auto.id().unwrap(), &Value::Int(1));
}

#[test]
fn storage_layout_is_stable() {
    let (store, model) = article_model();
    let mut record = model
        .create(attributes([("title", Value::from("One"))]))
        .unwrap();
    record.set("views", Value::Int(3)).unwrap();
    record.save(&SaveOptions::new()).unwrap();

    // Record hash: one field per family, each a JSON object of exactly
    // that family's properties; id lives in "default" only
    let fields = store
        .hash_get("articles:1", &["default", "counters"])
        .unwrap();
    let default: serde_json::Value = serde_json::from_str(fields[0].as_deref().unwrap()).unwrap();
    assert_eq!(
        default,
        serde_json::json!({"id": 1, "title": "One", "created": null})
    );
    let counters: serde_json::Value = serde_json::from_str(fields[1].as_deref().unwrap()).unwrap();
    assert_eq!(counters, serde_json::json!({"views": 3}));

    // Counter key layout
    assert!(store.exists("articles_ids").unwrap());
}

#[test]
fn find_miss_is_absence() {
    let (_, model) = article_model();
    assert!(model.find(404, &FindOptions::new()).unwrap().is_none());
}

#[test]
fn batch_find_preserves_requested_order() {
    let (_, model) = article_model();
    for _ in 0..10 {
        model.create(Attributes::new()).unwrap();
    }
    let found = model.find_many(&[2, 5, 6], &FindOptions::new()).unwrap();
    let ids: Vec<i64> = found
        .iter()
        .map(|r| r.id().unwrap().as_int().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 5, 6]);
}

#[test]
fn batch_find_omits_missing_ids() {
    let (_, model) = article_model();
    model.create(Attributes::new()).unwrap();
    model.create(Attributes::new()).unwrap();
    let found = model
        .find_many(&[2, 404, 1], &FindOptions::new())
        .unwrap();
    let ids: Vec<i64> = found
        .iter()
        .map(|r| r.id().unwrap().as_int().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn all_returns_every_record_sorted_by_id() {
    let (_, model) = article_model();
    for _ in 0..3 {
        model.create(Attributes::new()).unwrap();
    }
    let all = model.all().unwrap();
    let ids: Vec<String> = all.iter().map(|r| r.id_string().unwrap()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[test]
fn find_each_visits_everything_in_batches() {
    let (_, model) = article_model();
    for _ in 0..25 {
        model.create(Attributes::new()).unwrap();
    }
    let mut count = 0usize;
    model
        .find_each(&ScanOptions::new().batch_size(10), |record| {
            assert!(record.id().is_some());
            count += 1;
            Ok(())
        })
        .unwrap();
    assert_eq!(count, 25);
}

#[test]
fn destroy_is_final() {
    let (store, model) = article_model();
    let mut record = model.create(Attributes::new()).unwrap();
    assert!(store.exists("articles:1").unwrap());

    record.destroy().unwrap();
    assert!(!store.exists("articles:1").unwrap());
    assert!(!record.is_persisted().unwrap());
    assert!(matches!(
        record.set("title", Value::from("late")),
        Err(Error::RecordDestroyed)
    ));
    assert!(model.find(1, &FindOptions::new()).unwrap().is_none());
}

#[test]
fn update_attributes_writes_through() {
    let (_, model) = article_model();
    let mut record = model.create(Attributes::new()).unwrap();
    record
        .update_attributes(attributes([("title", Value::from("Edited"))]))
        .unwrap();

    let found = model.find(1, &FindOptions::new()).unwrap().unwrap();
    assert_eq!(found.get("title").unwrap(), &Value::from("Edited"));
}

#[test]
fn configured_model_uses_global_store() {
    let store = Arc::new(MemoryStore::new());
    warren::configure(store.clone());

    let schema = Schema::builder("note")
        .property("body", PropertyOptions::new())
        .build();
    let model = Model::configured(schema).unwrap();
    model
        .create(attributes([("body", Value::from("hi"))]))
        .unwrap();
    assert!(store.exists("notes:1").unwrap());
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Round-trip: anything saved in the default family reads back
        // identically after a find covering it
        #[test]
        fn title_round_trips(title in "[A-Za-z0-9 ,.!?-]{0,48}") {
            let (_, model) = article_model();
            model
                .create(attributes([("title", Value::from(title.clone()))]))
                .unwrap();
            let found = model.find(1, &FindOptions::new()).unwrap().unwrap();
            prop_assert_eq!(found.get("title").unwrap(), &Value::String(title));
        }

        #[test]
        fn views_round_trip_through_counters(views in any::<i64>()) {
            let (_, model) = article_model();
            let mut record = model.create(Attributes::new()).unwrap();
            record.set("views", Value::Int(views)).unwrap();
            record.save(&SaveOptions::new()).unwrap();

            let found = model
                .find(1, &FindOptions::with_families(["counters"]))
                .unwrap()
                .unwrap();
            prop_assert_eq!(found.get("views").unwrap(), &Value::Int(views));
        }
    }
}
