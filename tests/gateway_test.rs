//! Note gateway behaviour against the in-memory store

mod common;

use std::collections::{BTreeMap, HashSet};

use assert_matches::assert_matches;
use notehub::backend::notes::{MemoryNoteStore, NoteGateway};
use notehub::backend::BackendError;
use notehub::shared::{FieldValue, Fields, NoteId};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use common::text_fields;

fn gateway() -> NoteGateway {
    NoteGateway::from_store(MemoryNoteStore::default())
}

#[tokio::test]
async fn test_create_keeps_supplied_fields() {
    let gateway = gateway();
    let fields = text_fields(&[("title", "x"), ("text", "body")]);
    let note = gateway.create(fields.clone()).await.unwrap();
    assert_eq!(note.fields, fields);
}

#[tokio::test]
async fn test_create_assigns_fresh_ids() {
    let gateway = gateway();
    let mut seen = HashSet::new();
    for _ in 0..50 {
        let note = gateway.create(text_fields(&[("title", "x")])).await.unwrap();
        assert!(seen.insert(note.id), "id {} was assigned twice", note.id);
    }
    assert_eq!(gateway.list().await.unwrap().len(), 50);
}

#[tokio::test]
async fn test_update_preserves_unnamed_fields() {
    let gateway = gateway();
    let note = gateway
        .create(text_fields(&[("title", "x"), ("text", "body"), ("color", "red")]))
        .await
        .unwrap();

    gateway
        .update(note.id, text_fields(&[("title", "y"), ("color", "blue")]))
        .await
        .unwrap();

    let snapshot = gateway.list().await.unwrap();
    assert_eq!(
        snapshot.get(&note.id).unwrap().fields,
        text_fields(&[("title", "y"), ("text", "body"), ("color", "blue")])
    );
}

#[tokio::test]
async fn test_update_missing_note_is_not_found() {
    let gateway = gateway();
    let id = NoteId::new();
    let result = gateway.update(id, text_fields(&[("title", "y")])).await;
    assert_matches!(result, Err(BackendError::NotFound(missing)) if missing == id);
    assert!(gateway.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let gateway = gateway();
    let keep = gateway.create(text_fields(&[("title", "keep")])).await.unwrap();
    let gone = gateway.create(text_fields(&[("title", "gone")])).await.unwrap();

    assert!(gateway.delete(gone.id).await.unwrap().is_some());
    let after_first = gateway.list().await.unwrap();
    assert!(gateway.delete(gone.id).await.unwrap().is_none());
    let after_second = gateway.list().await.unwrap();

    assert_eq!(after_first, after_second);
    assert!(after_second.contains(&keep.id));
}

#[tokio::test]
async fn test_schema_violation_changes_nothing() {
    let gateway = gateway();
    let note = gateway.create(text_fields(&[("title", "x")])).await.unwrap();

    let bad_create = Fields::from([("x".to_string(), FieldValue::from("left"))]);
    assert_matches!(
        gateway.create(bad_create).await,
        Err(BackendError::ValidationFailed { .. })
    );

    let bad_update = Fields::from([("zIndex".to_string(), FieldValue::Bool(true))]);
    assert_matches!(
        gateway.update(note.id, bad_update).await,
        Err(BackendError::ValidationFailed { .. })
    );

    let snapshot = gateway.list().await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get(&note.id).unwrap(), &note);
}

#[derive(Debug, Clone)]
enum Op {
    Create(Fields),
    Update(usize, Fields),
    Delete(usize),
    UpdateUnknown(Fields),
    DeleteUnknown,
}

fn fields_strategy() -> impl Strategy<Value = Fields> {
    prop::collection::vec((0usize..4, "[a-z]{0,6}", any::<i32>()), 0..4).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(key, text, number)| match key {
                0 => ("title".to_string(), FieldValue::Text(text)),
                1 => ("text".to_string(), FieldValue::Text(text)),
                2 => ("color".to_string(), FieldValue::Text(text)),
                _ => ("x".to_string(), FieldValue::Integer(i64::from(number))),
            })
            .collect()
    })
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => fields_strategy().prop_map(Op::Create),
        3 => (any::<usize>(), fields_strategy()).prop_map(|(i, f)| Op::Update(i, f)),
        2 => any::<usize>().prop_map(Op::Delete),
        1 => fields_strategy().prop_map(Op::UpdateUnknown),
        1 => Just(Op::DeleteUnknown),
    ]
}

/// Apply `ops` to the gateway and to a plain map, then compare.
async fn check_against_model(ops: Vec<Op>) {
    let gateway = gateway();
    let mut model: BTreeMap<NoteId, Fields> = BTreeMap::new();
    // ids ever created, including deleted ones
    let mut ids: Vec<NoteId> = Vec::new();

    for op in ops {
        match op {
            Op::Create(fields) => {
                let note = gateway.create(fields.clone()).await.unwrap();
                assert!(!ids.contains(&note.id));
                assert_eq!(note.fields, fields);
                ids.push(note.id);
                model.insert(note.id, fields);
            }
            Op::Update(index, patch) if !ids.is_empty() => {
                let id = ids[index % ids.len()];
                let result = gateway.update(id, patch.clone()).await;
                match model.get_mut(&id) {
                    Some(existing) => {
                        existing.extend(patch);
                        assert_eq!(&result.unwrap().fields, existing);
                    }
                    None => assert_matches!(result, Err(BackendError::NotFound(_))),
                }
            }
            Op::Delete(index) if !ids.is_empty() => {
                let id = ids[index % ids.len()];
                let removed = gateway.delete(id).await.unwrap();
                assert_eq!(removed.map(|n| n.fields), model.remove(&id));
            }
            Op::UpdateUnknown(patch) => {
                let result = gateway.update(NoteId::new(), patch).await;
                assert_matches!(result, Err(BackendError::NotFound(_)));
            }
            Op::DeleteUnknown => {
                assert!(gateway.delete(NoteId::new()).await.unwrap().is_none());
            }
            Op::Update(..) | Op::Delete(_) => {}
        }
    }

    let snapshot = gateway.list().await.unwrap();
    let actual: BTreeMap<NoteId, Fields> = snapshot
        .into_iter()
        .map(|(id, note)| (id, note.fields))
        .collect();
    assert_eq!(actual, model);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_gateway_matches_reference_model(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(check_against_model(ops));
    }
}
