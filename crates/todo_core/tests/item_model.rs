use todo_core::{Item, ItemDraft, ItemValidationError, Priority};

fn sample_item() -> Item {
    Item {
        id: 42,
        title: "Buy milk".to_string(),
        description: "2 liters".to_string(),
        priority: Priority::Medium,
    }
}

#[test]
fn item_serialization_uses_expected_wire_fields() {
    let json = serde_json::to_value(sample_item()).unwrap();
    assert_eq!(json["id"], 42);
    assert_eq!(json["title"], "Buy milk");
    assert_eq!(json["description"], "2 liters");
    assert_eq!(json["priority"], "MEDIUM");

    let decoded: Item = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, sample_item());
}

#[test]
fn draft_without_id_deserializes_with_none() {
    let draft: ItemDraft = serde_json::from_value(serde_json::json!({
        "title": "a",
        "description": "b",
        "priority": "HIGH"
    }))
    .unwrap();
    assert_eq!(draft.id, None);
    assert_eq!(draft.priority, Priority::High);
}

#[test]
fn unknown_priority_is_rejected_on_the_wire() {
    let result = serde_json::from_value::<Item>(serde_json::json!({
        "id": 1,
        "title": "a",
        "description": "b",
        "priority": "URGENT"
    }));
    assert!(result.is_err());
}

#[test]
fn to_draft_keeps_id_hint_and_fields() {
    let item = sample_item();
    let draft = item.to_draft();
    assert_eq!(draft.id, Some(42));
    assert_eq!(draft.clone().into_item(42), item);
}

#[test]
fn validate_reports_first_empty_field() {
    let draft = ItemDraft::new("", "", Priority::Low);
    assert_eq!(draft.validate(), Err(ItemValidationError::EmptyTitle));

    let draft = ItemDraft::new("t", "", Priority::Low);
    assert_eq!(draft.validate(), Err(ItemValidationError::EmptyDescription));

    let draft = ItemDraft::new("\t", " ", Priority::Low);
    assert_eq!(draft.validate(), Ok(()));
}

#[test]
fn db_names_match_wire_names() {
    for priority in Priority::ALL {
        let wire = serde_json::to_value(priority).unwrap();
        assert_eq!(wire, priority.as_db_str());
        assert_eq!(Priority::from_db_str(priority.as_db_str()), Some(priority));
    }
    assert_eq!(Priority::from_db_str("high"), None);
}
