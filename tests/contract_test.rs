// Contract Model Tests
// Tests for draft validation, cost coercion, and wire shapes

use portchain::model::{
    parse_cost, ContractDraft, ContractRecord, ContractStatus, DraftError,
};
use uuid::Uuid;

// ============================================================================
// COST COERCION
// ============================================================================

#[test]
fn test_cost_string_is_coerced_to_integer() {
    assert_eq!(parse_cost("100").unwrap(), 100);
}

#[test]
fn test_negative_cost_is_rejected_locally() {
    assert_eq!(parse_cost("-5"), Err(DraftError::NegativeCost(-5)));
}

#[test]
fn test_zero_cost_is_allowed() {
    assert_eq!(parse_cost("0").unwrap(), 0);
}

#[test]
fn test_non_numeric_cost_is_rejected() {
    assert!(matches!(parse_cost(""), Err(DraftError::CostNotAnInteger(_))));
    assert!(matches!(
        parse_cost("ten"),
        Err(DraftError::CostNotAnInteger(_))
    ));
}

// ============================================================================
// DRAFT VALIDATION
// ============================================================================

#[test]
fn test_draft_accepts_distinct_ports() {
    let draft = ContractDraft::new("ESLCG001", "NLRTM001", 100).unwrap();

    assert_eq!(draft.port_from(), "ESLCG001");
    assert_eq!(draft.port_to(), "NLRTM001");
    assert_eq!(draft.cost(), 100);
}

#[test]
fn test_draft_rejects_origin_as_destination() {
    let result = ContractDraft::new("ESLCG001", "ESLCG001", 100);

    assert_eq!(result, Err(DraftError::SamePort("ESLCG001".to_string())));
}

#[test]
fn test_draft_serializes_creation_shape() {
    let draft = ContractDraft::new("ESLCG001", "NLRTM001", 250).unwrap();

    let json = serde_json::to_value(&draft).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "port_from": "ESLCG001",
            "port_to": "NLRTM001",
            "cost": 250,
        })
    );
}

// ============================================================================
// RECORD WIRE SHAPE
// ============================================================================

#[test]
fn test_record_deserializes_node_wire_format() {
    let json = r#"{
        "uuid": "3b2a4a6e-9c1f-4f6a-8d2e-5b7c9e1f2a3b",
        "cost": 100,
        "timestamp": 1700000000,
        "to_address": "NLRTM001",
        "from_address": "ESLCG001",
        "is_done": false
    }"#;

    let record: ContractRecord = serde_json::from_str(json).unwrap();

    assert_eq!(
        record.uuid,
        Uuid::parse_str("3b2a4a6e-9c1f-4f6a-8d2e-5b7c9e1f2a3b").unwrap()
    );
    assert_eq!(record.from_address, "ESLCG001");
    assert_eq!(record.to_address, "NLRTM001");
    assert!(!record.is_done);
}

#[test]
fn test_record_status_follows_is_done() {
    let mut record = ContractRecord {
        uuid: Uuid::from_u128(1),
        from_address: "A".to_string(),
        to_address: "B".to_string(),
        cost: 10,
        timestamp: 1_700_000_000,
        is_done: false,
    };

    assert_eq!(record.status(), ContractStatus::Created);
    assert_eq!(record.status().to_string(), "created");

    record.is_done = true;
    assert_eq!(record.status(), ContractStatus::Settled);
    assert_eq!(record.status().to_string(), "settled");
}
