use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = MachineId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
    assert_eq!(id.to_string(), uuid.to_string());
}

#[test]
fn test_typed_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = ProductId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
    assert!(ProductId::from_str("invalid").is_err());
}

#[test]
fn test_typed_id_ordering_follows_uuid() {
    let low = MachineId::from_uuid(Uuid::from_u128(1));
    let high = MachineId::from_uuid(Uuid::from_u128(2));
    assert!(low < high);
}

#[test]
fn test_report_ids_are_time_ordered() {
    let first = ReportId::new();
    let second = ReportId::new();
    assert_ne!(first, second);
}

#[test]
fn test_typed_id_serializes_transparently() {
    let uuid = Uuid::from_u128(42);
    let json = serde_json::to_string(&TransactionId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));
}
