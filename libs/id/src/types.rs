//! Typed ID definitions for all ruby entities.
//!
//! Each ID type is bound to one [`crate::IdKind`].
//! IDs are ULID-based for sortability and uniqueness.

use crate::define_id;

// =============================================================================
// Accounts
// =============================================================================

define_id!(UserId, User);

// =============================================================================
// Inventory
// =============================================================================

define_id!(ItemId, Item);
define_id!(ItemTypeId, ItemType);

// =============================================================================
// Cases
// =============================================================================

define_id!(CaseId, Case);
define_id!(CaseTypeId, CaseType);

// =============================================================================
// Messaging
// =============================================================================

define_id!(OutboxMessageId, OutboxMessage);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodeError, IdKind, Identifier, Ulid};

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::new();
        let s = id.to_string();
        let parsed: UserId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_user_id_has_no_prefix() {
        let id = UserId::new();
        let s = id.to_string();
        assert_eq!(s.len(), 26);
        assert_eq!(s, id.encode());
    }

    #[test]
    fn test_case_id_invalid_length() {
        let result: Result<CaseId, _> = "case_01HV4Z2WQXKJNM8GPQY6VBKC3D".parse();
        assert!(matches!(
            result.unwrap_err(),
            DecodeError::InvalidLength { actual: 31, .. }
        ));
    }

    #[test]
    fn test_case_id_empty() {
        let result: Result<CaseId, _> = "".parse();
        assert!(result.unwrap_err().is_length_error());
    }

    #[test]
    fn test_item_id_invalid_alphabet() {
        let result: Result<ItemId, _> = "01HV4Z2WQXKJNM8GPQY6VBKC3!".parse();
        assert!(matches!(
            result.unwrap_err(),
            DecodeError::InvalidAlphabet {
                position: 25,
                character: '!'
            }
        ));
    }

    #[test]
    fn test_from_raw_preserves_value() {
        let raw = 0x0191_2345_6789_ABCD_EF01_2345_6789_ABCD_u128;
        let id = ItemTypeId::from_raw(raw);
        assert_eq!(id.to_raw(), raw);
        assert_eq!(ItemTypeId::decode(&id.encode()).unwrap(), id);
    }

    #[test]
    fn test_user_id_json_roundtrip() {
        let id = UserId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.encode()));
        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_json_decode_error_names_kind() {
        let err = serde_json::from_str::<OutboxMessageId>("\"short\"").unwrap_err();
        assert!(err.to_string().contains("invalid outbox_message_id"));
    }

    #[test]
    fn test_case_id_sortable() {
        let id1 = CaseId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = CaseId::new();
        assert!(id1 < id2);
        assert!(id1.encode() < id2.encode());
        assert!(id1.timestamp_ms() < id2.timestamp_ms());
    }

    #[test]
    fn test_equal_payloads_stay_distinct_types() {
        let raw = Ulid::new();
        let user = UserId::from_ulid(raw);
        let item = ItemId::from_ulid(raw);
        // Same payload and same text, but the kinds differ. Cross-kind
        // assignment and comparison are compile_fail doctests in lib.rs.
        assert_eq!(user.encode(), item.encode());
        assert_ne!(UserId::KIND, ItemId::KIND);
        assert_eq!(<UserId as Identifier>::KIND, IdKind::User);
        assert_eq!(<ItemId as Identifier>::KIND, IdKind::Item);
    }

    #[test]
    fn test_all_kinds_bound_once() {
        let kinds = vec![
            UserId::KIND,
            ItemId::KIND,
            ItemTypeId::KIND,
            CaseId::KIND,
            CaseTypeId::KIND,
            OutboxMessageId::KIND,
            <Ulid as Identifier>::KIND,
        ];

        let unique: std::collections::HashSet<_> = kinds.iter().collect();
        assert_eq!(kinds.len(), unique.len(), "Duplicate ID kinds found!");
        assert_eq!(kinds.len(), IdKind::COUNT);
    }
}
