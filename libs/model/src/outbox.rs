//! Outbox messages awaiting delivery to external consumers.

use chrono::{DateTime, Utc};
use ruby_id::{OutboxMessageId, Ulid};
use ruby_wire::{define_wire_enum, define_wire_object, WireValue};

define_wire_enum! {
    /// Delivery state of an outbox message.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum OutboxStatus {
        Pending,
        Processed,
        Failed,
    }
}

define_wire_object! {
    /// An integration event recorded in the same transaction as the change
    /// that produced it.
    #[derive(Debug, Clone)]
    pub struct OutboxMessage {
        pub id: OutboxMessageId,
        /// The event type (e.g., "case.opened").
        pub event_type: String,
        pub payload: WireValue,
        pub status: OutboxStatus,
        /// Ties the message to the request that caused it.
        pub correlation_id: Ulid,
        pub occurred_at: DateTime<Utc>,
        pub processed_at: Option<DateTime<Utc>>,
        pub error: Option<String>,
    }
}

impl OutboxMessage {
    /// Records a new pending message.
    pub fn pending(event_type: impl Into<String>, payload: WireValue, correlation_id: Ulid) -> Self {
        Self {
            id: OutboxMessageId::new(),
            event_type: event_type.into(),
            payload,
            status: OutboxStatus::Pending,
            correlation_id,
            occurred_at: Utc::now(),
            processed_at: None,
            error: None,
        }
    }

    /// Marks the message as delivered.
    pub fn mark_processed(&mut self, at: DateTime<Utc>) {
        self.status = OutboxStatus::Processed;
        self.processed_at = Some(at);
        self.error = None;
    }

    /// Marks the message as failed with a reason.
    pub fn mark_failed(&mut self, at: DateTime<Utc>, error: impl Into<String>) {
        self.status = OutboxStatus::Failed;
        self.processed_at = Some(at);
        self.error = Some(error.into());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ruby_id::CodecRegistry;
    use ruby_wire::{GraphSerializer, SchemaIntrospector};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_outbox_message_wire_shape() {
        let correlation_id = Ulid::from(42_u128);
        let mut message = OutboxMessage::pending("case.opened", json!({"case": 1}), correlation_id);
        let at = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        message.mark_failed(at, "consumer unavailable");

        let serializer = GraphSerializer::new(Arc::new(CodecRegistry::standard()));
        let value = serializer.to_value(&message);

        assert_eq!(value["id"], json!(message.id.encode()));
        assert_eq!(value["status"], json!("failed"));
        assert_eq!(value["correlation_id"], json!("0000000000000000000000001A"));
        assert_eq!(value["processed_at"], json!("2024-01-02T03:04:05.000Z"));
        assert_eq!(value["payload"], json!({"case": 1}));
        assert_eq!(value["error"], json!("consumer unavailable"));

        message.mark_processed(at);
        let value = serializer.to_value(&message);
        assert_eq!(value["status"], json!("processed"));
        assert_eq!(value["error"], json!(null));
    }

    #[test]
    fn test_outbox_message_schema() {
        let registry = CodecRegistry::standard();
        let mut introspector = SchemaIntrospector::new(&registry);
        introspector.document::<OutboxMessage>();
        let catalog = introspector.finish().unwrap();
        let schema = catalog.component("OutboxMessage").unwrap().to_json();

        assert_eq!(
            schema["properties"]["id"],
            json!({"type": "string", "format": "outbox_message_id"})
        );
        assert_eq!(
            schema["properties"]["correlation_id"],
            json!({"type": "string", "format": "ulid"})
        );
        assert_eq!(
            schema["properties"]["processed_at"],
            json!({"type": "string", "format": "date-time", "nullable": true})
        );
        assert_eq!(
            schema["properties"]["status"],
            json!({"$ref": "#/components/schemas/OutboxStatus"})
        );
        assert_eq!(
            catalog.component("OutboxStatus").unwrap().to_json(),
            json!({"type": "string", "enum": ["pending", "processed", "failed"]})
        );
    }
}
