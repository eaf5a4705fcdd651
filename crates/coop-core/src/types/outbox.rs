//! Event outbox rows.
//!
//! ```text
//! repository write ──► entity row ─┐
//!                                  ├── same transaction
//!                  outbox row ─────┘
//!                      │
//!                      ▼
//!        relay polls pending() ──► broker ──► mark_dispatched / mark_failed
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::topics::{EventTopics, TopicAction};

/// One recorded write and the topics it should be published on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub entity: String,
    pub action: TopicAction,
    pub entity_id: Uuid,
    pub topics: Vec<String>,
    /// JSON response projection of the entity at write time.
    pub payload: serde_json::Value,
    pub attempts: i64,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub attempted_at: Option<DateTime<Utc>>,
    pub dispatched_at: Option<DateTime<Utc>>,
}

impl OutboxEvent {
    /// A pending event for `entity`.
    pub fn record<E: EventTopics>(
        entity: &E,
        action: TopicAction,
        payload: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Self {
        OutboxEvent {
            id: Uuid::new_v4(),
            entity: E::ENTITY.to_string(),
            action,
            entity_id: entity.topic_id(),
            topics: entity.topics(action),
            payload,
            attempts: 0,
            last_error: None,
            created_at: now,
            attempted_at: None,
            dispatched_at: None,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.dispatched_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CurrencyRequest;

    #[test]
    fn test_record_copies_topics() {
        let currency = CurrencyRequest {
            name: "Japanese Yen".to_string(),
            country: "Japan".to_string(),
            currency_code: "JPY".to_string(),
            ..Default::default()
        }
        .into_entity(Utc::now());

        let event = OutboxEvent::record(
            &currency,
            TopicAction::Delete,
            serde_json::json!({"currency_code": "JPY"}),
            Utc::now(),
        );

        assert_eq!(event.entity, "currency");
        assert_eq!(event.entity_id, currency.record.id);
        assert_eq!(event.topics, currency.deleted());
        assert!(event.is_pending());
    }
}
