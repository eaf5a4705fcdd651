//! # Event Topics
//!
//! Every write produces a deterministic list of topic keys. The keys are
//! used for cache invalidation and for pub/sub fan-out by whatever relays
//! the event outbox.
//!
//! ```text
//! holiday.create
//! holiday.create.<id>
//! holiday.create.branch.<branch_id>
//! holiday.create.organization.<organization_id>
//! ```
//!
//! Branch-scoped entities add their tenant scopes. Currency is global and
//! scopes by its ISO code instead (`currency.update.code.PHP`).

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The write that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicAction {
    Create,
    Update,
    Delete,
}

impl TopicAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TopicAction::Create => "create",
            TopicAction::Update => "update",
            TopicAction::Delete => "delete",
        }
    }

    /// Inverse of [`TopicAction::as_str`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "create" => Some(TopicAction::Create),
            "update" => Some(TopicAction::Update),
            "delete" => Some(TopicAction::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for TopicAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds topic keys for an entity.
///
/// Implementors supply the entity name, the row id and any scope suffixes;
/// the key template itself is shared.
pub trait EventTopics {
    /// Entity name used as the first topic segment.
    const ENTITY: &'static str;

    fn topic_id(&self) -> Uuid;

    /// Extra suffixes such as `branch.<id>`.
    fn topic_scopes(&self) -> Vec<String>;

    fn topics(&self, action: TopicAction) -> Vec<String> {
        let base = format!("{}.{}", Self::ENTITY, action);
        let scopes = self.topic_scopes();

        let mut keys = Vec::with_capacity(2 + scopes.len());
        keys.push(base.clone());
        keys.push(format!("{}.{}", base, self.topic_id()));
        keys.extend(scopes.into_iter().map(|scope| format!("{}.{}", base, scope)));
        keys
    }

    fn created(&self) -> Vec<String> {
        self.topics(TopicAction::Create)
    }

    fn updated(&self) -> Vec<String> {
        self.topics(TopicAction::Update)
    }

    fn deleted(&self) -> Vec<String> {
        self.topics(TopicAction::Delete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        id: Uuid,
    }

    impl EventTopics for Probe {
        const ENTITY: &'static str = "probe";

        fn topic_id(&self) -> Uuid {
            self.id
        }

        fn topic_scopes(&self) -> Vec<String> {
            vec!["branch.b1".to_string()]
        }
    }

    #[test]
    fn test_topic_template() {
        let probe = Probe { id: Uuid::nil() };
        assert_eq!(
            probe.deleted(),
            vec![
                "probe.delete".to_string(),
                format!("probe.delete.{}", Uuid::nil()),
                "probe.delete.branch.b1".to_string(),
            ]
        );
        assert_eq!(probe.created()[0], "probe.create");
        assert_eq!(probe.updated()[0], "probe.update");
    }

    #[test]
    fn test_action_serializes_lowercase() {
        let json = serde_json::to_string(&TopicAction::Update).unwrap();
        assert_eq!(json, "\"update\"");
    }
}
