use serde::{Deserialize, Serialize};

use crate::database::Tournament;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TournamentKey {
    pub id: String,
}

/// Row change on the `tournaments` table, shaped like
/// `{"eventType": "UPDATE", "new": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "eventType", rename_all = "UPPERCASE")]
pub enum TournamentChange {
    Insert { new: Tournament },
    Update { new: Tournament },
    Delete { old: TournamentKey },
}

impl TournamentChange {
    pub fn deleted(id: impl Into<String>) -> Self {
        Self::Delete {
            old: TournamentKey { id: id.into() },
        }
    }

    pub fn tournament_id(&self) -> &str {
        match self {
            Self::Insert { new } | Self::Update { new } => &new.id,
            Self::Delete { old } => &old.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "INSERT",
            Self::Update { .. } => "UPDATE",
            Self::Delete { .. } => "DELETE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_wire_shape() {
        let json = serde_json::to_value(TournamentChange::deleted("t-1")).unwrap();
        assert_eq!(json, serde_json::json!({"eventType": "DELETE", "old": {"id": "t-1"}}));
    }

    #[test]
    fn test_parse_delete() {
        let change: TournamentChange =
            serde_json::from_str(r#"{"eventType":"DELETE","old":{"id":"t-9"}}"#).unwrap();
        assert_eq!(change.tournament_id(), "t-9");
        assert_eq!(change.kind(), "DELETE");
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let parsed = serde_json::from_str::<TournamentChange>(r#"{"eventType":"TRUNCATE"}"#);
        assert!(parsed.is_err());
    }
}
