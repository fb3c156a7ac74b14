use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Collaborator row joined with the target user's profile where resolved.
/// `user_id` is null while the invitation is pending.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Collaborator {
    pub id: Uuid,
    pub list_id: Uuid,
    pub user_id: Option<Uuid>,
    pub invited_email: String,
    pub role: String,
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorRole {
    Viewer,
    Editor,
}

impl CollaboratorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollaboratorRole::Viewer => "viewer",
            CollaboratorRole::Editor => "editor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "viewer" => Some(CollaboratorRole::Viewer),
            "editor" => Some(CollaboratorRole::Editor),
            _ => None,
        }
    }
}

/// The requesting user's relationship to a list, resolved once per request
/// before any mutation. The owner is never a collaborator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAccess {
    Owner,
    Collaborator(CollaboratorRole),
}

impl ListAccess {
    /// Owner or editor collaborator may mutate the list and its items
    pub fn can_edit(&self) -> bool {
        matches!(
            self,
            ListAccess::Owner | ListAccess::Collaborator(CollaboratorRole::Editor)
        )
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, ListAccess::Owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_roundtrip() {
        assert_eq!(CollaboratorRole::parse("viewer"), Some(CollaboratorRole::Viewer));
        assert_eq!(CollaboratorRole::parse("editor"), Some(CollaboratorRole::Editor));
        assert_eq!(CollaboratorRole::parse("owner"), None);
    }

    #[test]
    fn edit_rights_by_role() {
        assert!(ListAccess::Owner.can_edit());
        assert!(ListAccess::Collaborator(CollaboratorRole::Editor).can_edit());
        assert!(!ListAccess::Collaborator(CollaboratorRole::Viewer).can_edit());
    }
}
