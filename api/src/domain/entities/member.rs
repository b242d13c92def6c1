//! Member domain entity
//!
//! A registered library patron who may borrow books.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Unique identifier for a member (e.g. "M1")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MemberId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A library member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.id, self.name)
    }
}

/// Data needed to register a member
#[derive(Debug, Clone, Deserialize)]
pub struct NewMember {
    pub id: MemberId,
    pub name: String,
}

impl NewMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: MemberId(id.into()),
            name: name.into(),
        }
    }

    /// Trim fields and reject a blank id
    pub fn normalized(self) -> Result<Self, DomainError> {
        let id = self.id.0.trim().to_string();
        if id.is_empty() {
            return Err(DomainError::Validation(
                "Member ID must not be empty".to_string(),
            ));
        }

        Ok(Self {
            id: MemberId(id),
            name: self.name.trim().to_string(),
        })
    }

    pub fn into_member(self) -> Member {
        Member {
            id: self.id,
            name: self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_trims_id_and_name() {
        let member = NewMember::new(" M7 ", "  Carol ").normalized().unwrap();
        assert_eq!(member.id, MemberId::from("M7"));
        assert_eq!(member.name, "Carol");
    }

    #[test]
    fn normalized_rejects_blank_id() {
        let result = NewMember::new("", "Carol").normalized();
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn member_display() {
        let member = NewMember::new("M1", "Alice").into_member();
        assert_eq!(member.to_string(), "M1 - Alice");
    }
}
