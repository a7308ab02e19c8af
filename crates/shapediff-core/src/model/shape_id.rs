use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ModelError;

/// Stable identity of a shape or member across model versions
///
/// Textual form is `namespace#Name` for shapes and `namespace#Name$member`
/// for members. Equality of ids is the only way two shapes from different
/// models are matched; there is no rename detection.
///
/// Ordering is lexicographic over (namespace, name, member), with a shape
/// sorting before all of its members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShapeId {
    namespace: String,
    name: String,
    member: Option<String>,
}

impl ShapeId {
    /// Parse and validate a shape id
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidShapeId` when the text is not of the form
    /// `namespace#Name[$member]` with identifier-safe characters.
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let invalid = |reason: &str| ModelError::InvalidShapeId {
            id: text.to_string(),
            reason: reason.to_string(),
        };

        let (namespace, rest) = text
            .split_once('#')
            .ok_or_else(|| invalid("missing `#` separator"))?;
        let (name, member) = match rest.split_once('$') {
            Some((name, member)) => (name, Some(member)),
            None => (rest, None),
        };

        if namespace.is_empty() {
            return Err(invalid("namespace is empty"));
        }
        if !namespace.split('.').all(is_identifier) {
            return Err(invalid("namespace segments must be identifiers"));
        }
        if !is_identifier(name) {
            return Err(invalid("shape name must be an identifier"));
        }
        if let Some(member) = member {
            if !is_identifier(member) {
                return Err(invalid("member name must be an identifier"));
            }
        }

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            member: member.map(str::to_string),
        })
    }

    /// Namespace part (`acme.weather` in `acme.weather#City`)
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Shape name part (`City` in `acme.weather#City$name`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member name, if this id refers to a member
    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    pub fn is_member(&self) -> bool {
        self.member.is_some()
    }

    /// The id of the containing shape (identity for non-member ids)
    pub fn container(&self) -> ShapeId {
        Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: None,
        }
    }

    /// Build the id of a member of this shape
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidShapeId` if this id is already a member id
    /// or `member` is not a valid identifier.
    pub fn with_member(&self, member: &str) -> Result<ShapeId, ModelError> {
        if self.is_member() {
            return Err(ModelError::InvalidShapeId {
                id: format!("{}${}", self, member),
                reason: "members cannot be nested".to_string(),
            });
        }
        if !is_identifier(member) {
            return Err(ModelError::InvalidShapeId {
                id: format!("{}${}", self, member),
                reason: "member name must be an identifier".to_string(),
            });
        }
        Ok(Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: Some(member.to_string()),
        })
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.namespace, self.name)?;
        if let Some(member) = &self.member {
            write!(f, "${}", member)?;
        }
        Ok(())
    }
}

impl FromStr for ShapeId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShapeId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ShapeId> for String {
    fn from(id: ShapeId) -> Self {
        id.to_string()
    }
}
