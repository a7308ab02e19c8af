use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::shape_id::ShapeId;
use crate::errors::ModelError;

/// Trait values keyed by absolute trait id (e.g. `smithy.api#required`)
///
/// Values are opaque JSON documents; the engine only compares them
/// structurally unless a per-trait comparator is registered.
pub type TraitMap = BTreeMap<String, Value>;

/// Compact JSON text of a trait value with object keys sorted at every depth
///
/// Values that compare equal render identically, whatever order their keys
/// were inserted in.
pub fn canonical_json(value: &Value) -> String {
    canonicalize(value).to_string()
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// The type of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    // Simple types
    Blob,
    Boolean,
    String,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    Timestamp,
    Document,
    // Enumerations
    Enum,
    IntEnum,
    // Aggregates
    List,
    Map,
    Structure,
    Union,
    // Service graph
    Operation,
    Resource,
    Service,
    Member,
}

impl ShapeKind {
    const ALL: [ShapeKind; 23] = [
        ShapeKind::Blob,
        ShapeKind::Boolean,
        ShapeKind::String,
        ShapeKind::Byte,
        ShapeKind::Short,
        ShapeKind::Integer,
        ShapeKind::Long,
        ShapeKind::Float,
        ShapeKind::Double,
        ShapeKind::BigInteger,
        ShapeKind::BigDecimal,
        ShapeKind::Timestamp,
        ShapeKind::Document,
        ShapeKind::Enum,
        ShapeKind::IntEnum,
        ShapeKind::List,
        ShapeKind::Map,
        ShapeKind::Structure,
        ShapeKind::Union,
        ShapeKind::Operation,
        ShapeKind::Resource,
        ShapeKind::Service,
        ShapeKind::Member,
    ];

    /// Name used in model documents and event messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Blob => "blob",
            ShapeKind::Boolean => "boolean",
            ShapeKind::String => "string",
            ShapeKind::Byte => "byte",
            ShapeKind::Short => "short",
            ShapeKind::Integer => "integer",
            ShapeKind::Long => "long",
            ShapeKind::Float => "float",
            ShapeKind::Double => "double",
            ShapeKind::BigInteger => "bigInteger",
            ShapeKind::BigDecimal => "bigDecimal",
            ShapeKind::Timestamp => "timestamp",
            ShapeKind::Document => "document",
            ShapeKind::Enum => "enum",
            ShapeKind::IntEnum => "intEnum",
            ShapeKind::List => "list",
            ShapeKind::Map => "map",
            ShapeKind::Structure => "structure",
            ShapeKind::Union => "union",
            ShapeKind::Operation => "operation",
            ShapeKind::Resource => "resource",
            ShapeKind::Service => "service",
            ShapeKind::Member => "member",
        }
    }

    /// Inverse of [`ShapeKind::as_str`]
    pub fn from_name(name: &str) -> Option<ShapeKind> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }

    /// Whether shapes of this kind may carry members
    pub fn has_members(&self) -> bool {
        matches!(
            self,
            ShapeKind::Enum
                | ShapeKind::IntEnum
                | ShapeKind::List
                | ShapeKind::Map
                | ShapeKind::Structure
                | ShapeKind::Union
                | ShapeKind::Operation
                | ShapeKind::Resource
                | ShapeKind::Service
        )
    }

    /// Aggregates whose member order is observable on the wire
    pub fn has_ordered_members(&self) -> bool {
        matches!(self, ShapeKind::Structure | ShapeKind::Union)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed field of an aggregate, operation or service shape
#[derive(Debug, Clone, PartialEq)]
pub struct MemberShape {
    id: ShapeId,
    target: ShapeId,
    traits: TraitMap,
}

impl MemberShape {
    /// Create member `name` of `container` pointing at `target`
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidShapeId` if `container` is itself a member
    /// id or `name` is not an identifier, and `ModelError::InvalidMember` if
    /// `target` is a member id.
    pub fn new(container: &ShapeId, name: &str, target: ShapeId) -> Result<Self, ModelError> {
        let id = container.with_member(name)?;
        if target.is_member() {
            return Err(ModelError::InvalidMember {
                member_id: id.to_string(),
                reason: format!("target {} is a member, not a shape", target),
            });
        }
        Ok(Self {
            id,
            target,
            traits: TraitMap::new(),
        })
    }

    /// Attach a trait (replacing any previous value for the same id)
    pub fn with_trait(mut self, trait_id: impl Into<String>, value: Value) -> Self {
        self.traits.insert(trait_id.into(), value);
        self
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    /// Member name; always present for ids built by [`MemberShape::new`]
    pub fn name(&self) -> &str {
        self.id.member().unwrap_or_default()
    }

    pub fn target(&self) -> &ShapeId {
        &self.target
    }

    pub fn traits(&self) -> &TraitMap {
        &self.traits
    }

    pub fn has_trait(&self, trait_id: &str) -> bool {
        self.traits.contains_key(trait_id)
    }
}

/// One node in the API model graph
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    traits: TraitMap,
    members: Vec<MemberShape>,
}

impl Shape {
    /// Create a shape with no traits and no members
    pub fn new(id: ShapeId, kind: ShapeKind) -> Self {
        Self {
            id,
            kind,
            traits: TraitMap::new(),
            members: Vec::new(),
        }
    }

    /// Attach a trait (replacing any previous value for the same id)
    pub fn with_trait(mut self, trait_id: impl Into<String>, value: Value) -> Self {
        self.traits.insert(trait_id.into(), value);
        self
    }

    /// Append a member; ordering is preserved
    ///
    /// Consistency with the container is checked by
    /// [`ModelBuilder::build`](super::ModelBuilder::build).
    pub fn with_member(mut self, member: MemberShape) -> Self {
        self.members.push(member);
        self
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn traits(&self) -> &TraitMap {
        &self.traits
    }

    pub fn has_trait(&self, trait_id: &str) -> bool {
        self.traits.contains_key(trait_id)
    }

    /// Members in declaration order
    pub fn members(&self) -> &[MemberShape] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&MemberShape> {
        self.members.iter().find(|m| m.name() == name)
    }
}
