use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use super::shape::{MemberShape, Shape, ShapeKind};
use super::shape_id::ShapeId;
use crate::errors::ModelError;

/// Namespace whose shapes are implicitly available to every model
pub const PRELUDE_NAMESPACE: &str = "smithy.api";

const PRELUDE_SHAPES: &[(&str, ShapeKind)] = &[
    ("Blob", ShapeKind::Blob),
    ("Boolean", ShapeKind::Boolean),
    ("String", ShapeKind::String),
    ("Byte", ShapeKind::Byte),
    ("Short", ShapeKind::Short),
    ("Integer", ShapeKind::Integer),
    ("Long", ShapeKind::Long),
    ("Float", ShapeKind::Float),
    ("Double", ShapeKind::Double),
    ("BigInteger", ShapeKind::BigInteger),
    ("BigDecimal", ShapeKind::BigDecimal),
    ("Timestamp", ShapeKind::Timestamp),
    ("Document", ShapeKind::Document),
    ("PrimitiveBoolean", ShapeKind::Boolean),
    ("PrimitiveByte", ShapeKind::Byte),
    ("PrimitiveShort", ShapeKind::Short),
    ("PrimitiveInteger", ShapeKind::Integer),
    ("PrimitiveLong", ShapeKind::Long),
    ("PrimitiveFloat", ShapeKind::Float),
    ("PrimitiveDouble", ShapeKind::Double),
    ("Unit", ShapeKind::Structure),
];

fn prelude() -> &'static BTreeMap<ShapeId, Shape> {
    static PRELUDE: OnceLock<BTreeMap<ShapeId, Shape>> = OnceLock::new();
    PRELUDE.get_or_init(|| {
        PRELUDE_SHAPES
            .iter()
            .filter_map(|(name, kind)| {
                let id = ShapeId::parse(&format!("{}#{}", PRELUDE_NAMESPACE, name)).ok()?;
                Some((id.clone(), Shape::new(id, *kind)))
            })
            .collect()
    })
}

/// Immutable shape graph for one model version
///
/// Only top-level shapes are stored; members live inside their container and
/// are reachable through [`Model::get_member`]. Prelude shapes
/// (`smithy.api#String`, ...) resolve through [`Model::get`] but are not part
/// of [`Model::shapes`], so they never show up as differences.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    shapes: BTreeMap<ShapeId, Shape>,
}

impl Model {
    /// A model with no shapes
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> ModelBuilder {
        ModelBuilder::default()
    }

    /// Iterate the model's own top-level shapes in id order
    pub fn shapes(&self) -> impl Iterator<Item = (&ShapeId, &Shape)> {
        self.shapes.iter()
    }

    /// Ids of the model's own top-level shapes
    pub fn ids(&self) -> BTreeSet<&ShapeId> {
        self.shapes.keys().collect()
    }

    /// Resolve a top-level shape id, falling back to the prelude
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        if id.is_member() {
            return None;
        }
        self.shapes.get(id).or_else(|| prelude().get(id))
    }

    /// Resolve a member id (`ns#Shape$member`)
    pub fn get_member(&self, id: &ShapeId) -> Option<&MemberShape> {
        let name = id.member()?;
        self.get(&id.container())?.member(name)
    }

    /// True if `id` names a shape or member of this model (prelude included)
    pub fn contains(&self, id: &ShapeId) -> bool {
        if id.is_member() {
            self.get_member(id).is_some()
        } else {
            self.get(id).is_some()
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Validated construction of a [`Model`]
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    shapes: Vec<Shape>,
}

impl ModelBuilder {
    pub fn add_shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn add_shapes(mut self, shapes: impl IntoIterator<Item = Shape>) -> Self {
        self.shapes.extend(shapes);
        self
    }

    /// Assemble the model, rejecting anything the diff engine must be able to
    /// assume about its inputs
    ///
    /// # Errors
    ///
    /// - `MemberIdAtTopLevel`: a top-level shape has a member id
    /// - `DuplicateShape`: two shapes share an id
    /// - `InvalidMember`: a top-level shape of kind `member`, members on a kind
    ///   that cannot carry them, a member id that does not belong to its
    ///   container, or a repeated member name
    /// - `UnresolvedTarget`: a member target is neither defined in this model
    ///   nor part of the prelude
    pub fn build(self) -> Result<Model, ModelError> {
        let mut shapes: BTreeMap<ShapeId, Shape> = BTreeMap::new();
        for shape in self.shapes {
            if shape.id().is_member() {
                return Err(ModelError::MemberIdAtTopLevel {
                    shape_id: shape.id().to_string(),
                });
            }
            if shape.kind() == ShapeKind::Member {
                return Err(ModelError::InvalidMember {
                    member_id: shape.id().to_string(),
                    reason: "member shapes cannot be top-level".to_string(),
                });
            }
            if shapes.contains_key(shape.id()) {
                return Err(ModelError::DuplicateShape {
                    shape_id: shape.id().to_string(),
                });
            }
            shapes.insert(shape.id().clone(), shape);
        }

        for shape in shapes.values() {
            check_members(shape)?;
        }

        let model = Model { shapes };
        for shape in model.shapes.values() {
            for member in shape.members() {
                if model.get(member.target()).is_none() {
                    return Err(ModelError::UnresolvedTarget {
                        member_id: member.id().to_string(),
                        target: member.target().to_string(),
                    });
                }
            }
        }
        Ok(model)
    }
}

fn check_members(shape: &Shape) -> Result<(), ModelError> {
    if shape.members().is_empty() {
        return Ok(());
    }
    if !shape.kind().has_members() {
        let first = &shape.members()[0];
        return Err(ModelError::InvalidMember {
            member_id: first.id().to_string(),
            reason: format!("{} shapes cannot have members", shape.kind()),
        });
    }

    let mut seen = BTreeSet::new();
    for member in shape.members() {
        if member.id().container() != *shape.id() {
            return Err(ModelError::InvalidMember {
                member_id: member.id().to_string(),
                reason: format!("member does not belong to {}", shape.id()),
            });
        }
        if !seen.insert(member.name()) {
            return Err(ModelError::InvalidMember {
                member_id: member.id().to_string(),
                reason: "duplicate member name".to_string(),
            });
        }
    }
    Ok(())
}
