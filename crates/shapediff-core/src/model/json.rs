//! JSON AST codec for shape graphs.
//!
//! Decoding is written out field by field rather than derived so that every
//! accepted document shape is visible here and every rejection carries a
//! precise message.
//!
//! ```json
//! {
//!   "smithy": "2.0",
//!   "shapes": {
//!     "acme#City": {
//!       "type": "structure",
//!       "members": { "name": { "target": "smithy.api#String" } },
//!       "traits": { "smithy.api#documentation": "A city" }
//!     },
//!     "acme#Names": { "type": "list", "member": { "target": "smithy.api#String" } }
//!   }
//! }
//! ```
//!
//! Member-bearing shapes may use `members`; lists use `member`, maps use
//! `key`/`value`, operations may use `input`/`output`, and resources may name
//! their lifecycle operations (`create`, `read`, ...). Services, resources and
//! operations may list bound `operations`, `resources`,
//! `collectionOperations` or `errors`; each entry becomes a member named after
//! the bound shape. Member order in `members` is preserved.

#![allow(clippy::result_large_err)]

use serde_json::{Map, Value};

use super::graph::Model;
use super::shape::{MemberShape, Shape, ShapeKind, TraitMap};
use super::shape_id::ShapeId;
use crate::errors::{ExError, ExErrorKind, Result};

/// Model format version written by [`encode_model`]
pub const FORMAT_VERSION: &str = "2.0";

/// Keys that introduce a single named member
const SINGLE_MEMBER_KEYS: &[&str] = &[
    "member", "key", "value", "input", "output", "create", "put", "read", "update", "delete",
    "list",
];

/// Keys that bind a list of shapes as members
const BINDING_KEYS: &[&str] = &["operations", "resources", "collectionOperations", "errors"];

fn invalid(message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidModel)
        .with_op("decode_model")
        .with_message(message)
}

/// Decode a JSON AST document into a validated [`Model`]
///
/// # Errors
///
/// - `InvalidModel`: the document does not follow the AST layout, or names
///   an unknown shape type
/// - `InvalidShapeId`, `DuplicateShape`, `InvalidMember` or
///   `UnresolvedTarget`: the decoded graph fails model validation
pub fn decode_model(doc: &Value) -> Result<Model> {
    let root = doc
        .as_object()
        .ok_or_else(|| invalid("model document must be a JSON object"))?;

    match root.get("smithy") {
        Some(Value::String(v)) if v.starts_with('1') || v.starts_with('2') => {}
        Some(other) => return Err(invalid(format!("unsupported `smithy` version: {}", other))),
        None => return Err(invalid("required field `smithy` is absent")),
    }

    let mut builder = Model::builder();
    if let Some(shapes) = root.get("shapes") {
        let shapes = shapes
            .as_object()
            .ok_or_else(|| invalid("`shapes` must be an object"))?;
        for (id_text, body) in shapes {
            builder = builder.add_shape(decode_shape(id_text, body)?);
        }
    }

    Ok(builder.build()?)
}

/// Parse `text` as JSON and decode it
///
/// # Errors
///
/// `Serialization` if the text is not JSON, otherwise as [`decode_model`].
pub fn decode_model_str(text: &str) -> Result<Model> {
    let doc: Value = serde_json::from_str(text)
        .map_err(|e| ExError::from(e).with_op("decode_model_str"))?;
    decode_model(&doc)
}

fn decode_shape(id_text: &str, body: &Value) -> Result<Shape> {
    let id = ShapeId::parse(id_text)?;
    let obj = body
        .as_object()
        .ok_or_else(|| invalid(format!("shape `{}` must be an object", id_text)))?;

    let kind_name = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(format!("shape `{}` has no string `type`", id_text)))?;
    let kind = ShapeKind::from_name(kind_name)
        .filter(|k| *k != ShapeKind::Member)
        .ok_or_else(|| invalid(format!("shape `{}` has unknown type `{}`", id_text, kind_name)))?;

    let mut shape = Shape::new(id.clone(), kind);
    for (trait_id, value) in decode_traits(obj, id_text)? {
        shape = shape.with_trait(trait_id, value);
    }

    if let Some(members) = obj.get("members") {
        let members = members
            .as_object()
            .ok_or_else(|| invalid(format!("`members` of `{}` must be an object", id_text)))?;
        for (name, member) in members {
            shape = shape.with_member(decode_member(&id, name, member)?);
        }
    }

    for key in SINGLE_MEMBER_KEYS {
        if let Some(member) = obj.get(*key) {
            shape = shape.with_member(decode_member(&id, key, member)?);
        }
    }

    for key in BINDING_KEYS {
        if let Some(bindings) = obj.get(*key) {
            let bindings = bindings
                .as_array()
                .ok_or_else(|| invalid(format!("`{}` of `{}` must be an array", key, id_text)))?;
            for binding in bindings {
                let target = decode_target(binding, id_text)?;
                let name = target.name().to_string();
                shape = shape.with_member(MemberShape::new(&id, &name, target)?);
            }
        }
    }

    Ok(shape)
}

fn decode_member(container: &ShapeId, name: &str, body: &Value) -> Result<MemberShape> {
    let label = format!("{}${}", container, name);
    let target = decode_target(body, &label)?;
    let mut member = MemberShape::new(container, name, target)?;
    if let Some(obj) = body.as_object() {
        for (trait_id, value) in decode_traits(obj, &label)? {
            member = member.with_trait(trait_id, value);
        }
    }
    Ok(member)
}

fn decode_target(body: &Value, label: &str) -> Result<ShapeId> {
    let target = body
        .as_object()
        .and_then(|o| o.get("target"))
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(format!("`{}` needs a string `target`", label)))?;
    Ok(ShapeId::parse(target)?)
}

fn decode_traits(obj: &Map<String, Value>, label: &str) -> Result<TraitMap> {
    match obj.get("traits") {
        None => Ok(TraitMap::new()),
        Some(Value::Object(traits)) => {
            let mut out = TraitMap::new();
            for (trait_id, value) in traits {
                // Trait ids are shape ids; validate the text but keep it as given
                ShapeId::parse(trait_id)?;
                out.insert(trait_id.clone(), value.clone());
            }
            Ok(out)
        }
        Some(_) => Err(invalid(format!("`traits` of `{}` must be an object", label))),
    }
}

/// Encode a model as a JSON AST document
///
/// Lists and maps use their dedicated member keys; every other member-bearing
/// shape uses `members`, so `decode_model(&encode_model(m))` reproduces `m`.
pub fn encode_model(model: &Model) -> Value {
    let mut shapes = Map::new();
    for (id, shape) in model.shapes() {
        shapes.insert(id.to_string(), encode_shape(shape));
    }

    let mut root = Map::new();
    root.insert("smithy".to_string(), Value::String(FORMAT_VERSION.to_string()));
    root.insert("shapes".to_string(), Value::Object(shapes));
    Value::Object(root)
}

fn encode_shape(shape: &Shape) -> Value {
    let mut obj = Map::new();
    obj.insert(
        "type".to_string(),
        Value::String(shape.kind().as_str().to_string()),
    );

    let dedicated_keys = match shape.kind() {
        ShapeKind::List => &["member"][..],
        ShapeKind::Map => &["key", "value"][..],
        _ => &[][..],
    };

    let mut members = Map::new();
    for member in shape.members() {
        if dedicated_keys.contains(&member.name()) {
            obj.insert(member.name().to_string(), encode_member(member));
        } else {
            members.insert(member.name().to_string(), encode_member(member));
        }
    }
    if !members.is_empty() {
        obj.insert("members".to_string(), Value::Object(members));
    }
    if !shape.traits().is_empty() {
        obj.insert("traits".to_string(), encode_traits(shape.traits()));
    }
    Value::Object(obj)
}

fn encode_member(member: &MemberShape) -> Value {
    let mut obj = Map::new();
    obj.insert(
        "target".to_string(),
        Value::String(member.target().to_string()),
    );
    if !member.traits().is_empty() {
        obj.insert("traits".to_string(), encode_traits(member.traits()));
    }
    Value::Object(obj)
}

fn encode_traits(traits: &TraitMap) -> Value {
    Value::Object(
        traits
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    )
}
