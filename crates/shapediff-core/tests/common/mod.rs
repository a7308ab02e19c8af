use serde_json::{json, Value};
use shapediff_core::model::{decode_model, MemberShape, Model, Shape, ShapeId, ShapeKind};

/// Parse a shape id, panicking on malformed test input
#[allow(dead_code)]
pub fn id(text: &str) -> ShapeId {
    ShapeId::parse(text).unwrap()
}

/// A member-less shape of the given kind
#[allow(dead_code)]
pub fn simple(name: &str, kind: ShapeKind) -> Shape {
    Shape::new(id(name), kind)
}

/// A structure with `(member, target)` pairs in declaration order
#[allow(dead_code)]
pub fn structure(name: &str, members: &[(&str, &str)]) -> Shape {
    aggregate(ShapeKind::Structure, name, members)
}

/// Any member-bearing shape with `(member, target)` pairs in declaration order
#[allow(dead_code)]
pub fn aggregate(kind: ShapeKind, name: &str, members: &[(&str, &str)]) -> Shape {
    let container = id(name);
    members
        .iter()
        .fold(Shape::new(container.clone(), kind), |shape, (member, target)| {
            shape.with_member(MemberShape::new(&container, member, id(target)).unwrap())
        })
}

/// A structure whose single member carries the given traits
#[allow(dead_code)]
pub fn structure_with_member_traits(
    name: &str,
    member: &str,
    target: &str,
    traits: &[(&str, Value)],
) -> Shape {
    let container = id(name);
    let member = traits.iter().fold(
        MemberShape::new(&container, member, id(target)).unwrap(),
        |m, (trait_id, value)| m.with_trait(*trait_id, value.clone()),
    );
    Shape::new(container, ShapeKind::Structure).with_member(member)
}

/// An operation taking `input` and returning `smithy.api#Unit`
#[allow(dead_code)]
pub fn operation(name: &str, input: &str) -> Shape {
    let op = id(name);
    Shape::new(op.clone(), ShapeKind::Operation)
        .with_member(MemberShape::new(&op, "input", id(input)).unwrap())
        .with_member(MemberShape::new(&op, "output", id("smithy.api#Unit")).unwrap())
}

/// Build a validated model from shapes
#[allow(dead_code)]
pub fn model(shapes: Vec<Shape>) -> Model {
    Model::builder().add_shapes(shapes).build().unwrap()
}

/// A small but realistic service model in JSON AST form
#[allow(dead_code)]
pub fn weather_doc() -> Value {
    json!({
        "smithy": "2.0",
        "shapes": {
            "example.weather#Weather": {
                "type": "service",
                "version": "2006-03-01",
                "operations": [{ "target": "example.weather#GetCity" }]
            },
            "example.weather#GetCity": {
                "type": "operation",
                "input": { "target": "example.weather#GetCityInput" },
                "output": { "target": "example.weather#GetCityOutput" },
                "traits": { "smithy.api#readonly": {} }
            },
            "example.weather#GetCityInput": {
                "type": "structure",
                "members": {
                    "cityId": {
                        "target": "example.weather#CityId",
                        "traits": { "smithy.api#required": {} }
                    }
                }
            },
            "example.weather#GetCityOutput": {
                "type": "structure",
                "members": {
                    "name": {
                        "target": "smithy.api#String",
                        "traits": { "smithy.api#required": {} }
                    },
                    "coordinates": { "target": "example.weather#CityCoordinates" }
                }
            },
            "example.weather#CityId": {
                "type": "string",
                "traits": { "smithy.api#pattern": "^[A-Za-z0-9 ]+$" }
            },
            "example.weather#CityCoordinates": {
                "type": "structure",
                "members": {
                    "latitude": { "target": "smithy.api#Float" },
                    "longitude": { "target": "smithy.api#Float" }
                }
            }
        }
    })
}

#[allow(dead_code)]
pub fn weather_model() -> Model {
    decode_model(&weather_doc()).unwrap()
}
