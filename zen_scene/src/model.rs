// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute storage backing each entity.
//!
//! An entity reads all of its properties through a [`Model`]. The scene only
//! requires numeric `X`, `Y`, `Width` and `Height` attributes; everything else
//! is optional. [`AttributeMap`] is the stock implementation.

use alloc::string::String;
use core::fmt;
use core::fmt::Debug;

use hashbrown::HashMap;
use peniko::Color;

use crate::asset::AssetId;

/// Name of an entity attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Horizontal position relative to the parent.
    X,
    /// Vertical position relative to the parent.
    Y,
    /// Advisory depth. Not used for ordering.
    Z,
    /// Horizontal extent.
    Width,
    /// Vertical extent.
    Height,
    /// Whether the entity (and its subtree) is drawn.
    Visible,
    /// Flat fill color.
    Color,
    /// Image asset drawn over the entity's box.
    Texture,
    /// Free-form type tag chosen by the application.
    Kind,
    /// Application-defined attribute.
    Custom(String),
}

impl Attribute {
    /// Whether a change to this attribute alters the entity's own rendering.
    pub fn marks_self(&self) -> bool {
        matches!(self, Self::Width | Self::Height | Self::Color | Self::Texture)
    }

    /// Whether a change to this attribute moves the entity inside its parent.
    pub fn marks_parent(&self) -> bool {
        matches!(self, Self::X | Self::Y)
    }

    /// Whether the attribute must hold a [`Value::Number`].
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::X | Self::Y | Self::Z | Self::Width | Self::Height
        )
    }

    pub(crate) fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Visible => matches!(value, Value::Bool(_)),
            Self::Color => matches!(value, Value::Color(_)),
            Self::Texture => matches!(value, Value::Texture(_)),
            Self::Kind => matches!(value, Value::Text(_)),
            Self::Custom(_) => true,
            _ => self.is_numeric() && matches!(value, Value::Number(_)),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
            Self::Z => f.write_str("z"),
            Self::Width => f.write_str("width"),
            Self::Height => f.write_str("height"),
            Self::Visible => f.write_str("visible"),
            Self::Color => f.write_str("color"),
            Self::Texture => f.write_str("texture"),
            Self::Kind => f.write_str("kind"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// Value stored under an [`Attribute`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Geometry and other scalar attributes.
    Number(f64),
    /// Flags such as visibility.
    Bool(bool),
    /// A flat fill color.
    Color(Color),
    /// Reference to an image asset owned elsewhere.
    Texture(AssetId),
    /// Text, e.g. the entity kind.
    Text(String),
}

impl Value {
    /// The number, if this is a [`Value::Number`].
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The flag, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The color, if this is a [`Value::Color`].
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// The asset id, if this is a [`Value::Texture`].
    pub fn as_texture(&self) -> Option<AssetId> {
        match self {
            Self::Texture(id) => Some(*id),
            _ => None,
        }
    }

    /// The text, if this is a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Named attribute storage for one entity.
///
/// Implementations only store values. Dirty tracking, region updates and
/// change notification are driven by the [`Scene`](crate::Scene) that owns
/// the entity, so mutating a model directly bypasses all of them.
pub trait Model: Debug {
    /// Current value of `attribute`, if set.
    fn attribute(&self, attribute: &Attribute) -> Option<&Value>;

    /// Store `value` under `attribute`, returning the previous value.
    fn set_attribute(&mut self, attribute: Attribute, value: Value) -> Option<Value>;

    /// Remove `attribute`, returning the previous value.
    fn remove_attribute(&mut self, attribute: &Attribute) -> Option<Value>;
}

/// [`Model`] backed by a hash map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeMap {
    values: HashMap<Attribute, Value>,
}

impl AttributeMap {
    /// An empty map. Not a valid entity model until geometry is set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A map with the attributes every default entity starts with:
    /// zero position, depth and size, and `visible = true`.
    pub fn with_defaults() -> Self {
        Self::new()
            .with(Attribute::X, Value::Number(0.0))
            .with(Attribute::Y, Value::Number(0.0))
            .with(Attribute::Z, Value::Number(0.0))
            .with(Attribute::Width, Value::Number(0.0))
            .with(Attribute::Height, Value::Number(0.0))
            .with(Attribute::Visible, Value::Bool(true))
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, attribute: Attribute, value: Value) -> Self {
        self.values.insert(attribute, value);
        self
    }

    /// Number of stored attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over stored attributes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Attribute, &Value)> + '_ {
        self.values.iter()
    }
}

impl Model for AttributeMap {
    fn attribute(&self, attribute: &Attribute) -> Option<&Value> {
        self.values.get(attribute)
    }

    fn set_attribute(&mut self, attribute: Attribute, value: Value) -> Option<Value> {
        self.values.insert(attribute, value)
    }

    fn remove_attribute(&mut self, attribute: &Attribute) -> Option<Value> {
        self.values.remove(attribute)
    }
}

/// First geometry attribute `model` lacks as a number, if any.
pub(crate) fn missing_geometry(model: &dyn Model) -> Option<Attribute> {
    [
        Attribute::X,
        Attribute::Y,
        Attribute::Width,
        Attribute::Height,
    ]
    .into_iter()
    .find(|a| model.attribute(a).and_then(Value::as_number).is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_geometry() {
        let map = AttributeMap::with_defaults();
        assert_eq!(missing_geometry(&map), None);
        assert_eq!(
            map.attribute(&Attribute::Visible),
            Some(&Value::Bool(true))
        );
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn missing_geometry_names_first_gap() {
        let map = AttributeMap::new()
            .with(Attribute::X, Value::Number(1.0))
            .with(Attribute::Y, Value::Text("nope".into()));
        assert_eq!(missing_geometry(&map), Some(Attribute::Y));
    }

    #[test]
    fn set_attribute_returns_previous() {
        let mut map = AttributeMap::with_defaults();
        let old = map.set_attribute(Attribute::Width, Value::Number(5.0));
        assert_eq!(old, Some(Value::Number(0.0)));
        assert_eq!(map.remove_attribute(&Attribute::Width), Some(Value::Number(5.0)));
        assert_eq!(map.attribute(&Attribute::Width), None);
    }

    #[test]
    fn attribute_value_kinds() {
        assert!(Attribute::X.accepts(&Value::Number(1.0)));
        assert!(!Attribute::X.accepts(&Value::Bool(true)));
        assert!(Attribute::Kind.accepts(&Value::Text("wall".into())));
        assert!(Attribute::Custom("hp".into()).accepts(&Value::Bool(false)));
        assert!(Attribute::Width.is_numeric() && !Attribute::Visible.is_numeric());
        assert!(!Attribute::Width.accepts(&Value::Text("wide".into())));
        assert!(Attribute::Color.marks_self());
        assert!(Attribute::Y.marks_parent());
        assert!(!Attribute::Z.marks_self() && !Attribute::Z.marks_parent());
    }
}
