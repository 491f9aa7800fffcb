// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::asset::{AssetId, AssetKind};
use crate::model::Attribute;
use crate::types::EntityId;

/// Errors reported by [`Scene`](crate::Scene) mutations.
///
/// A failed mutation leaves the scene unchanged.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneError {
    /// A texture was assigned from an asset that is not an image.
    InvalidAssetType {
        /// The rejected asset.
        asset: AssetId,
        /// Its actual kind.
        found: AssetKind,
    },
    /// A model lacks a required numeric geometry attribute.
    MissingModel {
        /// The first missing attribute.
        attribute: Attribute,
    },
    /// A value of the wrong type was given for an attribute.
    InvalidAttributeValue {
        /// The attribute being set.
        attribute: Attribute,
    },
    /// The id does not refer to a live entity.
    StaleEntity(EntityId),
    /// Attaching `child` under `parent` would make an entity its own ancestor.
    WouldCycle {
        /// Requested parent.
        parent: EntityId,
        /// Requested child.
        child: EntityId,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAssetType { asset, found } => write!(
                f,
                "texture asset {asset:?} must be an image, found {found:?}"
            ),
            Self::MissingModel { attribute } => {
                write!(f, "entity model has no numeric `{attribute}` attribute")
            }
            Self::InvalidAttributeValue { attribute } => {
                write!(f, "value has the wrong type for attribute `{attribute}`")
            }
            Self::StaleEntity(id) => write!(f, "entity {id:?} does not exist"),
            Self::WouldCycle { parent, child } => write!(
                f,
                "adding {child:?} under {parent:?} would create a cycle"
            ),
        }
    }
}

impl core::error::Error for SceneError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_attribute() {
        let err = SceneError::MissingModel {
            attribute: Attribute::Width,
        };
        assert_eq!(err.to_string(), "entity model has no numeric `width` attribute");
    }
}
