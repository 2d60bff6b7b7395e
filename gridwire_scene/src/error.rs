// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use crate::types::EntityId;

/// Errors from scene mutations that take caller-provided ids or names.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The id refers to a destroyed entity.
    #[error("entity {0:?} is not alive")]
    StaleEntity(EntityId),
    /// The operation needs a node, but the entity is something else.
    #[error("entity {0:?} is not a node")]
    NotANode(EntityId),
    /// The node's template has no connector with this name.
    #[error("node {node:?} has no connector named {name:?}")]
    UnknownConnector {
        /// The node.
        node: EntityId,
        /// The requested connector name.
        name: String,
    },
}
