//! Limn Core -- pure highlight-resolution model for the compositing pipeline.
//!
//! This crate contains everything about entity highlighting that can be
//! decided without touching a GPU: RGBA colors, read-only per-entity
//! snapshots, the per-frame feature configuration, the priority-ordered
//! highlight resolver, and the recursion guard that keeps the capture pass
//! from re-entering itself. The `limn-engine` crate wires these into a host
//! renderer's frame loop.
//!
//! # Quick Start
//!
//! ```
//! use limn_core::prelude::*;
//!
//! let mut snapshot = FeatureSnapshot::default();
//! snapshot.entity_highlight.styles.outline = true;
//!
//! let entity = EntityView::living(7, Hostility::Hostile);
//! let request = resolve(&entity, &snapshot, HighlightStyle::Outline)
//!     .expect("hostile living entity should match the generic rule");
//! assert_eq!(request.color, snapshot.entity_highlight.hostile);
//! ```

#![deny(unsafe_code)]

pub mod color;
pub mod config;
pub mod entity;
pub mod guard;
pub mod resolve;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::color::Color4;
    pub use crate::config::{
        EntityHighlight, FeatureSnapshot, FuseTimer, ItemHighlight, StorageHighlight, StyleSet,
    };
    pub use crate::entity::{EntityKind, EntityView, Hostility, StorageKind};
    pub use crate::guard::{RecursionGuard, ReentryToken};
    pub use crate::resolve::{resolve, resolve_all, rule_names, HighlightRequest, HighlightStyle};
}
