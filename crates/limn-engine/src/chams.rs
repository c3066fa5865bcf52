//! Through-wall rendering bracket.
//!
//! Chams draws a matched entity with a depth-bias override so extreme the
//! depth test effectively always passes, then restores default depth state
//! immediately after that one draw. The bracket is a pair of hooks around
//! a single entity draw; `engaged` makes the pair idempotent and keeps the
//! end side symmetric even if the feature snapshot changes mid-draw.

use limn_core::config::FeatureSnapshot;
use limn_core::entity::EntityView;
use limn_core::resolve::{resolve, HighlightStyle};

use crate::host::{DepthBias, HostRenderer};

/// Bias large enough to win the depth test against any scene geometry.
pub const THROUGH_WALL_BIAS: DepthBias = DepthBias {
    slope_scale: 1.0,
    units: -1_000_000.0,
};

/// The per-entity depth-bias bracket.
#[derive(Debug, Default)]
pub struct ChamsPass {
    engaged: bool,
}

impl ChamsPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-draw side of the bracket. Applies the through-wall bias when
    /// the entity resolves for the chams style. A second call before
    /// [`end`](Self::end) is a no-op.
    pub fn begin(
        &mut self,
        host: &mut dyn HostRenderer,
        entity: &EntityView,
        snapshot: &FeatureSnapshot,
    ) {
        if self.engaged {
            return;
        }
        if resolve(entity, snapshot, HighlightStyle::Chams).is_some() {
            host.set_depth_bias(THROUGH_WALL_BIAS);
            self.engaged = true;
        }
    }

    /// Post-draw side of the bracket. Restores default depth state if and
    /// only if [`begin`](Self::begin) engaged the bias; decided by the
    /// engaged flag, not by re-resolving the entity.
    pub fn end(&mut self, host: &mut dyn HostRenderer) {
        if self.engaged {
            host.clear_depth_bias();
            self.engaged = false;
        }
    }

    /// True between an engaging `begin` and its `end`.
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}
