//! Collision layers for visibility and projectile queries.

use serde::{Deserialize, Serialize};

/// A set of collision layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LayerMask(pub u8);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    /// Solid level geometry.
    pub const ENVIRONMENT: LayerMask = LayerMask(1 << 0);
    /// Water surfaces. Walk-blocking but transparent.
    pub const WATER: LayerMask = LayerMask(1 << 1);
    pub const ALL: LayerMask = LayerMask(u8::MAX);

    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn union(self, other: LayerMask) -> LayerMask {
        LayerMask(self.0 | other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection() {
        assert!(LayerMask::ENVIRONMENT.intersects(LayerMask::ALL));
        assert!(!LayerMask::ENVIRONMENT.intersects(LayerMask::WATER));
        assert!(!LayerMask::NONE.intersects(LayerMask::ALL));
        let both = LayerMask::ENVIRONMENT.union(LayerMask::WATER);
        assert!(both.intersects(LayerMask::WATER));
    }
}
