//! Pairwise entity collision checks.
//!
//! Every check is a plain AABB test on the entities' current bounds; no
//! broad phase. At tens of entities the O(enemies × projectiles) sweep the
//! engine runs each tick is cheap.

use crate::geometry::{intersects, Bounded};

/// Stateless collision resolver shared by every entity-vs-entity check.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollisionResolver;

impl CollisionResolver {
    pub fn new() -> Self {
        CollisionResolver
    }

    /// True when the two entities' bounding boxes overlap.
    pub fn check_collision<A, B>(&self, a: &A, b: &B) -> bool
    where
        A: Bounded + ?Sized,
        B: Bounded + ?Sized,
    {
        intersects(&a.bounds(), &b.bounds())
    }
}
