//! Simulated objects. Each owns its motion and activity state; none of them
//! know about each other or about platforms; cross-entity rules live in the
//! engine.

pub mod enemy;
pub mod player;
pub mod power_up;
pub mod projectile;

pub use enemy::{Enemy, EnemyKind};
pub use player::{Facing, Player};
pub use power_up::{PowerUp, PowerUpKind};
pub use projectile::Projectile;
