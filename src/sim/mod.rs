//! Game simulation module
//!
//! Everything that decides what happens in the game lives here:
//! - Fixed timestep only (driven by `Game::tick`)
//! - Seeded RNG only (debris)
//! - No rendering or platform dependencies

pub mod destruction;
pub mod game;
pub mod particles;
pub mod state;

pub use destruction::{impact_destroys, mark_destroyed};
pub use game::Game;
pub use particles::{MAX_PARTICLES, Particle, ParticleKind};
pub use state::{GameEvent, GameState, LaunchLink, LevelPhase, Target, TargetStatus};
