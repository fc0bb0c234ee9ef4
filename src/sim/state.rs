//! Game state and core types
//!
//! Everything the level lifecycle needs between ticks lives in [`GameState`].
//! Bodies themselves live in the physics world; the state only holds handles.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::particles::Particle;
use crate::physics::{BodyHandle, Spring};

/// Where the current shot is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelPhase {
    /// Link attached, projectile not yet released
    Aiming,
    /// Drag released, link still attached until the projectile passes the anchor
    InFlight,
    /// Link detached; the reset check arms at simulated time `arm_at`
    Released { arm_at: f64 },
    /// Reset check armed, waiting for the projectile to stop or leave
    Settling,
    /// No targets left, waiting for a click
    Cleared,
}

impl LevelPhase {
    /// Has the projectile been let go of this level
    pub fn is_fired(&self) -> bool {
        matches!(
            self,
            LevelPhase::InFlight | LevelPhase::Released { .. } | LevelPhase::Settling
        )
    }

    pub fn reset_armed(&self) -> bool {
        matches!(self, LevelPhase::Settling)
    }
}

/// Target status; destroyed targets wait for the next sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetStatus {
    #[default]
    Intact,
    Destroyed,
}

/// A destructible box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub body: BodyHandle,
    pub status: TargetStatus,
}

impl Target {
    pub fn new(body: BodyHandle) -> Self {
        Self {
            body,
            status: TargetStatus::Intact,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.status == TargetStatus::Destroyed
    }
}

/// The slingshot band: a spring from the anchor to the projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchLink {
    pub spring: Spring,
    /// Linked body, None once released
    pub body: Option<BodyHandle>,
}

impl LaunchLink {
    pub fn new(spring: Spring, body: BodyHandle) -> Self {
        Self {
            spring,
            body: Some(body),
        }
    }

    pub fn detached(spring: Spring) -> Self {
        Self { spring, body: None }
    }

    pub fn is_attached(&self) -> bool {
        self.body.is_some()
    }

    /// Release the linked body
    pub fn detach(&mut self) -> Option<BodyHandle> {
        self.body.take()
    }
}

/// Things that happened during a tick, for sound and logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Projectile released from the drag
    Launched,
    /// Projectile passed the anchor and left the band
    LinkReleased,
    TargetDestroyed { pos: Vec2 },
    /// New projectile placed on the slingshot
    LevelReset,
    /// Last target destroyed
    Cleared,
    /// Fresh board after a click on the win screen
    Restarted,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for the particle RNG
    pub seed: u64,
    pub rng: Pcg32,
    pub score: u64,
    pub phase: LevelPhase,
    /// Simulated seconds since start (monotonic)
    pub elapsed: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub projectile: Option<BodyHandle>,
    pub link: LaunchLink,
    /// Active targets, in spawn order
    pub targets: Vec<Target>,
    /// Visual debris (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Pending events, drained by the frontend
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, link_spring: Spring) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            phase: LevelPhase::Aiming,
            elapsed: 0.0,
            time_ticks: 0,
            projectile: None,
            link: LaunchLink::detached(link_spring),
            targets: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.phase == LevelPhase::Cleared
    }

    /// Take all events since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spring() -> Spring {
        Spring {
            anchor: Vec2::new(150.0, 200.0),
            stiffness: 0.05,
            damping: 0.05,
            length: 1.0,
        }
    }

    #[test]
    fn test_phase_flags() {
        assert!(!LevelPhase::Aiming.is_fired());
        assert!(LevelPhase::InFlight.is_fired());
        assert!(LevelPhase::Released { arm_at: 1.0 }.is_fired());
        assert!(LevelPhase::Settling.is_fired());
        assert!(!LevelPhase::Cleared.is_fired());

        assert!(!LevelPhase::Released { arm_at: 1.0 }.reset_armed());
        assert!(LevelPhase::Settling.reset_armed());
    }

    #[test]
    fn test_link_detaches_once() {
        let body = BodyHandle::from_raw_parts(7, 0);
        let mut link = LaunchLink::new(spring(), body);
        assert!(link.is_attached());
        assert_eq!(link.detach(), Some(body));
        assert!(!link.is_attached());
        assert_eq!(link.detach(), None);
    }

    #[test]
    fn test_new_state() {
        let mut state = GameState::new(42, spring());
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, LevelPhase::Aiming);
        assert!(state.targets.is_empty());
        assert!(!state.link.is_attached());

        state.events.push(GameEvent::Launched);
        assert_eq!(state.drain_events(), vec![GameEvent::Launched]);
        assert!(state.events.is_empty());
    }
}
