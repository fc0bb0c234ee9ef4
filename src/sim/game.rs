//! Game controller
//!
//! [`Game`] owns the physics world and the game state and is the only thing
//! that mutates either. The frontend feeds it pointer events and calls
//! [`Game::tick`] at a fixed rate.

use glam::Vec2;

use super::destruction::mark_destroyed;
use super::particles;
use super::state::{GameEvent, GameState, LaunchLink, LevelPhase, Target};
use crate::consts::SIM_DT;
use crate::physics::{BodyHandle, BodyPose, ContactStart, PhysicsWorld, Spring};
use crate::tuning::Tuning;

pub struct Game {
    tuning: Tuning,
    physics: PhysicsWorld,
    ground: BodyHandle,
    pub state: GameState,
}

impl Game {
    /// Build the world: ground, target grid, projectile on the slingshot
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut physics = PhysicsWorld::new(tuning.gravity, SIM_DT);
        let ground = physics.add_ground(tuning.ground_center, tuning.ground_size);
        let state = GameState::new(seed, Self::link_spring(&tuning));

        let mut game = Self {
            tuning,
            physics,
            ground,
            state,
        };
        game.setup_level();
        game
    }

    fn link_spring(tuning: &Tuning) -> Spring {
        Spring {
            anchor: tuning.anchor,
            stiffness: tuning.link_stiffness,
            damping: tuning.link_damping,
            length: tuning.link_length,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn ground_pose(&self) -> Option<BodyPose> {
        self.physics.pose(self.ground)
    }

    pub fn projectile_pose(&self) -> Option<BodyPose> {
        self.physics.pose(self.state.projectile?)
    }

    /// Poses of the remaining targets, in collection order
    pub fn target_poses(&self) -> impl Iterator<Item = BodyPose> + '_ {
        self.state
            .targets
            .iter()
            .filter_map(|t| self.physics.pose(t.body))
    }

    /// Band endpoints (anchor, projectile) while the link is attached
    pub fn link_line(&self) -> Option<(Vec2, Vec2)> {
        let body = self.state.link.body?;
        let pose = self.physics.pose(body)?;
        Some((self.state.link.spring.anchor, pose.pos))
    }

    /// Put a fresh projectile on the slingshot; re-seed targets if none are left
    fn setup_level(&mut self) {
        if let Some(old) = self.state.projectile.take() {
            self.physics.remove(old);
        }

        let t = &self.tuning;
        let projectile = self.physics.add_projectile(
            t.anchor,
            t.projectile_radius,
            t.projectile_density,
            t.projectile_restitution,
            t.air_friction,
        );
        self.state.projectile = Some(projectile);
        self.state.link = LaunchLink::new(Self::link_spring(t), projectile);

        if self.state.targets.is_empty() {
            self.seed_targets();
        }

        self.state.phase = LevelPhase::Aiming;
    }

    fn seed_targets(&mut self) {
        for center in self.tuning.target_centers() {
            let body = self
                .physics
                .add_target(center, self.tuning.target_size, self.tuning.air_friction);
            self.state.targets.push(Target::new(body));
        }
        log::debug!("Seeded {} targets", self.state.targets.len());
    }

    /// Start over after clearing the board. Ignored while targets remain.
    pub fn restart(&mut self) -> bool {
        if !self.state.targets.is_empty() {
            return false;
        }
        self.state.score = 0;
        self.seed_targets();
        self.setup_level();
        self.state.events.push(GameEvent::Restarted);
        log::info!("Restarted");
        true
    }

    /// Mouse button pressed at `point` (game coordinates)
    pub fn pointer_down(&mut self, point: Vec2) {
        if self.state.is_cleared() {
            self.restart();
            return;
        }
        self.physics.begin_drag(point, self.tuning.drag_stiffness);
    }

    pub fn pointer_move(&mut self, point: Vec2) {
        self.physics.move_drag(point);
    }

    pub fn pointer_up(&mut self) {
        if let Some(body) = self.physics.end_drag() {
            self.on_drag_end(body);
        }
    }

    /// A drag on `body` ended; releasing the projectile fires it
    pub fn on_drag_end(&mut self, body: BodyHandle) {
        if self.state.projectile == Some(body) && self.state.phase == LevelPhase::Aiming {
            self.state.phase = LevelPhase::InFlight;
            self.state.events.push(GameEvent::Launched);
            log::info!("Launched");
        }
    }

    /// Tag targets broken by these contacts
    pub fn on_collision_start(&mut self, contacts: &[ContactStart]) {
        let tagged = mark_destroyed(&mut self.state.targets, contacts, self.tuning.impact_speed);
        if tagged > 0 {
            log::debug!("{} target(s) hit", tagged);
        }
    }

    /// Remove tagged targets from the world and score them
    fn sweep_destroyed(&mut self) {
        for i in (0..self.state.targets.len()).rev() {
            if !self.state.targets[i].is_destroyed() {
                continue;
            }
            let target = self.state.targets.remove(i);
            let pos = self.physics.pose(target.body).map(|p| p.pos);
            self.physics.remove(target.body);
            self.state.score += self.tuning.points_per_target;

            if let Some(pos) = pos {
                particles::burst(
                    &mut self.state.particles,
                    &mut self.state.rng,
                    pos,
                    self.tuning.debris_per_target,
                );
                self.state.events.push(GameEvent::TargetDestroyed { pos });
            }
            log::debug!("Target destroyed, score {}", self.state.score);
        }
    }

    /// Detach the band once a fired projectile passes the anchor
    fn check_release(&mut self) {
        if self.state.phase != LevelPhase::InFlight {
            return;
        }
        let Some(pose) = self.state.link.body.and_then(|b| self.physics.pose(b)) else {
            return;
        };
        if pose.pos.x > self.tuning.anchor.x + self.tuning.release_offset {
            self.state.link.detach();
            let arm_at = self.state.elapsed + self.tuning.reset_delay_secs as f64;
            self.state.phase = LevelPhase::Released { arm_at };
            self.state.events.push(GameEvent::LinkReleased);
            log::info!("Released at {:.0} px/s", pose.speed());
        }
    }

    /// Arm the reset check after the delay; reset once the shot is over
    fn check_reset(&mut self) {
        if let LevelPhase::Released { arm_at } = self.state.phase {
            if self.state.elapsed >= arm_at {
                self.state.phase = LevelPhase::Settling;
            }
        }
        if !self.state.phase.reset_armed() || self.state.targets.is_empty() {
            return;
        }

        let over = match self.projectile_pose() {
            Some(pose) => {
                self.tuning.is_out_of_bounds(pose.pos) || pose.speed() < self.tuning.rest_speed
            }
            None => true,
        };
        if over {
            self.setup_level();
            self.state.events.push(GameEvent::LevelReset);
            log::info!("Level reset, {} targets left", self.state.targets.len());
        }
    }

    /// Advance one fixed timestep
    pub fn tick(&mut self) {
        self.state.time_ticks += 1;
        self.state.elapsed += SIM_DT as f64;

        if let Some(body) = self.state.link.body {
            self.physics.apply_spring(body, &self.state.link.spring);
        }
        let contacts = self.physics.step();
        self.on_collision_start(&contacts);

        self.sweep_destroyed();
        self.check_release();
        self.check_reset();

        if self.state.targets.is_empty() && !self.state.is_cleared() {
            self.state.phase = LevelPhase::Cleared;
            self.state.events.push(GameEvent::Cleared);
            log::info!("All presents opened! Score {}", self.state.score);
        }

        particles::update(&mut self.state.particles, self.tuning.gravity, SIM_DT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::BodyKind;
    use crate::sim::state::TargetStatus;

    fn new_game() -> Game {
        Game::new(Tuning::default(), 12345)
    }

    fn count(events: &[GameEvent], wanted: GameEvent) -> usize {
        events.iter().filter(|e| **e == wanted).count()
    }

    fn tick_for(game: &mut Game, secs: f64) {
        let end = game.state.elapsed + secs;
        while game.state.elapsed < end {
            game.tick();
        }
    }

    #[test]
    fn test_new_game_layout() {
        let game = new_game();
        assert_eq!(game.state.targets.len(), 12);
        assert_eq!(game.state.score, 0);
        assert_eq!(game.state.phase, LevelPhase::Aiming);
        assert!(game.state.link.is_attached());
        assert_eq!(game.state.link.body, game.state.projectile);
        assert_eq!(game.projectile_pose().unwrap().pos, game.tuning().anchor);
        // ground + projectile + targets
        assert_eq!(game.physics().body_count(), 14);
        assert_eq!(game.target_poses().count(), 12);
    }

    #[test]
    fn test_stack_settles_without_breaking() {
        let mut game = new_game();
        tick_for(&mut game, 2.0);
        assert_eq!(game.state.targets.len(), 12);
        assert_eq!(game.state.score, 0);
        assert_eq!(game.state.phase, LevelPhase::Aiming);
    }

    #[test]
    fn test_tagged_target_removed_once_and_scored() {
        let mut game = new_game();
        let body = game.state.targets[5].body;
        game.state.targets[5].status = TargetStatus::Destroyed;

        game.tick();
        assert_eq!(game.state.targets.len(), 11);
        assert_eq!(game.state.score, 100);
        assert!(!game.physics().contains(body));
        assert!(game.state.targets.iter().all(|t| t.body != body));

        game.tick();
        assert_eq!(game.state.targets.len(), 11);
        assert_eq!(game.state.score, 100);

        let events = game.state.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::TargetDestroyed { .. }))
                .count(),
            1
        );
        assert!(!game.state.particles.is_empty());
    }

    #[test]
    fn test_contacts_tag_targets() {
        let mut game = new_game();
        let target = game.state.targets[0].body;
        let ground = game.ground;
        let projectile = game.state.projectile.unwrap();

        let soft = ContactStart {
            a: target,
            b: ground,
            kind_a: BodyKind::Target,
            kind_b: BodyKind::Ground,
            speed_a: 10.0,
            speed_b: 0.0,
        };
        game.on_collision_start(&[soft]);
        assert_eq!(game.state.targets[0].status, TargetStatus::Intact);

        let bird = ContactStart {
            a: projectile,
            b: target,
            kind_a: BodyKind::Projectile,
            kind_b: BodyKind::Target,
            speed_a: 0.0,
            speed_b: 0.0,
        };
        game.on_collision_start(&[bird]);
        assert_eq!(game.state.targets[0].status, TargetStatus::Destroyed);
        // Still present until the sweep
        assert!(game.physics().contains(target));
        assert_eq!(game.state.targets.len(), 12);
    }

    #[test]
    fn test_clear_and_restart() {
        let mut game = new_game();
        // Restart is refused while targets remain
        assert!(!game.restart());

        for target in &mut game.state.targets {
            target.status = TargetStatus::Destroyed;
        }
        game.tick();
        assert!(game.state.targets.is_empty());
        assert_eq!(game.state.score, 1200);
        assert_eq!(game.state.phase, LevelPhase::Cleared);
        assert_eq!(count(&game.state.drain_events(), GameEvent::Cleared), 1);

        // Stays cleared
        game.tick();
        assert_eq!(game.state.phase, LevelPhase::Cleared);
        assert_eq!(count(&game.state.drain_events(), GameEvent::Cleared), 0);

        // Any click restarts
        game.pointer_down(Vec2::new(10.0, 10.0));
        assert_eq!(game.state.score, 0);
        assert_eq!(game.state.targets.len(), 12);
        assert_eq!(game.state.phase, LevelPhase::Aiming);
        assert!(game.state.link.is_attached());
        assert_eq!(count(&game.state.drain_events(), GameEvent::Restarted), 1);
        assert_eq!(game.physics().body_count(), 14);
    }

    #[test]
    fn test_only_projectile_drag_fires() {
        let mut game = new_game();
        let target = game.state.targets[0].body;
        game.on_drag_end(target);
        assert_eq!(game.state.phase, LevelPhase::Aiming);

        let projectile = game.state.projectile.unwrap();
        game.on_drag_end(projectile);
        assert_eq!(game.state.phase, LevelPhase::InFlight);
        assert!(game.state.phase.is_fired());
        assert_eq!(count(&game.state.drain_events(), GameEvent::Launched), 1);
    }

    #[test]
    fn test_pointer_drag_and_release_fires() {
        let mut game = new_game();
        let anchor = game.tuning().anchor;
        game.pointer_down(anchor);
        assert_eq!(game.physics().dragged(), game.state.projectile);

        game.pointer_move(anchor - Vec2::new(80.0, -30.0));
        for _ in 0..20 {
            game.tick();
        }
        assert!(game.projectile_pose().unwrap().pos.x < anchor.x - 40.0);
        assert_eq!(game.state.phase, LevelPhase::Aiming);

        game.pointer_up();
        assert_eq!(game.state.phase, LevelPhase::InFlight);

        // The band flings it past the anchor and lets go
        tick_for(&mut game, 0.5);
        assert!(!game.state.link.is_attached());
        assert!(matches!(game.state.phase, LevelPhase::Released { .. }));
        assert!(game.projectile_pose().unwrap().pos.x > anchor.x);
        assert_eq!(count(&game.state.drain_events(), GameEvent::LinkReleased), 1);
    }

    #[test]
    fn test_no_release_while_aiming() {
        let mut game = new_game();
        let projectile = game.state.projectile.unwrap();
        game.physics_mut()
            .set_pose(projectile, Vec2::new(300.0, 200.0), Vec2::ZERO);
        game.tick();
        assert!(game.state.link.is_attached());
        assert_eq!(game.state.phase, LevelPhase::Aiming);
    }

    #[test]
    fn test_reset_after_leaving_play_field() {
        let mut game = new_game();
        let anchor = game.tuning().anchor;
        let first = game.state.projectile.unwrap();
        game.on_drag_end(first);

        game.physics_mut()
            .set_pose(first, Vec2::new(2000.0, 100.0), Vec2::ZERO);
        game.tick();
        assert!(!game.state.link.is_attached());
        assert!(matches!(game.state.phase, LevelPhase::Released { .. }));
        // Undo the band's last pull; let it drop straight down out there
        game.physics_mut()
            .set_pose(first, Vec2::new(2000.0, 100.0), Vec2::ZERO);

        // Off screen, but the check is not armed yet
        tick_for(&mut game, 0.9);
        assert!(matches!(game.state.phase, LevelPhase::Released { .. }));
        assert_eq!(game.state.projectile, Some(first));
        assert!(!game.state.link.is_attached());

        let mut reset_pose = None;
        for _ in 0..30 {
            game.tick();
            if game.state.phase == LevelPhase::Aiming {
                reset_pose = game.projectile_pose();
                break;
            }
        }
        let pose = reset_pose.expect("level should reset once armed");
        assert_eq!(pose.pos, anchor);
        assert_ne!(game.state.projectile, Some(first));
        assert!(!game.physics().contains(first));
        assert_eq!(game.state.link.body, game.state.projectile);

        let events = game.state.drain_events();
        assert_eq!(count(&events, GameEvent::LinkReleased), 1);
        assert_eq!(count(&events, GameEvent::LevelReset), 1);
        assert_eq!(game.state.targets.len(), 12);
    }

    #[test]
    fn test_reset_after_projectile_stops() {
        let mut game = new_game();
        let first = game.state.projectile.unwrap();
        game.on_drag_end(first);

        // Resting on the ground, well clear of the stack
        let ground_top = game.tuning().ground_center.y - game.tuning().ground_size.y / 2.0;
        let rest = Vec2::new(300.0, ground_top - game.tuning().projectile_radius);
        game.physics_mut().set_pose(first, rest, Vec2::ZERO);
        game.tick();
        assert!(matches!(game.state.phase, LevelPhase::Released { .. }));
        // The band pulled on it during that tick; settle it again
        game.physics_mut().set_pose(first, rest, Vec2::ZERO);

        tick_for(&mut game, 0.5);
        assert!(matches!(game.state.phase, LevelPhase::Released { .. }));
        assert_eq!(game.state.projectile, Some(first));

        tick_for(&mut game, 1.0);
        assert_eq!(game.state.phase, LevelPhase::Aiming);
        assert_ne!(game.state.projectile, Some(first));
        assert!(game.state.link.is_attached());
    }

    #[test]
    fn test_score_survives_level_reset() {
        let mut game = new_game();
        game.state.targets[0].status = TargetStatus::Destroyed;
        game.tick();
        assert_eq!(game.state.score, 100);

        let first = game.state.projectile.unwrap();
        game.on_drag_end(first);
        game.physics_mut()
            .set_pose(first, Vec2::new(2000.0, 100.0), Vec2::ZERO);
        game.tick();
        game.physics_mut()
            .set_pose(first, Vec2::new(2000.0, 100.0), Vec2::ZERO);
        tick_for(&mut game, 1.5);
        assert_eq!(game.state.phase, LevelPhase::Aiming);
        assert_eq!(game.state.score, 100);
        assert_eq!(game.state.targets.len(), 11);
    }
}
