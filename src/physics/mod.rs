//! Rigid-body world
//!
//! Thin wrapper over rapier2d. The game never talks to rapier directly: it
//! creates bodies through [`PhysicsWorld`], reads them back as [`BodyPose`]s and
//! receives collision starts as [`ContactStart`]s after every step.
//!
//! The slingshot link and the mouse drag are soft constraints: each step they
//! change the body's velocity by a fraction of the remaining gap, before the
//! pipeline integrates.

pub mod contacts;

pub use contacts::{ContactCollector, ContactStart};

use glam::Vec2;
use rapier2d::parry::query::PointQuery;
use rapier2d::prelude::*;

/// Handle of a body in the world
pub type BodyHandle = RigidBodyHandle;

/// What a body is, stored in its `user_data`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Ground,
    Projectile,
    Target,
}

impl BodyKind {
    pub fn user_data(self) -> u128 {
        match self {
            BodyKind::Ground => 1,
            BodyKind::Projectile => 2,
            BodyKind::Target => 3,
        }
    }

    pub fn from_user_data(data: u128) -> Option<Self> {
        match data {
            1 => Some(BodyKind::Ground),
            2 => Some(BodyKind::Projectile),
            3 => Some(BodyKind::Target),
            _ => None,
        }
    }
}

/// Position, rotation and velocity of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub pos: Vec2,
    pub angle: f32,
    pub vel: Vec2,
}

impl BodyPose {
    /// Scalar speed, px/s
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Spring pulling a body toward a fixed point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub anchor: Vec2,
    /// Fraction of the stretch corrected per step
    pub stiffness: f32,
    /// Fraction of the body's velocity removed per step
    pub damping: f32,
    /// Rest length
    pub length: f32,
}

/// Active mouse drag
#[derive(Debug, Clone, Copy)]
struct Drag {
    body: BodyHandle,
    target: Vec2,
    stiffness: f32,
}

#[inline]
fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// The physics simulation container
pub struct PhysicsWorld {
    gravity: Vec2,
    dt: f32,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    contacts: ContactCollector,
    drag: Option<Drag>,
}

impl PhysicsWorld {
    /// Empty world stepping by `dt` seconds
    pub fn new(gravity: Vec2, dt: f32) -> Self {
        Self {
            gravity,
            dt,
            params: IntegrationParameters {
                dt,
                ..Default::default()
            },
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            contacts: ContactCollector::default(),
            drag: None,
        }
    }

    fn insert(&mut self, body: RigidBody, collider: Collider) -> BodyHandle {
        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Static rectangle
    pub fn add_ground(&mut self, center: Vec2, size: Vec2) -> BodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y])
            .user_data(BodyKind::Ground.user_data())
            .build();
        let collider = ColliderBuilder::cuboid(size.x / 2.0, size.y / 2.0)
            .friction(0.8)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.insert(body, collider)
    }

    /// Dynamic ball
    pub fn add_projectile(
        &mut self,
        center: Vec2,
        radius: f32,
        density: f32,
        restitution: f32,
        air_friction: f32,
    ) -> BodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![center.x, center.y])
            .linear_damping(air_friction)
            .ccd_enabled(true)
            .user_data(BodyKind::Projectile.user_data())
            .build();
        let collider = ColliderBuilder::ball(radius)
            .density(density)
            .restitution(restitution)
            .friction(0.1)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.insert(body, collider)
    }

    /// Dynamic square target
    pub fn add_target(&mut self, center: Vec2, size: f32, air_friction: f32) -> BodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![center.x, center.y])
            .linear_damping(air_friction)
            .user_data(BodyKind::Target.user_data())
            .build();
        let collider = ColliderBuilder::cuboid(size / 2.0, size / 2.0)
            .density(1.0)
            .friction(0.1)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.insert(body, collider)
    }

    /// Remove a body and its colliders. Returns false if it was already gone.
    pub fn remove(&mut self, handle: BodyHandle) -> bool {
        if self.drag.is_some_and(|d| d.body == handle) {
            self.drag = None;
        }
        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn kind(&self, handle: BodyHandle) -> Option<BodyKind> {
        BodyKind::from_user_data(self.bodies.get(handle)?.user_data)
    }

    /// Current pose of a body, None once removed
    pub fn pose(&self, handle: BodyHandle) -> Option<BodyPose> {
        let body = self.bodies.get(handle)?;
        Some(BodyPose {
            pos: to_vec2(body.translation()),
            angle: body.rotation().angle(),
            vel: to_vec2(body.linvel()),
        })
    }

    /// Teleport a body (rotation and spin are cleared)
    pub fn set_pose(&mut self, handle: BodyHandle, pos: Vec2, vel: Vec2) -> bool {
        let Some(body) = self.bodies.get_mut(handle) else {
            return false;
        };
        body.set_position(Isometry::translation(pos.x, pos.y), true);
        body.set_linvel(vector![vel.x, vel.y], true);
        body.set_angvel(0.0, true);
        true
    }

    /// Pull a body toward the spring's anchor for the coming step
    pub fn apply_spring(&mut self, handle: BodyHandle, spring: &Spring) {
        let Some(body) = self.bodies.get_mut(handle) else {
            return;
        };
        let pos = to_vec2(body.translation());
        let vel = to_vec2(body.linvel());

        let delta = spring.anchor - pos;
        let dist = delta.length();
        let stretch = if dist > spring.length {
            delta * (1.0 - spring.length / dist)
        } else {
            Vec2::ZERO
        };

        let new_vel = vel + stretch * spring.stiffness / self.dt - vel * spring.damping;
        body.set_linvel(vector![new_vel.x, new_vel.y], true);
    }

    /// Grab the dynamic body under `point`, if any
    pub fn begin_drag(&mut self, point: Vec2, stiffness: f32) -> Option<BodyHandle> {
        let pt = point![point.x, point.y];
        let hit = self
            .bodies
            .iter()
            .filter(|(_, body)| body.is_dynamic())
            .find(|(_, body)| {
                body.colliders().iter().any(|&ch| {
                    self.colliders
                        .get(ch)
                        .is_some_and(|c| c.shape().contains_point(body.position(), &pt))
                })
            })
            .map(|(handle, _)| handle)?;

        self.drag = Some(Drag {
            body: hit,
            target: point,
            stiffness,
        });
        Some(hit)
    }

    pub fn move_drag(&mut self, point: Vec2) {
        if let Some(drag) = &mut self.drag {
            drag.target = point;
        }
    }

    /// Let go; returns the body that was being dragged
    pub fn end_drag(&mut self) -> Option<BodyHandle> {
        self.drag.take().map(|d| d.body)
    }

    pub fn dragged(&self) -> Option<BodyHandle> {
        self.drag.map(|d| d.body)
    }

    /// Advance the simulation by one fixed step and report new contacts
    pub fn step(&mut self) -> Vec<ContactStart> {
        if let Some(drag) = self.drag {
            if let Some(body) = self.bodies.get_mut(drag.body) {
                let pos = to_vec2(body.translation());
                let vel = (drag.target - pos) * drag.stiffness / self.dt;
                body.set_linvel(vector![vel.x, vel.y], true);
                body.set_angvel(body.angvel() * 0.9, true);
            }
        }

        let gravity = vector![self.gravity.x, self.gravity.y];
        self.pipeline.step(
            &gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &self.contacts,
        );

        self.contacts.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn world_with_ground() -> (PhysicsWorld, BodyHandle) {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 1000.0), DT);
        let ground = world.add_ground(Vec2::new(400.0, 380.0), Vec2::new(810.0, 60.0));
        (world, ground)
    }

    #[test]
    fn test_user_data_kinds() {
        for kind in [BodyKind::Ground, BodyKind::Projectile, BodyKind::Target] {
            assert_eq!(BodyKind::from_user_data(kind.user_data()), Some(kind));
        }
        assert_eq!(BodyKind::from_user_data(0), None);
    }

    #[test]
    fn test_falling_ball_reports_ground_contact() {
        let (mut world, ground) = world_with_ground();
        let ball = world.add_projectile(Vec2::new(400.0, 300.0), 20.0, 2.0, 0.5, 0.0);

        let mut contacts = Vec::new();
        for _ in 0..60 {
            contacts.extend(world.step());
        }

        let hit = contacts
            .iter()
            .find(|c| (c.a == ball && c.b == ground) || (c.a == ground && c.b == ball))
            .expect("ball should land on the ground");
        let seen_from_ball = if hit.a == ball { *hit } else { hit.swapped() };
        assert_eq!(seen_from_ball.kind_a, BodyKind::Projectile);
        assert_eq!(seen_from_ball.kind_b, BodyKind::Ground);
        assert!(seen_from_ball.speed_a > 100.0);
        assert_eq!(seen_from_ball.speed_b, 0.0);
    }

    #[test]
    fn test_remove_body() {
        let (mut world, _) = world_with_ground();
        let target = world.add_target(Vec2::new(500.0, 330.0), 40.0, 0.0);
        assert_eq!(world.kind(target), Some(BodyKind::Target));
        assert!(world.pose(target).is_some());

        assert!(world.remove(target));
        assert!(world.pose(target).is_none());
        assert!(!world.contains(target));
        assert!(!world.remove(target));
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn test_drag_grabs_only_dynamic_bodies() {
        let (mut world, _) = world_with_ground();
        let ball = world.add_projectile(Vec2::new(150.0, 200.0), 20.0, 2.0, 0.5, 0.0);

        // Ground is fixed
        assert_eq!(world.begin_drag(Vec2::new(400.0, 380.0), 0.2), None);
        // Empty sky
        assert_eq!(world.begin_drag(Vec2::new(300.0, 50.0), 0.2), None);

        assert_eq!(world.begin_drag(Vec2::new(155.0, 205.0), 0.2), Some(ball));
        assert_eq!(world.dragged(), Some(ball));
        assert_eq!(world.end_drag(), Some(ball));
        assert_eq!(world.end_drag(), None);
    }

    #[test]
    fn test_drag_pulls_body_toward_pointer() {
        let mut world = PhysicsWorld::new(Vec2::ZERO, DT);
        let ball = world.add_projectile(Vec2::new(150.0, 200.0), 20.0, 2.0, 0.5, 0.0);

        world.begin_drag(Vec2::new(150.0, 200.0), 0.2).unwrap();
        world.move_drag(Vec2::new(80.0, 240.0));
        for _ in 0..60 {
            world.step();
        }

        let pose = world.pose(ball).unwrap();
        assert!((pose.pos - Vec2::new(80.0, 240.0)).length() < 1.0);
    }

    #[test]
    fn test_removing_dragged_body_ends_drag() {
        let (mut world, _) = world_with_ground();
        let ball = world.add_projectile(Vec2::new(150.0, 200.0), 20.0, 2.0, 0.5, 0.0);
        world.begin_drag(Vec2::new(150.0, 200.0), 0.2);
        world.remove(ball);
        assert_eq!(world.dragged(), None);
    }

    #[test]
    fn test_spring_pulls_toward_anchor() {
        let mut world = PhysicsWorld::new(Vec2::ZERO, DT);
        let anchor = Vec2::new(150.0, 200.0);
        let ball = world.add_projectile(anchor - Vec2::new(80.0, 0.0), 20.0, 2.0, 0.5, 0.0);
        let spring = Spring {
            anchor,
            stiffness: 0.05,
            damping: 0.0,
            length: 1.0,
        };

        let mut crossed = false;
        for _ in 0..60 {
            world.apply_spring(ball, &spring);
            world.step();
            if world.pose(ball).unwrap().pos.x > anchor.x {
                crossed = true;
                break;
            }
        }
        assert!(crossed, "spring should fling the ball past its anchor");
        assert!(world.pose(ball).unwrap().vel.x > 0.0);
    }

    #[test]
    fn test_set_pose_teleports() {
        let (mut world, _) = world_with_ground();
        let ball = world.add_projectile(Vec2::new(150.0, 200.0), 20.0, 2.0, 0.5, 0.0);
        assert!(world.set_pose(ball, Vec2::new(600.0, 100.0), Vec2::new(30.0, 0.0)));
        let pose = world.pose(ball).unwrap();
        assert_eq!(pose.pos, Vec2::new(600.0, 100.0));
        assert_eq!(pose.vel, Vec2::new(30.0, 0.0));
        assert_eq!(pose.angle, 0.0);
    }
}
