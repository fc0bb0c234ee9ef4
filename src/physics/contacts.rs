//! Collision-start collection
//!
//! rapier reports collision events from inside `PhysicsPipeline::step`. The
//! collector snapshots each new contact (with both bodies' speeds at the
//! moment of detection) so the game can react once the step has returned.

use std::sync::Mutex;

use rapier2d::prelude::*;

use super::{BodyHandle, BodyKind};

/// A pair of bodies that started touching during the last step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactStart {
    pub a: BodyHandle,
    pub b: BodyHandle,
    pub kind_a: BodyKind,
    pub kind_b: BodyKind,
    /// Linear speed of `a` when the contact was detected, px/s
    pub speed_a: f32,
    /// Linear speed of `b` when the contact was detected, px/s
    pub speed_b: f32,
}

impl ContactStart {
    /// The same contact seen from the other body
    pub fn swapped(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
            kind_a: self.kind_b,
            kind_b: self.kind_a,
            speed_a: self.speed_b,
            speed_b: self.speed_a,
        }
    }
}

/// `EventHandler` that buffers collision starts
#[derive(Default)]
pub struct ContactCollector {
    started: Mutex<Vec<ContactStart>>,
}

impl ContactCollector {
    /// Take everything collected since the last drain
    pub fn drain(&self) -> Vec<ContactStart> {
        self.started
            .lock()
            .map(|mut started| std::mem::take(&mut *started))
            .unwrap_or_default()
    }

    fn body_info(
        bodies: &RigidBodySet,
        colliders: &ColliderSet,
        collider: ColliderHandle,
    ) -> Option<(BodyHandle, BodyKind, f32)> {
        let handle = colliders.get(collider)?.parent()?;
        let body = bodies.get(handle)?;
        let kind = BodyKind::from_user_data(body.user_data)?;
        Some((handle, kind, body.linvel().norm()))
    }
}

impl EventHandler for ContactCollector {
    fn handle_collision_event(
        &self,
        bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let CollisionEvent::Started(c1, c2, _) = event else {
            return;
        };
        let (Some((a, kind_a, speed_a)), Some((b, kind_b, speed_b))) = (
            Self::body_info(bodies, colliders, c1),
            Self::body_info(bodies, colliders, c2),
        ) else {
            return;
        };

        if let Ok(mut started) = self.started.lock() {
            started.push(ContactStart {
                a,
                b,
                kind_a,
                kind_b,
                speed_a,
                speed_b,
            });
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
