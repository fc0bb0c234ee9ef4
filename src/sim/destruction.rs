//! Collision-driven target destruction
//!
//! Contacts only tag targets. Removal happens later in the tick's sweep, after
//! the physics step has fully returned.

use crate::physics::{BodyKind, ContactStart};

use super::state::{Target, TargetStatus};

/// Should a target hit by `other` break?
///
/// Any projectile contact breaks it; otherwise the faster of the two bodies
/// must reach `impact_speed`.
pub fn impact_destroys(other: BodyKind, speed_target: f32, speed_other: f32, impact_speed: f32) -> bool {
    other == BodyKind::Projectile || speed_target.max(speed_other) >= impact_speed
}

/// Tag every target a contact breaks. Returns how many were newly tagged.
pub fn mark_destroyed(targets: &mut [Target], contacts: &[ContactStart], impact_speed: f32) -> usize {
    let mut tagged = 0;
    for contact in contacts {
        for seen in [*contact, contact.swapped()] {
            if seen.kind_a != BodyKind::Target
                || !impact_destroys(seen.kind_b, seen.speed_a, seen.speed_b, impact_speed)
            {
                continue;
            }
            if let Some(target) = targets.iter_mut().find(|t| t.body == seen.a) {
                if target.status == TargetStatus::Intact {
                    target.status = TargetStatus::Destroyed;
                    tagged += 1;
                }
            }
        }
    }
    tagged
}
