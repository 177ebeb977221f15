//! Tests for core types, the weapon table, and archetype profiles.

use std::f64::consts::PI;

use crate::archetypes::archetype_profile;
use crate::components::{Buffs, Health};
use crate::constants::*;
use crate::enums::{ArchetypeKind, BehaviorTag};
use crate::types::{Position, Velocity};
use crate::weapons::{weapon_spec, ALL_WEAPONS};

// ---- Types ----

#[test]
fn test_range_to() {
    let a = Position::new(0.0, 0.0);
    let b = Position::new(3.0, 4.0);
    assert!((a.range_to(&b) - 5.0).abs() < 1e-12);
}

#[test]
fn test_from_angle_speed_up_is_negative_y() {
    let v = Velocity::from_angle_speed(PI / 2.0, 100.0);
    assert!(v.x.abs() < 1e-9, "straight up has no x component");
    assert!(
        (v.y + 100.0).abs() < 1e-9,
        "up must be negative y, got {}",
        v.y
    );

    let right = Velocity::from_angle_speed(0.0, 100.0);
    assert!((right.x - 100.0).abs() < 1e-9);
}

#[test]
fn test_distance_to_segment() {
    let a = Position::new(0.0, 0.0);
    let b = Position::new(10.0, 0.0);

    // Perpendicular foot inside the segment.
    let p = Position::new(5.0, 3.0);
    assert!((p.distance_to_segment(&a, &b) - 3.0).abs() < 1e-12);

    // Beyond an endpoint: clamps to the endpoint distance.
    let q = Position::new(14.0, 3.0);
    assert!((q.distance_to_segment(&a, &b) - 5.0).abs() < 1e-12);
}

#[test]
fn test_distance_to_degenerate_segment() {
    // Zero-length segment must not divide by zero.
    let a = Position::new(2.0, 2.0);
    let p = Position::new(5.0, 6.0);
    assert!((p.distance_to_segment(&a, &a) - 5.0).abs() < 1e-12);
}

// ---- Weapon table ----

#[test]
fn test_weapon_table_sane() {
    for id in ALL_WEAPONS {
        let spec = weapon_spec(id);
        assert!(spec.damage > 0.0, "{}: damage must be positive", spec.name);
        assert!(
            spec.falloff_floor >= 0.0 && spec.falloff_floor < 1.0,
            "{}: falloff floor out of range",
            spec.name
        );
        if matches!(spec.behavior, BehaviorTag::Beam { .. }) {
            // Beams never spawn a projectile.
            assert!(spec.max_bounces > 0, "{}: beams need a bounce budget", spec.name);
        } else {
            assert!(spec.speed > 0.0, "{}: muzzle speed must be positive", spec.name);
            assert!(
                spec.blast_radius > 0.0,
                "{}: blast radius must be positive",
                spec.name
            );
            assert!(
                spec.projectile_radius > 0.0,
                "{}: projectile radius must be positive",
                spec.name
            );
        }
    }
}

#[test]
fn test_bounce_budgets_only_on_bouncing_behaviors() {
    for id in ALL_WEAPONS {
        let spec = weapon_spec(id);
        match spec.behavior {
            BehaviorTag::Pinball { .. } | BehaviorTag::Escalator { .. } => {
                assert!(spec.max_bounces > 0, "{}: needs a bounce budget", spec.name)
            }
            BehaviorTag::Beam { .. } => {}
            _ => assert_eq!(
                spec.max_bounces, 0,
                "{}: non-bouncing weapons carry no budget",
                spec.name
            ),
        }
    }
}

#[test]
fn test_splitter_counts_bounded() {
    for id in ALL_WEAPONS {
        let spec = weapon_spec(id);
        if let BehaviorTag::Splitter { count, .. } | BehaviorTag::Cluster { count, .. } =
            spec.behavior
        {
            assert!(count >= 2, "{}: splitting into <2 is pointless", spec.name);
            assert!(count <= 8, "{}: fragment fan too wide", spec.name);
        }
    }
}

// ---- Archetypes ----

#[test]
fn test_archetype_profiles() {
    let trooper = archetype_profile(ArchetypeKind::Trooper);
    assert!((trooper.damage_mult - 1.0).abs() < 1e-12);
    assert!((trooper.passive_homing).abs() < 1e-12);

    let berserker = archetype_profile(ArchetypeKind::Berserker);
    assert!(berserker.damage_mult > 1.0);

    let bulwark = archetype_profile(ArchetypeKind::Bulwark);
    assert!(bulwark.damage_taken_mult < 1.0);
    assert!(bulwark.knockback_factor < 1.0);

    let phantom = archetype_profile(ArchetypeKind::Phantom);
    assert!(phantom.passive_homing > 0.0);
}

// ---- Components ----

#[test]
fn test_buffs_default_neutral() {
    let buffs = Buffs::default();
    assert!((buffs.damage_mult - 1.0).abs() < 1e-12);
    assert!(buffs.blast_bonus.abs() < 1e-12);
    assert_eq!(buffs.extra_bounces, 0);
    assert!(buffs.shield.is_none());
}

#[test]
fn test_health_alive() {
    let h = Health {
        hp: MAX_HEALTH,
        max_hp: MAX_HEALTH,
    };
    assert!(h.alive());
    let dead = Health {
        hp: 0.0,
        max_hp: MAX_HEALTH,
    };
    assert!(!dead.alive());
}
