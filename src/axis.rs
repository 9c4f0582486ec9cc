//! Axis projection
//!
//! Maps integer positions onto the see-saw axis. The axis tilts by a fixed
//! number of degrees per unit of combined token position, and every entity
//! sits on its upper surface, rotated with it.
//!
//! Read-only with respect to the match: positions come in through
//! [`MatchObserver::on_positions_changed`] and never flow back.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::host::MatchObserver;
use crate::sim::Outcome;

/// Projection failures. The placement is skipped rather than guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AxisError {
    #[error("axis geometry is not known yet")]
    MissingGeometry,
    #[error("axis range [{min}, {max}] is empty")]
    DegenerateRange { min: i32, max: i32 },
}

/// Axis shape in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisGeometry {
    /// Position mapped to the left end
    pub min: i32,
    /// Position mapped to the right end
    pub max: i32,
    /// Displayed length (scale applied)
    pub width: f32,
    /// Displayed thickness (scale applied)
    pub thickness: f32,
    /// World position of the axis center
    pub anchor: Vec2,
}

impl AxisGeometry {
    /// Geometry of a rect of `size` drawn with `scale`, centered at `anchor`
    pub fn from_rect(size: Vec2, scale: Vec2, anchor: Vec2, min: i32, max: i32) -> Self {
        Self {
            min,
            max,
            width: size.x * scale.x,
            thickness: size.y * scale.y,
            anchor,
        }
    }

    /// Clamp `position` into range and normalize it to `[0, 1]`
    pub fn normalize(&self, position: i32) -> Result<f32, AxisError> {
        if self.max <= self.min {
            return Err(AxisError::DegenerateRange {
                min: self.min,
                max: self.max,
            });
        }
        let clamped = position.clamp(self.min, self.max);
        let span = self.max as i64 - self.min as i64;
        Ok((clamped as i64 - self.min as i64) as f32 / span as f32)
    }
}

/// World placement of a rendered entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec2,
    /// Rotation about the view axis (degrees, counter-clockwise)
    pub rotation_deg: f32,
}

/// Axis tilt for the two token positions.
///
/// Only the tokens weigh on the see-saw; the chest never tilts it.
#[inline]
pub fn rotation_angle(unit_degree: f32, pos_a: i32, pos_b: i32) -> f32 {
    -unit_degree * (pos_a as i64 + pos_b as i64) as f32
}

/// Outward normal of the axis's upper surface
#[inline]
pub fn surface_normal(rotation_deg: f32) -> Vec2 {
    Vec2::from_angle(rotation_deg.to_radians()).rotate(Vec2::Y)
}

/// Project an integer position onto the rotated axis.
///
/// The entity's bottom rests on the upper surface: half the axis thickness
/// plus `height_offset` along the surface normal.
pub fn project(
    position: i32,
    geometry: &AxisGeometry,
    rotation_deg: f32,
    height_offset: f32,
) -> Result<Placement, AxisError> {
    let t = geometry.normalize(position)?;
    let offset = (t - 0.5) * geometry.width;

    let rotation = Vec2::from_angle(rotation_deg.to_radians());
    let center_line = geometry.anchor + rotation.rotate(Vec2::new(offset, 0.0));
    let normal = surface_normal(rotation_deg);

    Ok(Placement {
        position: center_line + normal * (geometry.thickness * 0.5 + height_offset),
        rotation_deg,
    })
}

/// Entities drawn on the axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    TokenA,
    TokenB,
    Chest,
}

impl Entity {
    pub const ALL: [Entity; 3] = [Entity::TokenA, Entity::TokenB, Entity::Chest];

    fn index(self) -> usize {
        match self {
            Entity::TokenA => 0,
            Entity::TokenB => 1,
            Entity::Chest => 2,
        }
    }
}

/// Per-entity distance from the axis surface to the entity's center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightOffsets {
    pub token_a: f32,
    pub token_b: f32,
    pub chest: f32,
}

impl Default for HeightOffsets {
    fn default() -> Self {
        Self {
            token_a: DEFAULT_TOKEN_HEIGHT_OFFSET,
            token_b: DEFAULT_TOKEN_HEIGHT_OFFSET,
            chest: DEFAULT_CHEST_HEIGHT_OFFSET,
        }
    }
}

impl HeightOffsets {
    pub fn get(&self, entity: Entity) -> f32 {
        match entity {
            Entity::TokenA => self.token_a,
            Entity::TokenB => self.token_b,
            Entity::Chest => self.chest,
        }
    }

    pub fn set(&mut self, entity: Entity, offset: f32) {
        match entity {
            Entity::TokenA => self.token_a = offset,
            Entity::TokenB => self.token_b = offset,
            Entity::Chest => self.chest = offset,
        }
    }
}

/// Positions and tilt currently shown
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisPose {
    pub a: i32,
    pub b: i32,
    pub chest: i32,
    pub rotation_deg: f32,
}

impl AxisPose {
    pub fn position(&self, entity: Entity) -> i32 {
        match entity {
            Entity::TokenA => self.a,
            Entity::TokenB => self.b,
            Entity::Chest => self.chest,
        }
    }
}

/// Linear transition between two poses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTween {
    from: AxisPose,
    to: AxisPose,
    duration: f32,
    elapsed: f32,
}

impl AxisTween {
    pub fn new(from: AxisPose, to: AxisPose, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn target(&self) -> AxisPose {
        self.to
    }

    /// Pose at the current progress; positions snap to whole units
    pub fn sample(&self) -> AxisPose {
        if self.is_finished() || self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        let lerp_i = |from: i32, to: i32| (from as f32 + (to - from) as f32 * t).round() as i32;
        AxisPose {
            a: lerp_i(self.from.a, self.to.a),
            b: lerp_i(self.from.b, self.to.b),
            chest: lerp_i(self.from.chest, self.to.chest),
            rotation_deg: self.from.rotation_deg
                + (self.to.rotation_deg - self.from.rotation_deg) * t,
        }
    }

    /// Advance by `dt` seconds and return the new pose
    pub fn advance(&mut self, dt: f32) -> AxisPose {
        self.elapsed = (self.elapsed + dt).min(self.duration.max(0.0));
        self.sample()
    }
}

/// Projection state for the three entities on one axis
#[derive(Debug, Clone)]
pub struct AxisView {
    geometry: Option<AxisGeometry>,
    unit_degree: f32,
    offsets: HeightOffsets,
    /// Transition length for position updates (0 = snap)
    smooth_secs: f32,
    pose: AxisPose,
    tween: Option<AxisTween>,
    placements: [Option<Placement>; 3],
    /// At least one pose has been shown
    has_pose: bool,
}

impl AxisView {
    pub fn new(
        geometry: Option<AxisGeometry>,
        unit_degree: f32,
        offsets: HeightOffsets,
        smooth_secs: f32,
    ) -> Self {
        if geometry.is_none() {
            log::warn!("axis view created without geometry; placements wait for set_geometry");
        }
        Self {
            geometry,
            unit_degree,
            offsets,
            smooth_secs: smooth_secs.max(0.0),
            pose: AxisPose::default(),
            tween: None,
            placements: [None; 3],
            has_pose: false,
        }
    }

    pub fn geometry(&self) -> Option<&AxisGeometry> {
        self.geometry.as_ref()
    }

    /// Provide (or replace) the axis geometry and re-project
    pub fn set_geometry(&mut self, geometry: AxisGeometry) {
        self.geometry = Some(geometry);
        if self.has_pose {
            self.relayout_or_log();
        }
    }

    #[inline]
    pub fn pose(&self) -> AxisPose {
        self.pose
    }

    #[inline]
    pub fn rotation_deg(&self) -> f32 {
        self.pose.rotation_deg
    }

    pub fn placement(&self, entity: Entity) -> Option<Placement> {
        self.placements[entity.index()]
    }

    /// Pose the view is heading to: the tween target, or the current pose
    pub fn target_pose(&self) -> AxisPose {
        self.tween.map_or(self.pose, |tween| tween.target())
    }

    /// Where `entity` settles once any running transition finishes
    pub fn target_placement(&self, entity: Entity) -> Result<Placement, AxisError> {
        let geometry = self.geometry.ok_or(AxisError::MissingGeometry)?;
        let target = self.target_pose();
        project(
            target.position(entity),
            &geometry,
            target.rotation_deg,
            self.offsets.get(entity),
        )
    }

    pub fn height_offsets(&self) -> HeightOffsets {
        self.offsets
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Show new positions, tweening from the current pose when smoothing is on
    pub fn update_positions(&mut self, a: i32, b: i32, chest: i32) {
        let target = AxisPose {
            a,
            b,
            chest,
            rotation_deg: rotation_angle(self.unit_degree, a, b),
        };
        log::debug!(
            "axis update: A={}, B={}, chest={}, rotation={:.1}°",
            a,
            b,
            chest,
            target.rotation_deg
        );

        if self.has_pose && self.smooth_secs > 0.0 {
            self.tween = Some(AxisTween::new(self.pose, target, self.smooth_secs));
        } else {
            self.tween = None;
            self.apply_pose(target);
        }
    }

    /// Show new positions immediately
    pub fn snap_to(&mut self, a: i32, b: i32, chest: i32) {
        self.tween = None;
        self.apply_pose(AxisPose {
            a,
            b,
            chest,
            rotation_deg: rotation_angle(self.unit_degree, a, b),
        });
    }

    /// Back to the level, centered layout
    pub fn reset(&mut self) {
        self.snap_to(0, 0, 0);
    }

    /// Jump to the end of any running transition
    pub fn finish_transition(&mut self) {
        if let Some(tween) = self.tween.take() {
            self.apply_pose(tween.target());
        }
    }

    /// Step any running transition by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        let Some(tween) = self.tween.as_mut() else {
            return;
        };
        let pose = tween.advance(dt);
        if tween.is_finished() {
            self.tween = None;
        }
        self.apply_pose(pose);
    }

    pub fn set_height_offset(&mut self, entity: Entity, offset: f32) {
        self.offsets.set(entity, offset);
        if self.has_pose {
            self.relayout_or_log();
        }
    }

    pub fn set_all_height_offsets(&mut self, offset: f32) {
        for entity in Entity::ALL {
            self.offsets.set(entity, offset);
        }
        if self.has_pose {
            self.relayout_or_log();
        }
    }

    /// Re-project every entity from the current pose
    pub fn relayout(&mut self) -> Result<(), AxisError> {
        let geometry = self.geometry.ok_or(AxisError::MissingGeometry)?;
        for entity in Entity::ALL {
            let placement = project(
                self.pose.position(entity),
                &geometry,
                self.pose.rotation_deg,
                self.offsets.get(entity),
            )?;
            self.placements[entity.index()] = Some(placement);
        }
        Ok(())
    }

    fn apply_pose(&mut self, pose: AxisPose) {
        self.pose = pose;
        self.has_pose = true;
        self.relayout_or_log();
    }

    fn relayout_or_log(&mut self) {
        if let Err(err) = self.relayout() {
            log::error!("axis projection skipped: {}", err);
        }
    }
}

impl MatchObserver for AxisView {
    fn on_positions_changed(&mut self, a: i32, b: i32, chest: i32) {
        self.update_positions(a, b, chest);
    }

    /// The final layout is shown as-is; nothing is left to animate toward
    fn on_match_ended(&mut self, _outcome: Outcome) {
        self.finish_transition();
    }
}
