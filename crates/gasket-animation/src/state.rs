//! Continuously evolving transform state advanced by the engine

use gasket_core::{Axis, BounceConfig};
use glam::{DMat4, DVec2, DVec3};

/// Per-axis angles in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisAngles {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AxisAngles {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, degrees: f64) {
        match axis {
            Axis::X => self.x = degrees,
            Axis::Y => self.y = degrees,
            Axis::Z => self.z = degrees,
        }
    }

    pub fn add(&mut self, axis: Axis, degrees: f64) {
        self.set(axis, self.get(axis) + degrees);
    }
}

/// Half extents of the rectangle the bounce action reflects inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceBounds {
    pub half_width: f64,
    pub half_height: f64,
}

impl BounceBounds {
    pub const DEFAULT_HALF_WIDTH: f64 = 2.5;
    pub const DEFAULT_HALF_HEIGHT: f64 = 1.0;
}

impl Default for BounceBounds {
    fn default() -> Self {
        Self {
            half_width: Self::DEFAULT_HALF_WIDTH,
            half_height: Self::DEFAULT_HALF_HEIGHT,
        }
    }
}

impl From<BounceConfig> for BounceBounds {
    fn from(config: BounceConfig) -> Self {
        Self {
            half_width: config.width,
            half_height: config.height,
        }
    }
}

/// Everything the engine mutates while running a sequence
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    /// Committed rotation from completed rotate actions, kept for the whole run
    pub cumulative_rotation: AxisAngles,
    /// Progress inside the rotate action currently running
    pub step_angle: AxisAngles,
    /// Translation accumulated by bounce and center
    pub position: DVec2,
    pub scale: f64,
    /// Bounce heading in radians
    pub bounce_angle: f64,
    /// Clock time when the running bounce action began
    pub bounce_start_time: f64,
    pub is_bouncing: bool,
    pub sequence_index: usize,
}

impl EngineState {
    pub fn new(bounce_angle: f64) -> Self {
        Self {
            cumulative_rotation: AxisAngles::ZERO,
            step_angle: AxisAngles::ZERO,
            position: DVec2::ZERO,
            scale: 1.0,
            bounce_angle,
            bounce_start_time: 0.0,
            is_bouncing: false,
            sequence_index: 0,
        }
    }

    /// Full reset at the start of a run
    pub fn reset_animation_state(&mut self, bounce_angle: f64) {
        *self = Self::new(bounce_angle);
    }

    /// Clear only the fields scoped to a single action
    pub fn reset_action_state(&mut self) {
        self.step_angle = AxisAngles::ZERO;
        self.is_bouncing = false;
    }

    /// Fold the in-progress turn into the committed rotation
    pub fn commit_step(&mut self) {
        self.cumulative_rotation.x += self.step_angle.x;
        self.cumulative_rotation.y += self.step_angle.y;
        self.cumulative_rotation.z += self.step_angle.z;
        self.step_angle = AxisAngles::ZERO;
    }

    /// Visible rotation about `axis`: committed plus in-progress
    pub fn rotation(&self, axis: Axis) -> f64 {
        self.cumulative_rotation.get(axis) + self.step_angle.get(axis)
    }

    /// `T(position) · Rx · Ry · Rz · S(scale)`.
    ///
    /// Translation is outermost so rotations spin the model about its own
    /// origin wherever it has drifted to.
    pub fn transform(&self) -> DMat4 {
        DMat4::from_translation(DVec3::new(self.position.x, self.position.y, 0.0))
            * DMat4::from_rotation_x(self.rotation(Axis::X).to_radians())
            * DMat4::from_rotation_y(self.rotation(Axis::Y).to_radians())
            * DMat4::from_rotation_z(self.rotation(Axis::Z).to_radians())
            * DMat4::from_scale(DVec3::splat(self.scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn fresh_state_is_identity() {
        let state = EngineState::new(0.3);
        assert!(state.transform().abs_diff_eq(DMat4::IDENTITY, EPS));
    }

    #[test]
    fn reset_action_state_keeps_committed_values() {
        let mut state = EngineState::new(0.0);
        state.cumulative_rotation.z = 90.0;
        state.step_angle.x = 12.0;
        state.is_bouncing = true;
        state.position = DVec2::new(1.0, -0.5);
        state.scale = 2.0;

        state.reset_action_state();

        assert_eq!(state.step_angle, AxisAngles::ZERO);
        assert!(!state.is_bouncing);
        assert_eq!(state.cumulative_rotation.z, 90.0);
        assert_eq!(state.position, DVec2::new(1.0, -0.5));
        assert_eq!(state.scale, 2.0);
    }

    #[test]
    fn commit_step_keeps_visible_rotation() {
        let mut state = EngineState::new(0.0);
        state.cumulative_rotation.z = 90.0;
        state.step_angle.z = 30.0;
        state.step_angle.x = -4.0;
        let before = state.transform();

        state.commit_step();

        assert_eq!(state.step_angle, AxisAngles::ZERO);
        assert_eq!(state.rotation(Axis::Z), 120.0);
        assert_eq!(state.rotation(Axis::X), -4.0);
        assert!(state.transform().abs_diff_eq(before, EPS));
    }

    #[test]
    fn translation_is_applied_after_rotation() {
        let mut state = EngineState::new(0.0);
        state.position = DVec2::new(1.0, 0.0);
        state.cumulative_rotation.z = 90.0;

        // Local +X rotates to +Y, then the whole model shifts by +X
        let p = state.transform().transform_point3(DVec3::X);
        assert!(p.abs_diff_eq(DVec3::new(1.0, 1.0, 0.0), EPS));
    }

    #[test]
    fn scale_is_innermost() {
        let mut state = EngineState::new(0.0);
        state.scale = 2.0;
        state.position = DVec2::new(0.5, 0.0);

        // Scaling must not stretch the translation
        let origin = state.transform().transform_point3(DVec3::ZERO);
        assert!(origin.abs_diff_eq(DVec3::new(0.5, 0.0, 0.0), EPS));
        let p = state.transform().transform_point3(DVec3::X);
        assert!(p.abs_diff_eq(DVec3::new(2.5, 0.0, 0.0), EPS));
    }

    #[test]
    fn rotations_apply_in_xyz_order() {
        let mut state = EngineState::new(0.0);
        state.cumulative_rotation.x = 90.0;
        state.step_angle.z = 90.0;

        // Rz first maps +X to +Y, then Rx maps +Y to +Z
        let p = state.transform().transform_point3(DVec3::X);
        assert!(p.abs_diff_eq(DVec3::Z, EPS));
    }

    #[test]
    fn axis_angles_accessors() {
        let mut angles = AxisAngles::ZERO;
        angles.add(Axis::Y, 45.0);
        angles.add(Axis::Y, 45.0);
        angles.set(Axis::X, -10.0);
        assert_eq!(angles.get(Axis::Y), 90.0);
        assert_eq!(angles.get(Axis::X), -10.0);
        assert_eq!(angles.get(Axis::Z), 0.0);
    }
}
