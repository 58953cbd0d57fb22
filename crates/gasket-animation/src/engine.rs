//! The animation state machine
//!
//! ```text
//!   Idle ──start──▶ Running ──stop──▶ Paused
//!                    │  ▲  ◀─resume──┘
//!                    │  └──start── Complete
//!                    └──last action done──▶ Complete
//! ```
//!
//! Each tick advances the current action by a fixed amount scaled by the
//! speed factor, so visual speed follows the host's frame rate. Bounce
//! duration is the one wall-clock measurement.

use crate::action::Action;
use crate::renderer::Renderer;
use crate::sequence::Sequence;
use crate::state::{BounceBounds, EngineState};
use gasket_core::{Axis, GasketRng};
use gasket_geometry::TriangleStream;
use glam::{DVec2, Mat4};
use std::f64::consts::PI;

/// Largest heading change added after a boundary reflection, in radians
pub const BOUNCE_JITTER: f64 = 0.1;

/// Center completes once position and scale are this close to rest
pub const CENTER_EPSILON: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    Running,
    Paused,
    Complete,
}

/// Per-tick rates at a given speed factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRates {
    /// Degrees per tick
    pub rotation: f64,
    /// Scale units per tick
    pub scale: f64,
    /// Bounce distance per tick
    pub movement: f64,
    /// Fraction of the remaining offset removed per tick by center
    pub return_rate: f64,
}

impl TickRates {
    pub fn for_speed(speed_factor: f64) -> Self {
        let s = if speed_factor.is_finite() {
            speed_factor.max(0.0)
        } else {
            0.0
        };
        Self {
            rotation: 2.0 * s,
            scale: 0.02 * s,
            movement: 0.03 * s,
            return_rate: 0.02 * s,
        }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Model transform for this frame
    pub transform: Mat4,
    /// False when the engine was not running and nothing moved
    pub advanced: bool,
    pub action_completed: bool,
    /// A bounce hit the boundary this tick
    pub reflected: bool,
    /// The last action completed and the engine is now `Complete`
    pub sequence_finished: bool,
}

impl TickOutcome {
    fn frozen(transform: Mat4) -> Self {
        Self {
            transform,
            advanced: false,
            action_completed: false,
            reflected: false,
            sequence_finished: false,
        }
    }
}

/// Executes a [`Sequence`] one action at a time.
pub struct AnimationEngine {
    phase: EnginePhase,
    state: EngineState,
    bounds: BounceBounds,
    rng: GasketRng,
    /// Clock reading when the current pause began
    paused_at: Option<f64>,
    /// Ticks executed since the last start
    ticks: u64,
}

impl AnimationEngine {
    pub fn new(rng: GasketRng) -> Self {
        let mut rng = rng;
        let heading = rng.angle();
        Self {
            phase: EnginePhase::Idle,
            state: EngineState::new(heading),
            bounds: BounceBounds::default(),
            rng,
            paused_at: None,
            ticks: 0,
        }
    }

    pub fn with_bounds(mut self, bounds: BounceBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == EnginePhase::Running
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn bounds(&self) -> BounceBounds {
        self.bounds
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The action the next tick will advance, if running or paused
    pub fn current_action<'a>(&self, sequence: &'a Sequence) -> Option<&'a Action> {
        match self.phase {
            EnginePhase::Running | EnginePhase::Paused => sequence.get(self.state.sequence_index),
            EnginePhase::Idle | EnginePhase::Complete => None,
        }
    }

    /// Composed model transform for the current state
    pub fn transform(&self) -> Mat4 {
        self.state.transform().as_mat4()
    }

    /// Begin a fresh run from the first action. An empty sequence completes at once.
    pub fn start(&mut self, sequence: &Sequence) {
        let heading = self.rng.angle();
        self.state.reset_animation_state(heading);
        self.paused_at = None;
        self.ticks = 0;

        if sequence.is_empty() {
            log::info!("Animation started with an empty sequence; nothing to do");
            self.phase = EnginePhase::Complete;
        } else {
            log::info!("Animation started ({} actions)", sequence.len());
            self.phase = EnginePhase::Running;
        }
    }

    /// Pause a running animation, keeping all state. Returns false if not running.
    pub fn stop(&mut self, now: f64) -> bool {
        if self.phase != EnginePhase::Running {
            return false;
        }
        self.phase = EnginePhase::Paused;
        self.paused_at = Some(now);
        log::info!("Animation paused at action {}", self.state.sequence_index + 1);
        true
    }

    /// Continue a paused animation. Bounce time does not advance while paused.
    pub fn resume(&mut self, now: f64) -> bool {
        if self.phase != EnginePhase::Paused {
            return false;
        }
        if let Some(paused_at) = self.paused_at.take() {
            if self.state.is_bouncing {
                self.state.bounce_start_time += (now - paused_at).max(0.0);
            }
        }
        self.phase = EnginePhase::Running;
        log::info!("Animation resumed at action {}", self.state.sequence_index + 1);
        true
    }

    /// Start/stop button: pause when running, resume when paused, otherwise start over
    pub fn toggle(&mut self, sequence: &Sequence, now: f64) -> EnginePhase {
        match self.phase {
            EnginePhase::Running => {
                self.stop(now);
            }
            EnginePhase::Paused => {
                self.resume(now);
            }
            EnginePhase::Idle | EnginePhase::Complete => self.start(sequence),
        }
        self.phase
    }

    /// Drop back to `Idle` with the identity transform, e.g. after the geometry changed
    pub fn reset(&mut self) {
        let heading = self.rng.angle();
        self.state.reset_animation_state(heading);
        self.phase = EnginePhase::Idle;
        self.paused_at = None;
        self.ticks = 0;
    }

    /// Keep the run on the same action after `sequence.remove_at(index)`.
    ///
    /// Removing the running action lets the one after it slide into place and
    /// start fresh; a partial turn stays where it is.
    pub fn action_removed(&mut self, index: usize) {
        if !matches!(self.phase, EnginePhase::Running | EnginePhase::Paused) {
            return;
        }
        let current = self.state.sequence_index;
        if index < current {
            self.state.sequence_index = current - 1;
        } else if index == current {
            self.state.commit_step();
            self.state.reset_action_state();
        }
    }

    /// Advance the current action by one tick.
    ///
    /// Outside `Running` this only reports the frozen transform.
    pub fn tick(&mut self, sequence: &Sequence, speed_factor: f64, now: f64) -> TickOutcome {
        if self.phase != EnginePhase::Running {
            return TickOutcome::frozen(self.transform());
        }
        self.ticks += 1;

        let rates = TickRates::for_speed(speed_factor);
        let mut reflected = false;
        let completed = match sequence.get(self.state.sequence_index) {
            Some(action) => self.advance(action, &rates, now, &mut reflected),
            // The sequence shrank underneath a running animation. Keep any
            // partial turn so the frozen frame matches this one.
            None => {
                self.state.commit_step();
                true
            }
        };

        let transform = self.transform();

        let mut finished = false;
        if completed {
            self.state.reset_action_state();
            self.state.sequence_index += 1;
            if self.state.sequence_index >= sequence.len() {
                self.state.sequence_index = 0;
                self.phase = EnginePhase::Complete;
                finished = true;
                log::info!("Animation sequence complete after {} ticks", self.ticks);
            } else if let Some(next) = sequence.get(self.state.sequence_index) {
                log::debug!("Next action {}: {}", self.state.sequence_index + 1, next);
            }
        }

        TickOutcome {
            transform,
            advanced: true,
            action_completed: completed,
            reflected,
            sequence_finished: finished,
        }
    }

    /// Tick, then hand the frame to `renderer`
    pub fn tick_and_render<R: Renderer + ?Sized>(
        &mut self,
        sequence: &Sequence,
        speed_factor: f64,
        now: f64,
        triangles: &TriangleStream,
        renderer: &mut R,
    ) -> TickOutcome {
        let outcome = self.tick(sequence, speed_factor, now);
        renderer.render_frame(outcome.transform, triangles);
        outcome
    }

    /// Returns true when `action` finished this tick
    fn advance(&mut self, action: &Action, rates: &TickRates, now: f64, reflected: &mut bool) -> bool {
        match *action {
            Action::Rotate { axis, degrees } => self.advance_rotate(axis, degrees, rates.rotation),
            Action::Scale { target } => self.advance_scale(target, rates.scale),
            Action::Bounce { duration } => {
                self.advance_bounce(duration, rates.movement, now, reflected)
            }
            Action::Center => self.advance_center(rates.return_rate),
            Action::Unsupported => true,
        }
    }

    fn advance_rotate(&mut self, axis: Axis, degrees: f64, speed: f64) -> bool {
        if !degrees.is_finite() {
            return true;
        }
        let progress = self.state.step_angle.get(axis);
        let remaining = degrees - progress;

        if remaining.abs() <= speed {
            // Commit the exact target so repeated turns never drift
            self.state.cumulative_rotation.add(axis, degrees);
            self.state.step_angle.set(axis, 0.0);
            true
        } else {
            self.state
                .step_angle
                .set(axis, progress + speed * remaining.signum());
            false
        }
    }

    fn advance_scale(&mut self, target: f64, speed: f64) -> bool {
        if !target.is_finite() {
            return true;
        }
        let diff = target - self.state.scale;
        if diff.abs() < speed {
            self.state.scale = target;
            true
        } else {
            self.state.scale += diff.signum() * speed;
            false
        }
    }

    fn advance_bounce(
        &mut self,
        duration: Option<f64>,
        speed: f64,
        now: f64,
        reflected: &mut bool,
    ) -> bool {
        if matches!(duration, Some(secs) if !secs.is_finite()) {
            return true;
        }
        if !self.state.is_bouncing {
            self.state.bounce_start_time = now;
            self.state.is_bouncing = true;
        }

        let heading = DVec2::new(self.state.bounce_angle.cos(), self.state.bounce_angle.sin());
        let next = self.state.position + heading * speed;

        if next.x.abs() > self.bounds.half_width {
            self.state.bounce_angle = PI - self.state.bounce_angle;
            self.state.bounce_angle += self.rng.range(-BOUNCE_JITTER, BOUNCE_JITTER);
            *reflected = true;
        }
        if next.y.abs() > self.bounds.half_height {
            self.state.bounce_angle = -self.state.bounce_angle;
            self.state.bounce_angle += self.rng.range(-BOUNCE_JITTER, BOUNCE_JITTER);
            *reflected = true;
        }

        let heading = DVec2::new(self.state.bounce_angle.cos(), self.state.bounce_angle.sin());
        self.state.position += heading * speed;

        match duration {
            Some(secs) => now - self.state.bounce_start_time >= secs,
            None => false,
        }
    }

    fn advance_center(&mut self, rate: f64) -> bool {
        let keep = 1.0 - rate;
        self.state.position *= keep;
        self.state.scale = 1.0 + (self.state.scale - 1.0) * keep;

        let at_rest = self.state.position.x.abs() < CENTER_EPSILON
            && self.state.position.y.abs() < CENTER_EPSILON
            && (self.state.scale - 1.0).abs() < CENTER_EPSILON;
        if at_rest {
            self.state.position = DVec2::ZERO;
            self.state.scale = 1.0;
        }
        at_rest
    }
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new(GasketRng::from_entropy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> AnimationEngine {
        AnimationEngine::new(GasketRng::new(42))
    }

    /// Tick until the engine leaves `Running`, returning the tick count
    fn run_to_end(engine: &mut AnimationEngine, seq: &Sequence, speed: f64) -> u64 {
        let mut guard = 0;
        while engine.is_running() {
            engine.tick(seq, speed, 0.0);
            guard += 1;
            assert!(guard < 100_000, "sequence never completed");
        }
        engine.ticks()
    }

    #[test]
    fn new_engine_is_idle_and_inert() {
        let mut e = engine();
        let seq = Sequence::with_defaults();
        let out = e.tick(&seq, 1.0, 0.0);
        assert_eq!(e.phase(), EnginePhase::Idle);
        assert!(!out.advanced);
        assert_eq!(out.transform, Mat4::IDENTITY);
    }

    #[test]
    fn rates_scale_linearly() {
        let r = TickRates::for_speed(2.0);
        assert_eq!(r.rotation, 4.0);
        assert_eq!(r.scale, 0.04);
        assert_eq!(r.movement, 0.06);
        assert_eq!(r.return_rate, 0.04);
        assert_eq!(TickRates::for_speed(f64::NAN).rotation, 0.0);
        assert_eq!(TickRates::for_speed(-1.0).scale, 0.0);
    }

    #[test]
    fn rotate_z_180_takes_90_ticks() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::rotate(Axis::Z, 180.0)]);
        e.start(&seq);

        for _ in 0..89 {
            let out = e.tick(&seq, 1.0, 0.0);
            assert!(!out.action_completed);
        }
        let out = e.tick(&seq, 1.0, 0.0);
        assert!(out.action_completed && out.sequence_finished);
        assert_eq!(e.ticks(), 90);
        assert_eq!(e.state().cumulative_rotation.z, 180.0);
        assert_eq!(e.state().step_angle.z, 0.0);
        assert_eq!(e.phase(), EnginePhase::Complete);
    }

    #[test]
    fn rotate_commits_exact_degrees_at_any_speed() {
        for speed in [0.3, 0.7, 1.0, 1.9, 7.5] {
            let mut e = engine();
            let seq = Sequence::from_actions(vec![
                Action::rotate(Axis::X, 97.3),
                Action::rotate(Axis::X, -33.1),
            ]);
            e.start(&seq);
            run_to_end(&mut e, &seq, speed);
            assert_eq!(e.state().cumulative_rotation.x, 97.3 + -33.1);
            assert_eq!(e.state().step_angle.x, 0.0);
        }
    }

    #[test]
    fn negative_rotation_moves_backward() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::rotate(Axis::Y, -10.0)]);
        e.start(&seq);
        e.tick(&seq, 1.0, 0.0);
        assert_eq!(e.state().step_angle.y, -2.0);
        assert_eq!(e.state().rotation(Axis::Y), -2.0);
    }

    #[test]
    fn completed_rotations_persist_across_axes() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![
            Action::rotate(Axis::X, 4.0),
            Action::rotate(Axis::Z, 10.0),
        ]);
        e.start(&seq);
        // X completes on tick 2, first Z step on tick 3
        for _ in 0..3 {
            e.tick(&seq, 1.0, 0.0);
        }
        assert_eq!(e.state().rotation(Axis::X), 4.0);
        assert_eq!(e.state().rotation(Axis::Z), 2.0);
    }

    #[test]
    fn scale_to_two_takes_50_ticks_and_snaps() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::scale(2.0)]);
        e.start(&seq);
        assert_eq!(run_to_end(&mut e, &seq, 1.0), 50);
        assert_eq!(e.state().scale, 2.0);
    }

    #[test]
    fn scale_down_snaps_exactly() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::scale(0.37)]);
        e.start(&seq);
        run_to_end(&mut e, &seq, 1.3);
        assert_eq!(e.state().scale, 0.37);
    }

    #[test]
    fn center_snaps_to_rest() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::Center]);
        e.start(&seq);
        e.state.position = DVec2::new(2.0, -0.8);
        e.state.scale = 3.0;

        run_to_end(&mut e, &seq, 1.0);
        assert_eq!(e.state().position, DVec2::ZERO);
        assert_eq!(e.state().scale, 1.0);
        assert_eq!(e.transform(), Mat4::IDENTITY);
    }

    #[test]
    fn center_at_rest_completes_in_one_tick() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::Center]);
        e.start(&seq);
        assert_eq!(run_to_end(&mut e, &seq, 1.0), 1);
    }

    #[test]
    fn bounce_reflects_off_right_wall() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::bounce_forever()]);
        e.start(&seq);
        e.state.position = DVec2::new(2.49, 0.0);
        e.state.bounce_angle = 0.0;

        let out = e.tick(&seq, 1.0, 0.0);

        assert!(out.reflected);
        assert!((e.state().bounce_angle - PI).abs() <= BOUNCE_JITTER);
        let limit = e.bounds().half_width + TickRates::for_speed(1.0).movement;
        assert!(e.state().position.x.abs() <= limit);
        assert!(e.state().position.x < 2.49);
    }

    #[test]
    fn bounce_reflects_off_corner_on_both_axes() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::bounce_forever()]);
        e.start(&seq);
        e.state.position = DVec2::new(2.49, 0.99);
        let theta = PI / 4.0;
        e.state.bounce_angle = theta;

        let out = e.tick(&seq, 1.0, 0.0);

        assert!(out.reflected);
        // -(π - θ) with jitter from two reflections
        let expected = -(PI - theta);
        assert!((e.state().bounce_angle - expected).abs() <= 2.0 * BOUNCE_JITTER);
        assert!(e.state().position.x < 2.49);
        assert!(e.state().position.y < 0.99);
    }

    #[test]
    fn bounce_without_contact_keeps_heading() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::bounce_forever()]);
        e.start(&seq);
        e.state.bounce_angle = 0.5;

        let out = e.tick(&seq, 1.0, 0.0);

        assert!(!out.reflected);
        assert_eq!(e.state().bounce_angle, 0.5);
        let expected = DVec2::new(0.5f64.cos(), 0.5f64.sin()) * 0.03;
        assert!(e.state().position.abs_diff_eq(expected, 1e-12));
    }

    #[test]
    fn bounce_stays_in_region_over_many_ticks() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::bounce_forever()]);
        e.start(&seq);
        let speed = TickRates::for_speed(1.0).movement;
        for _ in 0..5_000 {
            e.tick(&seq, 1.0, 0.0);
            let p = e.state().position;
            assert!(p.x.abs() <= 2.5 + 2.0 * speed);
            assert!(p.y.abs() <= 1.0 + 2.0 * speed);
        }
        assert!(e.is_running());
    }

    #[test]
    fn timed_bounce_runs_about_300_ticks_at_60hz() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::bounce_for(5.0)]);
        e.start(&seq);

        let mut tick = 0u32;
        while e.is_running() {
            tick += 1;
            e.tick(&seq, 1.0, tick as f64 / 60.0);
            assert!(tick < 1_000);
        }
        assert!((299..=302).contains(&tick), "took {} ticks", tick);
    }

    #[test]
    fn pause_freezes_bounce_time() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::bounce_for(2.0)]);
        e.start(&seq);

        e.tick(&seq, 1.0, 0.0);
        e.tick(&seq, 1.0, 1.0);
        assert!(e.stop(1.0));
        assert_eq!(e.phase(), EnginePhase::Paused);

        // Ticks while paused do nothing
        let out = e.tick(&seq, 1.0, 50.0);
        assert!(!out.advanced);

        assert!(e.resume(100.0));
        let out = e.tick(&seq, 1.0, 100.5);
        assert!(!out.action_completed);
        let out = e.tick(&seq, 1.0, 101.0);
        assert!(out.action_completed);
        assert_eq!(e.phase(), EnginePhase::Complete);
    }

    #[test]
    fn stop_and_resume_preserve_progress() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::rotate(Axis::Z, 20.0)]);
        e.start(&seq);
        for _ in 0..3 {
            e.tick(&seq, 1.0, 0.0);
        }
        assert_eq!(e.toggle(&seq, 0.0), EnginePhase::Paused);
        assert_eq!(e.state().step_angle.z, 6.0);
        assert_eq!(e.toggle(&seq, 0.0), EnginePhase::Running);
        assert_eq!(e.state().step_angle.z, 6.0);
        e.tick(&seq, 1.0, 0.0);
        assert_eq!(e.state().step_angle.z, 8.0);
    }

    #[test]
    fn stop_and_resume_reject_wrong_phase() {
        let mut e = engine();
        assert!(!e.stop(0.0));
        assert!(!e.resume(0.0));
    }

    #[test]
    fn n_actions_complete_and_index_wraps() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![
            Action::rotate(Axis::X, 4.0),
            Action::scale(1.04),
            Action::Unsupported,
            Action::bounce_for(0.0),
            Action::Center,
        ]);
        e.start(&seq);

        let mut completions = 0;
        while e.is_running() {
            if e.tick(&seq, 1.0, 0.0).action_completed {
                completions += 1;
            }
        }
        assert_eq!(completions, seq.len());
        assert_eq!(e.phase(), EnginePhase::Complete);
        assert_eq!(e.state().sequence_index, 0);
    }

    #[test]
    fn unsupported_action_completes_immediately_without_effect() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::Unsupported]);
        e.start(&seq);
        let out = e.tick(&seq, 1.0, 0.0);
        assert!(out.action_completed && out.sequence_finished);
        assert_eq!(out.transform, Mat4::IDENTITY);
    }

    #[test]
    fn non_finite_parameters_are_inert() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![
            Action::rotate(Axis::X, f64::NAN),
            Action::scale(f64::INFINITY),
            Action::bounce_for(f64::NAN),
        ]);
        e.start(&seq);
        assert_eq!(run_to_end(&mut e, &seq, 1.0), 3);
        assert_eq!(e.state().position, DVec2::ZERO);
        assert_eq!(e.transform(), Mat4::IDENTITY);
    }

    #[test]
    fn empty_sequence_completes_on_start() {
        let mut e = engine();
        let seq = Sequence::new();
        e.start(&seq);
        assert_eq!(e.phase(), EnginePhase::Complete);
        assert_eq!(e.ticks(), 0);
        assert!(!e.tick(&seq, 1.0, 0.0).advanced);
    }

    #[test]
    fn complete_freezes_last_frame() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![
            Action::rotate(Axis::Z, 90.0),
            Action::scale(2.0),
        ]);
        e.start(&seq);
        run_to_end(&mut e, &seq, 1.0);

        let frozen = e.transform();
        assert_ne!(frozen, Mat4::IDENTITY);
        assert_eq!(e.tick(&seq, 1.0, 0.0).transform, frozen);
        assert_eq!(e.state().scale, 2.0);
        assert_eq!(e.state().cumulative_rotation.z, 90.0);
    }

    #[test]
    fn restart_after_complete_resets_everything() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::scale(1.1)]);
        e.start(&seq);
        run_to_end(&mut e, &seq, 1.0);
        assert_eq!(e.toggle(&seq, 0.0), EnginePhase::Running);
        assert_eq!(e.state().scale, 1.0);
        assert_eq!(e.ticks(), 0);
    }

    #[test]
    fn reset_returns_to_idle_identity() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::scale(3.0)]);
        e.start(&seq);
        e.tick(&seq, 1.0, 0.0);
        e.reset();
        assert_eq!(e.phase(), EnginePhase::Idle);
        assert_eq!(e.transform(), Mat4::IDENTITY);
    }

    #[test]
    fn cleared_sequence_completes_running_engine() {
        let mut e = engine();
        let mut seq = Sequence::from_actions(vec![
            Action::rotate(Axis::Z, 2.0),
            Action::rotate(Axis::Z, 90.0),
        ]);
        e.start(&seq);
        e.tick(&seq, 1.0, 0.0);
        assert_eq!(e.state().sequence_index, 1);

        seq.clear();
        let out = e.tick(&seq, 1.0, 0.0);
        assert!(out.sequence_finished);
        assert_eq!(e.phase(), EnginePhase::Complete);
        assert_eq!(e.state().cumulative_rotation.z, 2.0);
    }

    #[test]
    fn removing_running_rotate_freezes_partial_turn() {
        let mut e = engine();
        let mut seq = Sequence::from_actions(vec![Action::rotate(Axis::Z, 90.0)]);
        e.start(&seq);
        for _ in 0..10 {
            e.tick(&seq, 1.0, 0.0);
        }

        seq.remove_at(0);
        let last = e.tick(&seq, 1.0, 0.0);
        assert!(last.sequence_finished);
        assert_eq!(e.state().cumulative_rotation.z, 20.0);
        assert_eq!(e.tick(&seq, 1.0, 0.0).transform, last.transform);
    }

    #[test]
    fn removing_an_earlier_action_keeps_the_current_one() {
        let mut e = engine();
        let mut seq = Sequence::from_actions(vec![
            Action::Unsupported,
            Action::rotate(Axis::Y, 90.0),
            Action::Center,
        ]);
        e.start(&seq);
        e.tick(&seq, 1.0, 0.0);
        e.tick(&seq, 1.0, 0.0);
        assert_eq!(e.current_action(&seq), Some(&Action::rotate(Axis::Y, 90.0)));

        seq.remove_at(0);
        e.action_removed(0);
        assert_eq!(e.current_action(&seq), Some(&Action::rotate(Axis::Y, 90.0)));
        assert_eq!(e.state().step_angle.y, 2.0);
    }

    #[test]
    fn removing_the_current_action_starts_the_next_fresh() {
        let mut e = engine();
        let mut seq = Sequence::from_actions(vec![
            Action::rotate(Axis::X, 90.0),
            Action::rotate(Axis::X, 4.0),
        ]);
        e.start(&seq);
        for _ in 0..5 {
            e.tick(&seq, 1.0, 0.0);
        }

        seq.remove_at(0);
        e.action_removed(0);
        assert_eq!(e.state().rotation(Axis::X), 10.0);
        assert_eq!(e.state().step_angle.x, 0.0);

        run_to_end(&mut e, &seq, 1.0);
        assert_eq!(e.state().cumulative_rotation.x, 14.0);
    }

    #[test]
    fn removal_is_ignored_when_not_running() {
        let mut e = engine();
        e.action_removed(0);
        assert_eq!(e.phase(), EnginePhase::Idle);
        assert_eq!(e.state().sequence_index, 0);
    }

    #[test]
    fn nan_bounce_from_file_text_completes() {
        let seq = Sequence::from_toml_str("[[actions]]\ntype = \"bounce\"\nduration = nan\n").unwrap();
        let mut e = engine();
        e.start(&seq);
        let mut now = 0.0;
        for _ in 0..10 {
            now += 1.0 / 60.0;
            e.tick(&seq, 1.0, now);
        }
        assert_eq!(e.phase(), EnginePhase::Complete);
    }

    #[test]
    fn current_action_tracks_index() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::Center, Action::scale(2.0)]);
        assert_eq!(e.current_action(&seq), None);
        e.start(&seq);
        assert_eq!(e.current_action(&seq), Some(&Action::Center));
        e.tick(&seq, 1.0, 0.0);
        assert_eq!(e.current_action(&seq), Some(&Action::scale(2.0)));
    }

    struct CountingRenderer {
        frames: Vec<Mat4>,
    }

    impl Renderer for CountingRenderer {
        fn render_frame(&mut self, transform: Mat4, _triangles: &TriangleStream) {
            self.frames.push(transform);
        }
    }

    #[test]
    fn tick_and_render_emits_every_frame() {
        let mut e = engine();
        let seq = Sequence::from_actions(vec![Action::rotate(Axis::Z, 4.0)]);
        let triangles = TriangleStream::default();
        let mut renderer = CountingRenderer { frames: Vec::new() };

        e.start(&seq);
        for _ in 0..3 {
            e.tick_and_render(&seq, 1.0, 0.0, &triangles, &mut renderer);
        }

        // Two ticks to finish, one frozen frame after
        assert_eq!(renderer.frames.len(), 3);
        assert_eq!(renderer.frames[1], renderer.frames[2]);
        assert_ne!(renderer.frames[0], renderer.frames[1]);
    }
}
