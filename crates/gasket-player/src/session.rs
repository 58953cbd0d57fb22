//! Interactive session: the single owner of config, sequence, geometry and engine

use crate::controls::Command;
use gasket_animation::{
    Action, ActionField, AnimationEngine, BounceBounds, EnginePhase, Renderer, Sequence,
    TickOutcome,
};
use gasket_core::{Color, GasketConfig, GasketRng, MAX_SUBDIVISION_DEPTH};
use gasket_geometry::GeometryBuilder;

pub const SPEED_STEP: f64 = 0.2;
pub const MIN_SPEED: f64 = 0.2;
pub const MAX_SPEED: f64 = 5.0;

/// Edit steps for `[` and `]`
pub const DEGREES_STEP: f64 = 90.0;
pub const SCALE_STEP: f64 = 0.1;
pub const DURATION_STEP: f64 = 0.5;

/// Colors a face steps through on `CycleFaceColor`
pub const FACE_PALETTE: [Color; 8] = [
    Color::rgb(1.0, 0.0, 0.0),
    Color::rgb(1.0, 0.5, 0.0),
    Color::rgb(1.0, 1.0, 0.0),
    Color::rgb(0.0, 1.0, 0.0),
    Color::rgb(0.0, 1.0, 1.0),
    Color::rgb(0.0, 0.0, 1.0),
    Color::rgb(1.0, 0.0, 1.0),
    Color::rgb(1.0, 1.0, 1.0),
];

/// Requests the session cannot satisfy itself and hands back to the window host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    Quit,
    ToggleFullscreen,
}

pub struct Session {
    config: GasketConfig,
    sequence: Sequence,
    geometry: GeometryBuilder,
    engine: AnimationEngine,
    /// Index of the action the edit keys act on
    selected: usize,
    /// Separate stream for face recoloring so jitter stays reproducible
    color_rng: GasketRng,
}

impl Session {
    /// Seeded sessions are fully deterministic given the same clock readings
    pub fn new(config: GasketConfig, sequence: Sequence, seed: Option<u32>) -> Self {
        let mut seeder = match seed {
            Some(seed) => GasketRng::new(seed),
            None => GasketRng::from_entropy(),
        };
        let engine_seed = (seeder.next_f64() * u32::MAX as f64) as u32;
        let engine = AnimationEngine::new(GasketRng::new(engine_seed))
            .with_bounds(BounceBounds::from(config.bounce));
        let geometry = GeometryBuilder::new(config.subdivision_depth, config.face_colors);

        log::info!("Sequence:\n{}", sequence);

        Self {
            config,
            sequence,
            geometry,
            engine,
            selected: 0,
            color_rng: seeder,
        }
    }

    pub fn config(&self) -> &GasketConfig {
        &self.config
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn geometry(&self) -> &GeometryBuilder {
        &self.geometry
    }

    pub fn engine(&self) -> &AnimationEngine {
        &self.engine
    }

    /// Selected action index; meaningless while the sequence is empty
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn speed_factor(&self) -> f64 {
        self.config.speed_factor
    }

    pub fn random_colors(&self) -> bool {
        self.config.random_colors
    }

    /// Begin a run regardless of the current phase
    pub fn start(&mut self) {
        self.engine.start(&self.sequence);
    }

    /// Apply one user command at clock time `now`
    pub fn apply(&mut self, command: Command, now: f64) -> Option<HostRequest> {
        match command {
            Command::ToggleRun => {
                self.engine.toggle(&self.sequence, now);
            }
            Command::Append(kind) => {
                self.sequence.append_kind(kind);
                self.selected = self.sequence.len() - 1;
                self.sequence_changed();
            }
            Command::SelectPrevious => self.select(self.selected.saturating_sub(1)),
            Command::SelectNext => self.select(self.selected.saturating_add(1)),
            Command::EditDecrease => self.step_selected(-1.0),
            Command::EditIncrease => self.step_selected(1.0),
            Command::RemoveSelected => {
                if self.sequence.remove_at(self.selected).is_some() {
                    self.engine.action_removed(self.selected);
                    self.selected = self.selected.min(self.sequence.len().saturating_sub(1));
                    self.sequence_changed();
                }
            }
            Command::ClearSequence => {
                self.sequence.clear();
                self.selected = 0;
                self.sequence_changed();
            }
            Command::ResetSequence => {
                self.sequence.reset_to_default();
                self.selected = 0;
                self.sequence_changed();
            }
            Command::DepthUp => {
                self.set_depth(self.geometry.depth().saturating_add(1));
            }
            Command::DepthDown => {
                self.set_depth(self.geometry.depth().saturating_sub(1));
            }
            Command::SpeedUp => self.step_speed(SPEED_STEP),
            Command::SpeedDown => self.step_speed(-SPEED_STEP),
            Command::ToggleRandomColors => {
                self.config.random_colors = !self.config.random_colors;
                log::info!(
                    "Random colors on bounce: {}",
                    if self.config.random_colors { "on" } else { "off" }
                );
            }
            Command::CycleFaceColor(face) => self.cycle_face_color(face),
            Command::ToggleFullscreen => return Some(HostRequest::ToggleFullscreen),
            Command::Quit => return Some(HostRequest::Quit),
        }
        None
    }

    /// Change subdivision depth. A new mesh invalidates the running animation.
    pub fn set_depth(&mut self, depth: u32) {
        let depth = depth.min(MAX_SUBDIVISION_DEPTH);
        if self.geometry.set_depth(depth) {
            self.config.subdivision_depth = depth;
            self.engine.reset();
            log::info!(
                "Subdivision depth {} ({} triangles)",
                depth,
                self.geometry.stream().triangle_count()
            );
        }
    }

    /// Set the speed factor, rounded to one decimal and clamped to a usable range
    pub fn set_speed(&mut self, speed: f64) {
        self.apply_speed(speed, MIN_SPEED, MAX_SPEED);
    }

    /// Step the speed by `delta`. A configured speed outside the key range is
    /// never pulled back into it by a step in the other direction.
    pub fn step_speed(&mut self, delta: f64) {
        let current = self.config.speed_factor;
        self.apply_speed(current + delta, MIN_SPEED.min(current), MAX_SPEED.max(current));
    }

    fn apply_speed(&mut self, speed: f64, min: f64, max: f64) {
        let speed = ((speed * 10.0).round() / 10.0).clamp(min, max);
        if speed != self.config.speed_factor {
            self.config.speed_factor = speed;
            log::info!("Speed factor {:.1}", speed);
        }
    }

    fn select(&mut self, index: usize) {
        let Some(last) = self.sequence.len().checked_sub(1) else {
            return;
        };
        self.selected = index.min(last);
        if let Some(action) = self.sequence.get(self.selected) {
            log::info!("Selected {}: {}", self.selected + 1, action);
        }
    }

    /// Nudge the selected action's parameter one step in `direction`
    fn step_selected(&mut self, direction: f64) {
        let Some(action) = self.sequence.get(self.selected) else {
            return;
        };
        let edit = match *action {
            Action::Rotate { degrees, .. } => {
                Some((ActionField::Degrees, degrees + direction * DEGREES_STEP))
            }
            Action::Scale { target } => {
                let target = ((target + direction * SCALE_STEP) * 10.0).round() / 10.0;
                Some((ActionField::Scale, target.max(SCALE_STEP)))
            }
            Action::Bounce { duration } => {
                let secs = duration.unwrap_or(Action::DEFAULT_BOUNCE_SECONDS);
                Some((ActionField::Duration, (secs + direction * DURATION_STEP).max(0.0)))
            }
            Action::Center | Action::Unsupported => None,
        };
        if let Some((field, value)) = edit {
            if self.sequence.edit_at(self.selected, field, value) {
                self.sequence_changed();
            }
        }
    }

    fn cycle_face_color(&mut self, face: usize) {
        let Some(current) = self.geometry.face_colors().get(face).copied() else {
            return;
        };
        let next = FACE_PALETTE
            .iter()
            .position(|c| *c == current)
            .map_or(0, |i| (i + 1) % FACE_PALETTE.len());
        self.geometry.set_face_color(face, FACE_PALETTE[next]);
        log::info!("Face {} color {}", face + 1, FACE_PALETTE[next].to_hex());
    }

    /// Advance one frame and draw it
    pub fn tick_and_render<R: Renderer + ?Sized>(&mut self, now: f64, renderer: &mut R) -> TickOutcome {
        let outcome = self.engine.tick_and_render(
            &self.sequence,
            self.config.speed_factor,
            now,
            self.geometry.stream(),
            renderer,
        );
        self.after_tick(&outcome);
        outcome
    }

    fn after_tick(&mut self, outcome: &TickOutcome) {
        if outcome.reflected && self.config.random_colors {
            let colors = [
                self.color_rng.color(),
                self.color_rng.color(),
                self.color_rng.color(),
                self.color_rng.color(),
            ];
            self.geometry.set_face_colors(colors);
            log::debug!(
                "Recolored faces: {}",
                colors.map(|c| c.to_hex()).join(" ")
            );
        }
        if outcome.sequence_finished {
            log::info!("Sequence finished; press Space to run it again");
        }
    }

    fn sequence_changed(&mut self) {
        log::info!("Sequence:\n{}", self.sequence);
        if let Some(action) = self.sequence.get(self.selected) {
            log::info!("Selected {}: {}", self.selected + 1, action);
        }
    }

    /// One-line status for the window title
    pub fn status_line(&self) -> String {
        let phase = match self.engine.phase() {
            EnginePhase::Idle => "Idle",
            EnginePhase::Running => "Running",
            EnginePhase::Paused => "Paused",
            EnginePhase::Complete => "Complete",
        };
        let mut line = format!("Gasket | {}", phase);
        if let Some(action) = self.engine.current_action(&self.sequence) {
            line.push_str(&format!(
                " | {}/{} {}",
                self.engine.state().sequence_index + 1,
                self.sequence.len(),
                action
            ));
        } else {
            line.push_str(&format!(" | {} actions", self.sequence.len()));
        }
        line.push_str(&format!(
            " | speed {:.1} | depth {}",
            self.config.speed_factor,
            self.geometry.depth()
        ));
        line
    }
}
