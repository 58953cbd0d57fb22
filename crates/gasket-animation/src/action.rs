//! Symbolic animation actions

use gasket_core::Axis;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of an animation script.
///
/// Serialized as an internally tagged table, e.g.
/// `{ type = "rotate", axis = "Z", degrees = 180.0 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Rotate about one axis by a signed number of degrees
    Rotate { axis: Axis, degrees: f64 },
    /// Grow or shrink toward a uniform scale factor
    Scale {
        #[serde(alias = "scale")]
        target: f64,
    },
    /// Drift around the bounce rectangle. `None` runs forever.
    Bounce {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<f64>,
    },
    /// Ease back to the origin at unit scale
    Center,
    /// Any unrecognized tag. Contributes nothing and completes at once.
    #[serde(other)]
    Unsupported,
}

/// The kinds of action the edit surface can append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    RotateX,
    RotateY,
    RotateZ,
    Scale,
    Bounce,
    Center,
}

/// Numeric parameters that can be edited in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionField {
    Degrees,
    Scale,
    Duration,
}

impl Action {
    pub const DEFAULT_ROTATION_DEGREES: f64 = 360.0;
    pub const DEFAULT_SCALE_TARGET: f64 = 1.0;
    pub const DEFAULT_BOUNCE_SECONDS: f64 = 5.0;

    pub fn rotate(axis: Axis, degrees: f64) -> Self {
        Action::Rotate { axis, degrees }
    }

    pub fn scale(target: f64) -> Self {
        Action::Scale { target }
    }

    pub fn bounce_for(seconds: f64) -> Self {
        Action::Bounce {
            duration: Some(seconds),
        }
    }

    pub fn bounce_forever() -> Self {
        Action::Bounce { duration: None }
    }

    /// A fresh action of `kind` with the edit surface's starting values
    pub fn from_kind(kind: ActionKind) -> Self {
        match kind {
            ActionKind::RotateX => Action::rotate(Axis::X, Self::DEFAULT_ROTATION_DEGREES),
            ActionKind::RotateY => Action::rotate(Axis::Y, Self::DEFAULT_ROTATION_DEGREES),
            ActionKind::RotateZ => Action::rotate(Axis::Z, Self::DEFAULT_ROTATION_DEGREES),
            ActionKind::Scale => Action::scale(Self::DEFAULT_SCALE_TARGET),
            ActionKind::Bounce => Action::bounce_for(Self::DEFAULT_BOUNCE_SECONDS),
            ActionKind::Center => Action::Center,
        }
    }

    /// Set one numeric parameter. Returns false, leaving the action untouched,
    /// when the field does not belong to this variant or the value is not finite.
    pub fn set_field(&mut self, field: ActionField, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match (self, field) {
            (Action::Rotate { degrees, .. }, ActionField::Degrees) => *degrees = value,
            (Action::Scale { target }, ActionField::Scale) => *target = value,
            (Action::Bounce { duration }, ActionField::Duration) => *duration = Some(value),
            _ => return false,
        }
        true
    }

    /// Bounces without a duration never complete on their own
    pub fn is_endless(&self) -> bool {
        matches!(self, Action::Bounce { duration: None })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Rotate { axis, degrees } => write!(f, "Rotate {}: {}°", axis, degrees),
            Action::Scale { target } => write!(f, "Scale to: {}×", target),
            Action::Bounce {
                duration: Some(secs),
            } => write!(f, "Bounce for: {}s", secs),
            Action::Bounce { duration: None } => f.write_str("Bounce: forever"),
            Action::Center => f.write_str("Center"),
            Action::Unsupported => f.write_str("Unsupported"),
        }
    }
}
