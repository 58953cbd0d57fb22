//! Keyboard bindings

use gasket_animation::ActionKind;
use winit::keyboard::KeyCode;

/// Everything the user can ask the viewer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start, pause or resume
    ToggleRun,
    Append(ActionKind),
    SelectPrevious,
    SelectNext,
    /// Step the selected action's parameter down
    EditDecrease,
    /// Step the selected action's parameter up
    EditIncrease,
    RemoveSelected,
    ClearSequence,
    ResetSequence,
    DepthUp,
    DepthDown,
    SpeedUp,
    SpeedDown,
    ToggleRandomColors,
    /// Move one face to the next palette color
    CycleFaceColor(usize),
    ToggleFullscreen,
    Quit,
}

pub fn command_for_key(key: KeyCode) -> Option<Command> {
    let command = match key {
        KeyCode::Space => Command::ToggleRun,
        KeyCode::Digit1 | KeyCode::Numpad1 => Command::Append(ActionKind::RotateX),
        KeyCode::Digit2 | KeyCode::Numpad2 => Command::Append(ActionKind::RotateY),
        KeyCode::Digit3 | KeyCode::Numpad3 => Command::Append(ActionKind::RotateZ),
        KeyCode::Digit4 | KeyCode::Numpad4 => Command::Append(ActionKind::Scale),
        KeyCode::Digit5 | KeyCode::Numpad5 => Command::Append(ActionKind::Bounce),
        KeyCode::Digit6 | KeyCode::Numpad6 => Command::Append(ActionKind::Center),
        KeyCode::ArrowLeft => Command::SelectPrevious,
        KeyCode::ArrowRight => Command::SelectNext,
        KeyCode::BracketLeft => Command::EditDecrease,
        KeyCode::BracketRight => Command::EditIncrease,
        KeyCode::Backspace => Command::RemoveSelected,
        KeyCode::Delete => Command::ClearSequence,
        KeyCode::KeyR => Command::ResetSequence,
        KeyCode::ArrowUp => Command::DepthUp,
        KeyCode::ArrowDown => Command::DepthDown,
        KeyCode::Equal | KeyCode::NumpadAdd => Command::SpeedUp,
        KeyCode::Minus | KeyCode::NumpadSubtract => Command::SpeedDown,
        KeyCode::KeyC => Command::ToggleRandomColors,
        KeyCode::F1 => Command::CycleFaceColor(0),
        KeyCode::F2 => Command::CycleFaceColor(1),
        KeyCode::F3 => Command::CycleFaceColor(2),
        KeyCode::F4 => Command::CycleFaceColor(3),
        KeyCode::F11 => Command::ToggleFullscreen,
        KeyCode::Escape => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Key / description pairs for the startup banner
pub const CONTROLS: &[(&str, &str)] = &[
    ("Space", "Start / pause / resume"),
    ("1 2 3", "Append rotate X / Y / Z"),
    ("4", "Append scale"),
    ("5", "Append bounce"),
    ("6", "Append center"),
    ("Left/Right", "Select previous / next action"),
    ("[ ]", "Edit selected action (-/+ 90°, 0.1×, 0.5s)"),
    ("Backspace", "Remove selected action"),
    ("Delete", "Clear sequence"),
    ("R", "Reset to default sequence"),
    ("Up/Down", "Subdivision depth +/- 1"),
    ("+/-", "Speed +/- 0.2"),
    ("C", "Toggle random colors on bounce"),
    ("F1-F4", "Cycle a face color"),
    ("F11", "Toggle fullscreen"),
    ("Escape", "Exit"),
];
