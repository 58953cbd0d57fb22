//! Gasket Player - interactive viewer library
//!
//! `Session` holds all mutable viewer state and is driven either by the
//! windowed `GasketApp` or by the headless capture in the binary.

mod app;
pub mod capture;
pub mod controls;
pub mod session;

pub use app::GasketApp;
pub use capture::{capture_frames, CaptureOptions};
pub use controls::{command_for_key, Command, CONTROLS};
pub use session::{HostRequest, Session};
