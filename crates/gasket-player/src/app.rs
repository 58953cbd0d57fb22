//! Viewer application implementing winit ApplicationHandler
//!
//! Owns the window and GPU renderer; every redraw advances the session by
//! one tick.

use crate::controls::command_for_key;
use crate::session::{HostRequest, Session};
use gasket_animation::{Clock, MonotonicClock};
use gasket_core::WindowConfig;
use gasket_render::GasketRenderer;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Fullscreen, Window, WindowId};

pub struct GasketApp {
    pub session: Session,
    clock: MonotonicClock,
    window_config: WindowConfig,
    autostart: bool,

    window: Option<Arc<Window>>,
    renderer: Option<GasketRenderer>,
    title: String,

    /// Set when startup failed; the event loop exits and `main` reports it
    error: Option<anyhow::Error>,
}

impl GasketApp {
    pub fn new(session: Session, window_config: WindowConfig, autostart: bool) -> Self {
        Self {
            session,
            clock: MonotonicClock::new(),
            window_config,
            autostart,
            window: None,
            renderer: None,
            title: String::new(),
            error: None,
        }
    }

    /// Startup failure recorded during the event loop, if any
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Gasket")
            .with_transparent(true)
            .with_inner_size(PhysicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs)?);

        if self.window_config.fullscreen {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let renderer = pollster::block_on(GasketRenderer::new(window.clone()))?;

        self.window = Some(window);
        self.renderer = Some(renderer);

        if self.autostart {
            self.session.start();
        }
        Ok(())
    }

    fn toggle_fullscreen(&self) {
        if let Some(window) = &self.window {
            if window.fullscreen().is_some() {
                window.set_fullscreen(None);
            } else {
                window.set_fullscreen(Some(Fullscreen::Borderless(None)));
            }
        }
    }

    fn update_title(&mut self) {
        let title = self.session.status_line();
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }

    fn frame(&mut self) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };
        renderer.sync_geometry(self.session.geometry());
        self.session.tick_and_render(self.clock.now(), renderer);
        self.update_title();
    }
}

impl ApplicationHandler for GasketApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.initialize(event_loop) {
            log::error!("Failed to initialize viewer: {:#}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(key_code) = event.physical_key else {
                    return;
                };
                let Some(command) = command_for_key(key_code) else {
                    return;
                };
                match self.session.apply(command, self.clock.now()) {
                    Some(HostRequest::Quit) => event_loop.exit(),
                    Some(HostRequest::ToggleFullscreen) => self.toggle_fullscreen(),
                    None => {}
                }
            }

            WindowEvent::RedrawRequested => {
                self.frame();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
