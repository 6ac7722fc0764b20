use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use super::error::CreateError;
use super::state::{DisplayState, StateEvent, WheelDelta};

/// `resumed` fires on the first pump on desktop platforms; a few extra pumps
/// cover platforms that deliver it late.
const WINDOW_CREATE_PUMPS: usize = 8;

/// Owns the winit event loop and window, dispatching events on demand.
///
/// winit 0.30 drives applications through `ApplicationHandler` callbacks; the
/// pump extension runs the pending callbacks and returns immediately, which
/// is what a poll-style display needs.
pub(super) struct EventPump {
    // Field order doubles as drop order: the window held by `app` must go
    // down before the event loop it was created on.
    app: PumpApp,
    event_loop: EventLoop<()>,
}

impl EventPump {
    /// Creates the event loop and materializes the window.
    ///
    /// Must be called on the main thread.
    pub(super) fn new(
        title: &str,
        size: PhysicalSize<u32>,
    ) -> Result<(Self, Arc<Window>), CreateError> {
        let event_loop = EventLoop::new().map_err(CreateError::EventLoop)?;

        let mut pump = EventPump {
            event_loop,
            app: PumpApp {
                title: title.to_string(),
                initial_size: size,
                window: None,
                window_error: None,
                state: DisplayState::new(size.width, size.height),
            },
        };

        for _ in 0..WINDOW_CREATE_PUMPS {
            pump.pump();
            if let Some(e) = pump.app.window_error.take() {
                return Err(CreateError::Window(e));
            }
            if pump.app.window.is_some() {
                break;
            }
        }

        let window = pump
            .app
            .window
            .clone()
            .ok_or(CreateError::WindowNeverCreated)?;

        Ok((pump, window))
    }

    /// Dispatches all pending platform events without blocking.
    pub(super) fn pump(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app);

        if let PumpStatus::Exit(code) = status {
            // The platform tore the loop down (e.g. session end); from the
            // display's point of view that is a close.
            log::debug!("event loop exited with code {code}");
            self.app.state.apply(StateEvent::CloseRequested);
        }
    }

    pub(super) fn state(&self) -> &DisplayState {
        &self.app.state
    }

    pub(super) fn state_mut(&mut self) -> &mut DisplayState {
        &mut self.app.state
    }
}

/// `ApplicationHandler` backing [`EventPump`].
///
/// Creates the window on `resumed` and funnels the events the display cares
/// about into [`DisplayState`].
struct PumpApp {
    title: String,
    initial_size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    window_error: Option<winit::error::OsError>,
    state: DisplayState,
}

impl ApplicationHandler for PumpApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.initial_size);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                window.request_redraw();
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                log::error!("failed to create window: {e}");
                self.window_error = Some(e);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // The pump timeout governs; never let winit park the loop.
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = &self.window else { return };
        if window.id() != window_id {
            return;
        }

        if let Some(ev) = translate_window_event(window, &event) {
            self.state.apply(ev);
        }
    }
}

/// Translates a winit `WindowEvent` into a display `StateEvent`.
///
/// Returns `None` for events the display does not track.
fn translate_window_event(window: &Window, event: &WindowEvent) -> Option<StateEvent> {
    match event {
        WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(StateEvent::CloseRequested),

        WindowEvent::Resized(size) => Some(StateEvent::Resized {
            width: size.width,
            height: size.height,
        }),

        // The drawable size changes with the scale factor even though no
        // Resized event is guaranteed; re-read it from the window.
        WindowEvent::ScaleFactorChanged { .. } => {
            let size = window.inner_size();
            Some(StateEvent::Resized {
                width: size.width,
                height: size.height,
            })
        }

        WindowEvent::RedrawRequested => Some(StateEvent::RedrawRequested),

        WindowEvent::MouseWheel { delta, .. } => Some(StateEvent::Wheel(match delta {
            MouseScrollDelta::LineDelta(_, y) => WheelDelta::Lines(*y),
            MouseScrollDelta::PixelDelta(pos) => {
                let logical = pos.to_logical::<f64>(window.scale_factor());
                WheelDelta::Pixels(logical.y as f32)
            }
        })),

        _ => None,
    }
}
