//! Display: a window with an attached rendering context.
//!
//! Owns the `winit` event loop + window and the wgpu surface/device/queue
//! behind a poll-style API: construct, then loop `clear` → draw → `update`
//! until [`Display::is_closed`]. `update` presents the pending frame and
//! pumps platform events without blocking.

mod context;
mod error;
mod frame;
mod state;
mod window;

pub use context::{DEPTH_FORMAT, RenderContext, SurfaceErrorAction};
pub use error::CreateError;
pub use frame::{Frame, record_clear};
pub use state::{DisplayState, StateEvent, WHEEL_PIXELS_PER_LINE, WheelDelta};

use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::time::{FrameClock, FrameTime};
use window::EventPump;

/// Display construction options.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Window title.
    pub title: String,

    /// Initial drawable size in physical pixels. Must be non-zero.
    pub width: u32,
    pub height: u32,

    /// Synchronize presentation with the monitor refresh rate.
    pub vsync: bool,

    /// Pick an sRGB surface format when the surface offers one.
    pub prefer_srgb: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "feigen".to_string(),
            width: 1024,
            height: 768,
            vsync: true,
            prefer_srgb: true,
        }
    }
}

/// A window with an attached rendering context.
///
/// The frame lifecycle is explicit: [`clear`](Self::clear) acquires the next
/// surface texture and records a clear pass, draw passes are recorded on the
/// pending [`Frame`], and [`update`](Self::update) submits, presents and
/// pumps platform events. Constructing and updating must happen on the main
/// thread; winit requires it of the event loop.
pub struct Display {
    // Field order doubles as drop order: the in-flight frame and GPU context
    // go down before the window and event loop.
    pending: Option<Frame>,
    ctx: RenderContext,
    clock: FrameClock,
    last_time: FrameTime,
    window: Arc<Window>,
    pump: EventPump,
}

impl Display {
    /// Opens a titled window of the given size with a configured rendering
    /// context. See [`DisplayConfig`] for the remaining options.
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, CreateError> {
        Self::with_config(&DisplayConfig {
            title: title.to_string(),
            width,
            height,
            ..DisplayConfig::default()
        })
    }

    /// Opens a display with the full option set.
    pub fn with_config(config: &DisplayConfig) -> Result<Self, CreateError> {
        if config.width == 0 || config.height == 0 {
            return Err(CreateError::ZeroSize {
                width: config.width,
                height: config.height,
            });
        }

        let (pump, window) =
            EventPump::new(&config.title, PhysicalSize::new(config.width, config.height))?;

        let ctx = pollster::block_on(RenderContext::new(window.clone(), config))?;

        let (w, h) = ctx.size();
        log::info!("display open: \"{}\" {w}x{h}", config.title);

        let mut clock = FrameClock::new();
        let last_time = clock.tick();

        Ok(Self {
            pending: None,
            ctx,
            clock,
            last_time,
            window,
            pump,
        })
    }

    /// Finishes the pending frame (submit + present) and pumps platform
    /// events. Never blocks waiting for events.
    pub fn update(&mut self) {
        self.present_pending();
        self.pump.pump();

        // Reconcile the surface with the platform's latest drawable size.
        let (w, h) = self.pump.state().size();
        if (w, h) != self.ctx.size() {
            self.ctx.resize(PhysicalSize::new(w, h));
            log::debug!("surface resized to {w}x{h}");
        }

        self.last_time = self.clock.tick();
    }

    /// Whether a close has been observed. Monotonic: once true, stays true.
    pub fn is_closed(&self) -> bool {
        self.pump.state().is_closed()
    }

    /// Acquires the next frame and records a pass clearing the color
    /// attachment to `(r, g, b, a)` and the depth attachment to the far
    /// plane. Components are in `[0, 1]`.
    ///
    /// Surface trouble is handled internally: lost or outdated surfaces are
    /// reconfigured and the frame is skipped; out-of-memory closes the
    /// display. Calling `clear` again before `update` finishes the frame in
    /// flight first.
    pub fn clear(&mut self, r: f32, g: f32, b: f32, a: f32) {
        if self.is_closed() {
            return;
        }

        self.present_pending();

        let mut frame = match self.ctx.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let msg = err.to_string();
                match self.ctx.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured => {
                        log::warn!("surface reconfigured after error: {msg}");
                    }
                    SurfaceErrorAction::SkipFrame => {
                        log::warn!("skipping frame: {msg}");
                    }
                    SurfaceErrorAction::Fatal => {
                        log::error!("fatal surface error: {msg}; closing display");
                        self.pump.state_mut().apply(StateEvent::CloseRequested);
                    }
                }
                return;
            }
        };

        record_clear(
            &mut frame.encoder,
            &frame.view,
            Some(&frame.depth_view),
            wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            },
        );

        self.pending = Some(frame);
    }

    /// The frame started by [`clear`](Self::clear), for recording draw
    /// passes. `None` when no frame is pending.
    pub fn frame(&mut self) -> Option<&mut Frame> {
        self.pending.as_mut()
    }

    /// Cumulative vertical scroll since creation, in wheel lines rounded to
    /// nearest. Pixel-precise scrolls fold in at [`WHEEL_PIXELS_PER_LINE`].
    pub fn wheel(&self) -> i32 {
        self.pump.state().wheel()
    }

    /// Whether a repaint is due (platform redraw request, resize, or first
    /// frame). Reading clears the flag.
    pub fn needs_redraw(&mut self) -> bool {
        self.pump.state_mut().take_redraw()
    }

    /// Current surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        self.ctx.size()
    }

    /// Timing of the most recent [`update`](Self::update).
    pub fn frame_time(&self) -> FrameTime {
        self.last_time
    }

    /// The GPU context, for building shaders and custom resources.
    pub fn render_context(&self) -> &RenderContext {
        &self.ctx
    }

    fn present_pending(&mut self) {
        if let Some(frame) = self.pending.take() {
            self.window.pre_present_notify();
            self.ctx.submit(frame);
        }
    }
}
