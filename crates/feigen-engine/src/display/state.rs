/// Scroll-wheel movement.
///
/// `Lines` is "scroll lines" style input; `Pixels` is high precision
/// (touchpads). Positive values scroll away from the user.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    Lines(f32),
    Pixels(f32),
}

/// Pixel scrolls are folded into the line accumulator at this rate.
pub const WHEEL_PIXELS_PER_LINE: f32 = 20.0;

/// Platform-agnostic event driving [`DisplayState`].
///
/// The winit translation layer produces these; `DisplayState::apply` consumes
/// them. Keeping the enum free of platform types makes the bookkeeping
/// testable without a window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum StateEvent {
    /// The user or the platform asked for the window to go away.
    CloseRequested,
    /// The drawable area changed size (physical pixels).
    Resized { width: u32, height: u32 },
    /// The platform wants the contents repainted.
    RedrawRequested,
    /// The scroll wheel moved.
    Wheel(WheelDelta),
}

/// Bookkeeping state for a single display.
///
/// Holds the closed flag, the wheel accumulator, the redraw flag and the
/// current drawable size. All transitions go through [`apply`](Self::apply).
#[derive(Debug, Clone)]
pub struct DisplayState {
    closed: bool,
    width: u32,
    height: u32,
    wheel_lines: f32,
    redraw_requested: bool,
}

impl DisplayState {
    /// Creates state for a freshly opened display.
    ///
    /// A new display starts with a redraw pending so the first frame paints
    /// without waiting for the platform to ask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            closed: false,
            width,
            height,
            wheel_lines: 0.0,
            redraw_requested: true,
        }
    }

    /// Applies one event to the state.
    pub fn apply(&mut self, ev: StateEvent) {
        match ev {
            StateEvent::CloseRequested => {
                // Closing is one-way; nothing below ever clears this.
                self.closed = true;
            }

            StateEvent::Resized { width, height } => {
                // 0x0 arrives while minimized; the last drawable size stays
                // authoritative until the window comes back.
                if width == 0 || height == 0 {
                    return;
                }
                if (width, height) != (self.width, self.height) {
                    self.width = width;
                    self.height = height;
                    self.redraw_requested = true;
                }
            }

            StateEvent::RedrawRequested => {
                self.redraw_requested = true;
            }

            StateEvent::Wheel(delta) => {
                self.wheel_lines += match delta {
                    WheelDelta::Lines(y) => y,
                    WheelDelta::Pixels(y) => y / WHEEL_PIXELS_PER_LINE,
                };
            }
        }
    }

    /// Whether a close has been observed. Monotonic.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Current drawable size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Cumulative vertical scroll in wheel lines, rounded to nearest.
    pub fn wheel(&self) -> i32 {
        self.wheel_lines.round() as i32
    }

    /// Returns whether a repaint is due and clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}
