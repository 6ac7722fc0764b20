use std::fmt;

/// Error returned by [`Display::new`](super::Display::new) and
/// [`Display::with_config`](super::Display::with_config).
#[derive(Debug)]
pub enum CreateError {
    /// Construction was asked for a zero-area window.
    ZeroSize { width: u32, height: u32 },
    /// The platform event loop could not be created.
    EventLoop(winit::error::EventLoopError),
    /// The platform refused to create the window.
    Window(winit::error::OsError),
    /// The platform never delivered the window after the creation request.
    WindowNeverCreated,
    /// The rendering surface could not be created for the window.
    Surface(wgpu::CreateSurfaceError),
    /// No GPU adapter is compatible with the surface.
    Adapter(wgpu::RequestAdapterError),
    /// The adapter refused the device request.
    Device(wgpu::RequestDeviceError),
    /// The surface reports no usable texture formats.
    NoSurfaceFormat,
}

impl fmt::Display for CreateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateError::ZeroSize { width, height } => {
                write!(f, "display size must be non-zero, got {width}x{height}")
            }
            CreateError::EventLoop(e) => write!(f, "failed to create event loop: {e}"),
            CreateError::Window(e) => write!(f, "failed to create window: {e}"),
            CreateError::WindowNeverCreated => {
                write!(f, "platform did not deliver a window")
            }
            CreateError::Surface(e) => write!(f, "failed to create rendering surface: {e}"),
            CreateError::Adapter(e) => write!(f, "no compatible GPU adapter: {e}"),
            CreateError::Device(e) => write!(f, "failed to acquire GPU device: {e}"),
            CreateError::NoSurfaceFormat => write!(f, "surface reports no texture formats"),
        }
    }
}

impl std::error::Error for CreateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CreateError::EventLoop(e) => Some(e),
            CreateError::Window(e) => Some(e),
            CreateError::Surface(e) => Some(e),
            CreateError::Adapter(e) => Some(e),
            CreateError::Device(e) => Some(e),
            _ => None,
        }
    }
}
