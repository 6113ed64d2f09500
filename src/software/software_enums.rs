#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelBufferError {
    ContextCreationFailed,
    SurfaceCreationFailed,
    InvalidSize(u32, u32),
    InvalidSurfaceSize,
    ResizeFailed(u32, u32),
    BufferFetchFailed,
    BufferTooSmall,
    PresentFailed,
}

impl std::fmt::Display for PixelBufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelBufferError::ContextCreationFailed => {
                write!(f, "Failed to create pixel buffer context")
            }
            PixelBufferError::SurfaceCreationFailed => {
                write!(f, "Failed to create pixel buffer surface")
            }
            PixelBufferError::InvalidSize(width, height) => {
                write!(f, "Invalid size: {}x{}", width, height)
            }
            PixelBufferError::InvalidSurfaceSize => write!(f, "Pixel buffer surface size is zero"),
            PixelBufferError::ResizeFailed(width, height) => {
                write!(f, "Failed to resize pixel buffer surface to {}x{}", width, height)
            }
            PixelBufferError::BufferFetchFailed => write!(f, "Failed to fetch pixel buffer"),
            PixelBufferError::BufferTooSmall => write!(f, "Pixel buffer is too small"),
            PixelBufferError::PresentFailed => write!(f, "Failed to present pixel buffer"),
        }
    }
}

impl std::error::Error for PixelBufferError {}
