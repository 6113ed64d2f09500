//! Presentation of the drawing surface using the softbuffer crate.
//!
//! Every window owns exactly one [PixelBuffer]. Drawing happens on a
//! tiny-skia pixmap, which is copied into the softbuffer surface and
//! presented once the draw callback returns.

use std::{num::NonZeroU32, sync::Arc};

use tiny_skia::{Pixmap, PremultipliedColorU8};
use winit::window::Window as WinitWindow;

use crate::math::Point2;

mod software_enums;
pub use software_enums::*;

pub type SoftbufferSurface = softbuffer::Surface<Arc<WinitWindow>, Arc<WinitWindow>>;
pub type SoftbufferContext = softbuffer::Context<Arc<WinitWindow>>;

/// A wrapper around softbuffer to present a pixmap on a window.
pub struct PixelBuffer {
    _context: SoftbufferContext,
    surface: SoftbufferSurface,
    surface_size: Point2,
}

impl PixelBuffer {
    /// Creates the softbuffer context and surface for `window`.
    ///
    /// This is not thread-safe and must be called from the event loop thread.
    pub(crate) fn new(window: Arc<WinitWindow>) -> Result<Self, PixelBufferError> {
        let context = SoftbufferContext::new(window.clone())
            .map_err(|_| PixelBufferError::ContextCreationFailed)?;

        let surface = SoftbufferSurface::new(&context, window)
            .map_err(|_| PixelBufferError::SurfaceCreationFailed)?;

        Ok(PixelBuffer {
            _context: context,
            surface,
            surface_size: Point2::ZERO,
        })
    }

    /// Get the size of the surface in pixels.
    pub fn size(&self) -> Point2 {
        self.surface_size
    }

    pub(crate) fn resize(&mut self, size: Point2) -> Result<(), PixelBufferError> {
        let (width, height) = nonzero_size(size)?;

        self.surface
            .resize(width, height)
            .map_err(|_| PixelBufferError::ResizeFailed(width.get(), height.get()))?;

        self.surface_size = size;

        Ok(())
    }

    /// Copies `pixmap` into the surface and presents it.
    ///
    /// The pixmap must have the same size as the surface.
    pub(crate) fn present(&mut self, pixmap: &Pixmap) -> Result<(), PixelBufferError> {
        if self.surface_size.is_empty() {
            return Err(PixelBufferError::InvalidSurfaceSize);
        }

        let pixmap_size = Point2::new(pixmap.width(), pixmap.height());
        if pixmap_size != self.surface_size {
            return Err(PixelBufferError::InvalidSize(pixmap.width(), pixmap.height()));
        }

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|_| PixelBufferError::BufferFetchFailed)?;

        if buffer.len() < pixmap.pixels().len() {
            return Err(PixelBufferError::BufferTooSmall);
        }

        pack_pixels(pixmap.pixels(), &mut buffer);

        buffer
            .present()
            .map_err(|_| PixelBufferError::PresentFailed)
    }
}

fn nonzero_size(size: Point2) -> Result<(NonZeroU32, NonZeroU32), PixelBufferError> {
    let width = u32::try_from(size.x).ok().and_then(NonZeroU32::new);
    let height = u32::try_from(size.y).ok().and_then(NonZeroU32::new);

    match (width, height) {
        (Some(width), Some(height)) => Ok((width, height)),
        _ => Err(PixelBufferError::InvalidSize(
            size.x.max(0) as u32,
            size.y.max(0) as u32,
        )),
    }
}

/// Converts premultiplied RGBA pixels into softbuffer's `0RGB` layout.
///
/// Premultiplied components are exactly the result of compositing over
/// black, which is what a window without alpha shows.
pub(crate) fn pack_pixels(src: &[PremultipliedColorU8], dst: &mut [u32]) {
    for (out, pixel) in dst.iter_mut().zip(src) {
        *out = (pixel.red() as u32) << 16 | (pixel.green() as u32) << 8 | pixel.blue() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_premultiplied_pixels_as_0rgb() {
        let src = [
            PremultipliedColorU8::from_rgba(255, 0, 0, 255).unwrap(),
            PremultipliedColorU8::from_rgba(0, 128, 255, 255).unwrap(),
            PremultipliedColorU8::from_rgba(64, 0, 0, 128).unwrap(),
        ];
        let mut dst = [0xdeadbeef_u32; 3];

        pack_pixels(&src, &mut dst);

        assert_eq!(dst, [0x00ff0000, 0x000080ff, 0x00400000]);
    }

    #[test]
    fn packs_only_overlapping_range() {
        let src = [PremultipliedColorU8::from_rgba(1, 2, 3, 255).unwrap()];
        let mut dst = [7u32; 2];

        pack_pixels(&src, &mut dst);

        assert_eq!(dst, [0x00010203, 7]);
    }

    #[test]
    fn rejects_zero_and_negative_sizes() {
        assert_eq!(
            nonzero_size(Point2::new(0, 10)),
            Err(PixelBufferError::InvalidSize(0, 10))
        );
        assert_eq!(
            nonzero_size(Point2::new(-5, 10)),
            Err(PixelBufferError::InvalidSize(0, 10))
        );

        let (w, h) = nonzero_size(Point2::new(3, 4)).unwrap();
        assert_eq!((w.get(), h.get()), (3, 4));
    }
}
