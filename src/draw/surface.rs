//! Fixed-size raster surface that accumulates strokes.

use super::color::Color;
use super::render::{render_background, render_segment};
use super::style::StrokeStyle;
use crate::util::Point;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Largest edge accepted for a surface, in pixels.
pub const MAX_DIMENSION: u32 = 8192;

/// Errors raised while creating or encoding a surface.
#[derive(Debug, Error)]
pub enum DrawError {
    #[error("Invalid surface size {width}x{height} (each edge must be 1-8192)")]
    InvalidSize { width: u32, height: u32 },

    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] cairo::IoError),
}

/// Raster bitmap with an opaque background fill.
///
/// The surface never resizes. No Cairo context is kept alive between calls;
/// each mutation opens a short-lived one so the pixel buffer stays exclusively
/// owned and readable.
pub struct Surface {
    image: cairo::ImageSurface,
    background: Color,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("background", &self.background)
            .finish()
    }
}

impl Surface {
    /// Creates a `width` x `height` surface filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self, DrawError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(DrawError::InvalidSize { width, height });
        }

        let image =
            cairo::ImageSurface::create(cairo::Format::ARgb32, width as i32, height as i32)?;
        let surface = Self {
            image,
            // Strokes are composited over the fill; a translucent background
            // would let erased areas show through.
            background: Color { a: 1.0, ..background },
        };
        surface.fill_background()?;
        log::debug!("Created {}x{} surface", width, height);
        Ok(surface)
    }

    pub fn width(&self) -> u32 {
        self.image.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.image.height() as u32
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Repaints every pixel with the background color.
    pub fn fill_background(&self) -> Result<(), DrawError> {
        let ctx = cairo::Context::new(&self.image)?;
        render_background(&ctx, self.background)?;
        Ok(())
    }

    /// Strokes a single segment onto the bitmap.
    pub fn stroke_segment(
        &self,
        from: Point,
        to: Point,
        style: StrokeStyle,
    ) -> Result<(), DrawError> {
        let ctx = cairo::Context::new(&self.image)?;
        render_segment(&ctx, from, to, style)?;
        Ok(())
    }

    /// Encodes the current contents as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, DrawError> {
        self.image.flush();
        let mut buffer = Vec::new();
        self.image.write_to_png(&mut buffer)?;
        Ok(buffer)
    }

    /// Encodes the contents as a `data:image/png;base64,...` URL.
    pub fn encode_data_url(&self) -> Result<String, DrawError> {
        let png = self.encode_png()?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }

    /// Reads one pixel as straight RGBA. Returns `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }

        let stride = self.image.stride() as usize;
        let offset = y as usize * stride + x as usize * 4;
        let mut pixel = None;
        self.image
            .with_data(|data| {
                if let Some(bytes) = data.get(offset..offset + 4) {
                    pixel = Some(unpremultiply(u32::from_ne_bytes([
                        bytes[0], bytes[1], bytes[2], bytes[3],
                    ])));
                }
            })
            .ok()?;
        pixel
    }

    /// Copies the raw premultiplied ARGB32 buffer.
    pub fn raw_pixels(&self) -> Vec<u8> {
        let mut copy = Vec::new();
        if let Err(err) = self.image.with_data(|data| copy.extend_from_slice(data)) {
            log::warn!("Could not read surface pixels: {}", err);
        }
        copy
    }
}

/// Converts a native-endian premultiplied ARGB32 word into straight RGBA.
fn unpremultiply(word: u32) -> [u8; 4] {
    let a = (word >> 24) & 0xff;
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let channel = |shift: u32| {
        let premultiplied = (word >> shift) & 0xff;
        ((premultiplied * 255 + a / 2) / a).min(255) as u8
    };
    [channel(16), channel(8), channel(0), a as u8]
}
