//! Tile rendering
//!
//! There is no frame buffer. The renderer walks the damaged part of the
//! screen one tile at a time: the surface is clipped to the tile and
//! cleared, every object overlapping the tile draws itself, and the tile
//! is pushed to the display.

mod renderer;

pub use renderer::{FrameStats, RenderError, Renderer};

use nanotile_transport::TransportError;

use crate::geometry::{Point, Rect};

/// Monochrome pixel value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    /// Pixel dark
    #[default]
    Off,
    /// Pixel lit
    On,
}

impl Color {
    /// The other value
    pub const fn inverted(self) -> Self {
        match self {
            Color::Off => Color::On,
            Color::On => Color::Off,
        }
    }
}

/// Surface failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceError {
    /// Pushing the tile to the display failed
    Transport(TransportError),
    /// Clip rect lies outside the display
    OutOfBounds,
    /// Clip rect does not fit the tile buffer
    TileTooLarge,
    /// Clip rect does not fall on the controller's addressing grid
    Unaligned,
}

impl From<TransportError> for SurfaceError {
    fn from(err: TransportError) -> Self {
        SurfaceError::Transport(err)
    }
}

/// 1-bpp image in controller page order
///
/// Each byte is a column of eight vertical pixels, least significant bit
/// on top. Pages of `width` bytes follow each other top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap<'a> {
    width: u16,
    height: u16,
    data: &'a [u8],
}

impl<'a> Bitmap<'a> {
    /// Wrap page-ordered pixel data
    ///
    /// Pixels beyond the end of `data` read as unset.
    pub const fn new(width: u16, height: u16, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Width in pixels
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Check if the pixel at `(x, y)` is set
    pub fn pixel(&self, x: u16, y: u16) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = (y as usize / 8) * self.width as usize + x as usize;
        self.data
            .get(index)
            .is_some_and(|byte| byte & (1 << (y % 8)) != 0)
    }
}

/// Drawing target for one tile at a time
///
/// Drawing outside the clip rect is silently cut off.
pub trait Surface {
    /// Current clip rect in screen coordinates
    fn clip(&self) -> Rect;

    /// Restrict drawing to `rect`
    fn set_clip(&mut self, rect: Rect) -> Result<(), SurfaceError>;

    /// Fill the whole clip rect
    fn clear(&mut self, color: Color) -> Result<(), SurfaceError>;

    /// Fill `rect`
    fn fill(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError>;

    /// Paint the set pixels of `bitmap` with `color`, top-left at `origin`
    fn blit(&mut self, origin: Point, bitmap: &Bitmap<'_>, color: Color)
        -> Result<(), SurfaceError>;

    /// Push the clipped area to the display
    fn flush_tile(&mut self) -> Result<(), SurfaceError>;
}
