//! Tile-sized 1-bpp canvas
//!
//! Holds only the pixels of the tile being drawn. Each tile is cleared,
//! painted by the objects that overlap it and pushed to the controller
//! before the next one starts.

use nanotile_core::{Bitmap, Color, Point, Rect, Surface, SurfaceError};
use nanotile_transport::Transport;

use crate::encoder::{ControllerEncoder, PAGE_HEIGHT};

/// Page-organized tile buffer of `BYTES` bytes bound to a display
///
/// A tile of `w` x `h` pixels needs `w * ceil(h / 8)` bytes.
pub struct TileCanvas<T, E, const BYTES: usize> {
    transport: T,
    encoder: E,
    clip: Rect,
    buffer: [u8; BYTES],
}

impl<T, E, const BYTES: usize> TileCanvas<T, E, BYTES>
where
    T: Transport,
    E: ControllerEncoder,
{
    /// Canvas drawing through `encoder` onto `transport`
    pub fn new(transport: T, encoder: E) -> Self {
        Self {
            transport,
            encoder,
            clip: Rect::EMPTY,
            buffer: [0; BYTES],
        }
    }

    /// Screen bounds
    pub fn bounds(&self) -> Rect {
        self.encoder.bounds()
    }

    /// The underlying transport, for controller setup
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The controller encoder
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Take the canvas apart
    pub fn into_parts(self) -> (T, E) {
        (self.transport, self.encoder)
    }

    /// Bytes of the current tile
    pub fn tile_bytes(&self) -> &[u8] {
        &self.buffer[..tile_len(&self.clip)]
    }

    /// Set one pixel; points outside the clip are ignored
    pub fn set_pixel(&mut self, point: Point, color: Color) {
        if !self.clip.contains(point) {
            return;
        }
        let (index, bit) = self.locate(point);
        match color {
            Color::On => self.buffer[index] |= bit,
            Color::Off => self.buffer[index] &= !bit,
        }
    }

    /// Read back one pixel of the current tile
    pub fn pixel(&self, point: Point) -> Option<Color> {
        if !self.clip.contains(point) {
            return None;
        }
        let (index, bit) = self.locate(point);
        Some(if self.buffer[index] & bit != 0 {
            Color::On
        } else {
            Color::Off
        })
    }

    /// Byte index and bit mask of a point inside the clip
    fn locate(&self, point: Point) -> (usize, u8) {
        let dx = (point.x as i32 - self.clip.p1().x as i32) as usize;
        let dy = (point.y as i32 - self.clip.p1().y as i32) as usize;
        let page = dy / PAGE_HEIGHT as usize;
        (
            page * self.clip.width() as usize + dx,
            1 << (dy % PAGE_HEIGHT as usize),
        )
    }
}

/// Bytes a page-organized tile covering `clip` occupies
fn tile_len(clip: &Rect) -> usize {
    clip.width() as usize * (clip.height()).div_ceil(PAGE_HEIGHT) as usize
}

impl<T, E, const BYTES: usize> Surface for TileCanvas<T, E, BYTES>
where
    T: Transport,
    E: ControllerEncoder,
{
    fn clip(&self) -> Rect {
        self.clip
    }

    fn set_clip(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        if !self.encoder.bounds().encloses(&rect) {
            return Err(SurfaceError::OutOfBounds);
        }
        if tile_len(&rect) > BYTES {
            return Err(SurfaceError::TileTooLarge);
        }
        self.clip = rect;
        Ok(())
    }

    fn clear(&mut self, color: Color) -> Result<(), SurfaceError> {
        let fill = match color {
            Color::On => 0xFF,
            Color::Off => 0x00,
        };
        let len = tile_len(&self.clip);
        self.buffer[..len].fill(fill);
        Ok(())
    }

    fn fill(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError> {
        let area = rect.intersection(&self.clip);
        if area.is_empty() {
            return Ok(());
        }

        let top = self.clip.p1().y as i32;
        let width = self.clip.width() as usize;
        let dx0 = (area.p1().x as i32 - self.clip.p1().x as i32) as usize;
        let dx1 = dx0 + area.width() as usize;
        let dy0 = area.p1().y as i32 - top;
        let dy1 = area.p2().y as i32 - top;

        // One column mask per page touched by the fill
        for page in (dy0 / 8)..=((dy1 - 1) / 8) {
            let lo = dy0.max(page * 8) - page * 8;
            let hi = dy1.min(page * 8 + 8) - page * 8;
            let mask = ((0xFFu16 << lo) & !(0xFFu16 << hi)) as u8;
            let row = page as usize * width;
            for byte in &mut self.buffer[row + dx0..row + dx1] {
                match color {
                    Color::On => *byte |= mask,
                    Color::Off => *byte &= !mask,
                }
            }
        }
        Ok(())
    }

    fn blit(
        &mut self,
        origin: Point,
        bitmap: &Bitmap<'_>,
        color: Color,
    ) -> Result<(), SurfaceError> {
        let area =
            Rect::with_size(origin, bitmap.width(), bitmap.height()).intersection(&self.clip);
        for y in area.p1().y..area.p2().y {
            for x in area.p1().x..area.p2().x {
                let bx = (x as i32 - origin.x as i32) as u16;
                let by = (y as i32 - origin.y as i32) as u16;
                if bitmap.pixel(bx, by) {
                    self.set_pixel(Point::new(x, y), color);
                }
            }
        }
        Ok(())
    }

    fn flush_tile(&mut self) -> Result<(), SurfaceError> {
        if self.clip.is_empty() {
            return Ok(());
        }
        let len = tile_len(&self.clip);
        self.encoder.set_window(&mut self.transport, self.clip)?;
        self.encoder
            .write_pixels(&mut self.transport, &self.buffer[..len])
    }
}
