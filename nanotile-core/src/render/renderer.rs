//! Tile walker

use super::{Color, Surface, SurfaceError};
use crate::geometry::{Coord, Point, Rect};
use crate::object::Drawable;
use crate::tiler::{DamageError, Tiler};

/// Rendering failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// The tiler refused to start a flush
    Damage(DamageError),
    /// Drawing or flushing a tile failed
    Draw(SurfaceError),
}

impl From<DamageError> for RenderError {
    fn from(err: DamageError) -> Self {
        RenderError::Damage(err)
    }
}

impl From<SurfaceError> for RenderError {
    fn from(err: SurfaceError) -> Self {
        RenderError::Draw(err)
    }
}

/// Work done for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameStats {
    /// Tiles flushed to the display
    pub tiles: u16,
    /// Object draw calls
    pub draws: u16,
}

/// Redraws the damaged part of a screen tile by tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    tile_width: u16,
    tile_height: u16,
}

impl Renderer {
    /// Renderer with the given tile size; zero is treated as one
    pub const fn new(tile_width: u16, tile_height: u16) -> Self {
        Self {
            tile_width: if tile_width == 0 { 1 } else { tile_width },
            tile_height: if tile_height == 0 { 1 } else { tile_height },
        }
    }

    /// Tile width in pixels
    pub const fn tile_width(&self) -> u16 {
        self.tile_width
    }

    /// Tile height in pixels
    pub const fn tile_height(&self) -> u16 {
        self.tile_height
    }

    /// Redraw everything the tiler has collected since the last frame
    ///
    /// The flush is always finished, even when drawing fails, so the tiler
    /// accepts reports again afterwards. A failed frame puts its region
    /// back, so the next frame redraws every tile that may not have
    /// reached the display.
    pub fn render(
        &self,
        tiler: &mut Tiler,
        objects: &[&dyn Drawable],
        surface: &mut dyn Surface,
    ) -> Result<FrameStats, RenderError> {
        let region = tiler.begin_flush()?;
        let result = self.walk(region, tiler.screen(), objects, surface);
        tiler.finish_flush();
        if result.is_err() {
            tiler.report(region)?;
        }

        #[cfg(feature = "defmt")]
        match &result {
            Ok(stats) => defmt::debug!("Frame: {} tiles, {} draws", stats.tiles, stats.draws),
            Err(e) => defmt::warn!("Frame aborted: {}", e),
        }

        result.map_err(RenderError::Draw)
    }

    fn walk(
        &self,
        region: Rect,
        screen: Rect,
        objects: &[&dyn Drawable],
        surface: &mut dyn Surface,
    ) -> Result<FrameStats, SurfaceError> {
        let mut stats = FrameStats::default();
        let region = region.intersection(&screen);
        if region.is_empty() {
            return Ok(stats);
        }

        let tw = self.tile_width as i32;
        let th = self.tile_height as i32;
        let origin = screen.p1();

        // Snap the walk to the tile grid anchored at the screen origin
        let x0 = grid_floor(region.p1().x, origin.x, tw);
        let mut y = grid_floor(region.p1().y, origin.y, th);
        let (x_end, y_end) = (region.p2().x as i32, region.p2().y as i32);

        while y < y_end {
            let mut x = x0;
            while x < x_end {
                let tile = Rect::with_size(
                    Point::new(x as Coord, y as Coord),
                    self.tile_width,
                    self.tile_height,
                )
                .intersection(&screen);

                surface.set_clip(tile)?;
                surface.clear(Color::Off)?;
                for object in objects.iter().filter(|o| o.bounds().overlaps(&tile)) {
                    object.draw(surface)?;
                    stats.draws = stats.draws.saturating_add(1);
                }
                surface.flush_tile()?;
                stats.tiles = stats.tiles.saturating_add(1);

                x += tw;
            }
            y += th;
        }

        Ok(stats)
    }
}

/// Start of the grid cell containing `value`
fn grid_floor(value: Coord, origin: Coord, step: i32) -> i32 {
    let offset = value as i32 - origin as i32;
    origin as i32 + offset.div_euclid(step) * step
}
