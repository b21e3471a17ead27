//! Ready-made drawables

use super::{Drawable, ObjectBase};
use crate::geometry::{Point, Rect};
use crate::render::{Bitmap, Color, Surface, SurfaceError};
use crate::tiler::{DamageError, DamageSink, TilerHandle};

/// Monochrome bitmap at a position
pub struct Sprite<'a> {
    base: ObjectBase,
    bitmap: Bitmap<'a>,
    color: Color,
}

impl<'a> Sprite<'a> {
    /// Sprite with its top-left corner at `position`, sized to the bitmap
    pub fn new(position: Point, bitmap: Bitmap<'a>, tiler: Option<TilerHandle>) -> Self {
        let rect = Rect::with_size(position, bitmap.width(), bitmap.height());
        let base = match tiler {
            Some(handle) => ObjectBase::attached(rect, handle),
            None => ObjectBase::new(rect),
        };
        Self {
            base,
            bitmap,
            color: Color::On,
        }
    }

    /// Paint set pixels with `color` instead of `Color::On`
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Current image
    pub fn bitmap(&self) -> &Bitmap<'a> {
        &self.bitmap
    }

    /// Swap the image in place
    ///
    /// The bounds keep their top-left corner and take the new size. Both
    /// the old and the new bounds are reported, so a shrinking sprite
    /// leaves nothing behind.
    pub fn set_bitmap(
        &mut self,
        bitmap: Bitmap<'a>,
        sink: &mut dyn DamageSink,
    ) -> Result<(), DamageError> {
        self.refresh(sink)?;
        let origin = self.base.rect().p1();
        self.base
            .set_rect(Rect::with_size(origin, bitmap.width(), bitmap.height()));
        self.bitmap = bitmap;
        self.refresh(sink)
    }
}

impl Drawable for Sprite<'_> {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        surface.blit(self.base.rect().p1(), &self.bitmap, self.color)
    }
}

/// Solid rectangle
pub struct Block {
    base: ObjectBase,
    color: Color,
}

impl Block {
    /// Block covering `rect`
    pub const fn new(rect: Rect, color: Color, tiler: Option<TilerHandle>) -> Self {
        let base = match tiler {
            Some(handle) => ObjectBase::attached(rect, handle),
            None => ObjectBase::new(rect),
        };
        Self { base, color }
    }

    /// Fill color
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Change the fill color; call [`Drawable::refresh`] to have it redrawn
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl Drawable for Block {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        surface.fill(self.base.rect(), self.color)
    }
}
