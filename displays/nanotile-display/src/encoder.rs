//! Controller command encoders
//!
//! An encoder turns "this window, these pixel bytes" into the command and
//! data stream of a specific controller. It owns no bus; every call borrows
//! the transport.

use heapless::Vec;
use nanotile_core::{Point, Rect, SurfaceError};
use nanotile_transport::{DataMode, Transport, TransportError, TransportExt};

/// Page-addressed controller commands (SSD1306 / SH1106)
#[allow(dead_code)]
pub mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const RESUME_RAM: u8 = 0xA4;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Rows per controller page
pub const PAGE_HEIGHT: u16 = 8;

/// Longest initialization sequence any supported controller needs
pub const MAX_INIT_LEN: usize = 32;

/// Window-and-stream interface a tile surface drives
pub trait ControllerEncoder {
    /// Screen bounds in controller coordinates
    fn bounds(&self) -> Rect;

    /// Address `window`; the following pixel bytes fill it
    fn set_window(&mut self, transport: &mut dyn Transport, window: Rect)
        -> Result<(), SurfaceError>;

    /// Stream pixel bytes into the current window
    fn write_pixels(&mut self, transport: &mut dyn Transport, pixels: &[u8])
        -> Result<(), SurfaceError>;
}

/// Supported page-addressed controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Controller {
    /// SSD1306, RAM matches the panel
    Ssd1306,
    /// SH1106, 132-column RAM with the panel centered
    Sh1106,
}

impl Controller {
    /// First RAM column visible on a 128-column panel
    pub const fn column_offset(self) -> u8 {
        match self {
            Controller::Ssd1306 => 0,
            Controller::Sh1106 => 2,
        }
    }
}

/// Encoder for page-addressed monochrome OLEDs
///
/// Pixel bytes are columns of eight rows, LSB on top, streamed one page
/// row at a time. Every page row is addressed explicitly, so windows work
/// the same on controllers without a horizontal addressing mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEncoder {
    controller: Controller,
    width: u16,
    height: u16,
    column_offset: u8,
    window: Rect,
    page: u16,
    column: u16,
}

impl PageEncoder {
    /// Encoder for a `width` x `height` panel
    pub const fn new(controller: Controller, width: u16, height: u16) -> Self {
        Self {
            controller,
            width,
            height,
            column_offset: controller.column_offset(),
            window: Rect::EMPTY,
            page: 0,
            column: 0,
        }
    }

    /// 128x64 SSD1306
    pub const fn ssd1306() -> Self {
        Self::new(Controller::Ssd1306, 128, 64)
    }

    /// 128x64 SH1106
    pub const fn sh1106() -> Self {
        Self::new(Controller::Sh1106, 128, 64)
    }

    /// Override the RAM column of pixel column zero
    pub const fn with_column_offset(mut self, offset: u8) -> Self {
        self.column_offset = offset;
        self
    }

    /// Controller family
    pub const fn controller(&self) -> Controller {
        self.controller
    }

    /// Power-up command sequence for the panel
    pub fn init_sequence(&self) -> Vec<u8, MAX_INIT_LEN> {
        let mux = self.height.clamp(16, 64) as u8 - 1;
        // Sequential COM pins only on short panels
        let com_pins = if self.height <= 32 { 0x02 } else { 0x12 };

        let mut seq = Vec::new();
        let mut push = |bytes: &[u8]| {
            let pushed = seq.extend_from_slice(bytes);
            debug_assert!(pushed.is_ok(), "init sequence longer than MAX_INIT_LEN");
        };
        push(&[cmd::DISPLAY_OFF, cmd::SET_CLOCK_DIV, 0x80]);
        push(&[cmd::SET_MUX_RATIO, mux, cmd::SET_DISPLAY_OFFSET, 0x00]);
        push(&[cmd::SET_START_LINE, cmd::SET_CHARGE_PUMP, 0x14]);
        if self.controller == Controller::Ssd1306 {
            // Page addressing, as on the SH1106
            push(&[cmd::SET_MEMORY_MODE, 0x02]);
        }
        push(&[cmd::SET_SEG_REMAP, cmd::SET_COM_SCAN_DEC]);
        push(&[cmd::SET_COM_PINS, com_pins, cmd::SET_CONTRAST, 0xCF]);
        push(&[cmd::SET_PRECHARGE, 0xF1, cmd::SET_VCOM_DETECT, 0x40]);
        push(&[cmd::RESUME_RAM, cmd::SET_NORMAL, cmd::DISPLAY_ON]);
        seq
    }

    /// Send the power-up sequence
    pub fn init(&self, transport: &mut dyn Transport) -> Result<(), TransportError> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Init {} {}x{} (column offset {})",
            self.controller,
            self.width,
            self.height,
            self.column_offset
        );

        transport.send_commands(&self.init_sequence())
    }

    /// Set display contrast (0-255)
    pub fn set_contrast(
        &self,
        transport: &mut dyn Transport,
        contrast: u8,
    ) -> Result<(), TransportError> {
        transport.send_commands(&[cmd::SET_CONTRAST, contrast])
    }

    /// Turn the panel on or off
    pub fn set_display_on(
        &self,
        transport: &mut dyn Transport,
        on: bool,
    ) -> Result<(), TransportError> {
        let command = if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF };
        transport.send_commands(&[command])
    }

    /// Invert display colors
    pub fn set_inverted(
        &self,
        transport: &mut dyn Transport,
        inverted: bool,
    ) -> Result<(), TransportError> {
        let command = if inverted {
            cmd::SET_INVERSE
        } else {
            cmd::SET_NORMAL
        };
        transport.send_commands(&[command])
    }

    /// Address one page row and stream its bytes in a single transaction
    fn write_row(
        &self,
        transport: &mut dyn Transport,
        page: u16,
        column: u16,
        bytes: &[u8],
    ) -> Result<(), TransportError> {
        let ram_column = column + self.column_offset as u16;
        let address = [
            cmd::SET_PAGE_ADDR | (page as u8 & 0x0F),
            cmd::SET_LOW_COLUMN | (ram_column as u8 & 0x0F),
            cmd::SET_HIGH_COLUMN | ((ram_column >> 4) as u8 & 0x0F),
        ];

        transport.begin_transaction()?;
        let result = transport
            .select(DataMode::Command)
            .and_then(|()| transport.send_buffer(&address))
            .and_then(|()| transport.select(DataMode::Data))
            .and_then(|()| transport.send_buffer(bytes));
        let ended = transport.end_transaction();
        result.and(ended)
    }
}

impl ControllerEncoder for PageEncoder {
    fn bounds(&self) -> Rect {
        Rect::with_size(Point::ZERO, self.width, self.height)
    }

    fn set_window(
        &mut self,
        _transport: &mut dyn Transport,
        window: Rect,
    ) -> Result<(), SurfaceError> {
        if !self.bounds().encloses(&window) {
            return Err(SurfaceError::OutOfBounds);
        }
        let bottom = window.p2().y as u16;
        if window.p1().y as u16 % PAGE_HEIGHT != 0
            || (bottom % PAGE_HEIGHT != 0 && bottom != self.height)
        {
            return Err(SurfaceError::Unaligned);
        }

        self.window = window;
        self.page = window.p1().y as u16 / PAGE_HEIGHT;
        self.column = 0;
        Ok(())
    }

    fn write_pixels(
        &mut self,
        transport: &mut dyn Transport,
        pixels: &[u8],
    ) -> Result<(), SurfaceError> {
        let width = self.window.width();
        let end_page = (self.window.p2().y as u16).div_ceil(PAGE_HEIGHT);
        let left = self.window.p1().x as u16;

        let mut rest = pixels;
        while !rest.is_empty() {
            if self.page >= end_page || width == 0 {
                return Err(SurfaceError::OutOfBounds);
            }
            let room = (width - self.column) as usize;
            let (row, tail) = rest.split_at(room.min(rest.len()));
            self.write_row(transport, self.page, left + self.column, row)?;

            self.column += row.len() as u16;
            if self.column == width {
                self.column = 0;
                self.page += 1;
            }
            rest = tail;
        }
        Ok(())
    }
}
