//! SPI and parallel transports
//!
//! Both buses select the controller with a chip-select line and tell
//! commands from data with a D/C line, so they share one implementation
//! over a byte [`Lane`]. On these buses the discriminator travels on the
//! D/C line, so a split transaction re-drives D/C instead of repeating a
//! marker byte.

use embedded_hal::digital::{Error as _, OutputPin};
use embedded_hal::spi::{Error as _, SpiBus};
use nanotile_hal::{ParallelBus, ParallelError};

use crate::config::{ParallelTransportConfig, SignaledConfig, SpiTransportConfig};
use crate::error::{BusErrorKind, BusOp, ConfigError, PinRole, TransportError};
use crate::framing::{DataMode, Framer, Session};
use crate::transport::{BusKind, Transport};

/// Byte sink of a signaled bus
pub trait Lane {
    /// Wrapped bus
    type Bus;

    /// Bus family
    const KIND: BusKind;

    /// Clock bytes out without touching the caller's buffer
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), BusErrorKind>;

    /// Block until every byte has physically left the controller
    fn flush(&mut self) -> Result<(), BusErrorKind>;

    /// Unwrap the bus
    fn into_inner(self) -> Self::Bus;
}

/// SPI lane
pub struct SpiLane<S>(S);

impl<S: SpiBus> Lane for SpiLane<S> {
    type Bus = S;

    const KIND: BusKind = BusKind::Spi;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), BusErrorKind> {
        // `transfer_in_place` would overwrite the buffer with MISO data
        self.0.write(bytes).map_err(|e| e.kind().into())
    }

    fn flush(&mut self) -> Result<(), BusErrorKind> {
        self.0.flush().map_err(|e| e.kind().into())
    }

    fn into_inner(self) -> S {
        self.0
    }
}

/// Parallel lane
pub struct ParallelLane<B>(B);

impl<B: ParallelBus> Lane for ParallelLane<B> {
    type Bus = B;

    const KIND: BusKind = BusKind::Parallel;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), BusErrorKind> {
        self.0.write_all(bytes).map_err(|e| e.kind().into())
    }

    fn flush(&mut self) -> Result<(), BusErrorKind> {
        self.0.flush().map_err(|e| e.kind().into())
    }

    fn into_inner(self) -> B {
        self.0
    }
}

/// Transport for controllers with chip-select and D/C lines
pub struct SignaledTransport<L, P> {
    lane: L,
    cs: Option<P>,
    dc: P,
    trailing_nop: Option<u8>,
    framer: Framer,
    /// Last level driven on D/C
    mode: Option<DataMode>,
    session: Session,
}

/// SPI display transport
pub type SpiTransport<S, P> = SignaledTransport<SpiLane<S>, P>;

/// Parallel display transport
pub type ParallelTransport<B, P> = SignaledTransport<ParallelLane<B>, P>;

impl<S: SpiBus, P: OutputPin> SignaledTransport<SpiLane<S>, P> {
    /// Open a transport on an already configured SPI bus
    ///
    /// `cs` may be `None` when chip select is tied low; `dc` is required.
    pub fn open(
        bus: S,
        cs: Option<P>,
        dc: Option<P>,
        config: &SpiTransportConfig,
    ) -> Result<Self, TransportError> {
        config.bus_config()?;
        Self::open_lane(SpiLane(bus), cs, dc, &config.signaled())
    }
}

impl<B: ParallelBus, P: OutputPin> SignaledTransport<ParallelLane<B>, P> {
    /// Open a transport on a parallel bus
    pub fn open(
        bus: B,
        cs: Option<P>,
        dc: Option<P>,
        config: &ParallelTransportConfig,
    ) -> Result<Self, TransportError> {
        Self::open_lane(ParallelLane(bus), cs, dc, &config.signaled())
    }
}

impl<L: Lane, P: OutputPin> SignaledTransport<L, P> {
    fn open_lane(
        lane: L,
        cs: Option<P>,
        dc: Option<P>,
        config: &SignaledConfig,
    ) -> Result<Self, TransportError> {
        let dc = dc.ok_or(ConfigError::MissingPin(PinRole::DataCommand))?;
        let limit = config.frame_limit().validate()?;

        let mut transport = Self {
            lane,
            cs,
            dc,
            trailing_nop: config.trailing_nop,
            framer: Framer::new(limit),
            mode: None,
            session: Session::Idle,
        };
        // Controller stays deselected until the first transaction
        transport.deselect(BusOp::Begin)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "{} transport open: cs={} limit={}",
            L::KIND,
            transport.cs.is_some(),
            limit.max()
        );

        Ok(transport)
    }

    /// Transaction state
    pub fn session(&self) -> Session {
        self.session
    }

    /// Give back the bus and pins
    pub fn release(self) -> (L::Bus, Option<P>, P) {
        (self.lane.into_inner(), self.cs, self.dc)
    }

    fn select_chip(&mut self, op: BusOp) -> Result<(), TransportError> {
        match self.cs.as_mut() {
            Some(cs) => cs.set_low().map_err(|e| TransportError::bus(op, e.kind())),
            None => Ok(()),
        }
    }

    fn deselect(&mut self, op: BusOp) -> Result<(), TransportError> {
        match self.cs.as_mut() {
            Some(cs) => cs.set_high().map_err(|e| TransportError::bus(op, e.kind())),
            None => Ok(()),
        }
    }

    fn drive_dc(&mut self, mode: DataMode, op: BusOp) -> Result<(), TransportError> {
        self.dc
            .set_state(mode.dc_high().into())
            .map_err(|e| TransportError::bus(op, e.kind()))?;
        self.mode = Some(mode);
        Ok(())
    }

    fn flush_lane(&mut self, op: BusOp) -> Result<(), TransportError> {
        self.lane.flush().map_err(|kind| TransportError::bus(op, kind))
    }

    /// Split the stream: drain, toggle chip select, restore D/C
    fn reframe(&mut self) -> Result<(), TransportError> {
        #[cfg(feature = "defmt")]
        defmt::trace!("{} reframe after {} bytes", L::KIND, self.framer.written());

        self.flush_lane(BusOp::Reframe)?;
        self.deselect(BusOp::Reframe)?;
        self.select_chip(BusOp::Reframe)?;
        if let Some(mode) = self.mode {
            self.drive_dc(mode, BusOp::Reframe)?;
        }
        self.framer.start();
        Ok(())
    }

    /// Trailing no-op (if any) and drain, before chip select goes high
    fn drain(&mut self) -> Result<(), TransportError> {
        if let Some(nop) = self.trailing_nop {
            self.drive_dc(DataMode::Command, BusOp::End)?;
            self.lane
                .write_all(&[nop])
                .map_err(|kind| TransportError::bus(BusOp::End, kind))?;
        }
        self.flush_lane(BusOp::End)
    }
}

impl<L: Lane, P: OutputPin> Transport for SignaledTransport<L, P> {
    fn bus_kind(&self) -> BusKind {
        L::KIND
    }

    fn in_transaction(&self) -> bool {
        self.session == Session::InTransaction
    }

    fn is_closed(&self) -> bool {
        self.session == Session::Closed
    }

    fn begin_transaction(&mut self) -> Result<(), TransportError> {
        self.session.require_idle()?;
        self.select_chip(BusOp::Begin)?;
        self.framer.start();
        self.session = Session::InTransaction;
        Ok(())
    }

    fn select(&mut self, mode: DataMode) -> Result<(), TransportError> {
        self.session.require_transaction()?;
        // Bytes still in the FIFO were sent under the old D/C level
        self.flush_lane(BusOp::Select)?;
        self.drive_dc(mode, BusOp::Select)
    }

    fn send(&mut self, byte: u8) -> Result<(), TransportError> {
        self.send_buffer(&[byte])
    }

    fn send_buffer(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.session.require_transaction()?;
        let mut rest = bytes;
        while !rest.is_empty() {
            if self.framer.is_full() {
                self.reframe()?;
            }
            let count = self.framer.room().min(rest.len());
            self.lane
                .write_all(&rest[..count])
                .map_err(|kind| TransportError::bus(BusOp::Send, kind))?;
            self.framer.record(count);
            rest = &rest[count..];
        }
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), TransportError> {
        self.session.require_transaction()?;
        self.session = Session::Idle;
        let drained = self.drain();
        let released = self.deselect(BusOp::End);
        drained.and(released)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if self.session == Session::Closed {
            return Ok(());
        }
        let result = if self.session == Session::InTransaction {
            let flushed = self.flush_lane(BusOp::Close);
            let released = self.deselect(BusOp::Close);
            flushed.and(released)
        } else {
            Ok(())
        };
        self.session = Session::Closed;

        #[cfg(feature = "defmt")]
        defmt::debug!("{} transport closed", L::KIND);

        result
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use super::*;
    use crate::error::Misuse;
    use crate::mock::{Event, Log, MockParallel, MockPin, MockSpi};

    const CS: u8 = 10;
    const DC: u8 = 9;

    fn open_spi(log: &Log, config: &SpiTransportConfig) -> SpiTransport<MockSpi, MockPin> {
        let t = SpiTransport::open(
            MockSpi::new(log),
            Some(MockPin::new(CS, log)),
            Some(MockPin::new(DC, log)),
            config,
        )
        .unwrap();
        log.clear();
        t
    }

    #[test]
    fn test_spi_transaction_bracket() {
        let log = Log::default();
        let mut t = open_spi(&log, &SpiTransportConfig::new(Some(CS), DC));

        t.begin_transaction().unwrap();
        t.select(DataMode::Data).unwrap();
        t.send_buffer(&[1, 2, 3]).unwrap();
        t.end_transaction().unwrap();

        assert_eq!(
            log.events(),
            vec![
                Event::Pin(CS, false),
                Event::Flush,
                Event::Pin(DC, true),
                Event::Bytes(vec![1, 2, 3]),
                Event::Flush,
                Event::Pin(CS, true),
            ]
        );
    }

    #[test]
    fn test_trailing_nop_before_deselect() {
        let log = Log::default();
        let mut config = SpiTransportConfig::new(Some(CS), DC);
        config.trailing_nop = Some(0x00);
        let mut t = open_spi(&log, &config);

        t.begin_transaction().unwrap();
        t.select(DataMode::Data).unwrap();
        t.send(0xAA).unwrap();
        t.end_transaction().unwrap();

        let events = log.events();
        assert_eq!(
            &events[3..],
            &[
                Event::Bytes(vec![0xAA]),
                Event::Pin(DC, false),
                Event::Bytes(vec![0x00]),
                Event::Flush,
                Event::Pin(CS, true),
            ]
        );
    }

    #[test]
    fn test_spi_reframe_toggles_cs_and_restores_dc() {
        let log = Log::default();
        let mut config = SpiTransportConfig::new(Some(CS), DC);
        config.max_transaction_bytes = Some(4);
        let mut t = open_spi(&log, &config);

        t.begin_transaction().unwrap();
        t.select(DataMode::Data).unwrap();
        t.send_buffer(&[0, 1, 2, 3, 4, 5]).unwrap();

        assert_eq!(
            log.events(),
            vec![
                Event::Pin(CS, false),
                Event::Flush,
                Event::Pin(DC, true),
                Event::Bytes(vec![0, 1, 2, 3]),
                Event::Flush,
                Event::Pin(CS, true),
                Event::Pin(CS, false),
                Event::Pin(DC, true),
                Event::Bytes(vec![4, 5]),
            ]
        );
        assert_eq!(log.bytes(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_spi_requires_dc_pin() {
        let log = Log::default();
        let result: Result<SpiTransport<_, MockPin>, _> = SpiTransport::open(
            MockSpi::new(&log),
            Some(MockPin::new(CS, &log)),
            None,
            &SpiTransportConfig::default(),
        );
        assert!(matches!(
            result,
            Err(TransportError::Configuration(ConfigError::MissingPin(
                PinRole::DataCommand
            )))
        ));
    }

    #[test]
    fn test_spi_without_cs_pin() {
        let log = Log::default();
        let mut t = SpiTransport::open(
            MockSpi::new(&log),
            None,
            Some(MockPin::new(DC, &log)),
            &SpiTransportConfig::new(None, DC),
        )
        .unwrap();

        t.begin_transaction().unwrap();
        t.send(0x55).unwrap();
        t.end_transaction().unwrap();

        assert_eq!(
            log.events(),
            vec![Event::Bytes(vec![0x55]), Event::Flush]
        );
    }

    #[test]
    fn test_send_without_transaction_is_misuse() {
        let log = Log::default();
        let mut t = open_spi(&log, &SpiTransportConfig::new(Some(CS), DC));

        assert_eq!(
            t.send(0x00),
            Err(TransportError::Misuse(Misuse::NoTransaction))
        );
        assert_eq!(
            t.select(DataMode::Command),
            Err(TransportError::Misuse(Misuse::NoTransaction))
        );
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_close_mid_transaction_releases_cs() {
        let log = Log::default();
        let mut t = open_spi(&log, &SpiTransportConfig::new(Some(CS), DC));

        t.begin_transaction().unwrap();
        t.close().unwrap();
        t.close().unwrap();

        assert_eq!(
            log.events(),
            vec![Event::Pin(CS, false), Event::Flush, Event::Pin(CS, true)]
        );
        assert_eq!(t.send(1), Err(TransportError::Misuse(Misuse::Closed)));

        let (_spi, cs, dc) = t.release();
        assert_eq!(cs.map(|p| p.id), Some(CS));
        assert_eq!(dc.id, DC);
    }

    #[test]
    fn test_parallel_fault_reported() {
        let log = Log::default();
        let mut bus = MockParallel::new(&log);
        bus.fail_write = true;
        let mut t = ParallelTransport::open(
            bus,
            Some(MockPin::new(CS, &log)),
            Some(MockPin::new(DC, &log)),
            &ParallelTransportConfig {
                dc_pin: Some(DC),
                ..ParallelTransportConfig::default()
            },
        )
        .unwrap();

        assert_eq!(t.bus_kind(), BusKind::Parallel);
        t.begin_transaction().unwrap();
        assert_eq!(
            t.send(0x2C),
            Err(TransportError::Bus {
                op: BusOp::Send,
                kind: BusErrorKind::Timeout
            })
        );
        // Caller decides what to do; the bracket is still open
        assert!(t.in_transaction());
        t.end_transaction().unwrap();
    }

    #[test]
    fn test_parallel_streams_bytes() {
        let log = Log::default();
        let mut t = ParallelTransport::open(
            MockParallel::new(&log),
            None,
            Some(MockPin::new(DC, &log)),
            &ParallelTransportConfig::default(),
        )
        .unwrap();

        t.begin_transaction().unwrap();
        t.select(DataMode::Command).unwrap();
        t.send(0x2C).unwrap();
        t.select(DataMode::Data).unwrap();
        t.send_buffer(&[0xF8, 0x00]).unwrap();
        t.end_transaction().unwrap();

        assert_eq!(log.bytes(), vec![0x2C, 0xF8, 0x00]);
    }
}
