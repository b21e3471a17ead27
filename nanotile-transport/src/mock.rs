//! Recording bus and pin doubles shared by the transport tests

extern crate std;

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::i2c::{self, I2c};
use embedded_hal::spi::{self, SpiBus};
use nanotile_hal::{ParallelBus, ParallelError, ParallelErrorKind};

/// Something that happened on the wire, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One I2C write transaction (address, payload)
    I2cWrite(u8, Vec<u8>),
    /// Bytes clocked out on a signaled bus
    Bytes(Vec<u8>),
    /// Signaled bus drained
    Flush,
    /// Pin `id` driven to a level
    Pin(u8, bool),
}

/// Shared ordered log
#[derive(Debug, Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Payloads of every I2C write
    pub fn i2c_writes(&self) -> Vec<Vec<u8>> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::I2cWrite(_, bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every byte clocked out on a signaled bus
    pub fn bytes(&self) -> Vec<u8> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Bytes(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

/// I2C master that records writes and can fail the n-th one
pub struct MockI2c {
    pub log: Log,
    pub fail_write: Option<(usize, i2c::ErrorKind)>,
    writes: usize,
}

impl MockI2c {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            fail_write: None,
            writes: 0,
        }
    }
}

impl i2c::ErrorType for MockI2c {
    type Error = i2c::ErrorKind;
}

impl I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [i2c::Operation<'_>],
    ) -> Result<(), i2c::ErrorKind> {
        for op in operations {
            if let i2c::Operation::Write(bytes) = op {
                let index = self.writes;
                self.writes += 1;
                if let Some((fail_at, kind)) = self.fail_write {
                    if fail_at == index {
                        return Err(kind);
                    }
                }
                self.log.push(Event::I2cWrite(address, bytes.to_vec()));
            }
        }
        Ok(())
    }
}

/// SPI master that records writes and flushes
pub struct MockSpi {
    pub log: Log,
    pub fail_write: bool,
}

impl MockSpi {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            fail_write: false,
        }
    }
}

impl spi::ErrorType for MockSpi {
    type Error = spi::ErrorKind;
}

impl SpiBus for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), spi::ErrorKind> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), spi::ErrorKind> {
        if self.fail_write {
            return Err(spi::ErrorKind::Overrun);
        }
        self.log.push(Event::Bytes(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), spi::ErrorKind> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), spi::ErrorKind> {
        // Real hardware overwrites the buffer with what it reads back
        self.log.push(Event::Bytes(words.to_vec()));
        words.fill(0xFF);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), spi::ErrorKind> {
        self.log.push(Event::Flush);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParallelFault;

impl ParallelError for ParallelFault {
    fn kind(&self) -> ParallelErrorKind {
        ParallelErrorKind::Timeout
    }
}

/// Parallel bus that records strobed bytes
pub struct MockParallel {
    pub log: Log,
    pub fail_write: bool,
}

impl MockParallel {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            fail_write: false,
        }
    }
}

impl ParallelBus for MockParallel {
    type Error = ParallelFault;

    fn write(&mut self, byte: u8) -> Result<(), ParallelFault> {
        if self.fail_write {
            return Err(ParallelFault);
        }
        self.log.push(Event::Bytes(std::vec![byte]));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ParallelFault> {
        self.log.push(Event::Flush);
        Ok(())
    }
}

/// Output pin that records level changes
pub struct MockPin {
    pub id: u8,
    pub log: Log,
}

impl MockPin {
    pub fn new(id: u8, log: &Log) -> Self {
        Self {
            id,
            log: log.clone(),
        }
    }
}

impl digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), core::convert::Infallible> {
        self.log.push(Event::Pin(self.id, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), core::convert::Infallible> {
        self.log.push(Event::Pin(self.id, true));
        Ok(())
    }
}
