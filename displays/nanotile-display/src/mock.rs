//! Transport that records what an encoder sends

extern crate std;

use std::vec::Vec;

use nanotile_transport::{
    BusErrorKind, BusKind, BusOp, DataMode, Misuse, Transport, TransportError,
};

/// Consecutive bytes sent in one mode within one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    pub mode: DataMode,
    pub bytes: Vec<u8>,
}

impl Write {
    pub fn command(bytes: &[u8]) -> Self {
        Self {
            mode: DataMode::Command,
            bytes: bytes.to_vec(),
        }
    }

    pub fn data(bytes: &[u8]) -> Self {
        Self {
            mode: DataMode::Data,
            bytes: bytes.to_vec(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub writes: Vec<Write>,
    pub transactions: usize,
    pub fail_send: bool,
    pub(crate) open: bool,
    pub(crate) mode: Option<DataMode>,
    pub(crate) fresh: bool,
}

impl Transport for Recorder {
    fn bus_kind(&self) -> BusKind {
        BusKind::Spi
    }

    fn in_transaction(&self) -> bool {
        self.open
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn begin_transaction(&mut self) -> Result<(), TransportError> {
        if self.open {
            return Err(Misuse::TransactionOpen.into());
        }
        self.open = true;
        self.mode = None;
        self.fresh = true;
        Ok(())
    }

    fn select(&mut self, mode: DataMode) -> Result<(), TransportError> {
        if !self.open {
            return Err(Misuse::NoTransaction.into());
        }
        self.mode = Some(mode);
        self.fresh = true;
        Ok(())
    }

    fn send(&mut self, byte: u8) -> Result<(), TransportError> {
        if !self.open {
            return Err(Misuse::NoTransaction.into());
        }
        if self.fail_send {
            return Err(TransportError::bus(BusOp::Send, BusErrorKind::Other));
        }
        let mode = self.mode.unwrap_or(DataMode::Command);
        match self.writes.last_mut() {
            Some(last) if !self.fresh && last.mode == mode => last.bytes.push(byte),
            _ => self.writes.push(Write {
                mode,
                bytes: std::vec![byte],
            }),
        }
        self.fresh = false;
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), TransportError> {
        if !self.open {
            return Err(Misuse::NoTransaction.into());
        }
        self.open = false;
        self.transactions += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}
