//! Serial transport behind the [`Wire`] trait.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits, TTYPort};

use crate::error::Result;

/// Link baud rate; fixed by the controller firmware.
pub const BAUD: u32 = 115_200;

/// How long a blocking read waits before handing control back.
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Byte transport to the controller.
///
/// `read_available` blocks for at most [`READ_TIMEOUT`] and returns
/// `Ok(0)` on timeout, so the reader thread gets a chance to check its
/// quit flag between waits.
pub trait Wire: Send {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize>;

    fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Drop unread input, so a fresh request cannot pair with a stale
    /// response already sitting in the OS buffer.
    fn flush_input(&mut self) -> Result<()>;

    /// Second handle onto the same device for the reader thread.
    fn try_clone(&self) -> Result<Box<dyn Wire>>;
}

/// [`Wire`] over a real serial device: 115200 8N1, no flow control,
/// exclusive access so a second daemon instance fails fast.
pub struct SerialWire {
    port: TTYPort,
}

impl SerialWire {
    pub fn open(path: &str) -> Result<Self> {
        let mut port = serialport::new(path, BAUD)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open_native()?;
        port.set_exclusive(true)?;
        port.clear(ClearBuffer::All)?;
        Ok(Self { port })
    }
}

impl Wire for SerialWire {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        Write::write_all(&mut self.port, buf)?;
        self.port.flush()?;
        Ok(())
    }

    fn flush_input(&mut self) -> Result<()> {
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn try_clone(&self) -> Result<Box<dyn Wire>> {
        let port = self.port.try_clone_native()?;
        Ok(Box::new(SerialWire { port }))
    }
}
