//! Frame routing between the serial device and client calls.
//!
//! One reader thread owns the receive side of the device. It collects
//! bytes into 16-byte frames and routes each by its tag: solicited
//! responses go into that tag's bounded queue, the shutdown
//! notification fires the registered callback inline, and frames with
//! an unregistered tag are discarded whole, which is also how the link
//! re-synchronizes after garbage.
//!
//! The send side is shared by every client thread and serialized by a
//! mutex; stale input is flushed under the same lock before a request
//! goes out.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use boardlink::{frame, Frame, Tag, FRAME_LEN};
use parking_lot::Mutex;

use crate::error::{LinkError, Result};
use crate::transport::{SerialWire, Wire};

/// Responses buffered per tag before the newest gets dropped.
pub const QUEUE_DEPTH: usize = 10;

/// How long a client waits for its response frame.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);

pub struct Link {
    wire: Mutex<Box<dyn Wire>>,
    queues: HashMap<u8, Mutex<Receiver<Frame>>>,
    quit: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
    pub(crate) ping_counter: AtomicU8,
}

impl Link {
    /// Open the serial device at `path` and start the reader thread.
    ///
    /// `on_shutdown` runs on the reader thread whenever the controller
    /// sends its unsolicited shutdown notification; it must not block.
    pub fn open_device(path: &str, on_shutdown: impl Fn() + Send + 'static) -> Result<Self> {
        let wire = SerialWire::open(path)?;
        Self::open(Box::new(wire), on_shutdown)
    }

    /// Start a link over an already-open transport.
    pub fn open(wire: Box<dyn Wire>, on_shutdown: impl Fn() + Send + 'static) -> Result<Self> {
        let reader_wire = wire.try_clone()?;

        let mut senders = HashMap::new();
        let mut queues = HashMap::new();
        for tag in Tag::SOLICITED {
            let (tx, rx) = sync_channel::<Frame>(QUEUE_DEPTH);
            senders.insert(tag as u8, tx);
            queues.insert(tag as u8, Mutex::new(rx));
        }

        let quit = Arc::new(AtomicBool::new(false));
        let reader = std::thread::Builder::new()
            .name("link-reader".into())
            .spawn({
                let quit = Arc::clone(&quit);
                move || reader_loop(reader_wire, senders, on_shutdown, quit)
            })?;

        Ok(Self {
            wire: Mutex::new(wire),
            queues,
            quit,
            reader: Some(reader),
            ping_counter: AtomicU8::new(0),
        })
    }

    /// Write a request that expects no response.
    pub(crate) fn send_request(&self, req: &Frame) -> Result<()> {
        let mut wire = self.wire.lock();
        wire.flush_input()?;
        wire.write_all(req)
    }

    /// Write a request and wait for the response with the same tag.
    ///
    /// Responses left over from an earlier timed-out exchange are
    /// drained first; the queue lock is held across the write so
    /// transactions on one tag cannot interleave.
    pub(crate) fn transact(&self, req: &Frame) -> Result<Frame> {
        let tag = frame::tag_of(req).ok_or(LinkError::Protocol("request has unregistered tag"))?;
        let rx = self
            .queues
            .get(&(tag as u8))
            .ok_or(LinkError::Protocol("no response queue for unsolicited tag"))?;
        let rx = rx.lock();
        while rx.try_recv().is_ok() {
            log::debug!("discarded stale {tag:?} response");
        }
        self.send_request(req)?;
        rx.recv_timeout(RESPONSE_TIMEOUT)
            .map_err(|_| LinkError::Timeout(tag))
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        self.quit.store(true, Ordering::Relaxed);
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
    }
}

fn reader_loop(
    mut wire: Box<dyn Wire>,
    senders: HashMap<u8, SyncSender<Frame>>,
    on_shutdown: impl Fn(),
    quit: Arc<AtomicBool>,
) {
    let mut buf: Frame = [0u8; FRAME_LEN];
    let mut have = 0usize;
    while !quit.load(Ordering::Relaxed) {
        match wire.read_available(&mut buf[have..]) {
            Ok(0) => continue,
            Ok(n) => have += n,
            Err(e) => {
                log::error!("link read failed, reader stopping: {e}");
                break;
            }
        }
        if have < FRAME_LEN {
            continue;
        }
        have = 0;

        match Tag::from_byte(buf[0]) {
            Some(Tag::Shutdown) => {
                log::info!("controller requested host shutdown");
                on_shutdown();
            }
            Some(tag) => {
                let Some(sender) = senders.get(&(tag as u8)) else {
                    continue;
                };
                if sender.try_send(buf).is_err() {
                    log::warn!("{tag:?} response queue full, dropping frame");
                }
            }
            None => {
                log::warn!("unrecognized tag 0x{:02x}, discarding frame", buf[0]);
            }
        }
    }
}
