//! One request/response call per message type.

use std::sync::atomic::Ordering;

use boardlink::watchdog::WatchdogPacket;
use boardlink::{fan_pwm, ping, shutdown, temperature, version, Frame, FRAME_LEN};

use crate::dispatcher::Link;
use crate::error::{LinkError, Result};

/// Version responses tolerated before giving up on end-of-message.
const MAX_VERSION_FRAMES: usize = 32;

impl Link {
    /// Round-trip an echo frame, verifying the payload came back
    /// intact.
    pub fn ping(&self) -> Result<()> {
        let counter = self.ping_counter.fetch_add(1, Ordering::Relaxed);
        let mut req: Frame = [0u8; FRAME_LEN];
        ping::req_pack(&mut req, counter);
        let resp = self.transact(&req)?;
        if !ping::resp_unpack(&resp) {
            return Err(LinkError::Protocol("ping reported failure"));
        }
        if !ping::echo_matches(&req, &resp) {
            return Err(LinkError::Protocol("ping echo mismatch"));
        }
        Ok(())
    }

    /// Read all temperature channels and the fan tachometer.
    pub fn read_temperatures(&self) -> Result<temperature::Readings> {
        let mut req: Frame = [0u8; FRAME_LEN];
        temperature::req_pack(&mut req);
        let resp = self.transact(&req)?;
        let (readings, success) = temperature::resp_unpack(&resp);
        if !success {
            return Err(LinkError::Protocol("controller reported a sensor read failure"));
        }
        Ok(readings)
    }

    /// Set a fan's PWM duty (0.0..=1.0 fraction). Returns the duty the
    /// controller applied.
    pub fn set_fan_duty(&self, fan_id: u8, duty: f32) -> Result<f32> {
        self.fan_transact(fan_id, true, duty)
    }

    /// Read a fan's current PWM duty.
    pub fn fan_duty(&self, fan_id: u8) -> Result<f32> {
        self.fan_transact(fan_id, false, 0.0)
    }

    fn fan_transact(&self, fan_id: u8, write: bool, duty: f32) -> Result<f32> {
        if fan_id == 0 || fan_id > 8 {
            return Err(LinkError::Protocol("fan id out of range"));
        }
        let mut req: Frame = [0u8; FRAME_LEN];
        fan_pwm::req_pack(&mut req, fan_id, write, duty);
        let resp = self.transact(&req)?;
        let msg = fan_pwm::unpack(&resp);
        if msg.write != write {
            return Err(LinkError::Protocol("fan response direction mismatch"));
        }
        if !msg.success {
            return Err(LinkError::Protocol("fan command refused"));
        }
        Ok(msg.duty)
    }

    /// Write the watchdog configuration. The response reflects the
    /// controller's actual armed state.
    pub fn configure_watchdog(
        &self,
        enable: bool,
        timeout_s: u16,
        max_retries: u16,
    ) -> Result<WatchdogPacket> {
        self.watchdog_transact(&WatchdogPacket {
            write: true,
            enable,
            success: false,
            timeout_s,
            max_retries,
        })
    }

    /// Read the watchdog configuration without changing it.
    pub fn read_watchdog(&self) -> Result<WatchdogPacket> {
        self.watchdog_transact(&WatchdogPacket::default())
    }

    fn watchdog_transact(&self, pkt: &WatchdogPacket) -> Result<WatchdogPacket> {
        let mut req: Frame = [0u8; FRAME_LEN];
        boardlink::watchdog::req_pack(&mut req, pkt);
        let resp = self.transact(&req)?;
        let reply = boardlink::watchdog::unpack(&resp);
        if !reply.success {
            return Err(LinkError::Protocol("watchdog request refused"));
        }
        Ok(reply)
    }

    /// Read the controller's build version, reassembling it across as
    /// many frames as it spans.
    pub fn read_version(&self) -> Result<String> {
        let mut assembled = Vec::new();
        for _ in 0..MAX_VERSION_FRAMES {
            let mut req: Frame = [0u8; FRAME_LEN];
            version::req_pack(&mut req);
            let resp = self.transact(&req)?;
            let chunk = version::resp_unpack(&resp);
            if chunk.som {
                assembled.clear();
            }
            assembled.extend_from_slice(chunk.text);
            if chunk.eom {
                return Ok(String::from_utf8_lossy(&assembled).into_owned());
            }
        }
        Err(LinkError::Protocol("version response never terminated"))
    }

    /// Tell the controller the host is about to power itself off.
    /// Fire-and-forget; the controller cuts the rails afterwards.
    pub fn acknowledge_shutdown(&self) -> Result<()> {
        let mut req: Frame = [0u8; FRAME_LEN];
        shutdown::req_pack(&mut req);
        self.send_request(&req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    use crate::transport::testing::{pair, read_frame, MockWire};
    use crate::transport::Wire;

    fn scripted(script: impl FnOnce(&mut MockWire) + Send + 'static) -> (Link, thread::JoinHandle<()>) {
        let (host, mut dev) = pair();
        let link = Link::open(Box::new(host), || {}).unwrap();
        let responder = thread::spawn(move || script(&mut dev));
        (link, responder)
    }

    #[test]
    fn test_ping_round_trip() {
        let (link, responder) = scripted(|dev| {
            let req = read_frame(dev);
            let mut resp: Frame = [0u8; FRAME_LEN];
            ping::resp_pack(&mut resp, &req, true);
            dev.write_all(&resp).unwrap();
        });
        link.ping().unwrap();
        responder.join().unwrap();
    }

    #[test]
    fn test_ping_echo_mismatch_rejected() {
        let (link, responder) = scripted(|dev| {
            let req = read_frame(dev);
            let mut resp: Frame = [0u8; FRAME_LEN];
            ping::resp_pack(&mut resp, &req, true);
            resp[5] ^= 0xFF;
            dev.write_all(&resp).unwrap();
        });
        assert!(matches!(link.ping(), Err(LinkError::Protocol(_))));
        responder.join().unwrap();
    }

    #[test]
    fn test_fan_direction_mismatch_rejected() {
        let (link, responder) = scripted(|dev| {
            let _req = read_frame(dev);
            let mut resp: Frame = [0u8; FRAME_LEN];
            // Write request answered as a read.
            fan_pwm::resp_pack(&mut resp, 1, false, 0.75, true);
            dev.write_all(&resp).unwrap();
        });
        assert!(matches!(
            link.set_fan_duty(1, 0.75),
            Err(LinkError::Protocol(_))
        ));
        responder.join().unwrap();
    }

    #[test]
    fn test_fan_id_validated_locally() {
        let (host, _dev) = pair();
        let link = Link::open(Box::new(host), || {}).unwrap();
        assert!(matches!(
            link.set_fan_duty(0, 0.5),
            Err(LinkError::Protocol(_))
        ));
    }

    #[test]
    fn test_version_reassembled_from_chunks() {
        let full = b"boardlink-fw 0.1.0-g1234567";
        let (link, responder) = scripted(move |dev| {
            let mut offset = 0;
            loop {
                let _req = read_frame(dev);
                let mut resp: Frame = [0u8; FRAME_LEN];
                offset = version::resp_pack(&mut resp, full, offset);
                dev.write_all(&resp).unwrap();
                if offset >= full.len() {
                    break;
                }
            }
        });
        assert_eq!(link.read_version().unwrap(), "boardlink-fw 0.1.0-g1234567");
        responder.join().unwrap();
    }

    #[test]
    fn test_watchdog_refusal_surfaces() {
        let (link, responder) = scripted(|dev| {
            let req = read_frame(dev);
            let mut reply = boardlink::watchdog::unpack(&req);
            reply.success = false;
            let mut resp: Frame = [0u8; FRAME_LEN];
            boardlink::watchdog::resp_pack(&mut resp, &reply);
            dev.write_all(&resp).unwrap();
        });
        assert!(matches!(
            link.configure_watchdog(true, 0, 0),
            Err(LinkError::Protocol(_))
        ));
        responder.join().unwrap();
    }
}
