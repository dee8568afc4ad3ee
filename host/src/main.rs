use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;

use boardlinkd::config::{Settings, WatchdogSettings};
use boardlinkd::Link;

#[derive(Parser)]
#[command(name = "boardlinkd", about = "Carrier-board link daemon", version)]
struct Args {
    /// Serial device connected to the board controller.
    #[arg(long, default_value = "/dev/ttyAMA1")]
    device: String,

    /// Telemetry poll interval in seconds.
    #[arg(long, default_value_t = 1.0)]
    poll_interval: f32,

    /// Fan 1 duty to apply at startup, 0.0..=1.0.
    #[arg(long, default_value_t = 0.5)]
    fan_duty: f32,

    /// Arm the controller's host watchdog.
    #[arg(long)]
    watchdog: bool,

    /// Watchdog timeout in seconds.
    #[arg(long, default_value_t = 20)]
    watchdog_timeout: u16,

    /// Host resets the watchdog may perform before giving up.
    #[arg(long, default_value_t = 0)]
    watchdog_retries: u16,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = Settings {
        device: args.device,
        poll_interval_s: args.poll_interval,
        fan1_duty: args.fan_duty,
        watchdog: WatchdogSettings {
            enable: args.watchdog,
            timeout_s: args.watchdog_timeout,
            max_retries: args.watchdog_retries,
        },
    };
    settings.sanitize();

    let shutdown_requested = Arc::new(AtomicBool::new(false));
    let link = Link::open_device(&settings.device, {
        let flag = Arc::clone(&shutdown_requested);
        move || flag.store(true, Ordering::SeqCst)
    })?;

    log::info!("controller version: {}", link.read_version()?);
    link.ping()?;
    link.set_fan_duty(1, settings.fan1_duty)?;
    link.configure_watchdog(
        settings.watchdog.enable,
        settings.watchdog.timeout_s,
        settings.watchdog.max_retries,
    )?;

    let poll = Duration::from_secs_f32(settings.poll_interval_s);
    loop {
        thread::sleep(poll);

        if shutdown_requested.swap(false, Ordering::SeqCst) {
            log::info!("controller requested shutdown, acknowledging and exiting");
            link.acknowledge_shutdown()?;
            break;
        }

        match link.read_temperatures() {
            Ok(r) => log::info!(
                "ntc {:?} degC, controller {:.2} degC, fan {} rpm",
                r.external,
                r.controller,
                r.fan1_rpm
            ),
            Err(e) => log::warn!("temperature poll failed: {e}"),
        }
    }
    Ok(())
}
