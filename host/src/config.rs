//! Daemon settings.

/// Watchdog defaults pushed to the controller at startup.
#[derive(Debug, Clone)]
pub struct WatchdogSettings {
    pub enable: bool,
    pub timeout_s: u16,
    pub max_retries: u16,
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Serial device connected to the board controller.
    pub device: String,
    /// Telemetry poll interval in seconds.
    pub poll_interval_s: f32,
    /// Fan 1 duty applied at startup, 0.0..=1.0.
    pub fan1_duty: f32,
    pub watchdog: WatchdogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device: "/dev/ttyAMA1".into(),
            poll_interval_s: 1.0,
            fan1_duty: 0.5,
            watchdog: WatchdogSettings {
                enable: false,
                timeout_s: 20,
                max_retries: 0,
            },
        }
    }
}

impl Settings {
    /// Clamp every field into its usable range, logging anything that
    /// had to be corrected.
    pub fn sanitize(&mut self) {
        if self.poll_interval_s < 0.1 || !self.poll_interval_s.is_finite() {
            log::warn!(
                "poll interval {}s out of range, using 0.1s",
                self.poll_interval_s
            );
            self.poll_interval_s = 0.1;
        }
        if !(0.0..=1.0).contains(&self.fan1_duty) || !self.fan1_duty.is_finite() {
            let clamped = if self.fan1_duty.is_finite() {
                self.fan1_duty.clamp(0.0, 1.0)
            } else {
                0.5
            };
            log::warn!("fan duty {} out of range, using {}", self.fan1_duty, clamped);
            self.fan1_duty = clamped;
        }
        if self.watchdog.timeout_s == 0 {
            log::warn!("watchdog timeout of 0s is not armable, using 1s");
            self.watchdog.timeout_s = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_already_sane() {
        let mut settings = Settings::default();
        let before = settings.clone();
        settings.sanitize();
        assert_eq!(settings.device, before.device);
        assert_eq!(settings.poll_interval_s, before.poll_interval_s);
        assert_eq!(settings.fan1_duty, before.fan1_duty);
        assert_eq!(settings.watchdog.timeout_s, before.watchdog.timeout_s);
    }

    #[test]
    fn test_sanitize_clamps() {
        let mut settings = Settings {
            poll_interval_s: 0.0,
            fan1_duty: 1.5,
            ..Settings::default()
        };
        settings.watchdog.timeout_s = 0;
        settings.sanitize();
        assert_eq!(settings.poll_interval_s, 0.1);
        assert_eq!(settings.fan1_duty, 1.0);
        assert_eq!(settings.watchdog.timeout_s, 1);
    }

    #[test]
    fn test_sanitize_rejects_nan() {
        let mut settings = Settings {
            poll_interval_s: f32::NAN,
            fan1_duty: f32::NAN,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.poll_interval_s, 0.1);
        assert_eq!(settings.fan1_duty, 0.5);
    }
}
