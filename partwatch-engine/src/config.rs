//! Engine configuration.

use std::time::Duration;

use partwatch_types::TimeRange;

/// Configuration for the polling engine.
///
/// Injected at construction; the engine has no implicit global settings.
/// The backend address lives on the client, not here.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Interval between polling ticks.
    pub tick_interval: Duration,
    /// Relative window used for per-part error lookups, resolved to an
    /// absolute bound freshly on every tick.
    pub time_range: TimeRange,
}

impl EngineConfig {
    /// Set the polling interval (default: 3 seconds).
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the error lookup window (default: one hour).
    pub fn time_range(mut self, range: TimeRange) -> Self {
        self.time_range = range;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(3),
            time_range: TimeRange::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_interval, Duration::from_secs(3));
        assert_eq!(config.time_range, TimeRange::Hours1);
    }

    #[test]
    fn builder_style_overrides() {
        let config = EngineConfig::default()
            .tick_interval(Duration::from_secs(10))
            .time_range(TimeRange::Days1);
        assert_eq!(config.tick_interval, Duration::from_secs(10));
        assert_eq!(config.time_range, TimeRange::Days1);
    }
}
