use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::timer::MAX_INTERVAL;

/// Interval used when a carousel does not configure one.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CarouselOptions {
    /// Identifier used in logs and stdin commands.
    pub name: String,
    /// Number of slides in the sequence; zero is allowed.
    #[serde(default)]
    pub slide_count: usize,
    /// Time each slide stays up before auto-advance.
    #[serde(default = "CarouselOptions::default_interval", with = "humantime_serde")]
    pub interval: Duration,
    /// Whether automatic advancement is permitted at all.
    #[serde(default = "CarouselOptions::default_auto_play")]
    pub auto_play: bool,
    /// Honor hold/release requests (pointer hover suspends auto-play).
    #[serde(default)]
    pub pause_on_hover: bool,
}

impl CarouselOptions {
    const fn default_interval() -> Duration {
        DEFAULT_INTERVAL
    }

    const fn default_auto_play() -> bool {
        true
    }

    pub fn new(name: impl Into<String>, slide_count: usize, interval: Duration) -> Self {
        Self {
            name: name.into(),
            slide_count,
            interval,
            auto_play: true,
            pause_on_hover: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.name.trim().is_empty(), "carousel name must not be empty");
        ensure!(
            !self.name.contains(char::is_whitespace),
            "carousel name '{}' must not contain whitespace",
            self.name
        );
        ensure!(
            self.interval > Duration::ZERO,
            "carousel '{}': interval must be positive",
            self.name
        );
        ensure!(
            self.interval <= MAX_INTERVAL,
            "carousel '{}': interval must not exceed {}",
            self.name,
            humantime::format_duration(MAX_INTERVAL)
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    /// Carousels driven by this process, in start order.
    pub carousels: Vec<CarouselOptions>,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            !self.carousels.is_empty(),
            "at least one carousel must be configured"
        );
        let mut seen = HashSet::new();
        for carousel in &self.carousels {
            carousel
                .validate()
                .with_context(|| format!("invalid carousel configuration '{}'", carousel.name))?;
            ensure!(
                seen.insert(carousel.name.as_str()),
                "duplicate carousel name '{}'",
                carousel.name
            );
        }
        Ok(self)
    }

    pub fn carousel(&self, name: &str) -> Option<&CarouselOptions> {
        self.carousels.iter().find(|c| c.name == name)
    }
}
