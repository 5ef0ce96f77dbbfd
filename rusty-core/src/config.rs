use std::{env, time::Duration};

use anyhow::Context as _;
use rusty_menu::{DEFAULT_TIMEOUT, MenuOptions};

const TOKEN_VAR: &str = "DISCORD_TOKEN";
const TIMEOUT_VAR: &str = "MENU_TIMEOUT_SECS";
const WHISPER_VAR: &str = "MENU_WHISPER";

#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    /// Inactivity window before a menu stops itself.
    pub menu_timeout: Duration,
    /// Whether slash-command menus are only visible to their invoker.
    pub menu_whisper: bool,
}

impl BotConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let token = lookup(TOKEN_VAR).with_context(|| format!("{TOKEN_VAR} is not set"))?;

        let menu_timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("{TIMEOUT_VAR} must be a whole number of seconds"))?;
                anyhow::ensure!(secs > 0, "{TIMEOUT_VAR} must be greater than zero");
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        let menu_whisper = match lookup(WHISPER_VAR) {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("{WHISPER_VAR} must be true or false"))?,
            None => true,
        };

        Ok(Self {
            token,
            menu_timeout,
            menu_whisper,
        })
    }

    /// Menu options seeded with the configured timeout and whisper setting.
    ///
    /// Callers may still override either one before launching.
    pub fn menu_options(&self, per_page: usize) -> MenuOptions {
        MenuOptions::new(per_page)
            .timeout(self.menu_timeout)
            .whisper(self.menu_whisper)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
