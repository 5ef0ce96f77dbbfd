use std::sync::Arc;

use twilight_http::Client;
use twilight_model::id::{Id, marker::ApplicationMarker};

use rusty_menu::twilight::DiscordMenuRegistry;

/// Environment-driven bot configuration.
pub mod config;

pub use config::BotConfig;

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub application_id: Id<ApplicationMarker>,
    pub config: Arc<BotConfig>,
    /// Menus currently waiting for button presses.
    pub menus: DiscordMenuRegistry,
}

impl Context {
    /// Create a new application context.
    pub fn new(
        http: Arc<Client>,
        application_id: Id<ApplicationMarker>,
        config: BotConfig,
    ) -> Self {
        Self {
            http,
            application_id,
            config: Arc::new(config),
            menus: DiscordMenuRegistry::new(),
        }
    }
}
