//! Discord delivery for menus, built on twilight.

pub mod channel;
pub mod components;
pub mod embed;
pub mod respond;

pub use channel::{InteractionChannel, PlainChannel};
pub use components::build_menu_components;
pub use embed::{build_page_embed, bulleted_description};

use twilight_model::gateway::payload::incoming::InteractionCreate;

/// Registry of live Discord menus; presses arrive as component interactions.
pub type DiscordMenuRegistry = crate::MenuRegistry<InteractionCreate>;
