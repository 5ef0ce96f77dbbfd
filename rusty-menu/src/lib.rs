//! Button-driven paginated menus.
//!
//! A [`MenuSession`] splits entries into pages, renders them through a
//! [`PageFormatter`], and lets its owner flip through them with five buttons.
//! Rendering goes out through a [`ResponseChannel`]; the [`twilight`] module
//! provides the Discord ones, and [`MenuRegistry`] keeps running sessions
//! reachable from incoming button presses.

/// Response channel abstraction and delivery modes.
pub mod channel;
/// Navigation actions and derived button layout.
pub mod controls;
/// Button custom ID codec.
pub mod custom_id;
/// Menu error type.
pub mod error;
/// Page partitioning and render cache.
pub mod paginator;
/// Live session registry and per-session event loop.
pub mod runner;
/// Navigation state machine.
pub mod session;
/// Discord adapters.
pub mod twilight;

#[cfg(test)]
mod test_support;

pub use channel::{ChannelMode, EditTarget, ResponseChannel};
pub use controls::{Control, ControlLayout, NavAction};
pub use custom_id::{MenuButtonId, build_custom_id, is_menu_custom_id, parse_custom_id};
pub use error::{MenuError, MenuResult};
pub use paginator::{FnFormatter, PageFormatter, Paginator, formatter_fn, page_count, paginate};
pub use runner::{Dispatch, MenuRegistry};
pub use session::{
    DEFAULT_TIMEOUT, IgnoreReason, MenuEvent, MenuOptions, MenuSession, MenuState,
    NavOutcome, NavigationState, TimeoutFn,
};
