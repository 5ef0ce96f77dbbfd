//! Button custom ID encoding for menu sessions.

use crate::controls::NavAction;

const MENU_PREFIX: &str = "mn";

/// Parsed menu button custom ID.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MenuButtonId {
    /// Registry key of the session the button belongs to.
    pub session_id: u64,
    pub action: NavAction,
}

/// Build a button custom ID for a session and action.
pub fn build_custom_id(session_id: u64, action: NavAction) -> String {
    format!("{MENU_PREFIX}:{session_id}:{}", action.as_str())
}

/// Whether a custom ID looks like a menu button at all.
pub fn is_menu_custom_id(custom_id: &str) -> bool {
    custom_id
        .strip_prefix(MENU_PREFIX)
        .is_some_and(|rest| rest.starts_with(':'))
}

/// Parse a menu button custom ID.
pub fn parse_custom_id(custom_id: &str) -> Option<MenuButtonId> {
    let mut parts = custom_id.split(':');

    if parts.next()? != MENU_PREFIX {
        return None;
    }

    let session_id = parts.next()?.parse::<u64>().ok()?;
    let action = NavAction::parse(parts.next()?)?;

    if parts.next().is_some() {
        return None;
    }

    Some(MenuButtonId { session_id, action })
}
