//! Navigation actions and the derived control layout.

use crate::session::{MenuState, NavigationState};

/// One of the five fixed menu buttons.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum NavAction {
    First,
    Previous,
    Pause,
    Next,
    Last,
}

impl NavAction {
    /// Buttons in display order.
    pub const ALL: [NavAction; 5] = [
        NavAction::First,
        NavAction::Previous,
        NavAction::Pause,
        NavAction::Next,
        NavAction::Last,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NavAction::First => "first",
            NavAction::Previous => "previous",
            NavAction::Pause => "pause",
            NavAction::Next => "next",
            NavAction::Last => "last",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == raw)
    }

    /// Whether this button is one of the skip-to-end buttons.
    pub fn is_skip(self) -> bool {
        matches!(self, NavAction::First | NavAction::Last)
    }
}

/// A button present in the layout.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Control {
    pub action: NavAction,
    pub enabled: bool,
}

/// Buttons to attach to a rendered page. Absent buttons are simply not listed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ControlLayout {
    pub controls: Vec<Control>,
}

impl ControlLayout {
    /// Layout for the given navigation state. Never stored, always recomputed.
    pub fn for_state(nav: &NavigationState, total_pages: usize) -> Self {
        if total_pages <= 1 || nav.state == MenuState::SinglePage {
            return Self::default();
        }

        let stopped = nav.state == MenuState::Stopped;
        let controls = NavAction::ALL
            .into_iter()
            .filter(|action| nav.show_skip_buttons || !action.is_skip())
            .map(|action| {
                let enabled = !stopped
                    && match action {
                        NavAction::First | NavAction::Previous => nav.current_page > 1,
                        NavAction::Pause => true,
                        NavAction::Next | NavAction::Last => nav.current_page < total_pages,
                    };
                Control { action, enabled }
            })
            .collect();

        Self { controls }
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn get(&self, action: NavAction) -> Option<&Control> {
        self.controls.iter().find(|control| control.action == action)
    }

    pub fn is_present(&self, action: NavAction) -> bool {
        self.get(action).is_some()
    }

    pub fn is_enabled(&self, action: NavAction) -> bool {
        self.get(action).is_some_and(|control| control.enabled)
    }
}
