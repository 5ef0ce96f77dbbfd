//! Menu button rows.

use twilight_model::channel::message::{
    EmojiReactionType,
    component::{ActionRow, Button, ButtonStyle, Component},
};

use crate::controls::{ControlLayout, NavAction};
use crate::custom_id::build_custom_id;

/// Build the action row for a layout. An empty layout yields no rows, which
/// also strips existing buttons when used in an edit.
pub fn build_menu_components(session_id: u64, layout: &ControlLayout) -> Vec<Component> {
    if layout.is_empty() {
        return vec![];
    }

    let buttons = layout
        .controls
        .iter()
        .map(|control| {
            Component::Button(Button {
                id: None,
                custom_id: Some(build_custom_id(session_id, control.action)),
                disabled: !control.enabled,
                emoji: Some(EmojiReactionType::Unicode {
                    name: button_emoji(control.action).to_owned(),
                }),
                label: None,
                style: ButtonStyle::Primary,
                url: None,
                sku_id: None,
            })
        })
        .collect();

    vec![Component::ActionRow(ActionRow {
        id: None,
        components: buttons,
    })]
}

fn button_emoji(action: NavAction) -> &'static str {
    match action {
        NavAction::First => "⏮️",
        NavAction::Previous => "⬅️",
        NavAction::Pause => "⏹️",
        NavAction::Next => "➡️",
        NavAction::Last => "⏭️",
    }
}
