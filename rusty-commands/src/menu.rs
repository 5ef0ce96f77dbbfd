//! Launching menus from commands and routing their button presses.

use std::sync::Arc;

use tracing::debug;
use twilight_model::{
    application::interaction::InteractionData,
    gateway::payload::incoming::{InteractionCreate, MessageCreate},
    id::{Id, marker::MessageMarker},
};

use rusty_core::Context;
use rusty_menu::twilight::respond::{respond_ephemeral_message, respond_expired};
use rusty_menu::twilight::{InteractionChannel, PlainChannel};
use rusty_menu::{
    Dispatch, MenuEvent, MenuOptions, MenuSession, PageFormatter, parse_custom_id,
};
use twilight_model::channel::message::embed::Embed;

/// Where a command was invoked from.
pub enum Invocation<'a> {
    /// A prefixed chat message.
    Message(&'a MessageCreate),
    /// A slash command.
    Slash(&'a InteractionCreate),
}

/// Build a menu for an invocation and hand it to the registry.
///
/// Message invocations post a plain message (or take over `existing`); slash
/// invocations answer the interaction. `options` is used as given; start from
/// [`BotConfig::menu_options`](rusty_core::BotConfig::menu_options) to pick up
/// the configured timeout and whisper setting.
pub async fn launch_menu<C, E>(
    ctx: &Context,
    invocation: Invocation<'_>,
    menu_ctx: C,
    entries: Vec<E>,
    formatter: impl PageFormatter<C, E, Embed> + 'static,
    options: MenuOptions,
    existing: Option<Id<MessageMarker>>,
) -> anyhow::Result<()>
where
    C: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    match invocation {
        Invocation::Message(msg) => {
            let session_id = msg.id.get();
            let channel =
                PlainChannel::new(Arc::clone(&ctx.http), session_id, msg.channel_id, existing);
            let session = MenuSession::new(
                menu_ctx,
                msg.author.id.get(),
                entries,
                formatter,
                options,
                channel,
            )?;
            ctx.menus.launch(session_id, session).await?;
        }
        Invocation::Slash(interaction) => {
            let Some(owner_id) = interaction.author_id().map(|id| id.get()) else {
                respond_ephemeral_message(
                    &ctx.http,
                    interaction,
                    "Unable to determine interaction user.",
                )
                .await?;
                return Ok(());
            };

            let session_id = interaction.id.get();
            let channel = InteractionChannel::new(Arc::clone(&ctx.http), session_id, interaction);
            let session =
                MenuSession::new(menu_ctx, owner_id, entries, formatter, options, channel)?;
            ctx.menus.launch(session_id, session).await?;
        }
    }

    Ok(())
}

/// Route a menu button press to its session.
///
/// Presses for menus that are no longer running get an ephemeral notice.
pub async fn route_press(ctx: &Context, interaction: Box<InteractionCreate>) -> anyhow::Result<()> {
    let Some(InteractionData::MessageComponent(data)) = interaction.data.as_ref() else {
        return Ok(());
    };

    let Some(button) = parse_custom_id(&data.custom_id) else {
        return Ok(());
    };

    let Some(actor_id) = interaction.author_id().map(|id| id.get()) else {
        respond_ephemeral_message(&ctx.http, &interaction, "Unable to determine interaction user.")
            .await?;
        return Ok(());
    };

    let event = MenuEvent {
        action: button.action,
        actor_id,
        interaction: Some(*interaction),
    };

    if let Dispatch::Unknown(event) = ctx.menus.dispatch(button.session_id, event).await {
        debug!(session_id = button.session_id, "press for a finished menu");
        if let Some(interaction) = event.interaction.as_ref() {
            respond_expired(&ctx.http, interaction).await?;
        }
    }

    Ok(())
}
