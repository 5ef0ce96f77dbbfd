pub mod menu;
pub mod utility;

use twilight_model::{
    application::{
        command::{Command, CommandType},
        interaction::{
            InteractionData,
            application_command::{CommandData, CommandOptionValue},
        },
    },
    gateway::payload::incoming::{InteractionCreate, MessageCreate},
};
use twilight_util::builder::command::{CommandBuilder, IntegerBuilder};

use rusty_core::Context;
use rusty_menu::is_menu_custom_id;

/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::help::META,
    utility::pagetest::META,
    // Add new commands here
];

/// Slash command definitions registered at startup.
pub fn application_commands() -> anyhow::Result<Vec<Command>> {
    let help = CommandBuilder::new(
        utility::help::META.name,
        utility::help::META.desc,
        CommandType::ChatInput,
    )
    .validate()?
    .build();

    let pagetest = CommandBuilder::new(
        utility::pagetest::META.name,
        utility::pagetest::META.desc,
        CommandType::ChatInput,
    )
    .option(
        IntegerBuilder::new("page", "Page to start on")
            .min_value(1)
            .required(false),
    )
    .validate()?
    .build();

    Ok(vec![help, pagetest])
}

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let content_owned = msg.content.clone();
    let content = content_owned.trim();

    if !content.starts_with(COMMAND_PREFIX) {
        return Ok(());
    }

    let content = content.trim_start_matches(COMMAND_PREFIX).trim();
    let mut command_and_rest = content.splitn(2, char::is_whitespace);
    let cmd = command_and_rest.next().unwrap_or("").to_ascii_lowercase();
    let arg1 = command_and_rest
        .next()
        .and_then(|rest| rest.split_whitespace().next())
        .map(ToOwned::to_owned);
    let arg1 = arg1.as_deref();

    match cmd.as_str() {
        "help" => utility::help::run(ctx.clone(), msg).await?,
        "pagetest" => utility::pagetest::run(ctx.clone(), msg, arg1).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}

pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    match interaction.data.as_ref() {
        Some(InteractionData::ApplicationCommand(data)) => {
            let name = data.name.clone();
            let page = integer_option(data, "page");
            match name.as_str() {
                "help" => utility::help::run_slash(ctx.clone(), interaction).await?,
                "pagetest" => utility::pagetest::run_slash(ctx.clone(), interaction, page).await?,
                _ => {}
            }
        }
        Some(InteractionData::MessageComponent(data)) if is_menu_custom_id(&data.custom_id) => {
            menu::route_press(&ctx, interaction).await?;
        }
        _ => {}
    }

    Ok(())
}

fn integer_option(data: &CommandData, name: &str) -> Option<i64> {
    data.options.iter().find_map(|option| match option.value {
        CommandOptionValue::Integer(value) if option.name == name => Some(value),
        _ => None,
    })
}
