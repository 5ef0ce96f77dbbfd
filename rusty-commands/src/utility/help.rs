use twilight_model::{
    channel::message::embed::Embed,
    gateway::payload::incoming::{InteractionCreate, MessageCreate},
};

use crate::menu::{Invocation, launch_menu};
use crate::{COMMANDS, CommandMeta};
use rusty_core::Context;
use rusty_menu::twilight::{build_page_embed, bulleted_description};
use rusty_menu::{FnFormatter, MenuOptions, formatter_fn};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help",
};

const HELP_COMMANDS_PER_PAGE: usize = 5;

/// Show the command catalog as a menu without skip buttons.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    launch_menu(
        &ctx,
        Invocation::Message(&msg),
        (),
        help_lines(),
        help_formatter(),
        help_options(&ctx),
        None,
    )
    .await
}

/// Slash-command form of `help`.
pub async fn run_slash(ctx: Context, interaction: Box<InteractionCreate>) -> anyhow::Result<()> {
    launch_menu(
        &ctx,
        Invocation::Slash(&interaction),
        (),
        help_lines(),
        help_formatter(),
        help_options(&ctx),
        None,
    )
    .await
}

fn help_options(ctx: &Context) -> MenuOptions {
    ctx.config
        .menu_options(HELP_COMMANDS_PER_PAGE)
        .show_skip_buttons(false)
}

fn help_formatter()
-> FnFormatter<impl Fn(&(), &[String], usize, &[Vec<String>]) -> anyhow::Result<Embed>> {
    formatter_fn(|_: &(), lines: &[String], page: usize, pages: &[Vec<String>]| {
        build_page_embed("Commands", bulleted_description(lines), page, pages.len())
    })
}

/// One line per command, grouped by category then name.
fn help_lines() -> Vec<String> {
    let mut commands: Vec<&CommandMeta> = COMMANDS.iter().collect();
    commands.sort_by_key(|command| (command.category, command.name));

    commands
        .into_iter()
        .map(|command| {
            format!(
                "**{}** `{}` ({}): {}",
                command.name, command.usage, command.category, command.desc
            )
        })
        .collect()
}
