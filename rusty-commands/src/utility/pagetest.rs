use std::sync::Arc;

use futures_util::future::BoxFuture;

use twilight_model::{
    channel::message::{component::Component, embed::Embed},
    gateway::payload::incoming::{InteractionCreate, MessageCreate},
};

use crate::CommandMeta;
use crate::menu::{Invocation, launch_menu};
use rusty_core::Context;
use rusty_menu::twilight::respond::respond_ephemeral_message;
use rusty_menu::twilight::{build_page_embed, bulleted_description};
use rusty_menu::{FnFormatter, TimeoutFn, formatter_fn, page_count};

pub const META: CommandMeta = CommandMeta {
    name: "pagetest",
    desc: "Test embed pagination behavior.",
    category: "utility",
    usage: "!pagetest [page]",
};

const ITEMS_PER_PAGE: usize = 5;
const TITLE: &str = "Pagination Test";

/// Menu over sample items.
///
/// Inputs:
/// - optional start page: `!pagetest [page]` or `/pagetest page:<n>`.
///
/// Error behavior:
/// - returns usage text on invalid page input.
/// - returns bounds text when the requested page is out of range.
///
/// The message form first posts a placeholder and then takes it over, and
/// strips the buttons on timeout instead of disabling them.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let items = build_test_items();

    let Some(start_page) = parse_one_based_page(arg1) else {
        let usage = format!("Usage: `{}` (page starts at 1)", META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    if let Some(out) = out_of_range_message(start_page, items.len()) {
        http.create_message(msg.channel_id).content(&out).await?;
        return Ok(());
    }

    let placeholder = http
        .create_message(msg.channel_id)
        .content("Building pages...")
        .await?
        .model()
        .await?;

    let strip_http = Arc::clone(&ctx.http);
    let channel_id = placeholder.channel_id;
    let message_id = placeholder.id;
    let strip_buttons: TimeoutFn = Arc::new(move || -> BoxFuture<'static, anyhow::Result<()>> {
        let http = Arc::clone(&strip_http);
        Box::pin(async move {
            let empty_components: [Component; 0] = [];
            http.update_message(channel_id, message_id)
                .components(Some(&empty_components))
                .await?;
            Ok::<(), anyhow::Error>(())
        })
    });

    let options = ctx
        .config
        .menu_options(ITEMS_PER_PAGE)
        .start_page(start_page)
        .on_timeout(strip_buttons);

    launch_menu(
        &ctx,
        Invocation::Message(&msg),
        TITLE.to_owned(),
        items,
        item_formatter(),
        options,
        Some(message_id),
    )
    .await
}

/// Slash-command form of `pagetest`.
pub async fn run_slash(
    ctx: Context,
    interaction: Box<InteractionCreate>,
    page: Option<i64>,
) -> anyhow::Result<()> {
    let items = build_test_items();
    let start_page = match page {
        Some(raw) => usize::try_from(raw).ok().filter(|page| *page >= 1),
        None => Some(1),
    };

    let Some(start_page) = start_page else {
        respond_ephemeral_message(&ctx.http, &interaction, "Page numbers start at 1.").await?;
        return Ok(());
    };

    if let Some(out) = out_of_range_message(start_page, items.len()) {
        respond_ephemeral_message(&ctx.http, &interaction, &out).await?;
        return Ok(());
    }

    launch_menu(
        &ctx,
        Invocation::Slash(&interaction),
        TITLE.to_owned(),
        items,
        item_formatter(),
        ctx.config.menu_options(ITEMS_PER_PAGE).start_page(start_page),
        None,
    )
    .await
}

fn item_formatter()
-> FnFormatter<impl Fn(&String, &[String], usize, &[Vec<String>]) -> anyhow::Result<Embed>> {
    formatter_fn(
        |title: &String, entries: &[String], page: usize, pages: &[Vec<String>]| {
            build_page_embed(title, bulleted_description(entries), page, pages.len())
        },
    )
}

/// Parse a one-based page argument, defaulting to the first page.
fn parse_one_based_page(raw: Option<&str>) -> Option<usize> {
    match raw {
        Some(value) => value.parse::<usize>().ok().filter(|page| *page >= 1),
        None => Some(1),
    }
}

fn out_of_range_message(page: usize, item_count: usize) -> Option<String> {
    let total = page_count(item_count, ITEMS_PER_PAGE);
    (page > total).then(|| format!("Page {page} does not exist. Available pages: 1-{total}."))
}

fn build_test_items() -> Vec<String> {
    (1..=24)
        .map(|index| format!("Sample pagination item #{index}"))
        .collect()
}
