// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Telegram adapter - long-polls for messages and answers with reports.

use crate::format::{Reply, ReplyFormat};
use crate::pipeline::{RugcheckPipeline, Screened};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Send a token address to check it on rugcheck.xyz.")]
pub enum Command {
    #[command(description = "show how to use the bot")]
    Start,
    #[command(description = "show how to use the bot")]
    Help,
}

/// Poll for updates until ctrl-c.
pub async fn run(bot: Bot, pipeline: Arc<RugcheckPipeline>) {
    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Message::filter_text().endpoint(handle_text));

    info!("📱 Telegram polling started");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![pipeline])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    pipeline: Arc<RugcheckPipeline>,
) -> ResponseResult<()> {
    send(&bot, msg.chat.id, pipeline.usage_hint()).await;
    Ok(())
}

async fn handle_text(
    bot: Bot,
    msg: Message,
    text: String,
    pipeline: Arc<RugcheckPipeline>,
) -> ResponseResult<()> {
    // unknown commands
    if text.starts_with('/') {
        return Ok(());
    }

    match pipeline.screen(&text) {
        Screened::Accepted(address) => {
            info!("🔍 Checking {} for chat {}", address, msg.chat.id);
            send(&bot, msg.chat.id, pipeline.waiting_notice()).await;
            let reply = pipeline.report(&address).await;
            send(&bot, msg.chat.id, reply).await;
        }
        Screened::Rejected(reply) => send(&bot, msg.chat.id, reply).await,
        Screened::Ignored => debug!("Dropped non-address message in chat {}", msg.chat.id),
    }

    Ok(())
}

async fn send(bot: &Bot, chat_id: ChatId, reply: Reply) {
    let mut request = bot.send_message(chat_id, reply.text);
    if reply.format == ReplyFormat::MarkdownV2 {
        request = request.parse_mode(ParseMode::MarkdownV2);
    }

    match request.await {
        Ok(_) => debug!("📤 Sent reply to chat {}", chat_id),
        Err(e) => error!("Failed to send Telegram message: {}", e),
    }
}
