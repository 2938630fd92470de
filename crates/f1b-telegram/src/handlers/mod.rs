//! Telegram update handlers.
//!
//! Messages addressed to the bot (prefix or `/command`) are turned into a
//! command line and handed to `commands::handle_command`. Everything else is
//! ignored, so the bot can sit in group chats.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use f1b_core::command::{slash_command, strip_prefix};

use crate::router::AppState;

mod commands;

/// The command line a message addresses to the bot, if any.
fn command_line(text: &str, prefix: &str) -> Option<String> {
    strip_prefix(text, prefix).or_else(|| slash_command(text))
}

pub async fn handle_message(_bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(line) = command_line(text, &state.cfg.prefix) else {
        return Ok(());
    };

    commands::handle_command(&state, msg.chat.id.0, &line).await;
    Ok(())
}
