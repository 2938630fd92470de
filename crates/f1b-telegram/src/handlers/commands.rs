use chrono::Utc;
use tracing::{info, warn};

use f1b_core::{
    command::parse,
    commands::{dispatch, error_reply, send_report, CommandContext},
    domain::ChatId,
    formatting::escape_html,
};

use crate::router::AppState;

pub async fn handle_command(state: &AppState, chat_id: i64, line: &str) {
    let chat_id = ChatId(chat_id);
    let cmd = parse(line);
    info!(chat_id = chat_id.0, command = %cmd.name, args = ?cmd.arguments, "processing command");

    // Provider calls can take a while; show the user something is happening.
    let _ = state.messenger.send_typing(chat_id).await;

    let ctx = CommandContext {
        provider: state.provider.as_ref(),
        zone: state.cfg.display_zone,
        prefix: &state.cfg.prefix,
        now: Utc::now(),
        results_limit: state.cfg.results_limit,
    };

    let sent = match dispatch(&ctx, &cmd).await {
        Ok(report) => send_report(state.messenger.as_ref(), chat_id, &report).await,
        Err(e) => {
            warn!(command = %cmd.name, error = %e, "command failed");
            state
                .messenger
                .send_html(chat_id, &escape_html(&error_reply(&e)))
                .await
        }
    };

    if let Err(e) = sent {
        warn!(chat_id = chat_id.0, error = %e, "error sending reply");
    }
}
