use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::info;

use f1b_core::{
    config::Config,
    ports::{DataProvider, MessagingPort},
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub provider: Arc<dyn DataProvider>,
    pub messenger: Arc<dyn MessagingPort>,
}

pub async fn run_polling(cfg: Arc<Config>, provider: Arc<dyn DataProvider>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Basic startup info.
    if let Ok(me) = bot.get_me().await {
        info!("f1b started: @{}", me.username());
    }
    info!(
        prefix = %cfg.prefix,
        zone = cfg.display_zone.name(),
        provider = %cfg.ergast_base_url,
        "listening for commands"
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(
        bot.clone(),
        cfg.telegram_safe_limit,
    ));

    let state = Arc::new(AppState {
        cfg,
        provider,
        messenger,
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
