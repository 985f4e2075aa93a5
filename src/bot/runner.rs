//! Telegram runtime entrypoint.

use crate::activity::ChatRegistry;
use crate::bot::commands::Command;
use crate::bot::handlers::{self, Activity, Sender};
use crate::bot::platform::TelegramPlatform;
use crate::config::Settings;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};

/// Run the bot until Ctrl-C.
pub async fn run_bot(settings: Arc<Settings>) {
    let bot = Bot::new(settings.telegram_bot_token.clone());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register command list: {e}");
    }

    let platform = Arc::new(TelegramPlatform::new(bot.clone()));
    let registry = Arc::new(ChatRegistry::new());
    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![platform, registry, settings])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .branch(
            dptree::filter_map(|msg: Message| msg.text().and_then(Command::parse_text))
                .endpoint(handle_command),
        )
        // Everything else, including commands whose arguments don't parse
        .branch(dptree::endpoint(handle_message))
}

async fn handle_command(
    msg: Message,
    cmd: Command,
    platform: Arc<TelegramPlatform>,
    registry: Arc<ChatRegistry>,
    settings: Arc<Settings>,
) -> Result<(), teloxide::RequestError> {
    let Some(sender) = Sender::from_message(&msg) else {
        debug!("Ignoring command without sender in chat {}", msg.chat.id);
        return respond(());
    };

    if let Err(e) = handlers::handle_command(
        platform.as_ref(),
        &registry,
        &settings,
        msg.chat.id,
        &sender,
        cmd,
    )
    .await
    {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_message(
    msg: Message,
    registry: Arc<ChatRegistry>,
) -> Result<(), teloxide::RequestError> {
    if let Some(sender) = Sender::from_message(&msg) {
        handlers::record_activity(&registry, msg.chat.id, &sender, Activity::from_message(&msg))
            .await;
    }
    respond(())
}
