use std::sync::Arc;

use teloxide::{
    dispatching::UpdateHandler,
    prelude::*,
    types::ParseMode,
    utils::command::BotCommands,
};
use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};

use common::{EngineCommand, EngineState};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Dependencies injected into every handler via `dptree`.
#[derive(Clone)]
pub struct BotDeps {
    pub command_tx: mpsc::Sender<EngineCommand>,
    pub engine_state: Arc<RwLock<EngineState>>,
    pub pair_name: String,
    pub allowed_user_ids: Arc<Vec<i64>>,
}

/// Telegram bot commands exposed to the operator.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "GoldBot commands:")]
pub enum Command {
    #[command(description = "Start the signal engine")]
    Start,
    #[command(description = "Stop the signal engine")]
    Stop,
    #[command(description = "Show engine status")]
    Status,
    #[command(description = "Run one evaluation cycle immediately")]
    Check,
}

/// Start the Telegram bot in long-polling mode.
pub async fn start_bot(token: String, deps: BotDeps) {
    let bot = Bot::new(token);
    let deps = Arc::new(deps);

    info!("Telegram bot starting (long-polling)");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![deps])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(handle_start))
        .branch(case![Command::Stop].endpoint(handle_stop))
        .branch(case![Command::Status].endpoint(handle_status))
        .branch(case![Command::Check].endpoint(handle_check));

    Update::filter_message()
        .filter_map(|msg: Message| msg.from().map(|u| u.id))
        .filter_async(auth_filter)
        .branch(command_handler)
}

/// Silently drop messages from users not in the allowed list.
async fn auth_filter(user_id: UserId, deps: Arc<BotDeps>) -> bool {
    let uid = user_id.0 as i64;
    let allowed = deps.allowed_user_ids.contains(&uid);
    if !allowed {
        warn!(user_id = uid, "Unauthorized Telegram access attempt");
    }
    allowed
}

async fn handle_start(bot: Bot, msg: Message, deps: Arc<BotDeps>) -> HandlerResult {
    let state = *deps.engine_state.read().await;
    if state == EngineState::Running {
        bot.send_message(msg.chat.id, "Engine is already running.").await?;
    } else {
        let _ = deps.command_tx.send(EngineCommand::Start).await;
        bot.send_message(msg.chat.id, "Signal engine started.").await?;
    }
    Ok(())
}

async fn handle_stop(bot: Bot, msg: Message, deps: Arc<BotDeps>) -> HandlerResult {
    let state = *deps.engine_state.read().await;
    if state == EngineState::Stopped {
        bot.send_message(msg.chat.id, "Engine is already stopped.").await?;
    } else {
        let _ = deps.command_tx.send(EngineCommand::Stop).await;
        bot.send_message(msg.chat.id, "Signal engine stopped.").await?;
    }
    Ok(())
}

async fn handle_status(bot: Bot, msg: Message, deps: Arc<BotDeps>) -> HandlerResult {
    let state = *deps.engine_state.read().await;
    let text = format!(
        "GoldBot Status\n\
         Engine: {state}\n\
         Pair: {}",
        deps.pair_name
    );
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn handle_check(bot: Bot, msg: Message, deps: Arc<BotDeps>) -> HandlerResult {
    let _ = deps.command_tx.send(EngineCommand::CheckNow).await;
    bot.send_message(msg.chat.id, "Running a manual check\u{2026}").await?;
    Ok(())
}

/// Send a proactive alert to all configured chat IDs, fire-and-forget.
/// Delivery failures are logged and never reach the engine.
pub async fn send_alert(bot: &Bot, chat_ids: &[ChatId], message: &str) {
    for &chat_id in chat_ids {
        if let Err(e) = bot
            .send_message(chat_id, message)
            .parse_mode(ParseMode::Html)
            .await
        {
            warn!(chat_id = ?chat_id, error = %e, "Failed to send Telegram alert");
        }
    }
}
