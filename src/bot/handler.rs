use super::{
    commands::{BotCommand, Invocation, Stats},
    error::TelegramFramework,
};
use command_error_router::{CommandInfo, ErrorContext, ErrorRouter, ErrorValue};
use futures_util::future::BoxFuture;
use std::{
    collections::HashMap,
    convert::TryFrom,
    sync::{atomic::Ordering, Arc},
};
use tgbot::{
    types::{Command, Message, MessageKind, Update, UpdateKind},
    Api, UpdateHandler,
};

#[derive(Clone)]
pub struct BotUpdateHandler {
    pub api: Api,
    pub router: Arc<ErrorRouter>,
    pub framework: Arc<TelegramFramework>,
    pub commands: Arc<HashMap<String, BotCommand>>,
    pub help: Arc<String>,
    pub stats: Arc<Stats>,
    pub owner: Option<String>,
    pub prefix: String,
}

impl BotUpdateHandler {
    fn context(&self, message: &Message, name: &str) -> ErrorContext {
        let chat_id = message.get_chat_id();
        let guild_id = match message.kind {
            MessageKind::Group { .. } | MessageKind::Supergroup { .. } => Some(chat_id),
            _ => None,
        };

        ErrorContext {
            command: self
                .commands
                .get(name)
                .map(|_| CommandInfo::new(name.trim_start_matches('/'))),
            content: message
                .get_text()
                .map(|text| text.data.clone())
                .unwrap_or_default(),
            author_id: message.get_user().map(|user| user.id).unwrap_or_default(),
            channel_id: chat_id,
            guild_id,
            message_id: message.id,
            prefix: self.prefix.clone(),
        }
    }

    async fn dispatch(&self, name: &str, command: &Command) -> Result<(), ErrorValue> {
        let bot_command = self.commands.get(name).ok_or(ErrorValue::CommandNotFound)?;

        if bot_command.owner_only {
            let username = command
                .get_message()
                .get_user()
                .and_then(|user| user.username.as_ref());
            if self.owner.is_none() || username != self.owner.as_ref() {
                return Err(ErrorValue::NotOwner);
            }
        }

        (bot_command.handler)(Invocation {
            api: self.api.clone(),
            chat_id: command.get_message().get_chat_id(),
            args: command.get_args().to_vec(),
            stats: Arc::clone(&self.stats),
            help: Arc::clone(&self.help),
        })
        .await
    }
}

impl UpdateHandler for BotUpdateHandler {
    type Future = BoxFuture<'static, ()>;

    fn handle(&self, update: Update) -> Self::Future {
        let handler = self.clone();

        Box::pin(async move {
            if let UpdateKind::Message(message) = update.kind {
                if let Ok(command) = Command::try_from(message) {
                    // "/cmd@SomeBot" in group chats
                    let name = command
                        .get_name()
                        .split('@')
                        .next()
                        .unwrap_or_default()
                        .to_string();

                    handler.stats.handled.fetch_add(1, Ordering::Relaxed);

                    if let Err(error) = handler.dispatch(&name, &command).await {
                        handler.stats.failed.fetch_add(1, Ordering::Relaxed);

                        let ctx = handler.context(command.get_message(), &name);
                        handler
                            .router
                            .handle(handler.framework.as_ref(), &ctx, &error, false)
                            .await;
                    }
                }
            }
        })
    }
}
