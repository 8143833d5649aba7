use command_error_router::{config::Config, Error, ErrorRouter, Result};
use std::sync::Arc;
use tgbot::{longpoll::LongPoll, webhook, Api, Config as ApiConfig};

mod commands;
mod error;
mod handler;

use commands::{BotCommandMap, Stats};
use error::TelegramFramework;
use handler::BotUpdateHandler;

pub struct Bot;

impl Bot {
    pub async fn run(config: &Config, router: Arc<ErrorRouter>) -> Result<()> {
        let mut api_config = ApiConfig::new(config.token.clone());

        if let Some(proxy) = config.proxy.clone() {
            api_config = api_config
                .proxy(proxy)
                .map_err(|e| Error::Api(e.to_string()))?;
        }

        let api = Api::new(api_config).map_err(|e| Error::Api(e.to_string()))?;

        let commands = BotCommandMap::init();
        let help = Arc::new(BotCommandMap::help(&commands));

        let handler = BotUpdateHandler {
            api: api.clone(),
            router,
            framework: Arc::new(TelegramFramework::new(api.clone())),
            commands: Arc::new(commands),
            help,
            stats: Arc::new(Stats::default()),
            owner: config.owner.clone(),
            prefix: config.prefix.clone(),
        };

        if config.webhook_port == 0 {
            tracing::info!("Running in longpoll mode");
            LongPoll::new(api, handler).run().await;
        } else {
            tracing::info!("Running at port {} in webhook mode", config.webhook_port);
            webhook::run_server(([127, 0, 0, 1], config.webhook_port), "/", handler)
                .await
                .map_err(|e| Error::Webhook(e.to_string()))?;
        }

        Ok(())
    }
}
