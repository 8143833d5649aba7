use command_error_router::{Cause, ErrorValue, OriginalError};
use futures_util::future::BoxFuture;
use itertools::Itertools;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tgbot::{methods::SendMessage, Api};

pub type CommandResult = Result<(), ErrorValue>;

type CommandHandler = Box<dyn Fn(Invocation) -> BoxFuture<'static, CommandResult> + Send + Sync>;

pub struct Invocation {
    pub api: Api,
    pub chat_id: i64,
    pub args: Vec<String>,
    pub stats: Arc<Stats>,
    pub help: Arc<String>,
}

impl Invocation {
    async fn reply(&self, text: String) -> CommandResult {
        self.api
            .execute(SendMessage::new(self.chat_id, text))
            .await
            .map(|_| ())
            .map_err(|e| ErrorValue::CommandInvokeError(OriginalError::from_error(Cause::Http, &e)))
    }
}

#[derive(Default)]
pub struct Stats {
    pub handled: AtomicU64,
    pub failed: AtomicU64,
}

pub struct BotCommand {
    pub description: String,
    pub owner_only: bool,
    pub handler: CommandHandler,
}

pub struct BotCommandMap;

impl BotCommandMap {
    pub fn init() -> HashMap<String, BotCommand> {
        let mut commands = HashMap::new();

        fn help(invocation: Invocation) -> BoxFuture<'static, CommandResult> {
            Box::pin(async move {
                let help = invocation.help.to_string();
                invocation.reply(help).await
            })
        }
        commands.insert(
            String::from("/help"),
            BotCommand {
                description: String::from("Print the help menu"),
                owner_only: false,
                handler: Box::new(help) as CommandHandler,
            },
        );

        fn square(invocation: Invocation) -> BoxFuture<'static, CommandResult> {
            Box::pin(async move {
                let n = parse_number(invocation.args.first(), "n")?;
                let squared = n.checked_mul(n).ok_or_else(|| {
                    ErrorValue::invoke(
                        Cause::DataOutOfRange,
                        "NumericValueOutOfRange",
                        format!("{} squared does not fit in 64 bits", n),
                    )
                })?;
                invocation.reply(format!("{}² = {}", n, squared)).await
            })
        }
        commands.insert(
            String::from("/square"),
            BotCommand {
                description: String::from("<n> Square a whole number"),
                owner_only: false,
                handler: Box::new(square) as CommandHandler,
            },
        );

        fn stats(invocation: Invocation) -> BoxFuture<'static, CommandResult> {
            Box::pin(async move {
                let text = format!(
                    "Handled {} commands, {} failed",
                    invocation.stats.handled.load(Ordering::Relaxed),
                    invocation.stats.failed.load(Ordering::Relaxed)
                );
                invocation.reply(text).await
            })
        }
        commands.insert(
            String::from("/stats"),
            BotCommand {
                description: String::from("Show how many commands failed"),
                owner_only: true,
                handler: Box::new(stats) as CommandHandler,
            },
        );

        commands
    }

    pub fn help(commands: &HashMap<String, BotCommand>) -> String {
        let mut help_message = String::from("Commands:");

        for (name, command) in commands
            .iter()
            .sorted_unstable_by(|a, b| Ord::cmp(&a.0, &b.0))
        {
            help_message.push_str(&format!("\n{} {}", name, command.description));
        }

        help_message
    }
}

fn parse_number(arg: Option<&String>, param: &str) -> Result<i64, ErrorValue> {
    let arg = arg.ok_or_else(|| ErrorValue::MissingRequiredArgument {
        param: param.to_string(),
    })?;

    arg.parse::<i64>().map_err(|_| ErrorValue::BadArgument {
        param: Some(param.to_string()),
    })
}
