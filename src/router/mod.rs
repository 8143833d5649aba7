//! Turns a failed command into at most one reply, and reports the failures
//! nobody expected.

mod action;
mod context;
mod duration;
mod kind;

pub use action::{Action, Decision, Embed, Reply, RED};
pub use context::{CommandInfo, ErrorContext};
pub use duration::format_retry_after;
pub use kind::{Cause, CheckFailure, ErrorValue, OriginalError};

use crate::{
    error::FrameworkError,
    i18n::{interpolate, Localizer, Untranslated},
    reporter::{CrashReporter, ReportRecord},
};
use async_trait::async_trait;
use std::sync::Arc;

/// What the router needs from the bot framework hosting it.
#[async_trait]
pub trait Framework: Send + Sync {
    async fn send(&self, ctx: &ErrorContext, reply: Reply) -> Result<(), FrameworkError>;

    async fn reset_cooldown(&self, ctx: &ErrorContext) -> Result<(), FrameworkError>;
}

/// Operator-facing record of an unexpected failure.
pub trait DiagnosticSink: Send + Sync {
    fn command_failed(&self, command: &str, original: &OriginalError);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn command_failed(&self, command: &str, original: &OriginalError) {
        tracing::error!("In {}:\n{}", command, original.trace());
        tracing::error!("{}: {}", original.type_name, original.message);
    }
}

pub struct ErrorRouter {
    reporter: Option<Arc<CrashReporter>>,
    localizer: Arc<dyn Localizer>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl ErrorRouter {
    pub fn new(reporter: Option<Arc<CrashReporter>>) -> Self {
        Self {
            reporter,
            localizer: Arc::new(Untranslated),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = localizer;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn reporter(&self) -> Option<&CrashReporter> {
        self.reporter.as_deref()
    }

    /// Decides what to do about `error` without touching the outside world.
    pub fn classify(&self, ctx: &ErrorContext, error: &ErrorValue, bypass: bool) -> Decision {
        let delegated = ctx
            .command
            .as_ref()
            .map_or(false, CommandInfo::handled_elsewhere);
        if !bypass && delegated {
            return Decision {
                action: Action::Ignore,
                reset_cooldown: false,
            };
        }

        if let ErrorValue::CommandOnCooldown { retry_after } = error {
            let time = format_retry_after(*retry_after);
            let text = interpolate(
                &self.tr("You are on cooldown. Try again in {time}."),
                &[("time", time.as_str())],
            );
            // resetting here would lift the very cooldown being reported
            return Decision {
                action: Action::SendMessage(Reply::Text(text)),
                reset_cooldown: false,
            };
        }

        Decision {
            action: self.action_for(ctx, error),
            reset_cooldown: true,
        }
    }

    fn action_for(&self, ctx: &ErrorContext, error: &ErrorValue) -> Action {
        let reply = match error {
            ErrorValue::CommandNotFound => return Action::Ignore,
            ErrorValue::MissingRequiredArgument { param } => interpolate(
                &self.tr("Oops! You forgot a required argument: `{arg}`"),
                &[("arg", param.as_str())],
            ),
            ErrorValue::BadArgument { .. } => self.tr("You used a malformed argument!"),
            _ if error.original().map(|o| o.cause) == Some(Cause::Http) => return Action::Ignore,
            ErrorValue::NotOwner => {
                return self.denied("This command is only available for the bot owner.")
            }
            ErrorValue::CheckFailure(check) => match self.check_failure(ctx, check) {
                Some(text) => text,
                None => {
                    return self.denied(
                        "You don't have the permissions to use this command. It is thought for other users.",
                    )
                }
            },
            ErrorValue::NoChoice => self.tr("You did not choose anything."),
            ErrorValue::CommandInvokeError(original) => return self.invoke_error(ctx, original),
            _ => return Action::Ignore,
        };

        Action::SendMessage(Reply::Text(reply))
    }

    fn check_failure(&self, ctx: &ErrorContext, check: &CheckFailure) -> Option<String> {
        let text = match check {
            CheckFailure::NoCharacter => self.tr("You don't have a character yet."),
            CheckFailure::NoGuild => self.tr("You need to have a guild to use this command."),
            CheckFailure::NeedsNoGuild => self.tr("You need to be in no guild to use this command."),
            CheckFailure::NoGuildPermissions => {
                self.tr("Your rank in the guild is too low to use this command.")
            }
            CheckFailure::NeedsNoGuildLeader => {
                self.tr("You mustn't be the owner of a guild to use this command.")
            }
            CheckFailure::NeedsNoAdventure => interpolate(
                &self.tr(
                    "You are already on an adventure. Use `{prefix}status` to see how long it lasts.",
                ),
                &[("prefix", ctx.prefix.as_str())],
            ),
            CheckFailure::NeedsAdventure => interpolate(
                &self.tr(
                    "You need to be on an adventure to use this command. Try `{prefix}adventure`!",
                ),
                &[("prefix", ctx.prefix.as_str())],
            ),
            CheckFailure::Other(_) => return None,
        };
        Some(text)
    }

    fn invoke_error(&self, ctx: &ErrorContext, original: &OriginalError) -> Action {
        if original.cause.is_transient_transport() {
            return Action::Ignore;
        }

        if original.cause == Cause::DataOutOfRange {
            return Action::SendMessage(Reply::Text(self.tr(
                "An argument or value you entered was far too high for me to handle properly!",
            )));
        }

        Action::SendMessageAndReport(
            Reply::Text(self.tr(
                "The command you tried to use ran into an error. The incident has been reported and the team will work hard to fix the issue!",
            )),
            ReportRecord::new(ctx, original),
        )
    }

    /// Classifies `error` and carries out the outcome. Never fails; problems
    /// talking to the framework are logged and dropped.
    pub async fn handle<F>(
        &self,
        framework: &F,
        ctx: &ErrorContext,
        error: &ErrorValue,
        bypass: bool,
    ) -> Action
    where
        F: Framework + ?Sized,
    {
        let Decision {
            action,
            reset_cooldown,
        } = self.classify(ctx, error, bypass);

        tracing::debug!(
            "{} in {:?} -> {}",
            error.kind_name(),
            ctx.qualified_name(),
            match &action {
                Action::Ignore => "ignore",
                Action::SendMessage(_) => "reply",
                Action::SendMessageAndReport(..) => "reply and report",
            }
        );

        if let (Action::SendMessageAndReport(_, record), Some(original)) =
            (&action, error.original())
        {
            self.diagnostics.command_failed(ctx.qualified_name(), original);
            if let Some(reporter) = &self.reporter {
                reporter.submit(record);
            }
        }

        if let Some(reply) = action.reply() {
            if let Err(e) = framework.send(ctx, reply.clone()).await {
                tracing::warn!("could not deliver error reply: {}", e);
            }
        }

        if reset_cooldown {
            if let Err(e) = framework.reset_cooldown(ctx).await {
                tracing::warn!("could not reset cooldown: {}", e);
            }
        }

        action
    }

    /// Closes the crash reporter. Safe to call more than once.
    pub fn shutdown(&self) {
        if let Some(reporter) = &self.reporter {
            reporter.stop();
        }
    }

    fn tr(&self, template: &str) -> String {
        self.localizer.localize(template)
    }

    fn denied(&self, description: &str) -> Action {
        Action::SendMessage(Reply::Embed(Embed {
            title: self.tr("Permission denied"),
            description: self.tr(description),
            colour: RED,
        }))
    }
}
