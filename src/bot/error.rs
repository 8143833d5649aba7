use command_error_router::{Embed, ErrorContext, Framework, FrameworkError, Reply};
use tgbot::{methods::SendMessage, types::ParseMode, Api};

/// Delivers the router's replies over the Telegram Bot API.
pub struct TelegramFramework {
    api: Api,
}

impl TelegramFramework {
    pub fn new(api: Api) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl Framework for TelegramFramework {
    async fn send(&self, ctx: &ErrorContext, reply: Reply) -> Result<(), FrameworkError> {
        let send_message = match reply {
            Reply::Text(text) => SendMessage::new(ctx.channel_id, text),
            Reply::Embed(embed) => {
                SendMessage::new(ctx.channel_id, render_embed(&embed)).parse_mode(ParseMode::Html)
            }
        };

        self.api
            .execute(send_message)
            .await
            .map(|_| ())
            .map_err(FrameworkError::send)
    }

    async fn reset_cooldown(&self, ctx: &ErrorContext) -> Result<(), FrameworkError> {
        // commands here are not rate limited
        tracing::trace!("no cooldown to reset for {:?}", ctx.qualified_name());
        Ok(())
    }
}

/// Telegram has no embeds; the title becomes a bold first line.
pub fn render_embed(embed: &Embed) -> String {
    format!(
        "<b>{}</b>\n{}",
        escape_html(&embed.title),
        escape_html(&embed.description)
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_error_router::router::RED;

    #[test]
    fn embeds_render_as_html() {
        let embed = Embed {
            title: String::from("Permission denied"),
            description: String::from("<admins> & owners only"),
            colour: RED,
        };
        assert_eq!(
            render_embed(&embed),
            "<b>Permission denied</b>\n&lt;admins&gt; &amp; owners only"
        );
    }
}
