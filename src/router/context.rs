/// Metadata of the command that failed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: String,
    pub qualified_name: String,
    /// The command carries its own error handler.
    pub has_error_handler: bool,
    /// The command's group declares a handler for this command.
    pub group_has_handler: bool,
}

impl CommandInfo {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            qualified_name: name.clone(),
            name,
            has_error_handler: false,
            group_has_handler: false,
        }
    }

    pub fn handled_elsewhere(&self) -> bool {
        self.has_error_handler || self.group_has_handler
    }
}

/// Read-only view of the invocation that failed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub command: Option<CommandInfo>,
    pub content: String,
    pub author_id: i64,
    pub channel_id: i64,
    pub guild_id: Option<i64>,
    pub message_id: i64,
    pub prefix: String,
}

impl ErrorContext {
    pub fn command_name(&self) -> &str {
        self.command.as_ref().map_or("", |command| command.name.as_str())
    }

    pub fn qualified_name(&self) -> &str {
        self.command
            .as_ref()
            .map_or("", |command| command.qualified_name.as_str())
    }
}
