use crate::reporter::ReportRecord;

pub const RED: u32 = 0xFF0000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub colour: u32,
}

/// A message sent back to the channel the command came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Embed(Embed),
}

impl Reply {
    pub fn text(&self) -> Option<&str> {
        match self {
            Reply::Text(text) => Some(text),
            Reply::Embed(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Ignore,
    SendMessage(Reply),
    SendMessageAndReport(Reply, ReportRecord),
}

impl Action {
    pub fn reply(&self) -> Option<&Reply> {
        match self {
            Action::Ignore => None,
            Action::SendMessage(reply) | Action::SendMessageAndReport(reply, _) => Some(reply),
        }
    }
}

/// The outcome of classifying one error.
#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub reset_cooldown: bool,
}
