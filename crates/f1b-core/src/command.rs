//! Command line parsing: prefix handling and whitespace tokenization.

/// A parsed bot command: `name` followed by positional `arguments`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub arguments: Vec<String>,
}

impl Command {
    pub fn arg(&self, idx: usize) -> Option<&str> {
        self.arguments.get(idx).map(String::as_str)
    }
}

/// Split a command line on runs of whitespace.
///
/// The first token is the command name, the rest are its arguments in order.
/// No quoting or escaping: `"a b"` is two arguments.
pub fn parse(text: &str) -> Command {
    let mut tokens = text.split_whitespace().map(str::to_string);
    let name = tokens.next().unwrap_or_default();
    Command {
        name,
        arguments: tokens.collect(),
    }
}

/// Strip the bot prefix from an incoming message.
///
/// Returns `None` when the message is not addressed to the bot. A bare prefix
/// means "help".
pub fn strip_prefix(text: &str, prefix: &str) -> Option<String> {
    let text = text.trim();
    let rest = text.strip_prefix(prefix)?;
    if rest.is_empty() {
        return Some("help".to_string());
    }
    // `!f1next` is not addressed to `!f1`.
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start().to_string())
}

/// Telegram-style `/cmd@botname args...` to `cmd args...`.
pub fn slash_command(text: &str) -> Option<String> {
    let text = text.trim().strip_prefix('/')?;
    let mut parts = text.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();

    let cmd = first.split('@').next().unwrap_or("").to_lowercase();
    if cmd.is_empty() {
        return None;
    }
    if rest.is_empty() {
        return Some(cmd);
    }
    Some(format!("{cmd} {rest}"))
}
