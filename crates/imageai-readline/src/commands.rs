//! REPL commands: the command table and input-line parsing.

/// One slash command as shown in help, hints and completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    /// Argument placeholder, empty when the command takes none
    pub args: &'static str,
    pub help: &'static str,
}

impl CommandSpec {
    pub fn usage(&self) -> String {
        if self.args.is_empty() {
            self.name.to_string()
        } else {
            format!("{} {}", self.name, self.args)
        }
    }

    pub fn takes_args(&self) -> bool {
        !self.args.is_empty()
    }
}

pub const COMMANDS: [CommandSpec; 9] = [
    CommandSpec {
        name: "/suggest",
        args: "[n]",
        help: "list starter prompts, or put the n-th one in the draft",
    },
    CommandSpec {
        name: "/send",
        args: "",
        help: "submit the draft",
    },
    CommandSpec {
        name: "/new",
        args: "",
        help: "archive this conversation and start a new one",
    },
    CommandSpec {
        name: "/history",
        args: "",
        help: "list previous conversations",
    },
    CommandSpec {
        name: "/delete",
        args: "<id>",
        help: "delete a history entry",
    },
    CommandSpec {
        name: "/login",
        args: "<name>",
        help: "sign in (ends the current session first)",
    },
    CommandSpec {
        name: "/logout",
        args: "",
        help: "sign out",
    },
    CommandSpec {
        name: "/help",
        args: "",
        help: "show this list",
    },
    CommandSpec {
        name: "/quit",
        args: "",
        help: "exit",
    },
];

pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// Commands whose name starts with `prefix`.
pub fn matching(prefix: &str) -> impl Iterator<Item = &'static CommandSpec> + '_ {
    COMMANDS.iter().filter(move |spec| spec.name.starts_with(prefix))
}

/// Inline hint for a partially typed line.
///
/// - `/de` hints the rest of the name plus its arguments (`lete <id>`)
/// - a complete name hints its help text
/// - `/delete ` with nothing typed yet hints the argument placeholder
pub fn hint_for(line: &str) -> Option<String> {
    if !line.starts_with('/') {
        return None;
    }

    match line.split_once(' ') {
        None => {
            if let Some(spec) = lookup(line) {
                return Some(format!("  {}", spec.help));
            }
            let spec = matching(line).next()?;
            let rest = &spec.name[line.len()..];
            if spec.takes_args() {
                Some(format!("{rest} {}", spec.args))
            } else {
                Some(rest.to_string())
            }
        }
        Some((name, rest)) if rest.is_empty() => {
            let spec = lookup(name)?;
            spec.takes_args().then(|| spec.args.to_string())
        }
        Some(_) => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text, submitted as a prompt
    Prompt(String),
    /// List suggestions, or put the n-th (1-based) into the draft
    Suggest(Option<usize>),
    Send,
    New,
    History,
    Delete(String),
    Logout,
    Login(String),
    Help,
    Quit,
    /// A command that could not be parsed; carries the message to show
    Invalid(String),
}

/// Parses one input line. Returns `None` for blank lines.
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if !line.starts_with('/') {
        return Some(Command::Prompt(line.to_string()));
    }

    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let usage = || {
        lookup(name)
            .map(|spec| format!("Usage: {}", spec.usage()))
            .unwrap_or_default()
    };

    let command = match name {
        "/suggest" if arg.is_empty() => Command::Suggest(None),
        "/suggest" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => Command::Suggest(Some(n)),
            _ => Command::Invalid(format!("{}, got '{arg}'", usage())),
        },
        "/send" => Command::Send,
        "/new" => Command::New,
        "/history" => Command::History,
        "/delete" if arg.is_empty() => Command::Invalid(usage()),
        "/delete" => Command::Delete(arg.to_string()),
        "/logout" => Command::Logout,
        "/login" if arg.is_empty() => Command::Invalid(usage()),
        "/login" => Command::Login(arg.to_string()),
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        other => Command::Invalid(format!("Unknown command: {other}")),
    };
    Some(command)
}
