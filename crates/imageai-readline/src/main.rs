use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use imageai_application::{ChatWorkspace, ConversationEvent};
use imageai_core::config::ProviderKind;
use imageai_core::conversation::Message;
use imageai_core::identity::Route;
use imageai_interaction::config::load_config;
use imageai_interaction::{LocalSessionGate, build_generation_client};

mod commands;

use commands::{COMMANDS, Command};

#[derive(Parser)]
#[command(name = "imageai")]
#[command(about = "ImageAI - chat with an image generator from the terminal", long_about = None)]
struct Args {
    /// Path to the config file (defaults to ~/.config/imageai/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the generation provider from the config file
    #[arg(long, value_enum)]
    provider: Option<ProviderArg>,

    /// Signs in as this user on startup
    #[arg(long)]
    user: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    Mock,
    Openai,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Mock => ProviderKind::Mock,
            ProviderArg::Openai => ProviderKind::OpenAi,
        }
    }
}

/// rustyline helper driven by the command table: completes command names,
/// hints their arguments and help text, and flags unknown commands.
#[derive(Clone, Copy)]
struct CliHelper;

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = commands::matching(line)
            .map(|spec| Pair {
                display: spec.usage(),
                replacement: if spec.takes_args() {
                    format!("{} ", spec.name)
                } else {
                    spec.name.to_string()
                },
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }
        let (name, rest) = match line.find(' ') {
            Some(split) => line.split_at(split),
            None => (line, ""),
        };
        let name = if commands::matching(name).next().is_some() {
            name.bright_cyan()
        } else {
            name.red()
        };
        Owned(format!("{name}{rest}"))
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, line: &str, _pos: usize, _forced: bool) -> bool {
        line.starts_with('/')
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        // Only hint at the end of the line
        if pos < line.len() {
            return None;
        }
        commands::hint_for(line)
    }
}

impl Validator for CliHelper {}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_help() {
    println!("{}", "Type a prompt to generate an image, or use a command:".bright_black());
    for spec in COMMANDS {
        println!(
            "  {} {}",
            format!("{:<14}", spec.usage()).bright_cyan(),
            spec.help.bright_black()
        );
    }
}

fn print_suggestions(suggestions: &[&str]) {
    println!("{}", "Try one of these:".bright_yellow());
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).yellow(), suggestion);
    }
}

fn print_assistant_message(message: &Message) {
    for line in message.text.lines() {
        println!("{}", line.bright_blue());
    }
    if let Some(image) = &message.image_ref {
        if image.is_inline() {
            println!("{}", "[inline image]".bright_black());
        } else {
            println!("{}", format!("Image: {image}").cyan());
        }
    }
}

async fn print_history(workspace: &ChatWorkspace) {
    let entries = workspace.history().list().await;
    if entries.is_empty() {
        println!("{}", "No previous conversations".bright_black());
        return;
    }
    for entry in entries {
        println!(
            "{} {} {}",
            format!("[{}]", entry.id).bright_black(),
            entry.title.bold(),
            entry.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
        );
        println!("    {}", entry.preview_text.bright_black());
    }
}

/// Shows the chat screen header once a session is established.
async fn enter_chat(workspace: &ChatWorkspace) -> Result<Route> {
    let route = workspace.on_session_established().await?;
    if let Some(identity) = workspace.current_identity().await {
        println!("{}", format!("Signed in as {}", identity.display_label).bright_green());
    }
    print_suggestions(workspace.controller().suggestions());
    Ok(route)
}

/// The main entry point for the ImageAI readline REPL.
///
/// Submissions return immediately; replies are printed by a background task
/// that follows the conversation event stream.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ===== Configuration =====
    let mut config = load_config(args.config.as_deref())?;
    if let Some(provider) = args.provider {
        config.generation.provider = provider.into();
    }
    init_logging(&config.logging.level);

    // ===== Backend Initialization =====
    let client = build_generation_client(&config.generation)?;
    let gate = Arc::new(LocalSessionGate::new());
    if let Some(user) = &args.user {
        gate.sign_in(user.as_str()).await?;
    }
    let workspace = ChatWorkspace::new(client, gate.clone());

    // Print replies as soon as they land in the log
    let mut events = workspace.controller().subscribe();
    let event_printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ConversationEvent::GenerationStarted { .. }) => {
                    println!("{}", "Generating your image...".bright_black());
                }
                Ok(ConversationEvent::MessageAppended(message)) if message.is_assistant() => {
                    print_assistant_message(&message);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Readline] Event printer skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    println!("{}", "=== ImageAI ===".bright_magenta().bold());
    println!("{}", "Type '/help' for commands or '/quit' to exit.".bright_black());
    println!();

    let mut route = workspace.initial_route().await;
    match route {
        Route::Chat => route = enter_chat(&workspace).await?,
        _ => println!("{}", "Sign in with '/login <name>' to start.".bright_yellow()),
    }

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        let line = match readline {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let Some(command) = commands::parse(&line) else {
            continue;
        };
        let _ = rl.add_history_entry(line.as_str());
        let in_chat = route == Route::Chat && workspace.can_enter(Route::Chat).await;

        match command {
            Command::Quit => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Command::Help => print_help(),
            Command::Invalid(message) => println!("{}", message.yellow()),
            Command::Login(name) => {
                // Switching users ends the current session first
                if in_chat {
                    match workspace.logout().await {
                        Ok(next) => route = next,
                        Err(e) => {
                            eprintln!("{}", format!("Logout failed: {e}").red());
                            continue;
                        }
                    }
                }
                match gate.sign_in(name).await {
                    Ok(_) => match enter_chat(&workspace).await {
                        Ok(next) => route = next,
                        Err(e) => eprintln!("{}", format!("Login failed: {e}").red()),
                    },
                    Err(e) => eprintln!("{}", format!("Login failed: {e}").red()),
                }
            }
            _ if !in_chat => {
                println!("{}", "Sign in with '/login <name>' first.".yellow());
            }
            Command::Prompt(text) => {
                if let Err(reason) = workspace.controller().submit_prompt(&text).await {
                    println!("{}", reason.to_string().yellow());
                }
            }
            Command::Suggest(None) => print_suggestions(workspace.controller().suggestions()),
            Command::Suggest(Some(n)) => {
                let suggestions = workspace.controller().suggestions();
                match suggestions.get(n - 1) {
                    Some(suggestion) => {
                        workspace.controller().apply_suggestion(suggestion).await;
                        println!("{}", format!("Draft: {suggestion}").green());
                        println!("{}", "Type '/send' to submit it.".bright_black());
                    }
                    None => println!(
                        "{}",
                        format!("There are only {} suggestions", suggestions.len()).yellow()
                    ),
                }
            }
            Command::Send => {
                if let Err(reason) = workspace.controller().submit_draft().await {
                    println!("{}", reason.to_string().yellow());
                }
            }
            Command::New => match workspace.new_chat().await {
                Ok(Some(entry)) => {
                    println!("{}", format!("Saved '{}' to history", entry.title).green());
                    print_suggestions(workspace.controller().suggestions());
                }
                Ok(None) => print_suggestions(workspace.controller().suggestions()),
                Err(reason) => println!("{}", reason.to_string().yellow()),
            },
            Command::History => print_history(&workspace).await,
            Command::Delete(id) => {
                workspace.delete_history_entry(&id).await;
                println!("{}", format!("Deleted {id}").bright_black());
            }
            Command::Logout => match workspace.logout().await {
                Ok(next) => {
                    route = next;
                    println!("{}", "Signed out.".bright_green());
                }
                Err(e) => eprintln!("{}", format!("Logout failed: {e}").red()),
            },
        }
    }

    event_printer.abort();
    Ok(())
}
