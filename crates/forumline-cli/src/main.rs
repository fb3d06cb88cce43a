//! forumline - a terminal front-end for the forum backend.
//!
//! Each subcommand is one "page" of the forum: the thread list, a thread
//! with its replies, the login and registration forms, the profile.

mod app;
mod views;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use forumline_core::auth::CredentialBackend;
use forumline_core::models::{MessageSort, ThreadStatus};
use forumline_core::Method;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;

#[derive(Parser, Debug)]
#[command(name = "forumline", version, about = "Browse and post to a forum from the terminal")]
pub struct Cli {
    /// Backend base URL (overrides config and FORUMLINE_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where the session token is kept: file, keyring or memory
    #[arg(long, global = true)]
    pub store: Option<CredentialBackend>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long, short, env = "FORUMLINE_USERNAME")]
        username: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long, short)]
        username: Option<String>,
        #[arg(long, short)]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who the stored session belongs to
    Whoami,
    /// List threads
    Threads {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        per_page: u32,
        #[arg(long, default_value = "open")]
        status: ThreadStatus,
    },
    /// Search threads by title and description
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        per_page: u32,
    },
    /// Show a thread and its replies
    Show {
        id: i64,
        #[arg(long, default_value = "newest")]
        sort: MessageSort,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Start a new thread
    NewThread {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Comma-separated
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Edit one of your threads
    EditThread {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        #[arg(long)]
        status: Option<ThreadStatus>,
    },
    /// Delete one of your threads
    DeleteThread {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Reply to a thread (reads stdin when no text is given)
    Reply { thread_id: i64, content: Option<String> },
    /// Like a message
    Like { message_id: i64 },
    /// Dislike a message
    Dislike { message_id: i64 },
    /// Show your profile
    Profile,
    /// Update your profile
    EditProfile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        picture: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    /// List your own threads, or your messages with --messages
    Mine {
        #[arg(long)]
        messages: bool,
    },
    /// Site-wide counters
    Stats,
    /// Raw call against any endpoint, printing the response envelope
    Call {
        method: Method,
        endpoint: String,
        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr unless `log_file` is set. The returned guard must live
/// until exit so buffered lines are flushed.
fn init_tracing(log_file: Option<&PathBuf>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("forumline.log"));
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let guard = init_tracing(cli.log_file.as_ref());
    info!(command = ?cli.command, "forumline starting");

    let app = App::new(cli.api_url.as_deref(), cli.store)?;
    if let Err(e) = app.run(cli.command).await {
        eprintln!("Error: {:#}", e);
        drop(guard);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_threads_defaults() {
        let cli = Cli::try_parse_from(["forumline", "threads"]).unwrap();
        match cli.command {
            Command::Threads { page, per_page, status } => {
                assert_eq!(page, 1);
                assert_eq!(per_page, 10);
                assert_eq!(status, ThreadStatus::Open);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "forumline",
            "show",
            "5",
            "--sort",
            "likes",
            "--store",
            "memory",
            "--api-url",
            "http://127.0.0.1:9000",
        ])
        .unwrap();
        assert_eq!(cli.store, Some(CredentialBackend::Memory));
        assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert!(matches!(
            cli.command,
            Command::Show { id: 5, sort: MessageSort::Likes, page: 1 }
        ));
    }

    #[test]
    fn test_parse_tags_and_method() {
        let cli = Cli::try_parse_from([
            "forumline",
            "new-thread",
            "--title",
            "Hi",
            "--description",
            "Body",
            "--tags",
            "a,b",
        ])
        .unwrap();
        match cli.command {
            Command::NewThread { tags, .. } => assert_eq!(tags, vec!["a", "b"]),
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from(["forumline", "call", "delete", "/api/threads/3"]).unwrap();
        assert!(matches!(cli.command, Command::Call { method: Method::Delete, .. }));
        assert!(Cli::try_parse_from(["forumline", "call", "PATCH", "/x"]).is_err());
    }
}
