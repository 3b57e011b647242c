use {
  anyhow::{Context, anyhow},
  app::App,
  chrono::{DateTime, NaiveDateTime},
  client::Client,
  command::Command,
  command_dispatch::CommandDispatch,
  comment::Comment,
  comment_entry::CommentEntry,
  comment_record::CommentRecord,
  compose_input::ComposeInput,
  config::{Config, DateFormat},
  crossterm::{
    event as crossterm_event,
    event::{
      Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    },
    execute,
    style::Stylize,
    terminal::{
      EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
      enable_raw_mode,
    },
  },
  effect::Effect,
  event::Event,
  help_view::HelpView,
  pending_replies::PendingReplies,
  pending_root::PendingRoot,
  pending_submit::PendingSubmit,
  ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
  },
  replies_affordance::RepliesAffordance,
  serde::{
    Deserialize, Deserializer,
    de::{self, Unexpected},
  },
  serde_json::Value,
  state::State,
  std::{
    backtrace::BacktraceStatus,
    env, fs,
    io::{self, IsTerminal, Stdout},
    path::PathBuf,
    process,
    str::FromStr,
    string::String,
    time::{Duration, Instant},
  },
  thread_view::ThreadView,
  tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
  },
  tracing_subscriber::EnvFilter,
  transient_message::TransientMessage,
  utils::{
    deserialize_flexible_bool, deserialize_lenient_u64,
    deserialize_optional_string, deserialize_optional_u64, format_timestamp,
    sanitize_comment, truncate, wrap_text,
  },
};

mod app;
mod client;
mod command;
mod command_dispatch;
mod comment;
mod comment_entry;
mod comment_record;
mod compose_input;
mod config;
mod effect;
mod event;
mod help_view;
mod pending_replies;
mod pending_root;
mod pending_submit;
mod replies_affordance;
mod state;
mod thread_view;
mod transient_message;
mod utils;

const BROWSE_STATUS: &str = "↑/k up • ↓/j down • enter replies • m more • c comment • r reply • q quit • ? help";

const LOADING_COMMENTS_STATUS: &str = "Loading comments...";
const LOADING_REPLIES_STATUS: &str = "Loading replies...";
const POSTING_STATUS: &str = "Posting comment...";

const HELP_TITLE: &str = "Help";
const HELP_STATUS: &str = "Press ? or esc to close help";

const BASE_INDENT: &str = " ";

// Replies compose one level deep: only entries at this depth offer the
// reply affordance. Expansion itself follows has_replies at any depth.
const REPLY_COMPOSE_DEPTH: usize = 0;

const SUBMIT_SUCCESS: &str = "success";

const TOO_SHORT_TEMPLATE: &str =
  "Your comment is too short. Please enter at least {{min}} characters.";

const HELP_TEXT: &str = "\
Navigation:
  ↑ / k   move selection up
  ↓ / j   move selection down
  pg↓     page down
  pg↑     page up
  ctrl+d  page down
  ctrl+u  page up
  home    jump to the first comment
  end     jump to the last comment

Actions:
  enter   show or hide replies for the selected comment
  m       load more comments
  c       write a new comment
  r       reply to the selected comment
  o       open the author's avatar in your browser
  q       quit backtalk
  scroll  keep going past the end to load more comments
  ?       toggle this help

Composing:
  type    edit the draft
  enter   post the comment
  esc     discard the draft
";

type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;

fn initialize_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
  let path = log_path()?;

  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }

  let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

  let (writer, guard) = tracing_appender::non_blocking(file);

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("backtalk=debug")),
    )
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}

fn initialize_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
  enable_raw_mode()?;

  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen)?;

  Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn log_path() -> Result<PathBuf> {
  if let Ok(path) = env::var("BACKTALK_LOG_FILE") {
    return Ok(PathBuf::from(path));
  }

  let base_dir = if let Ok(dir) = env::var("XDG_STATE_HOME") {
    PathBuf::from(dir)
  } else if let Ok(home) = env::var("HOME") {
    PathBuf::from(home).join(".local").join("state")
  } else {
    env::current_dir()?.join(".state")
  };

  Ok(base_dir.join("backtalk").join("backtalk.log"))
}

fn restore_terminal(
  terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result {
  disable_raw_mode()?;

  execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

  terminal.show_cursor()?;

  Ok(())
}

async fn run() -> Result {
  let config = Config::load()?;

  let _logging_guard =
    initialize_logging().context("could not initialize logging")?;

  let client = Client::new(&config);

  let initial = client
    .fetch_root_comments(0, config.page_size)
    .await
    .context("could not load comments")?;

  let mut terminal = initialize_terminal()?;

  let mut app = App::new(client, State::new(config, initial));

  app.run(&mut terminal)?;

  restore_terminal(&mut terminal)
}

#[tokio::main]
async fn main() {
  if let Err(error) = run().await {
    let use_color = io::stderr().is_terminal();

    if use_color {
      eprintln!("{} {error}", "error:".bold().red());
    } else {
      eprintln!("error: {error}");
    }

    for (i, error) in error.chain().skip(1).enumerate() {
      if i == 0 {
        eprintln!();

        if use_color {
          eprintln!("{}", "because:".bold().red());
        } else {
          eprintln!("because:");
        }
      }

      if use_color {
        eprintln!("{} {error}", "-".bold().red());
      } else {
        eprintln!("- {error}");
      }
    }

    let backtrace = error.backtrace();

    if backtrace.status() == BacktraceStatus::Captured {
      if use_color {
        eprintln!("{}", "backtrace:".bold().red());
      } else {
        eprintln!("backtrace:");
      }

      eprintln!("{backtrace}");
    }

    process::exit(1);
  }
}
