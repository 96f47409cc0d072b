//! CLI interface for the logbook.
//!
//! With no subcommand the search palette opens in the terminal. Every
//! subcommand is non-interactive: arguments in, plain text out.
//!
//! Log ids may be given as a full UUID or an unambiguous prefix.

mod format;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use jiff::Timestamp;
use uuid::Uuid;

use crate::config::{self, Config};
use crate::model::{CollectionType, Log, LogKind, LogPatch, LogType, NewLog, Priority};
use crate::repository::LogRepository;
use crate::search;
use crate::storage::{SettingKey, SettingsStore, Storage};
use crate::{telemetry, tui};

use format::{format_detail, format_row, short_id};

/// Logbook: notes, tasks, events and collections, one keystroke away.
#[derive(Debug, Parser)]
#[command(name = "logbook", after_long_help = USAGE_HELP)]
pub struct Cli {
    /// Data directory. Defaults to `$LOGBOOK_HOME`, then `~/.logbook`.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

const USAGE_HELP: &str = r#"Palette keys:
  ↑ ↓        move through shortcuts, pinned logs, and all logs
  ⏎          open the selected item
  Shift+Tab  open the context menu of the selected log (Open / Pin / Delete)
  Esc        clear the query, or close the palette when it is empty

Examples:
  logbook new note --title "Groceries" "milk, eggs"
  logbook search groc
  logbook pin 3fa8"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a log. Prints the new id.
    New {
        #[command(subcommand)]
        kind: NewCommand,
    },

    /// List logs in creation order.
    List {
        /// Only logs of this type.
        #[arg(long = "type", value_enum)]
        log_type: Option<TypeArg>,

        /// Only pinned logs.
        #[arg(long)]
        pinned: bool,

        /// Only logs whose title or content contains this text.
        #[arg(long, value_name = "TEXT")]
        matching: Option<String>,
    },

    /// Search titles and content, pinned results first.
    Search {
        /// Case-insensitive text to look for. Empty lists everything.
        #[arg(default_value = "")]
        query: String,
    },

    /// Show one log in full.
    Show { id: String },

    /// Change a log's title or content.
    Edit {
        id: String,

        /// New title.
        #[arg(long, conflicts_with = "clear_title")]
        title: Option<String>,

        /// Remove the title.
        #[arg(long)]
        clear_title: bool,

        /// New content.
        #[arg(long)]
        content: Option<String>,
    },

    /// Pin a log to the top of search results.
    Pin { id: String },

    /// Unpin a log.
    Unpin { id: String },

    /// Delete a log. Collections that list it keep a dangling reference.
    Delete { id: String },

    /// Read, change, or reset settings.
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum NewCommand {
    /// Free-form text.
    Note {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Something to get done.
    Task {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(long, value_enum, default_value_t = PriorityArg::Low)]
        priority: PriorityArg,

        /// Due time, RFC 3339 (e.g. `2025-04-05T09:00:00Z`).
        #[arg(long)]
        due: Option<Timestamp>,
    },

    /// Something that happens over a span of time.
    Event {
        #[command(flatten)]
        common: CommonArgs,

        /// Start time, RFC 3339.
        #[arg(long)]
        from: Timestamp,

        /// End time, RFC 3339. Defaults to the start.
        #[arg(long)]
        to: Option<Timestamp>,

        /// Spans whole days.
        #[arg(long)]
        continuous: bool,
    },

    /// A group of other logs.
    Collection {
        #[command(flatten)]
        common: CommonArgs,

        /// Child log ids, in order. Can be specified multiple times.
        #[arg(long = "child")]
        children: Vec<String>,

        /// Present children as a board rather than a list.
        #[arg(long)]
        board: bool,
    },
}

/// Fields every new log takes.
#[derive(Debug, clap::Args)]
pub struct CommonArgs {
    /// Body text.
    content: String,

    /// Display name. Shown as "Untitled" when omitted.
    #[arg(long)]
    title: Option<String>,

    /// Pin on creation.
    #[arg(long)]
    pin: bool,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print one setting, or all of them.
    Get {
        #[arg(value_enum)]
        key: Option<SettingKeyArg>,
    },

    /// Change a setting.
    Set {
        #[arg(value_enum)]
        key: SettingKeyArg,
        value: String,
    },

    /// Restore the defaults.
    Reset,
}

/// CLI-facing log type, mapped to the domain `LogType`.
#[derive(Debug, Clone, ValueEnum)]
pub enum TypeArg {
    Note,
    Task,
    Event,
    Collection,
}

impl TypeArg {
    fn to_domain(&self) -> LogType {
        match self {
            Self::Note => LogType::Note,
            Self::Task => LogType::Task,
            Self::Event => LogType::Event,
            Self::Collection => LogType::Collection,
        }
    }
}

/// CLI-facing priority, mapped to the domain `Priority`.
#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl PriorityArg {
    fn to_domain(&self) -> Priority {
        match self {
            Self::Low => Priority::Low,
            Self::Medium => Priority::Medium,
            Self::High => Priority::High,
        }
    }
}

/// CLI-facing settings key, mapped to the storage `SettingKey`.
#[derive(Debug, Clone, ValueEnum)]
pub enum SettingKeyArg {
    Theme,
}

impl SettingKeyArg {
    fn to_domain(&self) -> SettingKey {
        match self {
            Self::Theme => SettingKey::Theme,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run() -> Result<(), String> {
    let cli = Cli::parse();

    let root = config::resolve_root(cli.root.as_deref())?;
    let storage = Storage::new(&root).map_err(|e| format!("failed to initialize storage: {e}"))?;
    let config = Config::load(&root)?;
    let _guard = telemetry::init(&root, &config)?;
    tracing::debug!(root = %root.display(), "starting");

    let settings = storage.settings();
    let mut repository =
        LogRepository::load(storage).map_err(|e| format!("failed to load logs: {e}"))?;

    match cli.command {
        None => tui::run(repository, settings).map_err(|e| format!("terminal error: {e}")),
        Some(Command::New { kind }) => cmd_new(&mut repository, kind),
        Some(Command::List {
            log_type,
            pinned,
            matching,
        }) => {
            cmd_list(
                &repository,
                log_type.as_ref().map(TypeArg::to_domain),
                pinned,
                matching.as_deref(),
            );
            Ok(())
        }
        Some(Command::Search { query }) => {
            cmd_search(&repository, &query);
            Ok(())
        }
        Some(Command::Show { id }) => {
            let id = resolve_log(&repository, &id)?;
            if let Some(log) = repository.get(id) {
                println!("{}", format_detail(log, &repository));
            }
            Ok(())
        }
        Some(Command::Edit {
            id,
            title,
            clear_title,
            content,
        }) => {
            let id = resolve_log(&repository, &id)?;
            let patch = LogPatch {
                title: if clear_title {
                    Some(None)
                } else {
                    title.map(Some)
                },
                content,
                kind: None,
            };
            cmd_edit(&mut repository, id, patch)
        }
        Some(Command::Pin { id }) => {
            let id = resolve_log(&repository, &id)?;
            repository
                .pin(id)
                .map_err(|e| format!("failed to pin log: {e}"))?;
            Ok(())
        }
        Some(Command::Unpin { id }) => {
            let id = resolve_log(&repository, &id)?;
            repository
                .unpin(id)
                .map_err(|e| format!("failed to unpin log: {e}"))?;
            Ok(())
        }
        Some(Command::Delete { id }) => {
            let id = resolve_log(&repository, &id)?;
            repository
                .delete(id)
                .map_err(|e| format!("failed to delete log: {e}"))?;
            eprintln!("Deleted {}", &id.to_string()[..8]);
            Ok(())
        }
        Some(Command::Settings { command }) => cmd_settings(&settings, &command),
    }
}

fn cmd_new(repository: &mut LogRepository, command: NewCommand) -> Result<(), String> {
    let (common, kind) = match command {
        NewCommand::Note { common } => (common, LogKind::Note),
        NewCommand::Task {
            common,
            priority,
            due,
        } => (
            common,
            LogKind::Task {
                priority: priority.to_domain(),
                due,
                done: false,
            },
        ),
        NewCommand::Event {
            common,
            from,
            to,
            continuous,
        } => {
            let to = to.unwrap_or(from);
            if to < from {
                return Err("an event cannot end before it starts".to_string());
            }
            (
                common,
                LogKind::Event {
                    from,
                    to,
                    continuous,
                },
            )
        }
        NewCommand::Collection {
            common,
            children,
            board,
        } => {
            let children = children
                .iter()
                .map(|c| resolve_log(repository, c))
                .collect::<Result<Vec<Uuid>, String>>()?;
            let collection_type = if board {
                CollectionType::Board
            } else {
                CollectionType::List
            };
            (
                common,
                LogKind::Collection {
                    children,
                    collection_type,
                },
            )
        }
    };

    let id = repository
        .create(NewLog {
            title: common.title,
            content: common.content,
            pinned: common.pin,
            kind,
        })
        .map_err(|e| format!("failed to create log: {e}"))?;

    println!("{id}");
    Ok(())
}

fn cmd_list(
    repository: &LogRepository,
    log_type: Option<LogType>,
    pinned_only: bool,
    matching: Option<&str>,
) {
    let logs: Vec<&Log> = repository
        .query(matching.unwrap_or_default())
        .into_iter()
        .filter(|l| log_type.is_none_or(|t| l.log_type() == t))
        .filter(|l| !pinned_only || l.pinned)
        .collect();

    if logs.is_empty() {
        println!("No logs");
        return;
    }
    for log in logs {
        println!("{}", format_row(log));
    }
}

fn cmd_search(repository: &LogRepository, query: &str) {
    let results = search::search(query, repository.all());
    if results.is_empty() {
        println!("No results found");
        return;
    }

    if !results.pinned.is_empty() {
        println!("Pinned");
        for log in &results.pinned {
            println!("  {}", format_row(log));
        }
    }
    if !results.unpinned.is_empty() {
        println!("All logs");
        for log in &results.unpinned {
            println!("  {}", format_row(log));
        }
    }
}

fn cmd_edit(repository: &mut LogRepository, id: Uuid, patch: LogPatch) -> Result<(), String> {
    if patch.is_empty() {
        return Err("nothing to change: pass --title, --clear-title, or --content".to_string());
    }
    repository
        .update(id, patch)
        .map_err(|e| format!("failed to update log: {e}"))?;
    if let Some(log) = repository.get(id) {
        eprintln!("Updated {}", short_id(log));
    }
    Ok(())
}

fn cmd_settings(settings: &SettingsStore, command: &SettingsCommand) -> Result<(), String> {
    match command {
        SettingsCommand::Get { key } => {
            let value = settings
                .get(key.as_ref().map(SettingKeyArg::to_domain))
                .map_err(|e| format!("failed to read settings: {e}"))?;
            match value {
                toml::Value::String(s) => println!("{s}"),
                other => print!("{other}"),
            }
        }
        SettingsCommand::Set { key, value } => {
            settings
                .set(key.to_domain(), value)
                .map_err(|e| format!("failed to update settings: {e}"))?;
        }
        SettingsCommand::Reset => {
            settings
                .reset()
                .map_err(|e| format!("failed to reset settings: {e}"))?;
            eprintln!("Settings reset to defaults");
        }
    }
    Ok(())
}

/// Resolve a log reference (full UUID or unambiguous prefix) to an id.
fn resolve_log(repository: &LogRepository, reference: &str) -> Result<Uuid, String> {
    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return repository
            .get(id)
            .map(|l| l.id)
            .ok_or_else(|| format!("no log with id {id}"));
    }

    // Try as a prefix match against all logs.
    let matches: Vec<&Log> = repository
        .all()
        .iter()
        .filter(|l| l.id.to_string().starts_with(reference))
        .collect();

    match matches.len() {
        0 => Err(format!("no log matching '{reference}'")),
        1 => Ok(matches[0].id),
        n => {
            let ids: Vec<String> = matches.iter().map(|l| short_id(l)).collect();
            Err(format!(
                "'{reference}' is ambiguous: matches {n} logs: {}",
                ids.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_palette() {
        let cli = Cli::try_parse_from(["logbook"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_new_task() {
        let cli = Cli::try_parse_from([
            "logbook",
            "new",
            "task",
            "--priority",
            "high",
            "--due",
            "2025-04-05T09:00:00Z",
            "ship it",
        ])
        .unwrap();
        let Some(Command::New {
            kind: NewCommand::Task { priority, due, .. },
        }) = cli.command
        else {
            panic!("expected new task");
        };
        assert_eq!(priority, PriorityArg::High);
        assert!(due.is_some());
    }

    #[test]
    fn list_filters_parse() {
        let cli = Cli::try_parse_from(["logbook", "list", "--type", "task", "--matching", "ship"])
            .unwrap();
        let Some(Command::List {
            log_type, matching, ..
        }) = cli.command
        else {
            panic!("expected list");
        };
        assert_eq!(log_type.map(|t| t.to_domain()), Some(LogType::Task));
        assert_eq!(matching.as_deref(), Some("ship"));
    }

    #[test]
    fn resolve_by_prefix_and_full_id() {
        let mut repo = LogRepository::in_memory();
        let id = repo.create(NewLog::note(Some("Alpha"), "x")).unwrap();
        let full = id.to_string();

        assert_eq!(resolve_log(&repo, &full).unwrap(), id);
        assert_eq!(resolve_log(&repo, &full[..6]).unwrap(), id);
        assert!(resolve_log(&repo, "zzzz").is_err());
        assert!(resolve_log(&repo, &Uuid::new_v4().to_string()).is_err());
    }

    #[test]
    fn empty_prefix_is_ambiguous_with_several_logs() {
        let mut repo = LogRepository::in_memory();
        repo.create(NewLog::note(Some("Alpha"), "x")).unwrap();
        repo.create(NewLog::note(Some("Beta"), "y")).unwrap();

        let err = resolve_log(&repo, "").unwrap_err();
        assert!(err.contains("ambiguous"));
    }

    #[test]
    fn event_ending_before_start_is_rejected() {
        let mut repo = LogRepository::in_memory();
        let err = cmd_new(
            &mut repo,
            NewCommand::Event {
                common: CommonArgs {
                    content: "Meeting".into(),
                    title: None,
                    pin: false,
                },
                from: Timestamp::new(2_000, 0).unwrap(),
                to: Some(Timestamp::new(1_000, 0).unwrap()),
                continuous: false,
            },
        )
        .unwrap_err();

        assert!(err.contains("end before"));
        assert!(repo.all().is_empty());
    }

    #[test]
    fn collection_children_resolve_by_prefix() {
        let mut repo = LogRepository::in_memory();
        let child = repo.create(NewLog::note(Some("Kid"), "x")).unwrap();

        cmd_new(
            &mut repo,
            NewCommand::Collection {
                common: CommonArgs {
                    content: "Folder".into(),
                    title: None,
                    pin: false,
                },
                children: vec![child.to_string()[..8].to_string()],
                board: true,
            },
        )
        .unwrap();

        let folder = &repo.all()[1];
        assert_eq!(
            folder.kind,
            LogKind::Collection {
                children: vec![child],
                collection_type: CollectionType::Board,
            }
        );
    }

    #[test]
    fn edit_without_changes_is_rejected() {
        let mut repo = LogRepository::in_memory();
        let id = repo.create(NewLog::note(None, "x")).unwrap();
        assert!(cmd_edit(&mut repo, id, LogPatch::default()).is_err());
    }
}
