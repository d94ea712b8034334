use clap::{Args, Parser, Subcommand};
use mnumistore::calendar::{CalendarType, EventInput};
use mnumistore::query::SortOrder;
use mnumistore::translation::TranslationInput;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mnumi", version)]
#[command(about = "Manage MnumiDesigner calendar and translation files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub resource: Resource,

    /// Config file (default: mnumi.toml in the OS config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base directory holding the resource directories
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Resource {
    /// Name-day and national-day calendars
    #[command(alias = "cal")]
    Calendars {
        #[command(subcommand)]
        command: CalendarCommand,
    },

    /// Editor translation overrides
    #[command(alias = "tr")]
    Translations {
        #[command(subcommand)]
        command: TranslationCommand,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(long)]
    pub page: Option<i64>,

    #[arg(long)]
    pub per_page: Option<i64>,

    /// Only resources with exactly this name
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub locale: Option<String>,

    /// store (directory order) or name
    #[arg(long, value_parser = parse_order)]
    pub order: Option<SortOrder>,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Print pagination headers before the body
    #[arg(short, long)]
    pub include: bool,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Comma separated fields to include (default: all)
    #[arg(long)]
    pub fields: Option<String>,

    /// Print documents as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum CalendarCommand {
    /// List calendars
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// name-day or national-day
        #[arg(long = "type")]
        calendar_type: Option<String>,
    },

    /// Show one calendar
    Get {
        /// Calendar id (name.type.locale)
        id: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Create a calendar
    Create {
        /// Human name; slugged into the id
        name: String,

        #[arg(long = "type", value_parser = parse_calendar_type)]
        calendar_type: CalendarType,

        #[arg(long)]
        locale: String,

        /// DATE=NAME[=TYPE], DATE is YYYY-MM-DD or MM-DD (repeatable)
        #[arg(long = "event", value_parser = parse_event)]
        events: Vec<EventInput>,

        /// Treat full dates as yearly events
        #[arg(long)]
        cyclic: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Replace the events of a calendar
    Update {
        id: String,

        /// DATE=NAME[=TYPE] (repeatable)
        #[arg(long = "event", value_parser = parse_event)]
        events: Vec<EventInput>,

        #[arg(long)]
        cyclic: bool,

        /// Refuse the write unless the stored version still matches
        #[arg(long)]
        if_version: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Delete a calendar
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum TranslationCommand {
    /// List translations
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        #[arg(long)]
        domain: Option<String>,

        /// Language part of the locale (pl for pl_PL)
        #[arg(long)]
        fallback: Option<String>,
    },

    /// Show one translation
    Get {
        /// Translation id (name.editor.locale)
        id: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Create a translation
    Create {
        name: String,

        #[arg(long)]
        locale: String,

        /// ID=TEXT (repeatable)
        #[arg(long = "entry", value_parser = parse_entry)]
        entries: Vec<TranslationInput>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Overlay entries onto a translation
    Update {
        id: String,

        /// ID=TEXT (repeatable)
        #[arg(long = "entry", value_parser = parse_entry)]
        entries: Vec<TranslationInput>,

        #[arg(long)]
        if_version: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Delete a translation
    #[command(alias = "rm")]
    Delete { id: String },
}

fn parse_order(s: &str) -> Result<SortOrder, String> {
    s.parse().map_err(|e: mnumistore::StoreError| e.to_string())
}

fn parse_calendar_type(s: &str) -> Result<CalendarType, String> {
    s.parse().map_err(|e: mnumistore::StoreError| e.to_string())
}

/// `DATE=NAME[=TYPE]`. A `MM-DD` date is always yearly.
pub fn parse_event(s: &str) -> Result<EventInput, String> {
    let mut parts = s.splitn(3, '=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(date), Some(name), event_type) if !date.is_empty() && !name.is_empty() => {
            let event = EventInput::new(date, name, date.len() == 5);
            Ok(match event_type {
                Some(t) => event.with_type(t),
                None => event,
            })
        }
        _ => Err(format!("expected DATE=NAME[=TYPE], got '{}'", s)),
    }
}

pub fn parse_entry(s: &str) -> Result<TranslationInput, String> {
    match s.split_once('=') {
        Some((id, text)) if !id.is_empty() => Ok(TranslationInput::new(id, text)),
        _ => Err(format!("expected ID=TEXT, got '{}'", s)),
    }
}
