use clap::Parser;
use colored::*;
use mnumistore::calendar::EventInput;
use mnumistore::commands::create::NewResource;
use mnumistore::commands::update::ResourceUpdate;
use mnumistore::commands::CmdResult;
use mnumistore::config::DesignerConfig;
use mnumistore::dictionary::Dictionary;
use mnumistore::mapper::Fields;
use mnumistore::store::fs::FsStore;
use mnumistore::{DesignerApi, ListParams, ResourceKind, StoreError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod args;
mod render;

use args::{CalendarCommand, Cli, ListArgs, OutputArgs, Resource, TranslationCommand};

type Api = DesignerApi<FsStore, Box<dyn Dictionary>>;

/// Exit code for errors caused by the request rather than the environment.
const EXIT_USAGE: i32 = 2;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red(), e);
        let client_error = e
            .downcast_ref::<StoreError>()
            .is_some_and(StoreError::is_client_error);
        std::process::exit(if client_error { EXIT_USAGE } else { 1 });
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "mnumi=debug,mnumistore=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("MNUMI_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = DesignerConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    let api = DesignerApi::from_config(&config)?;

    match cli.resource {
        Resource::Calendars { command } => handle_calendars(&api, command),
        Resource::Translations { command } => handle_translations(&api, command),
    }
}

fn handle_calendars(api: &Api, command: CalendarCommand) -> anyhow::Result<()> {
    let kind = ResourceKind::Calendar;
    match command {
        CalendarCommand::List {
            list,
            calendar_type,
        } => {
            let extra = calendar_type.map(|t| ("type".to_string(), t));
            handle_list(api, kind, &list, extra.into_iter().collect())
        }
        CalendarCommand::Get { id, output } => handle_get(api, kind, &id, &output),
        CalendarCommand::Create {
            name,
            calendar_type,
            locale,
            events,
            cyclic,
            output,
        } => {
            let input = NewResource::Calendar {
                name,
                calendar_type,
                locale,
                events: mark_cyclic(events, cyclic),
            };
            let result = api.create(&input, &fields(&output))?;
            print_single(result, &output)
        }
        CalendarCommand::Update {
            id,
            events,
            cyclic,
            if_version,
            output,
        } => {
            let update = ResourceUpdate::Events {
                events: mark_cyclic(events, cyclic),
            };
            let result = api.update(kind, &id, &update, if_version.as_deref(), &fields(&output))?;
            print_single(result, &output)
        }
        CalendarCommand::Delete { id } => handle_delete(api, kind, &id),
    }
}

fn handle_translations(api: &Api, command: TranslationCommand) -> anyhow::Result<()> {
    let kind = ResourceKind::Translation;
    match command {
        TranslationCommand::List {
            list,
            domain,
            fallback,
        } => {
            let extra = domain
                .map(|d| ("domain".to_string(), d))
                .into_iter()
                .chain(fallback.map(|f| ("fallback".to_string(), f)))
                .collect();
            handle_list(api, kind, &list, extra)
        }
        TranslationCommand::Get { id, output } => handle_get(api, kind, &id, &output),
        TranslationCommand::Create {
            name,
            locale,
            entries,
            output,
        } => {
            let input = NewResource::Translation {
                name,
                locale,
                translations: entries,
            };
            let result = api.create(&input, &fields(&output))?;
            print_single(result, &output)
        }
        TranslationCommand::Update {
            id,
            entries,
            if_version,
            output,
        } => {
            let update = ResourceUpdate::Translations {
                translations: entries,
            };
            let result = api.update(kind, &id, &update, if_version.as_deref(), &fields(&output))?;
            print_single(result, &output)
        }
        TranslationCommand::Delete { id } => handle_delete(api, kind, &id),
    }
}

fn mark_cyclic(events: Vec<EventInput>, cyclic: bool) -> Vec<EventInput> {
    events
        .into_iter()
        .map(|mut event| {
            event.cyclic |= cyclic;
            event
        })
        .collect()
}

fn fields(output: &OutputArgs) -> Fields {
    output.fields.as_deref().map(Fields::parse).unwrap_or_default()
}

fn handle_list(
    api: &Api,
    kind: ResourceKind,
    list: &ListArgs,
    kind_filters: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let mut filters = Vec::new();
    if let Some(name) = &list.name {
        filters.push(("name".to_string(), name.clone()));
    }
    filters.extend(kind_filters);
    if let Some(locale) = &list.locale {
        filters.push(("locale".to_string(), locale.clone()));
    }
    let params = ListParams {
        page: list.page,
        per_page: list.per_page,
        filters,
        order: list.order,
    };

    let result = api.list(kind, &params, &fields(&list.output))?;
    if list.include {
        if let Some(page) = &result.page {
            render::print_headers(&api.page_headers(kind, page, &params));
        }
    }
    if list.output.json {
        render::print_json(&result.documents)?;
    } else {
        render::print_table(&result.documents, &format!("No {}s found.", kind));
    }
    render::print_messages(&result.messages, true);
    Ok(())
}

fn handle_get(api: &Api, kind: ResourceKind, id: &str, output: &OutputArgs) -> anyhow::Result<()> {
    let result = api.get(kind, id, &fields(output))?;
    print_single(result, output)
}

fn print_single(result: CmdResult, output: &OutputArgs) -> anyhow::Result<()> {
    match (result.documents.first(), output.json) {
        (Some(doc), true) => render::print_json(doc)?,
        (None, true) => println!("{{}}"),
        (Some(doc), false) => render::print_document(doc),
        (None, false) => {}
    }
    render::print_messages(&result.messages, output.json);
    Ok(())
}

fn handle_delete(api: &Api, kind: ResourceKind, id: &str) -> anyhow::Result<()> {
    let result = api.delete(kind, id)?;
    render::print_messages(&result.messages, false);
    Ok(())
}
