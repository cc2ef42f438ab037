use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use data_dict::dict::{AggregationLevel, ColumnSpec, DictRepository, NodeKind, Record, TreeNode};
use data_dict::host::DesktopShell;
use data_dict::logging;
use data_dict::plugin::PluginManager;
use data_dict::plugins::dict::DictPlugin;
use data_dict::router::{route, EnterAction, Route, CODE_INPUT, CODE_LIST, CODE_SEARCH};
use data_dict::settings::{Settings, SETTINGS_FILE};
use data_dict::store::JsonFileStore;
use data_dict::theme::{ThemeConfig, ThemeController};
use data_dict::views::aggregate::AggregateView;
use data_dict::views::input::InputView;
use data_dict::views::list::{ListView, EMPTY_MSG};
use data_dict::views::search::SearchView;

/// Record small JSON tables, search them and group them into trees.
#[derive(Debug, Parser)]
#[command(name = "data_dict", version, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Settings file to load.
    #[arg(long, global = true, value_name = "PATH", default_value = SETTINGS_FILE)]
    settings: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Store a JSON array of objects under a keyword.
    Dictinput(InputArgs),
    /// Search a collection with `<keyword>:<search text>`.
    Dict(SearchArgs),
    /// List collections, optionally showing one of them.
    Dictlist(ListArgs),
    /// Run launcher text through the plugin.
    Query(QueryArgs),
    /// Create an empty collection from a header list.
    Create(CreateArgs),
    /// Add a record to a collection.
    Add(AddArgs),
    /// Edit a record of a collection.
    Edit(EditArgs),
    /// Delete records of a collection by id.
    Delete(DeleteArgs),
    /// Remove a collection entirely.
    Clear(CollectionArgs),
    /// Export a collection to `<name>_data.json`.
    Export(CollectionArgs),
    /// Show a collection as a grouped tree.
    Tree(TreeArgs),
    /// Show or change the theme.
    Theme(ThemeArgs),
}

#[derive(Debug, Clone, Args)]
struct InputArgs {
    keyword: String,
    /// JSON array of objects.
    #[arg(value_name = "JSON")]
    json: String,
}

#[derive(Debug, Clone, Args)]
struct SearchArgs {
    #[arg(value_name = "KEYWORD:TEXT")]
    query: String,
}

#[derive(Debug, Clone, Args)]
struct ListArgs {
    collection: Option<String>,
}

#[derive(Debug, Clone, Args)]
struct QueryArgs {
    text: String,
}

#[derive(Debug, Clone, Args)]
struct CreateArgs {
    collection: String,
    /// Column names separated by commas, semicolons or newlines.
    headers: String,
}

#[derive(Debug, Clone, Args)]
struct AddArgs {
    collection: String,
    #[arg(value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Args)]
struct EditArgs {
    collection: String,
    id: String,
    #[arg(value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Args)]
struct DeleteArgs {
    collection: String,
    #[arg(required = true)]
    ids: Vec<String>,
}

#[derive(Debug, Clone, Args)]
struct CollectionArgs {
    collection: String,
}

#[derive(Debug, Clone, Args)]
struct TreeArgs {
    collection: String,
    /// Levels separated by `/`, columns of a level by `,` (e.g. `region,city/type`).
    #[arg(value_name = "LEVELS", value_parser = parse_levels)]
    levels: Option<Levels>,
}

#[derive(Debug, Clone, PartialEq)]
struct Levels(Vec<AggregationLevel>);

#[derive(Debug, Clone, Args)]
struct ThemeArgs {
    mode: Option<ThemeMode>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeMode {
    System,
    Dark,
    Light,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.settings)?;
    logging::init(
        settings.debug_logging,
        settings.log_file.as_ref().map(Into::into),
    );
    std::fs::create_dir_all(settings.data_dir())?;

    let shell = DesktopShell::new(settings.toast_log_path());
    let repo = DictRepository::new(JsonFileStore::new(settings.store_path()));
    tracing::debug!(command = ?cli.command, "command");

    let ok = match cli.command {
        Command::Dictinput(args) => {
            if route(&EnterAction::new(CODE_INPUT, ""), &shell) != Some(Route::Input) {
                return Ok(ExitCode::FAILURE);
            }
            let mut view = InputView::new();
            view.form.keyword = args.keyword.clone();
            view.form.json_data = args.json;
            let stored = view.submit(&repo, &shell);
            if let Some(count) = stored {
                println!("{count} record(s) stored in {}", args.keyword);
            }
            stored.is_some()
        }
        Command::Dict(args) => {
            match route(&EnterAction::new(CODE_SEARCH, args.query), &shell) {
                Some(Route::Search(query)) => {
                    let mut view = SearchView::new();
                    view.open(query, &repo, &shell);
                    println!("{}", view.title());
                    print_table(view.columns(), view.results());
                    true
                }
                _ => false,
            }
        }
        Command::Dictlist(args) => {
            route(&EnterAction::new(CODE_LIST, ""), &shell);
            let mut view = ListView::new(false);
            view.load(&repo, &shell);
            if view.is_empty() {
                println!("{EMPTY_MSG}");
                return Ok(ExitCode::SUCCESS);
            }
            if let Some(name) = &args.collection {
                if !view.switch_tab(name, &repo, &shell) {
                    return Ok(ExitCode::FAILURE);
                }
            }
            for (key, label) in view.tabs() {
                let marker = if view.active() == Some(key.as_str()) { '*' } else { ' ' };
                println!("{marker} {label}");
            }
            print_table(view.columns(), &view.rows());
            true
        }
        Command::Query(args) => {
            let mut manager = PluginManager::new();
            manager.register(Box::new(DictPlugin::new(JsonFileStore::new(
                settings.store_path(),
            ))));
            for action in manager.search(&args.text) {
                println!("{}\t{}\t{}", action.label, action.desc, action.action);
            }
            true
        }
        Command::Create(args) => {
            let mut view = ListView::new(settings.show_action_column);
            view.load(&repo, &shell);
            let created = view.create_collection(&args.collection, &args.headers, &repo, &shell);
            if created {
                print_table(view.columns(), &[]);
            }
            created
        }
        Command::Add(args) => match open_collection(&args.collection, &repo, &shell) {
            Some(mut view) => view.save_form(None, args.fields, &repo, &shell),
            None => false,
        },
        Command::Edit(args) => match open_collection(&args.collection, &repo, &shell) {
            Some(mut view) => view.save_form(Some(args.id.as_str()), args.fields, &repo, &shell),
            None => false,
        },
        Command::Delete(args) => match open_collection(&args.collection, &repo, &shell) {
            Some(mut view) => {
                view.set_selection(args.ids);
                let removed = view.delete_selected(&repo, &shell);
                println!("{removed} record(s) deleted");
                removed > 0
            }
            None => false,
        },
        Command::Clear(args) => match open_collection(&args.collection, &repo, &shell) {
            Some(mut view) => view.clear_active(&repo, &shell),
            None => false,
        },
        Command::Export(args) => match open_collection(&args.collection, &repo, &shell) {
            Some(view) => {
                let dir = settings.export_dir();
                std::fs::create_dir_all(&dir)?;
                view.export_active(&dir, &repo, &shell).is_some()
            }
            None => false,
        },
        Command::Tree(args) => {
            let mut view = AggregateView::open(&args.collection, &repo, &shell);
            if let Some(Levels(levels)) = args.levels {
                view.apply(levels, &repo, &shell);
            }
            if view.config().is_empty() {
                println!("no aggregation configured; fields: {}", view.fields().join(", "));
            }
            print_tree(view.tree(), 0);
            true
        }
        Command::Theme(args) => {
            let mut theme = ThemeController::new(repo.store(), false)?;
            match args.mode {
                Some(ThemeMode::System) => theme.update(ThemeConfig::system(false))?,
                Some(ThemeMode::Dark) => theme.update(ThemeConfig {
                    follow_system: false,
                    is_dark_mode: true,
                })?,
                Some(ThemeMode::Light) => theme.update(ThemeConfig {
                    follow_system: false,
                    is_dark_mode: false,
                })?,
                None => {}
            }
            println!("{}", serde_json::to_string_pretty(&theme.config())?);
            if let Some(palette) = theme.config().palette() {
                println!("{}", serde_json::to_string_pretty(&palette)?);
            }
            true
        }
    };
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Load the list page with `name` active. `None` when it does not exist.
fn open_collection(
    name: &str,
    repo: &DictRepository<JsonFileStore>,
    shell: &DesktopShell,
) -> Option<ListView> {
    let mut view = ListView::new(false);
    view.load(repo, shell);
    view.switch_tab(name, repo, shell).then_some(view)
}

fn parse_assignment(field: &str) -> Result<(String, String), String> {
    field
        .split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected field=value, got {field}"))
}

/// `region,city/type` is two levels: `[region, city]` then `[type]`.
fn parse_levels(spec: &str) -> Result<Levels, String> {
    let levels: Vec<_> = spec
        .split('/')
        .map(|level| {
            AggregationLevel::new(
                level
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty()),
            )
        })
        .filter(|level| !level.columns.is_empty())
        .collect();
    if levels.is_empty() {
        return Err(format!("no columns in {spec:?}"));
    }
    Ok(Levels(levels))
}

fn print_table(columns: &[ColumnSpec], rows: &[Record]) {
    let header: Vec<&str> = columns.iter().map(|c| c.title.as_str()).collect();
    println!("{}", header.join("\t"));
    for row in rows {
        let cells: Vec<String> = columns.iter().map(|c| c.cell(row)).collect();
        println!("{}", cells.join("\t"));
    }
}

fn print_tree(nodes: &[TreeNode], depth: usize) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        match &node.kind {
            NodeKind::Leaf { values } => {
                let cells: Vec<&str> = values.iter().map(|(_, v)| v.as_str()).collect();
                println!("{indent}{}", cells.join("\t"));
            }
            NodeKind::Header { columns } => println!("{indent}{}", columns.join("\t")),
            NodeKind::Group { .. } => println!("{indent}{}", node.title()),
        }
        print_tree(&node.children, depth + 1);
    }
}
