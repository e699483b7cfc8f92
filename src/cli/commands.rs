//! Command dispatch: wires CLI arguments to the selector session.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::SelectorSession;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{config_template, global_config_path, Settings};
use crate::domain::{iter_forest, search, Selection, TreeBuilder, UnitId};
use crate::infrastructure::traits::{JsonFileRepository, PickItem, Picker, SkimPicker};
use crate::infrastructure::{InfraError, InfraResult};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(Commands::Completion { shell }) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    match &cli.command {
        None => Ok(()),
        Some(Commands::Config { command }) => cmd_config(command, cli),
        Some(command) => {
            let settings = Settings::load(cli.config.as_deref())?;
            let mut session = open_session(cli, &settings)?;
            match command {
                Commands::Tree {
                    query,
                    expand,
                    expand_all,
                } => cmd_tree(cli, &mut session, query.as_deref(), expand, *expand_all),
                Commands::Roots => cmd_roots(cli, &session),
                Commands::Search { query } => cmd_search(cli, &mut session, query),
                Commands::Select { ids, current } => {
                    let mut selection = to_selection(current);
                    for id in ids {
                        selection = session.select(&selection, UnitId(*id));
                    }
                    print_selection(cli, &selection)
                }
                Commands::Deselect { ids, current } => {
                    let mut selection = to_selection(current);
                    for id in ids {
                        selection = session.deselect(&selection, UnitId(*id));
                    }
                    print_selection(cli, &selection)
                }
                Commands::SelectAll => {
                    let selection = session.select_all();
                    print_selection(cli, &selection)
                }
                Commands::Clear => {
                    let selection = session.clear_all();
                    print_selection(cli, &selection)
                }
                Commands::Pick { query } => {
                    let picker = SkimPicker::new(settings.picker_height.clone());
                    let selection = pick_selection(&mut session, &picker, query.as_deref())?;
                    print_selection(cli, &selection)
                }
                Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
            }
        }
    }
}

/// Resolve the units file and load a session over it.
#[instrument(level = "debug", skip(settings))]
pub fn open_session(cli: &Cli, settings: &Settings) -> CliResult<SelectorSession> {
    let path: PathBuf = cli
        .file
        .clone()
        .or_else(|| settings.units_file.clone())
        .ok_or_else(|| {
            CliError::Usage("no units file: pass --file or set units_file in config".to_string())
        })?;
    debug!("open_session: units file {}", path.display());

    let repository = Arc::new(JsonFileRepository::new(path));
    let mut session = SelectorSession::new(repository, settings.ordering_policy()?)
        .with_max_height(settings.max_height);
    session.on_selection_change(|selection| {
        debug!("selection changed: [{}]", selection.iter().join(","));
    });
    session.load()?;
    Ok(session)
}

fn to_selection(ids: &[i64]) -> Selection {
    ids.iter().copied().map(UnitId).collect()
}

fn print_selection(cli: &Cli, selection: &Selection) -> CliResult<()> {
    if cli.json {
        output::info(&serde_json::to_string(selection)?);
    } else {
        output::info(&selection.iter().join(","));
    }
    Ok(())
}

fn cmd_tree(
    cli: &Cli,
    session: &mut SelectorSession,
    query: Option<&str>,
    expand: &[i64],
    expand_all: bool,
) -> CliResult<()> {
    if let Some(q) = query {
        session.set_query(q);
    }
    if expand_all {
        session.expand_all();
    }
    if let Some(unknown) = expand.iter().find(|id| !session.arena().contains(UnitId(**id))) {
        return Err(CliError::InvalidArgs(format!(
            "--expand: no unit with id {}",
            unknown
        )));
    }
    for id in expand {
        session.toggle_expansion(UnitId(*id));
    }

    let forest = session.tree()?;
    if cli.json {
        output::info(&serde_json::to_string_pretty(&forest)?);
        return Ok(());
    }

    if forest.is_empty() {
        output::warning(&format!("no unit matches '{}'", session.query().trim()));
        return Ok(());
    }
    for root in &forest {
        output::info(&root.to_tree_string());
    }
    debug!("tree: {} node(s) shown", iter_forest(&forest).count());
    Ok(())
}

fn cmd_roots(cli: &Cli, session: &SelectorSession) -> CliResult<()> {
    let forest = session.tree()?;
    let policy = session.policy();
    if cli.json {
        let rows: Vec<_> = forest
            .iter()
            .map(|n| {
                serde_json::json!({
                    "id": n.unit.id,
                    "name": n.unit.name,
                    "rank": policy.root_rank(&n.unit.name),
                })
            })
            .collect();
        output::info(&serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    output::header(&format!("{:>5}  {:>6}  {}", "RANK", "ID", "NAME"));
    for node in &forest {
        output::root_row(
            policy.root_rank(&node.unit.name),
            &node.unit.id,
            &node.unit.name,
        );
    }
    Ok(())
}

fn cmd_search(cli: &Cli, session: &mut SelectorSession, query: &str) -> CliResult<()> {
    session.set_query(query);
    let result = session.search();
    let visible = result.visible.iter().sorted().collect::<Vec<_>>();
    let matches = result.matches.iter().sorted().collect::<Vec<_>>();

    if cli.json {
        let doc = serde_json::json!({
            "visible": visible,
            "matches": matches,
            "forceExpand": result.force_expand,
        });
        output::info(&serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    output::action("visible", &visible.iter().join(","));
    output::action("matches", &matches.iter().join(","));
    output::action("force_expand", &result.force_expand);
    Ok(())
}

/// Offer units to `picker` and cascade-select whatever is picked.
///
/// Candidates are listed in tree order, labelled `lineage [id]`, and
/// narrowed to the search result for `query` when given. The session's
/// stored query and expansion are left as they are.
pub fn pick_selection(
    session: &mut SelectorSession,
    picker: &dyn Picker,
    query: Option<&str>,
) -> CliResult<Selection> {
    if !session.is_ready() {
        return Err(ApplicationError::NotLoaded.into());
    }

    let items: Vec<PickItem> = {
        let arena = session.arena();
        let result = search::filter(arena, query.unwrap_or_default());
        let forest =
            TreeBuilder::new(session.policy()).build(arena, result.visible_filter(), |_| true);
        iter_forest(&forest)
            .map(|node| PickItem {
                display: pick_label(session, node.id()),
                id: node.id(),
            })
            .collect()
    };

    let picked = picker
        .pick_many(&items, "unit> ")
        .map_err(InfraError::picker)?;
    debug!("pick_selection: {} item(s) picked", picked.len());

    let mut selection = Selection::new();
    for item in &picked {
        selection = session.select(&selection, item.id);
    }
    Ok(selection)
}

/// `Root / Child / Unit [id]`; the id keeps same-named units apart.
fn pick_label(session: &SelectorSession, id: UnitId) -> String {
    let lineage = session
        .arena()
        .lineage(id)
        .iter()
        .map(|u| u.name.as_str())
        .join(" / ");
    format!("{} [{}]", lineage, id)
}

fn cmd_config(command: &ConfigCommands, cli: &Cli) -> CliResult<()> {
    let target = cli.config.clone().or_else(global_config_path);

    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match &target {
                Some(path) => {
                    let status = if path.exists() { "exists" } else { "not found" };
                    output::action("config", &format!("{} ({})", path.display(), status));
                }
                None => output::warning("no config directory available"),
            }
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = target.ok_or_else(|| {
                CliError::Usage("no config directory available, pass --config".to_string())
            })?;
            write_template(&path, *force)?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}

fn write_template(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::Usage(format!(
            "{} already exists, use --force to overwrite",
            path.display()
        )));
    }
    create_file(path, &config_template())?;
    Ok(())
}

fn create_file(path: &Path, content: &str) -> InfraResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
    }
    std::fs::write(path, content)
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))
}
