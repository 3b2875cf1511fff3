//! `pqsnav` - CLI for pqs-nav
//!
//! This binary resolves routes against the navigation tables, replays click
//! sequences through a navigation session, and manages locally stored
//! navigation analytics.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::rc::Rc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::debug;

use pqs_nav::analytics::AnalyticsRecorder;
use pqs_nav::breadcrumbs::BreadcrumbTrail;
use pqs_nav::cli::{
    AnalyticsCommand, Cli, Command, ConfigCommand, ReplayCommand, ReplayStep, RouteCommand,
    RoutesCommand,
};
use pqs_nav::{
    init_logging, routes, BreadcrumbItem, Config, KeyValueStore, MemoryRouter, MemoryStore,
    NavigationSession, SqliteStore, SystemClock,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Route(cmd) => handle_route(&cmd),
        Command::Routes(cmd) => handle_routes(&cmd),
        Command::Replay(cmd) => handle_replay(&config, cmd),
        Command::Analytics(cmd) => handle_analytics(&config, cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_route(cmd: &RouteCommand) -> anyhow::Result<()> {
    let state = routes::state_for_route(&cmd.path);
    let crumbs = BreadcrumbTrail::new().derive(&cmd.path);
    let label = routes::label_for_path(&cmd.path);

    if cmd.json {
        let out = serde_json::json!({
            "path": cmd.path,
            "label": label,
            "state": state,
            "breadcrumbs": crumbs,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Path:            {}", cmd.path);
        println!("Label:           {label}");
        println!("Active item:     {}", state.active_item);
        println!(
            "Expanded menus:  {}",
            if state.expanded_menus.is_empty() {
                "(none)".to_string()
            } else {
                state.expanded_menus.join(", ")
            }
        );
        println!("Breadcrumbs:     {}", format_trail(&crumbs));
    }
    Ok(())
}

fn handle_routes(cmd: &RoutesCommand) -> anyhow::Result<()> {
    match cmd {
        RoutesCommand::List { json } => {
            let rows: Vec<_> = routes::known_item_ids()
                .into_iter()
                .map(|id| {
                    let parent = routes::parent_group(id);
                    let route = match parent {
                        Some(group) => routes::route_for_item(group, Some(id)),
                        None => routes::route_for_item(id, None),
                    };
                    (id, parent, route)
                })
                .collect();

            if *json {
                let out: Vec<_> = rows
                    .iter()
                    .map(|(id, parent, route)| {
                        serde_json::json!({ "id": id, "group": parent, "route": route })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for (id, parent, route) in rows {
                    println!(
                        "{:<16} {:<10} {}",
                        id,
                        parent.unwrap_or("-"),
                        route.unwrap_or("(no route)")
                    );
                }
            }
        }
        RoutesCommand::Check => {
            let problems = routes::check_consistency();
            if !problems.is_empty() {
                for problem in &problems {
                    eprintln!("  {problem}");
                }
                bail!("{} route table inconsistencies", problems.len());
            }
            println!(
                "Route tables are consistent ({} entries).",
                routes::known_item_ids().len()
            );
        }
    }
    Ok(())
}

fn handle_replay(config: &Config, cmd: ReplayCommand) -> anyhow::Result<()> {
    let store: Box<dyn KeyValueStore> = if cmd.record {
        Box::new(open_store(config)?)
    } else {
        Box::new(MemoryStore::new())
    };
    let mut session = NavigationSession::new(config, MemoryRouter::new(cmd.start.clone()), store)?;

    for step in &cmd.steps {
        debug!(%step, "replaying step");
        match step {
            ReplayStep::Navigate(path) => session.navigate(path, None),
            ReplayStep::Shortcut(shortcut) => {
                if !session.handle_shortcut(*shortcut) {
                    eprintln!("{step}: nothing to do");
                }
            }
            ReplayStep::Menu(id) => session.handle_menu_click(id),
            ReplayStep::Submenu(parent, id) => session.handle_submenu_click(parent, id),
            ReplayStep::Breadcrumb(path) => session.navigate_to_breadcrumb(path),
            ReplayStep::SignOut => session.handle_sign_out(),
        }
    }

    if cmd.json {
        let out = serde_json::json!({
            "path": session.current_path(),
            "state": session.state().state(),
            "history": session.history().entries(),
            "cursor": session.history().cursor(),
            "breadcrumbs": session.breadcrumbs(),
            "stats": session.analytics().stats(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Current path:    {}", session.current_path());
        println!("Active item:     {}", session.state().active_item());
        println!(
            "Expanded menus:  {}",
            session.state().expanded_menus().join(", ")
        );
        println!("Breadcrumbs:     {}", format_trail(&session.breadcrumbs()));
        println!();
        println!("History");
        println!("-------");
        let cursor = session.history().cursor();
        for (i, entry) in session.history().entries().iter().enumerate() {
            let marker = if Some(i) == cursor { ">" } else { " " };
            println!("{marker} {:>2}  {:<24} {}", i, entry.path, entry.label);
        }
        println!();
        println!("Events recorded: {}", session.analytics().len());
    }

    session.shutdown()?;
    Ok(())
}

fn handle_analytics(config: &Config, cmd: AnalyticsCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let mut recorder = AnalyticsRecorder::new(&config.analytics, Box::new(store), Rc::new(SystemClock));

    match cmd {
        AnalyticsCommand::Stats { json } => {
            let stats = recorder.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Navigation Analytics");
                println!("====================");
                println!();
                println!("Total events:        {}", stats.total_events);
                for (kind, count) in &stats.events_by_type {
                    println!("  {:<18} {count}", kind.to_string());
                }
                println!(
                    "Avg page duration:   {:.0} ms",
                    stats.average_page_duration_ms
                );
                println!();
                println!("Most visited paths:");
                for entry in &stats.most_visited_paths {
                    println!("  {:<24} {}", entry.path, entry.count);
                }
                println!();
                println!("Most used menus:");
                for entry in &stats.most_used_menus {
                    println!("  {:<24} {}", entry.menu_id, entry.count);
                }
            }
        }
        AnalyticsCommand::Export { output } => {
            match output {
                Some(target) => {
                    let path = recorder
                        .export_to_file(&target)
                        .with_context(|| format!("failed to export to {}", target.display()))?;
                    println!("Exported analytics to {}", path.display());
                }
                None => println!("{}", recorder.export_analytics()?),
            }
        }
        AnalyticsCommand::Clear { yes } => {
            if yes {
                let count = recorder.len();
                recorder.clear_analytics();
                println!("Cleared {count} events.");
            } else {
                println!("This will delete {} recorded events.", recorder.len());
                println!("Use --yes to confirm.");
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Navigation]");
                println!("  History limit:      {}", config.navigation.history_limit);
                println!();
                println!("[Analytics]");
                println!("  Enabled:            {}", config.analytics.enabled);
                println!("  Max events:         {}", config.analytics.max_events);
                println!("  Flush every:        {}", config.analytics.flush_every);
                println!("  Storage key:        {}", config.analytics.storage_key);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn open_store(config: &Config) -> anyhow::Result<SqliteStore> {
    let path = config.database_path();
    SqliteStore::open(&path).with_context(|| format!("failed to open {}", path.display()))
}

fn format_trail(crumbs: &[BreadcrumbItem]) -> String {
    crumbs
        .iter()
        .map(|c| {
            if c.is_active {
                format!("[{}]", c.label)
            } else {
                c.label.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" > ")
}
