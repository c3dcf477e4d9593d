/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bpaf::Bpaf;
use hydranet::graph::{LinkType, NodeType};
use hydranet::inp::ImportReport;
use hydranet::{EditorPreferences, NetworkStore};

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version)]
/// Inspect and normalize pipe network files
struct Cli {
    /// Preferences file (defaults to the user config directory)
    #[bpaf(long("prefs"), argument("PATH"))]
    prefs: Option<PathBuf>,
    #[bpaf(external(command))]
    command: Command,
}

#[derive(Debug, Clone, Bpaf)]
enum Command {
    /// Print element counts and the import report
    #[bpaf(command)]
    Inspect {
        #[bpaf(positional("FILE"))]
        file: PathBuf,
    },
    /// Re-export a network file to stdout
    #[bpaf(command)]
    Normalize {
        /// Append a [COORDINATES] section
        coordinates: bool,
        #[bpaf(positional("FILE"))]
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    #[cfg(feature = "tracing")]
    init_tracing();

    let cli = cli().run();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("hydranet: {message}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let prefs = match &cli.prefs {
        Some(path) => EditorPreferences::load(path),
        None => EditorPreferences::load_or_default(),
    }
    .map_err(|e| e.to_string())?;

    match cli.command {
        Command::Inspect { file } => {
            let (store, report) = load(&file, &prefs)?;
            print_summary(&store, &report);
        },
        Command::Normalize { coordinates, file } => {
            let (store, report) = load(&file, &prefs)?;
            let mut options = prefs.export_options();
            options.coordinates |= coordinates;
            if let Some(title) = report.title {
                options.title = title;
            }
            println!("{}", store.export_inp(&options));
        },
    }
    Ok(())
}

fn load(path: &Path, prefs: &EditorPreferences) -> Result<(NetworkStore, ImportReport), String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let mut store = NetworkStore::with_history_depth(prefs.history_depth);
    let report =
        store.import_inp_with_rng(&text, &mut rand::thread_rng(), prefs.placeholder_extent);
    Ok((store, report))
}

fn print_summary(store: &NetworkStore, report: &ImportReport) {
    if let Some(title) = &report.title {
        println!("title: {title}");
    }
    for node_type in NodeType::ALL {
        let count = store
            .nodes()
            .filter(|node| node.node_type() == node_type)
            .count();
        println!("{node_type:?}: {count}");
    }
    for link_type in LinkType::ALL {
        let count = store
            .links()
            .filter(|link| link.link_type() == link_type)
            .count();
        println!("{link_type:?}: {count}");
    }
    println!("defaulted fields: {}", report.defaulted_fields);
    println!("skipped records: {}", report.skipped_records);
    println!("relocated nodes: {}", report.relocated_nodes);
    println!("ignored records: {}", report.ignored_records);
}
