//! Pack Studio - Bedrock behavior pack archives from the command line
//!
//! Main entry point for the CLI.
//!
//! # Overview
//!
//! This binary drives the pack engine in [`packstudio::services`] through the
//! [`StateManager`]. It initializes:
//! - Configuration loading ([`ConfigManager`], `Studio Settings.yaml`)
//! - Logging infrastructure (file rotation + console output on stderr)
//! - Tokio async runtime (archive entries are decoded on blocking tasks)
//!
//! # Commands
//!
//! - `new <DIR>`: manifest plus starter script in a fresh project directory
//! - `export <DIR>`: pack a project directory into `<name>.mcpack`
//! - `import <ARCHIVE> <DIR>`: unpack an archive into a project directory
//! - `apply <DIR> <RESPONSE>`: merge a generation response into a project
//! - `manifest [DIR]`: print the manifest that export would generate
//! - `tree <DIR>`: list a project as folders and files
//!
//! Results go to stdout; logs go to `logs/` and stderr.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{ApplyArgs, Command, ExportArgs, ImportArgs, ManifestArgs, NewArgs, RootArgs, TreeArgs};
use packstudio::models::{GeneratedTexture, StudioSettings};
use packstudio::services::{FileNode, UuidTokenSource, build_tree, generate_manifest, workspace};
use packstudio::{APP_NAME, ConfigManager, ProjectState, StateChange, StateManager, VERSION};
use tokio::sync::broadcast;

fn main() -> Result<()> {
    let args = RootArgs::parse();

    let config_manager = ConfigManager::new(&args.config_dir)?;
    let mut settings = config_manager.load_settings()?;
    if args.debug {
        settings.logging.debug_mode = true;
    }

    // Guard must live until exit so buffered log lines are flushed
    let _log_guard = packstudio::logging::setup_logging(&settings.logging)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("packstudio-worker")
        .build()
        .context("Failed to create tokio runtime")?;

    let result = runtime.block_on(run(args.command, &settings));

    runtime.shutdown_timeout(std::time::Duration::from_secs(5));

    if let Err(e) = &result {
        tracing::error!("Command failed: {:#}", e);
    }
    result
}

async fn run(command: Command, settings: &StudioSettings) -> Result<()> {
    match command {
        Command::New(args) => new_project(args, settings),
        Command::Export(args) => export(args, settings).await,
        Command::Import(args) => import(args, settings).await,
        Command::Apply(args) => apply(args).await,
        Command::Manifest(args) => print_manifest(args, settings),
        Command::Tree(args) => print_tree(args),
    }
}

fn new_project(args: NewArgs, settings: &StudioSettings) -> Result<()> {
    let mut config = settings.default_pack.clone();
    if let Some(name) = args.name {
        config.name = name;
    }
    if let Some(author) = args.author {
        config.author = author;
    }

    let state = ProjectState::new(config, &mut UuidTokenSource)
        .context("Failed to generate manifest")?;
    workspace::write_project_dir(&args.dir, &state.files)?;

    println!("Created {:?} in {}", state.config.name, args.dir);
    Ok(())
}

async fn export(args: ExportArgs, settings: &StudioSettings) -> Result<()> {
    let state = workspace::open_project_dir(&args.dir)?;
    let manager = StateManager::new(state, Box::new(UuidTokenSource));
    let mut events = manager.subscribe();

    if let Some(icon) = &args.icon {
        let data = tokio::fs::read(icon)
            .await
            .with_context(|| format!("Failed to read icon {}", icon))?;
        manager.update(|state| state.set_pack_icon(data));
    }

    for (name, path) in args.textures {
        let data = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read texture {}", path))?;
        manager.add_texture(GeneratedTexture::new(name, data)?);
    }

    let archive = manager.export()?;
    let out_dir = args
        .out
        .unwrap_or_else(|| settings.export_dir.as_str().into());
    let written = archive.write_to(&out_dir).await?;

    log_events(&mut events);
    println!("{}", written);
    Ok(())
}

async fn import(args: ImportArgs, settings: &StudioSettings) -> Result<()> {
    let bytes = tokio::fs::read(&args.archive)
        .await
        .with_context(|| format!("Failed to read archive {}", args.archive))?;
    let archive_name = args.archive.file_name().unwrap_or(args.archive.as_str());

    let manager = StateManager::with_new_project(settings.default_pack.clone())?;
    let mut events = manager.subscribe();
    manager.import_archive(bytes, archive_name).await?;
    log_events(&mut events);

    let state = manager.snapshot();
    workspace::write_project_dir(&args.dir, &state.files)?;

    println!(
        "{} v{} by {} ({} files)",
        state.config.name,
        state.config.version,
        state.config.author,
        state.files.len()
    );
    if let Some(selected) = &state.selected_file {
        println!("Selected: {}", selected);
    }
    Ok(())
}

async fn apply(args: ApplyArgs) -> Result<()> {
    let state = workspace::open_project_dir(&args.dir)?;
    let manager = StateManager::new(state, Box::new(UuidTokenSource));
    let mut events = manager.subscribe();

    let response = tokio::fs::read_to_string(&args.response)
        .await
        .with_context(|| format!("Failed to read response {}", args.response))?;
    let outcome = manager.apply_generation_response(&response)?;

    if let Some(payload_path) = &args.icon_payload {
        let payload = tokio::fs::read_to_string(payload_path)
            .await
            .with_context(|| format!("Failed to read icon payload {}", payload_path))?;
        manager.set_pack_icon_from_payload(&payload)?;
        manager.track_pack_icon();
    }

    log_events(&mut events);
    let state = manager.snapshot();
    workspace::write_project_dir(&args.dir, &state.files)?;

    println!(
        "{} new, {} replaced",
        outcome.summary.inserted, outcome.summary.replaced
    );
    if let Some(explanation) = outcome.explanation {
        println!("{}", explanation);
    }
    Ok(())
}

fn print_manifest(args: ManifestArgs, settings: &StudioSettings) -> Result<()> {
    let config = match &args.dir {
        Some(dir) => workspace::open_project_dir(dir)?.config,
        None => settings.default_pack.clone(),
    };

    let manifest = generate_manifest(&config, &mut UuidTokenSource);
    println!("{}", manifest.to_pretty_json()?);
    Ok(())
}

fn print_tree(args: TreeArgs) -> Result<()> {
    let files = workspace::load_project_dir(&args.dir)?;
    let tree = build_tree(files.paths());
    print_nodes(&tree, 0);
    Ok(())
}

fn print_nodes(nodes: &[FileNode], depth: usize) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        match node {
            FileNode::Folder { name, children, .. } => {
                println!("{}{}/", indent, name);
                print_nodes(children, depth + 1);
            }
            FileNode::File { name, .. } => println!("{}{}", indent, name),
        }
    }
}

fn log_events(events: &mut broadcast::Receiver<StateChange>) {
    while let Ok(change) = events.try_recv() {
        tracing::debug!("State change: {:?}", change);
    }
}
