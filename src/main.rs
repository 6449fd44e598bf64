//! Framewatch - folder placement watcher.
//!
//! This is the main entry point: it loads and validates the config,
//! wires the placement checker into the folder watcher, and runs the
//! watch loop until Ctrl-C or source closure.

use std::{path::PathBuf, sync::Arc};

use {
    clap::Parser,
    tokio::{signal, spawn},
    tracing::{error, info},
    tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt},
};

use framewatch::{
    alert::{AlertSink, CommandAlertSink, LogAlertSink},
    config::WatchSettings,
    naming::{NamePatterns, PlacementChecker},
    watcher::FolderWatcher,
};

#[derive(Parser, Debug)]
#[command(
    name = "framewatch",
    about = "Watches print folders and alerts on misplaced framed prints"
)]
struct Args {
    /// Path to the watcher config file.
    #[arg(long, default_value = "framewatch.json")]
    config: PathBuf,

    /// Display debugging information.
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = match load_settings(&args.config) {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing(args.verbose);
            error!("loading config from {:?}: {}", args.config, e);
            let _ = LogAlertSink.alert("ERROR", &e.to_string());
            return Err(e.into());
        }
    };

    init_tracing(args.verbose || settings.debug);

    let sink = build_sink(&settings)?;

    if let Err(e) = watch(settings, sink.clone()).await {
        error!("{:#}", e);
        let _ = sink.alert("ERROR", &format!("{e:#}"));
        return Err(e);
    }

    Ok(())
}

fn load_settings(path: &PathBuf) -> Result<WatchSettings, framewatch::ConfigError> {
    let settings = WatchSettings::load(path)?;
    settings.validate()?;
    Ok(settings)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "framewatch=debug"
    } else {
        "framewatch=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn build_sink(settings: &WatchSettings) -> anyhow::Result<Arc<dyn AlertSink>> {
    match &settings.alert_command {
        Some(command) => Ok(Arc::new(CommandAlertSink::new(command)?)),
        None => Ok(Arc::new(LogAlertSink)),
    }
}

async fn watch(settings: WatchSettings, sink: Arc<dyn AlertSink>) -> anyhow::Result<()> {
    let watch_list = settings.resolve_watch_list()?;

    let folder_patterns = NamePatterns::new(&settings.folder_patterns)?;
    let file_patterns = NamePatterns::new(&settings.file_patterns)?;
    let checker = PlacementChecker::new(
        folder_patterns,
        file_patterns,
        Arc::new(settings.frame_type_mapping),
        sink,
    );

    let mut watcher = FolderWatcher::new()?;
    watcher.add_folders(&watch_list)?;
    watcher.add_callbacks(vec![checker.into_callback()]);

    info!("Monitoring following folders:");
    for (index, folder) in watch_list.iter().enumerate() {
        info!("[{}] {}", index + 1, folder.display());
    }
    info!("Press CTRL + C to close");

    let shutdown = watcher.shutdown_handle();
    spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            shutdown.shutdown();
        }
    });

    let reason = watcher.watch().await?;
    info!("watcher stopped: {}", reason);

    Ok(())
}
