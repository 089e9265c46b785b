use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use engine_logging::{engine_info, engine_warn};
use scout_core::RunStatus;
use scout_engine::{
    download, normalize_target_url, CrawlConfig, CrawlTask, ScanConfig, ScanTask, WorkerSlot,
};

use super::cli::{Cli, Command};
use super::logging;
use super::render::{EventRenderer, OutputFormat};
use super::roots::resolve_roots;
use super::settings::{default_settings_path, load_settings, Settings};

/// Conventional exit status for a run stopped with Ctrl-C.
const EXIT_CANCELLED: u8 = 130;

pub fn run_app() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::initialize(cli.verbose, cli.log_file.clone());

    let settings_path = cli.config.clone().unwrap_or_else(default_settings_path);
    let settings = load_settings(&settings_path);
    let format = if cli.json {
        OutputFormat::JsonLines
    } else {
        OutputFormat::Text
    };
    let mut renderer = EventRenderer::new(io::stdout().lock(), format);

    engine_info!("scout {} starting", cli.command.label());
    match cli.command {
        Command::Download { url, dir } => {
            let dir = dir.unwrap_or_else(|| settings.download_dir.clone());
            let url = normalize_target_url(&url);
            let saved = download(&url, &dir, &settings.download_settings())
                .with_context(|| format!("downloading {url}"))?;
            renderer.render_saved(&saved)?;
            Ok(ExitCode::SUCCESS)
        }
        command => {
            let mut slot = WorkerSlot::new(command.label());
            start(&mut slot, command, &settings)?;
            cancel_on_ctrl_c(&slot)?;
            drive(&mut slot, &mut renderer)
        }
    }
}

fn start(slot: &mut WorkerSlot, command: Command, settings: &Settings) -> Result<()> {
    let label = command.label();
    match command {
        Command::Media {
            kind,
            max_items,
            roots,
        } => {
            let config = ScanConfig::media(resolve_roots(roots), kind.into())
                .with_max_items(Some(max_items.unwrap_or(settings.max_items)));
            slot.start(ScanTask::new(label, config))?;
        }
        Command::Documents { max_items, roots } => {
            let config = ScanConfig::documents(resolve_roots(roots))
                .with_max_items(Some(max_items.unwrap_or(settings.max_items)));
            slot.start(ScanTask::new(label, config))?;
        }
        Command::Find {
            query,
            depth,
            roots,
        } => {
            let config = ScanConfig::name_search(resolve_roots(roots), query)
                .with_max_depth(Some(depth.unwrap_or(settings.max_depth)));
            slot.start(ScanTask::new(label, config))?;
        }
        Command::Crawl { url } => {
            let config = CrawlConfig::with_settings(&url, settings.fetch_settings());
            slot.start(CrawlTask::new(config))?;
        }
        Command::Download { .. } => anyhow::bail!("download does not run in a worker"),
    }
    Ok(())
}

fn cancel_on_ctrl_c(slot: &WorkerSlot) -> Result<()> {
    let Some(token) = slot.cancel_token() else {
        return Ok(());
    };
    ctrlc::set_handler(move || {
        engine_info!("Received Ctrl+C, cancelling run...");
        token.cancel();
    })
    .context("installing Ctrl+C handler")
}

fn drive<W: Write>(slot: &mut WorkerSlot, renderer: &mut EventRenderer<W>) -> Result<ExitCode> {
    while let Some(event) = slot.recv() {
        renderer.render(&event)?;
    }

    let state = slot.state();
    Ok(match state.status() {
        RunStatus::Completed if state.was_cancelled() => ExitCode::from(EXIT_CANCELLED),
        RunStatus::Completed => ExitCode::SUCCESS,
        RunStatus::Failed => ExitCode::FAILURE,
        other => {
            engine_warn!("Worker exited without a terminal event (status {:?})", other);
            ExitCode::FAILURE
        }
    })
}
