use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};

use anyhow::Context;
use giftscan_core::Report;
use giftscan_engine::{
    AttributeRowExtractor, CancellationToken, ChannelProgressSink, ReqwestFetcher, ScanEngine,
};
use giftscan_logging::{scan_debug, scan_info, scan_warn, LogDestination};
use log::LevelFilter;

use crate::cli::{Cli, LogTarget, OutputMode};
use crate::config::ScannerConfig;
use crate::progress::ProgressDisplay;
use crate::render;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(&cli);

    let config = match cli.config.as_deref() {
        Some(path) => ScannerConfig::load(path)?,
        None => ScannerConfig::default(),
    };
    let plan = cli.into_plan(config)?;

    let fetcher = ReqwestFetcher::new(plan.target.clone(), plan.fetch.clone())
        .context("failed to set up http client")?
        .with_extractor(AttributeRowExtractor::new(plan.attribute.label()));
    let engine = ScanEngine::new(Arc::new(fetcher), plan.limit);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    scan_info!(
        "scanning {} gifts from {} with {} workers",
        plan.range.len(),
        plan.target.base(),
        plan.limit.get()
    );

    let (tx, rx) = mpsc::channel();
    let progress = ProgressDisplay::spawn(rx, plan.range.len(), plan.output == OutputMode::Table);
    let cancel = CancellationToken::new();

    let stats = runtime.block_on(async {
        tokio::spawn(forward_interrupts(cancel.clone()));
        let sink = ChannelProgressSink::new(tx);
        engine.scan_with_cancel(plan.range, &sink, &cancel).await
    });
    let interrupted = cancel.is_cancelled();
    // Later interrupts exit immediately.
    cancel.cancel();

    let totals = progress.finish();
    scan_debug!("progress drain saw {} events", totals.ticks);

    let report = Report::new(&stats, plan.range.len());
    match plan.output {
        OutputMode::Json => render::print_json(&report)?,
        OutputMode::Table => {
            render::print_table(&report, plan.attribute, interrupted);
            if plan.wait_for_enter {
                wait_for_enter()?;
            }
        }
    }
    Ok(())
}

/// First interrupt stops admitting new gifts; any further one exits.
async fn forward_interrupts(cancel: CancellationToken) {
    while tokio::signal::ctrl_c().await.is_ok() {
        if cancel.is_cancelled() {
            std::process::exit(130);
        }
        scan_warn!("interrupt received, waiting for in-flight requests");
        cancel.cancel();
    }
}

fn init_logging(cli: &Cli) {
    let Some(target) = cli.log else {
        return;
    };
    let destination = match target {
        LogTarget::Terminal => LogDestination::Terminal,
        LogTarget::File => LogDestination::File,
        LogTarget::Both => LogDestination::Both,
    };
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    giftscan_logging::initialize(destination, level, &cli.log_file);
}

fn wait_for_enter() -> io::Result<()> {
    println!();
    println!("Press Enter to exit...");
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
