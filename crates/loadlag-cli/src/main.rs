use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use tokio::sync::watch;

use loadlag_engine::logging::{init_logging, LoggingConfig};
use loadlag_engine::report::Frontend;
use loadlag_engine::runtime::{run_measurement, TokioTimerHost};
use loadlag_engine::{AbortReason, LagSampler, SamplerState};

mod cli;
mod navigator;
mod output;

use cli::Args;
use navigator::HttpNavigator;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(match &args.log {
        Some(filter) => LoggingConfig::with_filter(filter.clone()),
        None => LoggingConfig::default(),
    });

    let target = args.target();
    let timing = args.timing();
    info!(
        "{} run(s) against {} ({} mode)",
        args.runs,
        target.resolve_url(),
        if target.is_instrumented() { "instrumented" } else { "fallback" }
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stop_tx.send(true);
        }
    });

    let mut frontend = Frontend::new();
    let mut navigator = HttpNavigator::new().context("building HTTP client")?;

    for run in 1..=args.runs {
        let (timers, mut events) = TokioTimerHost::new();
        frontend.begin(target.resolve_url());

        let mut sampler = LagSampler::with_timing(&mut navigator, timers, &mut frontend, timing);
        let mut stop = stop_rx.clone();
        let shutdown = async move {
            // Without a signal handler there is nothing to wait for.
            if stop.wait_for(|stopped| *stopped).await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        let state = run_measurement(&mut sampler, &mut events, &target, shutdown)
            .await
            .with_context(|| format!("measurement {run} of {}", args.runs))?;
        drop(sampler);

        match state {
            SamplerState::Done => {}
            SamplerState::Aborted(AbortReason::LoadDeadline) => {
                let partial = frontend.abandon();
                warn!(
                    "run {run}: page still loading at deadline; dropped {} samples",
                    partial.loadlag.len()
                );
            }
            SamplerState::Aborted(AbortReason::Stopped) => {
                frontend.abandon();
                warn!("interrupted during run {run}");
                break;
            }
            other => unreachable!("measurement loop returned non-terminal state {other:?}"),
        }
    }

    let reports = frontend.into_completed();
    println!("{}", output::render(&reports, args.format)?);
    Ok(())
}
