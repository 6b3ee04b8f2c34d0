//! Headless Reroute Console session.
//!
//! Usage:
//!   cargo run -p reroute-cli --bin run_console -- --scenario runway --ticks 40 --approve-at 20

use anyhow::Result;
use clap::Parser;
use reroute_cli::session::{self, SessionPlan};
use reroute_core::{EngineConfig, Provider, ScenarioId};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a seeded reroute console session")]
struct Args {
    /// Seed for fleet generation and path jitter
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Active scenario (wx, runway, staffing)
    #[arg(long, default_value = "wx")]
    scenario: ScenarioId,

    /// Number of animation ticks to run
    #[arg(long, default_value_t = 30)]
    ticks: u64,

    /// Tick interval in milliseconds when pacing in real time
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Pace ticks at --tick-ms instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Approve all open proposals after this many ticks
    #[arg(long)]
    approve_at: Option<u64>,

    /// Minimum risk score for a reroute proposal
    #[arg(long, default_value_t = 0.6)]
    risk_threshold: f64,

    /// JSON feed file to ingest instead of the synthetic fleet
    #[arg(long)]
    feed: Option<PathBuf>,

    /// Feed format (aviationstack, canonical)
    #[arg(long, default_value = "aviationstack")]
    provider: Provider,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reroute_cli=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let plan = SessionPlan {
        config: EngineConfig {
            seed: args.seed,
            tick_interval_ms: args.tick_ms,
            risk_threshold: args.risk_threshold,
            ..EngineConfig::default()
        },
        scenario: args.scenario,
        ticks: args.ticks,
        approve_at: args.approve_at,
        feed: args.feed.map(|path| (args.provider, path)),
    };

    let report = if args.realtime {
        let mut engine = session::build_engine(&plan)?;
        let mut ticker = tokio::time::interval(Duration::from_millis(args.tick_ms.max(1)));
        for _ in 0..plan.ticks {
            ticker.tick().await;
            session::step(&mut engine, &plan);
            tracing::info!(
                "tick {}: {} open proposal(s)",
                engine.tick_count(),
                engine.proposals().len()
            );
        }
        session::report(&engine)
    } else {
        session::run(&plan)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}
