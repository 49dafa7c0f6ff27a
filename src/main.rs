use anyhow::{Context, Result};
use filmpermits::{
    config::ReportConfig,
    render::{HtmlPage, TextSink},
    report::{self, Outcome},
};
use reqwest::Client;
use std::io;
use tokio::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,filmpermits=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(io::stderr)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let cfg = ReportConfig::from_env().context("loading configuration")?;
    info!(source = %cfg.source, output = %cfg.output, variant = ?cfg.variant, "configured");

    // ─── 3) load, aggregate, render ──────────────────────────────────
    let client = Client::new();
    let start = Instant::now();

    let outcome = if cfg.writes_to_stdout() {
        let mut sink = TextSink::new(io::stdout().lock());
        report::run(&client, &cfg, &mut sink).await
    } else {
        let mut page = HtmlPage::new(cfg.title.clone());
        let outcome = report::run(&client, &cfg, &mut page).await;
        // the error block still goes on the page
        page.write_to(&cfg.output)?;
        outcome
    };

    match outcome {
        Outcome::Rendered { result, .. } => {
            info!(total = result.total, elapsed = ?start.elapsed(), "all done");
        }
        Outcome::LoadFailed => {
            error!(path = %cfg.source, "no data; report contains the error block only");
        }
    }
    Ok(())
}
