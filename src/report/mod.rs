// src/report/mod.rs
use crate::{
    aggregate::{AggregationResult, Columns, YearTracking},
    config::{ReportConfig, Variant},
    fetch::{self, Source},
    parse::{NaiveCsv, Record, RecordParser},
    present::{self, BarScale},
    render::RenderSink,
};
use rand::seq::SliceRandom;
use reqwest::Client;
use tracing::{info, instrument, warn};

const LOAD_ERROR_BLOCK: &str = "<b>Error</b><br/>Unable to load data from source provided.";

/// What a run ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Rendered {
        result: AggregationResult,
        permit_type: Option<String>,
    },
    /// Source could not be read; only the error block was rendered.
    LoadFailed,
}

/// Pick the permit type for a filtered report: the pinned one if any,
/// otherwise a random type present in the data.
fn choose_permit_type<R: rand::Rng + ?Sized>(
    columns: &Columns,
    records: &[Record],
    pinned: Option<&str>,
    rng: &mut R,
) -> Option<String> {
    if let Some(p) = pinned {
        return Some(p.to_string());
    }
    columns
        .permit_types(records)
        .choose(rng)
        .map(|t| t.to_string())
}

/// Parse, aggregate and render already loaded text.
pub fn render_report<R: rand::Rng + ?Sized>(
    text: &str,
    cfg: &ReportConfig,
    sink: &mut dyn RenderSink,
    rng: &mut R,
) -> Outcome {
    let records = NaiveCsv.parse(text);
    info!(records = records.len(), "parsed permits");

    let (permit_type, bars) = match cfg.variant {
        Variant::All => (None, BarScale::Total),
        Variant::ByType => {
            let chosen =
                choose_permit_type(&cfg.columns, &records, cfg.permit_type.as_deref(), rng);
            if chosen.is_none() {
                warn!("no permit types present; reporting every record");
            }
            (chosen, BarScale::LargestBorough)
        }
    };

    let result = cfg
        .columns
        .aggregate(&records, permit_type.as_deref(), cfg.years);
    if cfg.years == YearTracking::Corrected {
        info!("using corrected year bounds");
    }

    sink.append(
        &present::format_summary(&result, permit_type.as_deref()),
        Some("header"),
    );
    for bar in present::format_borough_bars(&result, bars) {
        sink.append(&bar, Some("borough"));
    }

    info!(
        total = result.total,
        boroughs = result.boroughs.len(),
        permit_type = ?permit_type,
        "rendered report"
    );
    Outcome::Rendered {
        result,
        permit_type,
    }
}

/// Load the configured source and render the report into `sink`.
///
/// A failed load renders a single error block and stops.
#[instrument(level = "info", skip_all, fields(source = %cfg.source, variant = ?cfg.variant))]
pub async fn run(client: &Client, cfg: &ReportConfig, sink: &mut dyn RenderSink) -> Outcome {
    let source = Source::parse(&cfg.source);
    let text = match fetch::load_text(client, &source).await {
        Ok(t) => t,
        Err(e) => {
            warn!(path = %source, error = %e, "rendering load error");
            sink.append(LOAD_ERROR_BLOCK, Some("error"));
            return Outcome::LoadFailed;
        }
    };

    render_report(&text, cfg, sink, &mut rand::thread_rng())
}
