//! Payload ingest: event API JSON → sorted, boundary-filtered series.
//!
//! The event API nests price history as
//! `probabilityGraph.markets[].history[]` with `{ t, p }` entries, where `t`
//! is a unix timestamp and `p` a probability percentage. The payload is not
//! trusted: `p` may arrive as a string, be missing, or be garbage. Unparsable
//! probabilities are replaced by a fallback (50 by default), samples without a
//! usable `t` are dropped, and probabilities are clamped to `[0, 100]`.
//! A history entry that is not an object counts as dropped; a market entry
//! that is not an object is skipped. Only a document that is not JSON at all,
//! or has no `probabilityGraph.markets` array, is rejected.

use std::path::{Path, PathBuf};

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::domain::{Sample, Series, TimeUnit};

pub const DEFAULT_FALLBACK_PROBABILITY: f64 = 50.0;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed payload JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected payload shape: {0}")]
    Shape(String),

    #[error("cannot read payload {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Knobs for the coercion policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestOptions {
    pub fallback_probability: f64,
    pub time_unit: TimeUnit,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            fallback_probability: DEFAULT_FALLBACK_PROBABILITY,
            time_unit: TimeUnit::Seconds,
        }
    }
}

/// What ingest had to fix up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub markets: usize,
    /// Market entries that were not objects.
    pub markets_skipped: usize,
    pub samples_kept: usize,
    /// No usable `t`, or not an object at all.
    pub samples_dropped: usize,
    /// `p` replaced by the fallback probability.
    pub samples_coerced: usize,
    /// `p` outside `[0, 100]`.
    pub samples_clamped: usize,
    /// Recorded before the market's start boundary.
    pub samples_before_start: usize,
}

#[derive(Debug, Clone)]
pub struct Ingested {
    pub series: Vec<Series>,
    pub report: IngestReport,
}

// ── Wire shape ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    probability_graph: Option<ProbabilityGraph>,
}

#[derive(Debug, Deserialize)]
struct ProbabilityGraph {
    markets: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMarket {
    id: Option<Value>,
    name: Option<Value>,
    title: Option<Value>,
    question: Option<Value>,
    start_date: Option<Value>,
    start_time: Option<Value>,
    #[serde(rename = "start_boundary")]
    start_boundary: Option<Value>,
    history: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    t: Option<Value>,
    p: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutPayload<'a> {
    probability_graph: OutGraph<'a>,
}

#[derive(Debug, Serialize)]
struct OutGraph<'a> {
    markets: Vec<OutMarket<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutMarket<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<i64>,
    history: Vec<OutPoint>,
}

#[derive(Debug, Serialize)]
struct OutPoint {
    t: i64,
    p: f64,
}

// ── Parsing ──────────────────────────────────────────────────────────

/// Parse a payload string into series.
pub fn parse_payload(json: &str, options: &IngestOptions) -> Result<Ingested, IngestError> {
    let payload: Payload = serde_json::from_str(json)?;
    let markets = payload
        .probability_graph
        .ok_or_else(|| IngestError::Shape("missing probabilityGraph".into()))?
        .markets
        .ok_or_else(|| IngestError::Shape("missing probabilityGraph.markets".into()))?;

    let mut report = IngestReport::default();
    let mut series = Vec::with_capacity(markets.len());
    for (i, raw) in markets.into_iter().enumerate() {
        match serde_json::from_value::<RawMarket>(raw) {
            Ok(market) => series.push(build_series(i, market, options, &mut report)),
            Err(err) => {
                debug!(index = i, %err, "skipping malformed market");
                report.markets_skipped += 1;
            }
        }
    }
    report.markets = series.len();

    debug!(
        markets = report.markets,
        markets_skipped = report.markets_skipped,
        kept = report.samples_kept,
        dropped = report.samples_dropped,
        coerced = report.samples_coerced,
        clamped = report.samples_clamped,
        before_start = report.samples_before_start,
        "ingested payload"
    );
    Ok(Ingested { series, report })
}

/// Read and parse a payload file.
pub fn load_payload(path: &Path, options: &IngestOptions) -> Result<Ingested, IngestError> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_payload(&text, options)
}

/// Serialize series back into the payload shape.
pub fn to_payload_json(series_list: &[Series]) -> Result<String, IngestError> {
    let payload = OutPayload {
        probability_graph: OutGraph {
            markets: series_list
                .iter()
                .map(|s| OutMarket {
                    id: &s.id,
                    name: &s.name,
                    start_date: s.start_boundary,
                    history: s
                        .samples
                        .iter()
                        .map(|sample| OutPoint {
                            t: sample.timestamp,
                            p: sample.probability,
                        })
                        .collect(),
                })
                .collect(),
        },
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

fn build_series(
    index: usize,
    market: RawMarket,
    options: &IngestOptions,
    report: &mut IngestReport,
) -> Series {
    let id = market
        .id
        .as_ref()
        .and_then(value_as_id)
        .unwrap_or_else(|| format!("market-{index}"));
    let name = [market.name, market.title, market.question]
        .iter()
        .flatten()
        .find_map(value_as_id)
        .unwrap_or_else(|| id.clone());
    let start_boundary = [market.start_date, market.start_time, market.start_boundary]
        .iter()
        .flatten()
        .find_map(|v| value_as_timestamp(v, options.time_unit));

    let history = market.history.unwrap_or_default();
    let mut samples = Vec::with_capacity(history.len());
    for raw in history {
        let Ok(point) = serde_json::from_value::<RawPoint>(raw) else {
            report.samples_dropped += 1;
            continue;
        };
        let Some(timestamp) = point.t.as_ref().and_then(value_as_integer) else {
            report.samples_dropped += 1;
            continue;
        };
        let probability = match point.p.as_ref().and_then(value_as_float) {
            Some(p) if !(0.0..=100.0).contains(&p) => {
                report.samples_clamped += 1;
                p.clamp(0.0, 100.0)
            }
            Some(p) => p,
            None => {
                report.samples_coerced += 1;
                options.fallback_probability
            }
        };
        samples.push(Sample::new(timestamp, probability));
    }

    let mut series = Series {
        id,
        name,
        samples,
        start_boundary,
    };
    series.sort_samples();
    report.samples_before_start += series.apply_start_boundary();
    report.samples_kept += series.len();
    series
}

fn value_as_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_as_integer(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn value_as_float(v: &Value) -> Option<f64> {
    let f = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    f.is_finite().then_some(f)
}

/// Integer timestamps are taken as-is; strings may also be RFC 3339 dates.
fn value_as_timestamp(v: &Value, unit: TimeUnit) -> Option<i64> {
    if let Some(ts) = value_as_integer(v) {
        return Some(ts);
    }
    let Value::String(s) = v else {
        return None;
    };
    let dt = DateTime::parse_from_rfc3339(s.trim()).ok()?;
    Some(match unit {
        TimeUnit::Seconds => dt.timestamp(),
        TimeUnit::Millis => dt.timestamp_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Ingested {
        parse_payload(json, &IngestOptions::default()).unwrap()
    }

    #[test]
    fn parses_basic_payload() {
        let ingested = parse(
            r#"{"probabilityGraph":{"markets":[
                {"id":"m1","name":"Yes","history":[{"t":10,"p":70},{"t":0,"p":50.5}]}
            ]}}"#,
        );
        let s = &ingested.series[0];
        assert_eq!(s.id, "m1");
        assert_eq!(s.name, "Yes");
        assert!(s.is_sorted());
        assert_eq!(s.samples[0], Sample::new(0, 50.5));
        assert_eq!(ingested.report.samples_kept, 2);
    }

    #[test]
    fn unparsable_probability_falls_back() {
        let ingested = parse(
            r#"{"probabilityGraph":{"markets":[
                {"id":1,"history":[{"t":0,"p":"abc"},{"t":1},{"t":2,"p":"61.5"},{"t":3,"p":null}]}
            ]}}"#,
        );
        let values: Vec<f64> = ingested.series[0]
            .samples
            .iter()
            .map(|s| s.probability)
            .collect();
        assert_eq!(values, vec![50.0, 50.0, 61.5, 50.0]);
        assert_eq!(ingested.report.samples_coerced, 3);
        assert_eq!(ingested.series[0].id, "1");
        assert_eq!(ingested.series[0].name, "1");
    }

    #[test]
    fn custom_fallback_is_used() {
        let opts = IngestOptions {
            fallback_probability: 0.0,
            ..IngestOptions::default()
        };
        let ingested = parse_payload(
            r#"{"probabilityGraph":{"markets":[{"id":"m","history":[{"t":0,"p":"x"}]}]}}"#,
            &opts,
        )
        .unwrap();
        assert_eq!(ingested.series[0].samples[0].probability, 0.0);
    }

    #[test]
    fn missing_or_fractional_t_is_dropped() {
        let ingested = parse(
            r#"{"probabilityGraph":{"markets":[
                {"id":"m","history":[{"p":10},{"t":"soon","p":10},{"t":1.5,"p":10},{"t":"7","p":10}]}
            ]}}"#,
        );
        assert_eq!(ingested.series[0].len(), 1);
        assert_eq!(ingested.series[0].samples[0].timestamp, 7);
        assert_eq!(ingested.report.samples_dropped, 3);
    }

    #[test]
    fn out_of_range_probability_is_clamped() {
        let ingested = parse(
            r#"{"probabilityGraph":{"markets":[{"id":"m","history":[{"t":0,"p":140},{"t":1,"p":-3}]}]}}"#,
        );
        let values: Vec<f64> = ingested.series[0]
            .samples
            .iter()
            .map(|s| s.probability)
            .collect();
        assert_eq!(values, vec![100.0, 0.0]);
        assert_eq!(ingested.report.samples_clamped, 2);
    }

    #[test]
    fn start_boundary_accepts_numbers_and_dates() {
        let ingested = parse(
            r#"{"probabilityGraph":{"markets":[
                {"id":"a","startDate":5,"history":[{"t":0,"p":1},{"t":5,"p":2}]},
                {"id":"b","startTime":"1970-01-01T00:00:10Z","history":[{"t":0,"p":1},{"t":10,"p":2}]}
            ]}}"#,
        );
        assert_eq!(ingested.series[0].start_boundary, Some(5));
        assert_eq!(ingested.series[0].len(), 1);
        assert_eq!(ingested.series[1].start_boundary, Some(10));
        assert_eq!(ingested.series[1].len(), 1);
        assert_eq!(ingested.report.samples_before_start, 2);
    }

    #[test]
    fn name_falls_back_through_title_and_question() {
        let ingested = parse(
            r#"{"probabilityGraph":{"markets":[
                {"id":"a","title":"T","history":[]},
                {"id":"b","question":"Q?","history":[]},
                {"history":[]}
            ]}}"#,
        );
        assert_eq!(ingested.series[0].name, "T");
        assert_eq!(ingested.series[1].name, "Q?");
        assert_eq!(ingested.series[2].id, "market-2");
        assert!(ingested.series[2].is_empty());
    }

    #[test]
    fn malformed_entries_do_not_reject_the_payload() {
        let ingested = parse(
            r#"{"probabilityGraph":{"markets":[
                {"id":"a","history":[{"t":0,"p":50},null,7,"x",{"t":5,"p":60}]},
                {"id":"b","history":null},
                {"id":"c","name":42,"title":"ignored","history":[{"t":1,"p":1}]},
                null,
                {"id":"d","name":{"nested":true},"history":[]}
            ]}}"#,
        );
        assert_eq!(ingested.series.len(), 4);
        assert_eq!(ingested.series[0].len(), 2);
        assert_eq!(ingested.report.samples_dropped, 3);
        assert!(ingested.series[1].is_empty());
        assert_eq!(ingested.series[2].name, "42");
        assert_eq!(ingested.series[3].name, "d");
        assert_eq!(ingested.report.markets, 4);
        assert_eq!(ingested.report.markets_skipped, 1);
        assert_eq!(ingested.report.samples_kept, 3);
    }

    #[test]
    fn missing_graph_is_shape_error() {
        let err = parse_payload(r#"{"markets":[]}"#, &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::Shape(_)));
        let err =
            parse_payload(r#"{"probabilityGraph":{}}"#, &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::Shape(_)));
    }

    #[test]
    fn malformed_json_is_json_error() {
        let err = parse_payload("{not json", &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::Json(_)));
    }

    #[test]
    fn payload_json_reparses_to_same_series() {
        let original = vec![Series::new(
            "m1",
            "Yes",
            vec![Sample::new(5, 40.0), Sample::new(9, 45.5)],
            Some(5),
        )];
        let json = to_payload_json(&original).unwrap();
        let back = parse(&json);
        assert_eq!(back.series, original);
    }
}
