//! In-process counters rendered in the Prometheus text exposition format.
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

const LATENCY_BUCKETS_MS: [u64; 9] = [1, 5, 10, 25, 50, 100, 250, 500, 1000];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOp {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug)]
pub struct Metrics {
    start_time_seconds: u64,
    created: AtomicU64,
    updated: AtomicU64,
    deleted: AtomicU64,
    // (method, path, status)
    requests: Mutex<BTreeMap<(String, String, u16), u64>>,
    // (method, path)
    latency: Mutex<BTreeMap<(String, String), Histogram>>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let start_time_seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Self {
            start_time_seconds,
            created: AtomicU64::new(0),
            updated: AtomicU64::new(0),
            deleted: AtomicU64::new(0),
            requests: Mutex::new(BTreeMap::new()),
            latency: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn record_request(&self, method: &str, path: &str, status: u16, elapsed_ms: u64) {
        let method = method_label(method);
        if let Ok(mut requests) = self.requests.lock() {
            *requests
                .entry((method.to_string(), path.to_string(), status))
                .or_insert(0) += 1;
        }
        if let Ok(mut latency) = self.latency.lock() {
            latency
                .entry((method.to_string(), path.to_string()))
                .or_insert_with(Histogram::new)
                .record(elapsed_ms);
        }
    }

    pub fn record_message(&self, op: MessageOp) {
        let counter = match op {
            MessageOp::Created => &self.created,
            MessageOp::Updated => &self.updated,
            MessageOp::Deleted => &self.deleted,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("# HELP bacheca_up Service is running.\n");
        out.push_str("# TYPE bacheca_up gauge\n");
        out.push_str("bacheca_up 1\n");

        out.push_str("# HELP bacheca_start_time_seconds Start time in unix seconds.\n");
        out.push_str("# TYPE bacheca_start_time_seconds gauge\n");
        let _ = writeln!(out, "bacheca_start_time_seconds {}", self.start_time_seconds);

        out.push_str("# HELP bacheca_messages_total Message mutations by operation.\n");
        out.push_str("# TYPE bacheca_messages_total counter\n");
        for (op, counter) in [
            ("created", &self.created),
            ("updated", &self.updated),
            ("deleted", &self.deleted),
        ] {
            let _ = writeln!(
                out,
                "bacheca_messages_total{{op=\"{op}\"}} {}",
                counter.load(Ordering::Relaxed)
            );
        }

        let requests = self.requests.lock().unwrap_or_else(|e| e.into_inner());
        out.push_str(
            "# HELP bacheca_http_requests_total HTTP requests by method, route and status.\n",
        );
        out.push_str("# TYPE bacheca_http_requests_total counter\n");
        for ((method, path, status), count) in requests.iter() {
            let _ = writeln!(
                out,
                "bacheca_http_requests_total{} {count}",
                format_labels(
                    &[
                        ("method", method.as_str()),
                        ("path", path.as_str()),
                        ("status", status.to_string().as_str()),
                    ],
                    None
                )
            );
        }
        drop(requests);

        let latency = self.latency.lock().unwrap_or_else(|e| e.into_inner());
        out.push_str("# HELP bacheca_http_request_duration_ms HTTP request latency.\n");
        out.push_str("# TYPE bacheca_http_request_duration_ms histogram\n");
        for ((method, path), hist) in latency.iter() {
            emit_histogram(
                &mut out,
                "bacheca_http_request_duration_ms",
                hist,
                &[("method", method.as_str()), ("path", path.as_str())],
            );
        }

        out
    }
}

#[derive(Debug, Clone)]
struct Histogram {
    buckets: [u64; LATENCY_BUCKETS_MS.len() + 1],
    sum: u64,
    count: u64,
}

impl Histogram {
    fn new() -> Self {
        Self { buckets: [0; LATENCY_BUCKETS_MS.len() + 1], sum: 0, count: 0 }
    }

    fn record(&mut self, value_ms: u64) {
        self.sum += value_ms;
        self.count += 1;
        let idx = LATENCY_BUCKETS_MS
            .iter()
            .position(|upper| value_ms <= *upper)
            .unwrap_or(LATENCY_BUCKETS_MS.len());
        self.buckets[idx] += 1;
    }
}

fn emit_histogram(out: &mut String, name: &str, hist: &Histogram, labels: &[(&str, &str)]) {
    let mut cumulative = 0u64;
    for (idx, upper) in LATENCY_BUCKETS_MS.iter().enumerate() {
        cumulative += hist.buckets[idx];
        let _ = writeln!(
            out,
            "{name}_bucket{} {cumulative}",
            format_labels(labels, Some(&upper.to_string()))
        );
    }
    cumulative += hist.buckets[LATENCY_BUCKETS_MS.len()];
    let _ = writeln!(out, "{name}_bucket{} {cumulative}", format_labels(labels, Some("+Inf")));
    let _ = writeln!(out, "{name}_sum{} {}", format_labels(labels, None), hist.sum);
    let _ = writeln!(out, "{name}_count{} {}", format_labels(labels, None), hist.count);
}

fn format_labels(labels: &[(&str, &str)], le: Option<&str>) -> String {
    let mut parts: Vec<String> = labels
        .iter()
        .map(|(k, v)| format!("{k}=\"{}\"", escape_label(v)))
        .collect();
    if let Some(le) = le {
        parts.push(format!("le=\"{le}\""));
    }
    format!("{{{}}}", parts.join(","))
}

/// Only standard methods become label values; anything else is "other".
fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "PATCH" => "PATCH",
        "OPTIONS" => "OPTIONS",
        "CONNECT" => "CONNECT",
        "TRACE" => "TRACE",
        _ => "other",
    }
}

fn escape_label(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}
