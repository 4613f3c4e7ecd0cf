//! Metric registry with deterministic text exposition.
//!
//! Series are keyed by metric name plus a sorted label set and stored in a
//! `DashMap`, one atomic cell per series. Counters keep a `u64`; gauges keep
//! the bit pattern of an `f64`. Every value is a single word, so a snapshot
//! never observes a half-applied write.
//!
//! Output line format: `name{k="v",...} value`, brace group omitted when a
//! series has no labels. Snapshot order is metric name, then rendered label
//! string, so two renders of an unchanged registry are byte-identical.

use std::fmt::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::error::{Result, VitalsError};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`
pub fn is_valid_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::Counter => f.write_str("counter"),
            MetricKind::Gauge => f.write_str("gauge"),
        }
    }
}

/// Point-in-time value of one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Counter(u64),
    Gauge(f64),
}

impl MetricValue {
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricValue::Counter(_) => MetricKind::Counter,
            MetricValue::Gauge(_) => MetricKind::Gauge,
        }
    }
}

impl fmt::Display for MetricValue {
    // f64's Display is the shortest representation that round-trips.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Counter(v) => write!(f, "{v}"),
            MetricValue::Gauge(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SeriesKey {
    name: String,
    labels: Vec<(String, String)>,
}

impl SeriesKey {
    /// Validate and build the identity key. Also returns labels in caller order,
    /// which is the order they are rendered in.
    fn build(name: &str, labels: &[(&str, &str)]) -> Result<(Self, Vec<(String, String)>)> {
        if !is_valid_name(name) {
            return Err(VitalsError::InvalidName(name.to_string()));
        }
        let mut display: Vec<(String, String)> = Vec::with_capacity(labels.len());
        for (k, v) in labels {
            if !is_valid_name(k) {
                return Err(VitalsError::InvalidName((*k).to_string()));
            }
            if display.iter().any(|(seen, _)| seen == k) {
                return Err(VitalsError::DuplicateLabel((*k).to_string()));
            }
            display.push((k.to_string(), v.to_string()));
        }

        let mut sorted = display.clone();
        sorted.sort();
        Ok((
            Self {
                name: name.to_string(),
                labels: sorted,
            },
            display,
        ))
    }
}

struct Series {
    kind: MetricKind,
    labels: Vec<(String, String)>,
    cell: AtomicU64,
}

impl Series {
    fn read(&self) -> MetricValue {
        let raw = self.cell.load(Ordering::Acquire);
        match self.kind {
            MetricKind::Counter => MetricValue::Counter(raw),
            MetricKind::Gauge => MetricValue::Gauge(f64::from_bits(raw)),
        }
    }
}

/// Process-wide store of named counters and gauges.
///
/// All operations are synchronous and lock only the shard that owns the
/// series. Invalid input is rejected before anything is inserted or written.
#[derive(Default)]
pub struct MetricRegistry {
    kinds: DashMap<String, MetricKind>,
    series: DashMap<SeriesKey, Series>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a counter by 1. Returns the new value.
    pub fn increment(&self, name: &str, labels: &[(&str, &str)]) -> Result<u64> {
        self.increment_by(name, labels, 1)
    }

    /// Increment a counter by `delta`, creating it at 0 on first use.
    /// Negative deltas fail with `InvalidDelta`. Saturates at `u64::MAX`.
    pub fn increment_by(&self, name: &str, labels: &[(&str, &str)], delta: i64) -> Result<u64> {
        if delta < 0 {
            return Err(VitalsError::InvalidDelta(delta));
        }
        let delta = delta as u64;

        self.with_series(name, labels, MetricKind::Counter, 0, |cell| {
            let prev = cell
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| {
                    Some(v.saturating_add(delta))
                })
                .unwrap_or_else(|v| v);
            prev.saturating_add(delta)
        })
    }

    /// Overwrite a gauge, creating it on first use. NaN and infinities fail
    /// with `NonFiniteValue`.
    pub fn set_gauge(&self, name: &str, labels: &[(&str, &str)], value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(VitalsError::NonFiniteValue(value));
        }
        let bits = value.to_bits();
        self.with_series(name, labels, MetricKind::Gauge, bits, |cell| {
            cell.store(bits, Ordering::Release)
        })
    }

    /// Current counter value; `None` when the series does not exist.
    pub fn counter_value(&self, name: &str, labels: &[(&str, &str)]) -> Option<u64> {
        match self.lookup(name, labels)? {
            MetricValue::Counter(v) => Some(v),
            MetricValue::Gauge(_) => None,
        }
    }

    /// Current gauge value; `None` when the series does not exist.
    pub fn gauge_value(&self, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
        match self.lookup(name, labels)? {
            MetricValue::Gauge(v) => Some(v),
            MetricValue::Counter(_) => None,
        }
    }

    /// Number of distinct series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Copy every series out under its shard lock and sort for output.
    pub fn snapshot(&self) -> Snapshot {
        let mut samples: Vec<Sample> = self
            .series
            .iter()
            .map(|r| {
                let s = r.value();
                Sample {
                    name: r.key().name.clone(),
                    labels: s.labels.clone(),
                    value: s.read(),
                }
            })
            .collect();
        samples.sort_by_cached_key(|s| (s.name.clone(), s.label_string()));
        Snapshot { samples }
    }

    /// Render the current state in text exposition format.
    pub fn render(&self) -> String {
        self.snapshot().render()
    }

    fn lookup(&self, name: &str, labels: &[(&str, &str)]) -> Option<MetricValue> {
        let (key, _) = SeriesKey::build(name, labels).ok()?;
        let series = self.series.get(&key)?;
        Some(series.read())
    }

    /// One kind per metric name, fixed by the first write.
    fn claim_kind(&self, name: &str, kind: MetricKind) -> Result<()> {
        let existing = self.kinds.get(name).map(|k| *k);
        let existing = match existing {
            Some(k) => k,
            None => *self.kinds.entry(name.to_string()).or_insert(kind),
        };
        if existing != kind {
            return Err(VitalsError::KindMismatch {
                name: name.to_string(),
                existing,
                requested: kind,
            });
        }
        Ok(())
    }

    fn with_series<T>(
        &self,
        name: &str,
        labels: &[(&str, &str)],
        kind: MetricKind,
        init: u64,
        f: impl FnOnce(&AtomicU64) -> T,
    ) -> Result<T> {
        let (key, display) = SeriesKey::build(name, labels)?;
        self.claim_kind(name, kind)?;

        if let Some(series) = self.series.get(&key) {
            return Ok(f(&series.cell));
        }
        let series = self.series.entry(key).or_insert_with(|| Series {
            kind,
            labels: display,
            cell: AtomicU64::new(init),
        });
        Ok(f(&series.cell))
    }
}

/// One series as captured by [`MetricRegistry::snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: String,
    /// Labels in first-write order.
    pub labels: Vec<(String, String)>,
    pub value: MetricValue,
}

impl Sample {
    pub fn kind(&self) -> MetricKind {
        self.value.kind()
    }

    /// `k1="v1",k2="v2"` with values escaped; empty when unlabeled.
    pub fn label_string(&self) -> String {
        self.labels
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn write_line(&self, out: &mut String) {
        let labels = self.label_string();
        if labels.is_empty() {
            let _ = writeln!(out, "{} {}", self.name, self.value);
        } else {
            let _ = writeln!(out, "{}{{{}}} {}", self.name, labels, self.value);
        }
    }
}

/// Immutable, ordered copy of the registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    samples: Vec<Sample>,
}

impl Snapshot {
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Newline-terminated exposition text. Pure function of the snapshot.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for s in &self.samples {
            s.write_line(&mut out);
        }
        out
    }
}
