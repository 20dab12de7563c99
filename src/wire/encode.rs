//! Metric line encoding: `<name>:<value>|<type>[|#key:val,key:val,...]`.
//!
//! No escaping is performed; names and tag values must not contain the
//! delimiter characters `:`, `|`, `,`. That is a precondition on callers,
//! not something the encoder validates.

use std::fmt;

use serde::Serialize;

/// Numeric metric value. Integers render without a decimal point, floats
/// in their natural decimal representation (no fixed rounding; display
/// layers round for readability, the wire does not).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{}", v),
            // Debug formatting keeps the decimal point on whole-number
            // floats ("30.0", not "30"), so a float value decodes back
            // as a float and the codec stays invertible.
            MetricValue::Float(v) => write!(f, "{:?}", v),
        }
    }
}

/// Metric type tag. Everything this agent emits is a gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricKind {
    Gauge,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "g",
        }
    }
}

/// One metric, alive only long enough to be encoded and sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: String,
    pub value: MetricValue,
    pub kind: MetricKind,
    /// Ordered `key:value` pairs; order is preserved on the wire.
    pub tags: Vec<(String, String)>,
}

impl Metric {
    pub fn gauge(name: impl Into<String>, value: MetricValue) -> Self {
        Self {
            name: name.into(),
            value,
            kind: MetricKind::Gauge,
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }
}

/// Encodes a metric as one wire line.
pub fn encode(metric: &Metric) -> String {
    let mut line = format!("{}:{}|{}", metric.name, metric.value, metric.kind.as_str());
    if !metric.tags.is_empty() {
        line.push_str("|#");
        let tags: Vec<String> = metric
            .tags
            .iter()
            .map(|(key, value)| format!("{}:{}", key, value))
            .collect();
        line.push_str(&tags.join(","));
    }
    line
}

/// Error from decoding a wire line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// No `:` between name and value.
    MissingValue,
    /// No `|` type tag after the value.
    MissingKind,
    /// Type tag other than `g`.
    UnknownKind(String),
    /// Value is neither an integer nor a float.
    BadValue(String),
    /// Tag without a `:` separator.
    BadTag(String),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::MissingValue => write!(f, "missing ':' between name and value"),
            WireError::MissingKind => write!(f, "missing '|' type tag"),
            WireError::UnknownKind(kind) => write!(f, "unknown metric type '{}'", kind),
            WireError::BadValue(value) => write!(f, "unparseable value '{}'", value),
            WireError::BadTag(tag) => write!(f, "malformed tag '{}'", tag),
        }
    }
}

impl std::error::Error for WireError {}

/// Decodes one wire line back into a metric.
///
/// Inverse of [`encode`] for any metric whose name and tags are free of
/// delimiter characters. Values containing `.`, `e`, or `E` decode as
/// floats, everything else as integers.
pub fn decode(line: &str) -> Result<Metric, WireError> {
    let (head, tags_part) = match line.split_once("|#") {
        Some((head, tags)) => (head, Some(tags)),
        None => (line, None),
    };

    let (name_value, kind) = head.split_once('|').ok_or(WireError::MissingKind)?;
    let kind = match kind {
        "g" => MetricKind::Gauge,
        other => return Err(WireError::UnknownKind(other.to_string())),
    };

    let (name, value) = name_value.split_once(':').ok_or(WireError::MissingValue)?;
    let value = parse_value(value)?;

    let mut tags = Vec::new();
    if let Some(tags_part) = tags_part {
        for tag in tags_part.split(',') {
            let (key, tag_value) = tag
                .split_once(':')
                .ok_or_else(|| WireError::BadTag(tag.to_string()))?;
            tags.push((key.to_string(), tag_value.to_string()));
        }
    }

    Ok(Metric {
        name: name.to_string(),
        value,
        kind,
        tags,
    })
}

fn parse_value(raw: &str) -> Result<MetricValue, WireError> {
    if raw.contains(['.', 'e', 'E']) {
        raw.parse::<f64>()
            .map(MetricValue::Float)
            .map_err(|_| WireError::BadValue(raw.to_string()))
    } else {
        raw.parse::<i64>()
            .map(MetricValue::Int)
            .map_err(|_| WireError::BadValue(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_untagged_integer_gauge() {
        let metric = Metric::gauge("mcman.worker_processes", MetricValue::Int(3));
        assert_eq!(encode(&metric), "mcman.worker_processes:3|g");
    }

    #[test]
    fn encodes_tagged_float_gauge() {
        let metric = Metric::gauge("custom.network.latency", MetricValue::Float(25.5))
            .with_tag("source", "test-server")
            .with_tag("destination", "example.com");
        assert_eq!(
            encode(&metric),
            "custom.network.latency:25.5|g|#source:test-server,destination:example.com"
        );
    }

    #[test]
    fn integers_render_without_decimal_point() {
        assert_eq!(MetricValue::Int(0).to_string(), "0");
        assert_eq!(MetricValue::Int(-2).to_string(), "-2");
        assert_eq!(MetricValue::Float(0.045).to_string(), "0.045");
    }

    #[test]
    fn whole_number_floats_keep_their_decimal_point() {
        // Loss on a lossless pass is 0.0, on a dead pass 100.0; both must
        // stay floats on the wire so decoding gives the value back.
        assert_eq!(MetricValue::Float(0.0).to_string(), "0.0");
        assert_eq!(MetricValue::Float(30.0).to_string(), "30.0");
        assert_eq!(MetricValue::Float(100.0).to_string(), "100.0");
    }

    #[test]
    fn decode_inverts_encode() {
        let metrics = [
            Metric::gauge("mcman.worker_processes", MetricValue::Int(3))
                .with_tag("process", "mcman"),
            Metric::gauge("custom.network.latency", MetricValue::Float(25.5))
                .with_tag("source", "test-server")
                .with_tag("destination", "example.com"),
            Metric::gauge("custom.network.connection_status", MetricValue::Int(1)),
            // Whole-number floats are what packet_loss carries on most
            // passes (0.0, 30.0, 100.0 for 10 probes).
            Metric::gauge("custom.network.packet_loss", MetricValue::Float(30.0))
                .with_tag("source", "test-server")
                .with_tag("destination", "example.com"),
            Metric::gauge("custom.network.packet_loss", MetricValue::Float(0.0)),
        ];

        for metric in metrics {
            assert_eq!(decode(&encode(&metric)).unwrap(), metric);
        }
    }

    #[test]
    fn tag_order_is_preserved() {
        let decoded =
            decode("m:1|g|#b:2,a:1").unwrap();
        assert_eq!(
            decoded.tags,
            vec![("b".to_string(), "2".to_string()), ("a".to_string(), "1".to_string())]
        );
    }

    #[test]
    fn decode_rejects_malformed_lines() {
        assert_eq!(decode("noseparator"), Err(WireError::MissingKind));
        assert_eq!(decode("name3|g"), Err(WireError::MissingValue));
        assert_eq!(
            decode("name:3|c"),
            Err(WireError::UnknownKind("c".to_string()))
        );
        assert_eq!(
            decode("name:x|g"),
            Err(WireError::BadValue("x".to_string()))
        );
        assert_eq!(
            decode("name:3|g|#keyonly"),
            Err(WireError::BadTag("keyonly".to_string()))
        );
    }

    #[test]
    fn encoding_is_pure() {
        let metric = Metric::gauge("m", MetricValue::Float(1.25)).with_tag("k", "v");
        assert_eq!(encode(&metric), encode(&metric));
    }
}
