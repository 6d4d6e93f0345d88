//! Metric Stream Parsing
//!
//! Converts the complete stdout of one benchmark process into a validated
//! `MetricRecord`. Every non-empty line must be `key:value` with exactly one
//! separator. The hyperparameter key echoed in self-report mode parses as an
//! integer, everything else as a float.
//!
//! The parser is stateful across a sweep: the first successfully parsed run
//! establishes the canonical schema (key set and order), and every later run
//! must report exactly that key set or the whole run is rejected. No partial
//! or best-effort records are produced.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::SweepError;
use crate::grid::SweepAxis;

/// One parsed metric value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// Echoed integer hyperparameter
    Int(i64),
    /// Floating-point metric (timings, approximation factors)
    Float(f64),
}

impl MetricValue {
    /// Value as f64, for charting
    pub fn as_f64(&self) -> f64 {
        match *self {
            MetricValue::Int(v) => v as f64,
            MetricValue::Float(v) => v,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MetricValue::Int(v) => write!(f, "{}", v),
            MetricValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Validated key→value mapping produced by exactly one run,
/// entries in canonical schema order
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    /// (key, value) pairs in canonical order
    pub entries: Vec<(String, MetricValue)>,
}

impl MetricRecord {
    /// Keys in canonical order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Values in canonical order
    pub fn values(&self) -> impl Iterator<Item = MetricValue> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }
}

/// Parser for the `key:value` stdout wire format.
///
/// One parser instance serves a whole sweep so that every run is validated
/// against the schema established by the first.
#[derive(Debug)]
pub struct MetricParser {
    int_keys: BTreeSet<String>,
    schema: Option<Vec<String>>,
}

impl Default for MetricParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricParser {
    /// Create a parser with no integer-typed keys; every value parses as
    /// a float
    pub fn new() -> Self {
        Self {
            int_keys: BTreeSet::new(),
            schema: None,
        }
    }

    /// Create a parser for a sweep axis. The axis's echoed hyperparameter
    /// key, if any, is typed as an integer.
    pub fn for_axis(axis: &SweepAxis) -> Self {
        let mut parser = Self::new();
        if let Some(key) = &axis.echo_key {
            parser.int_keys.insert(key.clone());
        }
        parser
    }

    /// Canonical schema once established, in first-run line order
    pub fn schema(&self) -> Option<&[String]> {
        self.schema.as_deref()
    }

    /// Parse the complete stdout text of one run.
    ///
    /// Rejects the run as a whole on any malformed line, repeated key, or
    /// key-set drift from the established schema.
    pub fn parse(&mut self, stdout: &str) -> Result<MetricRecord, SweepError> {
        let mut entries: Vec<(String, MetricValue)> = Vec::new();

        for line in stdout.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut parts = line.split(':');
            let (key, value) = match (parts.next(), parts.next(), parts.next()) {
                (Some(k), Some(v), None) => (k.trim(), v.trim()),
                _ => {
                    return Err(SweepError::Format {
                        line: line.to_string(),
                    })
                }
            };

            if key.is_empty() || entries.iter().any(|(k, _)| k == key) {
                return Err(SweepError::Format {
                    line: line.to_string(),
                });
            }

            let parsed = if self.int_keys.contains(key) {
                value.parse::<i64>().ok().map(MetricValue::Int)
            } else {
                value.parse::<f64>().ok().map(MetricValue::Float)
            };
            let parsed = parsed.ok_or_else(|| SweepError::Format {
                line: line.to_string(),
            })?;

            entries.push((key.to_string(), parsed));
        }

        if entries.is_empty() {
            return Err(SweepError::Format {
                line: "(empty metric stream)".to_string(),
            });
        }

        match &self.schema {
            None => {
                // First successful run establishes the canonical schema
                self.schema = Some(entries.iter().map(|(k, _)| k.clone()).collect());
                Ok(MetricRecord { entries })
            }
            Some(schema) => {
                let expected: BTreeSet<&str> = schema.iter().map(String::as_str).collect();
                let got: BTreeSet<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
                if expected != got {
                    return Err(SweepError::Schema {
                        expected: schema.join(", "),
                        got: entries
                            .iter()
                            .map(|(k, _)| k.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    });
                }

                // Reorder to canonical key order
                let entries = schema
                    .iter()
                    .map(|key| {
                        let value = entries
                            .iter()
                            .find(|(k, _)| k == key)
                            .map(|(_, v)| *v)
                            .unwrap_or(MetricValue::Float(0.0));
                        (key.clone(), value)
                    })
                    .collect();
                Ok(MetricRecord { entries })
            }
        }
    }
}
