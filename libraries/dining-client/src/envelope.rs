//! Normalization of the API's inconsistent response envelopes.
//!
//! The same collection endpoint may answer with `{data: {users: [...]}}`,
//! `{data: [...]}`, a single object under `data`, or a bare array. All of
//! them funnel through [`ListEnvelope::classify`] so the rest of the client
//! only ever sees a [`FetchedPage`].

use crate::error::{ClientError, Result};
use crate::types::{EnvelopeShape, FetchedPage};
use dining_core::{Entity, EntityKind};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// A list payload, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEnvelope {
    /// `{ data: { <collection>: [...] } }`
    Nested {
        items: Vec<Value>,
        total: Option<u64>,
    },
    /// `{ data: [...] }`
    Flat {
        items: Vec<Value>,
        total: Option<u64>,
    },
    /// `{ data: { ...one record... } }`
    Single(Value),
    /// `[...]`
    Bare(Vec<Value>),
    /// Anything else
    Unrecognized,
}

impl ListEnvelope {
    /// Classify `payload` as a list of `kind`.
    pub fn classify(payload: &Value, kind: EntityKind) -> Self {
        match payload {
            Value::Array(items) => ListEnvelope::Bare(items.clone()),
            Value::Object(root) => match root.get("data") {
                Some(Value::Object(data)) => {
                    if let Some(Value::Array(items)) = data.get(kind.collection_key()) {
                        ListEnvelope::Nested {
                            items: items.clone(),
                            total: read_total(root).or_else(|| read_total(data)),
                        }
                    } else if data.is_empty() {
                        ListEnvelope::Unrecognized
                    } else {
                        ListEnvelope::Single(Value::Object(data.clone()))
                    }
                }
                Some(Value::Array(items)) => ListEnvelope::Flat {
                    items: items.clone(),
                    total: read_total(root),
                },
                _ => ListEnvelope::Unrecognized,
            },
            _ => ListEnvelope::Unrecognized,
        }
    }

    /// Which shape this is
    pub fn shape(&self) -> EnvelopeShape {
        match self {
            ListEnvelope::Nested { .. } => EnvelopeShape::Nested,
            ListEnvelope::Flat { .. } => EnvelopeShape::Flat,
            ListEnvelope::Single(_) => EnvelopeShape::Single,
            ListEnvelope::Bare(_) => EnvelopeShape::Bare,
            ListEnvelope::Unrecognized => EnvelopeShape::Unrecognized,
        }
    }

    /// Server-reported total, if the envelope carried one
    pub fn total(&self) -> Option<u64> {
        match self {
            ListEnvelope::Nested { total, .. } | ListEnvelope::Flat { total, .. } => *total,
            _ => None,
        }
    }

    /// Raw records in payload order
    pub fn into_items(self) -> Vec<Value> {
        match self {
            ListEnvelope::Nested { items, .. } | ListEnvelope::Flat { items, .. } => items,
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Single(item) => vec![item],
            ListEnvelope::Unrecognized => Vec::new(),
        }
    }
}

/// Read a total from `count`, `total`, `results`, or `pagination.total`.
pub fn read_total(obj: &Map<String, Value>) -> Option<u64> {
    ["count", "total", "results"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(as_count))
        .or_else(|| {
            obj.get("pagination")
                .and_then(|p| p.get("total"))
                .and_then(as_count)
        })
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decode a list payload into entities.
///
/// Records that fail to decode are skipped and counted; an unrecognized
/// payload yields an empty page. Neither case is an error.
pub fn normalize_list<E: Entity>(payload: &Value) -> FetchedPage<E> {
    let envelope = ListEnvelope::classify(payload, E::KIND);
    let shape = envelope.shape();
    let server_total = envelope.total();

    if shape == EnvelopeShape::Unrecognized {
        warn!(kind = %E::KIND, "Unrecognized list payload, treating as empty");
        return FetchedPage::empty(shape);
    }

    let raw = envelope.into_items();
    let mut items = Vec::with_capacity(raw.len());
    let mut skipped = 0;
    for (index, record) in raw.into_iter().enumerate() {
        match serde_json::from_value::<E>(record) {
            Ok(item) => items.push(item),
            Err(e) => {
                skipped += 1;
                warn!(kind = %E::KIND, index, error = %e, "Skipping undecodable record");
            }
        }
    }

    debug!(kind = %E::KIND, ?shape, count = items.len(), skipped, "Normalized list");
    FetchedPage {
        items,
        server_total,
        shape,
        skipped,
    }
}

/// Decode a single-record payload, looking under `data.<singular>`, then
/// `data`, then the root.
pub fn normalize_record<E: Entity>(payload: &Value) -> Result<E> {
    let data = payload.get("data");
    let candidate = data
        .and_then(|d| d.get(E::KIND.singular_key()))
        .filter(|v| v.is_object())
        .or_else(|| data.filter(|v| v.is_object()))
        .unwrap_or(payload);

    if !candidate.is_object() {
        return Err(ClientError::MalformedResponse(format!(
            "Expected a {} record",
            E::KIND
        )));
    }

    serde_json::from_value(candidate.clone()).map_err(|e| {
        ClientError::MalformedResponse(format!("Failed to decode {}: {}", E::KIND, e))
    })
}
