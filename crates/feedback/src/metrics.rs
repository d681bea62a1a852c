//! JSON metric lines emitted on the `metric` tracing target.
//!
//! Each metric is a single JSON object carrying `metric_type`, `metric_name`,
//! the measured value and any extra fields supplied by the caller, so a log
//! shipper can pick them out of the regular output by target.

use serde_json::{json, Map, Value};

pub const METRIC_TARGET: &str = "metric";

pub fn trace_count(metric_name: &str, count: u64, fields: Value) {
  send(build("count", metric_name, "count", json!(count), fields));
}

pub fn trace_duration(metric_name: &str, duration_in_ms: u128, fields: Value) {
  send(build("duration", metric_name, "duration", json!(duration_in_ms as u64), fields));
}

fn build(metric_type: &str, metric_name: &str, key: &str, value: Value, fields: Value) -> Value {
  let mut message = Map::new();
  message.insert("metric_type".to_string(), json!(metric_type));
  message.insert("metric_name".to_string(), json!(metric_name));
  message.insert(key.to_string(), value);

  // Non-object extras have no field names to merge under.
  if let Value::Object(extra) = fields {
    message.extend(extra);
  }

  Value::Object(message)
}

fn send(message: Value) {
  match serde_json::to_string(&message) {
    Ok(line) => tracing::info!(target: METRIC_TARGET, "{line}"),
    Err(e) => tracing::error!("failed to encode metric: {e}"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_build_merges_extra_fields() {
    let message = build("count", "feedback_submit_failed", "count", json!(1), json!({"status": 500}));
    assert_eq!(
      message,
      json!({
        "metric_type": "count",
        "metric_name": "feedback_submit_failed",
        "count": 1,
        "status": 500,
      })
    );
  }

  #[test]
  fn test_build_ignores_non_object_fields() {
    let message = build("duration", "feedback_submit", "duration", json!(40), Value::Null);
    assert_eq!(message.as_object().map(|m| m.len()), Some(3));
  }

  #[test]
  fn test_trace_functions_do_not_panic_without_subscriber() {
    trace_count("c", 1, json!({}));
    trace_duration("d", 12, json!({"outcome": "ok"}));
  }
}
