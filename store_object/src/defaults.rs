//! Ready-made default providers

use type_mapping::Value;

/// Random 32-character hex identifier, suitable for string primary keys
pub fn uuid_string() -> Value {
    Value::Text(uuid::Uuid::new_v4().simple().to_string())
}

/// Current time as fractional seconds since the Unix epoch
pub fn unix_timestamp() -> Value {
    let now = chrono::Utc::now();
    Value::Float(now.timestamp_micros() as f64 / 1_000_000.0)
}
