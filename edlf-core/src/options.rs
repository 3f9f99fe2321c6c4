//! Network configuration.

use serde::{Deserialize, Serialize};

/// Construction-time options for a [`Network`](crate::Network).
///
/// Deserializable with every field optional, so embedding applications can
/// keep it in their own configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkOptions {
    /// Reject new nodes once the first change has propagated.
    pub freeze_topology: bool,

    /// Initial allocation of the event queue. Not a bound.
    pub event_capacity: usize,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            freeze_topology: true,
            event_capacity: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let opts: NetworkOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, NetworkOptions::default());
        assert!(opts.freeze_topology);
    }

    #[test]
    fn fields_override_defaults() {
        let opts: NetworkOptions =
            serde_json::from_str(r#"{"freeze_topology": false, "event_capacity": 2}"#).unwrap();
        assert!(!opts.freeze_topology);
        assert_eq!(opts.event_capacity, 2);
    }
}
