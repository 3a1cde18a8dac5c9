//! # Decode Statistics
//!
//! Per-instance counters for monitoring decode health: how often a capture
//! forced resynchronization, how many opcodes missed the command registry,
//! and how many transactions completed cleanly. Each decoder instance owns
//! its own counters; nothing here is shared or locked.

use serde::Serialize;

/// Counters collected by a single decoder instance.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeStats {
    /// Input symbols consumed.
    pub symbols_consumed: u64,
    /// Transactions that reached a Stop.
    pub transactions_completed: u64,
    /// Protocol violations that forced a context reset.
    pub resyncs: u64,
    /// Command opcodes absent from the registry.
    pub unknown_commands: u64,
    /// Commands whose protocol type this layer does not assemble values for.
    pub unsupported_protocols: u64,
}

impl DecodeStats {
    pub fn new() -> Self {
        DecodeStats::default()
    }

    /// Serialize the counters as a JSON snapshot.
    pub fn to_json(&self) -> Result<String, crate::error::SmBusError> {
        serde_json::to_string(self).map_err(|e| crate::error::SmBusError::Other(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_snapshot() {
        let mut stats = DecodeStats::new();
        stats.symbols_consumed = 7;
        stats.resyncs = 1;
        let json = stats.to_json().unwrap();
        assert!(json.contains("\"symbols_consumed\":7"));
        assert!(json.contains("\"resyncs\":1"));
    }
}
