//! Test helpers for deterministic testing with a mock bridge.

#![allow(dead_code)]

use boolberry_view::mock_bridge::{MockBridge, RecordedCall};
use boolberry_view::money::MoneyAmount;
use boolberry_view::types::{DaemonStatus, TransactionRecord};
use boolberry_view::{BridgeAdapter, ViewConfig};
use std::path::PathBuf;

pub const SAMPLE_ADDRESS: &str = "1Htb4dS5vfR53S5RhQuHyz7hHaiKJGU3qfdG2fvz1pCRVf3jTJ12mia8SJsvCo1RSRZbHRC1rwNvJjkURreY7xAVUDtaumz";

/// An adapter wired to a mock bridge. The bridge is shared, so calls can be inspected.
pub struct MockViewHelper {
    pub adapter: BridgeAdapter<MockBridge>,
    pub bridge: MockBridge,
}

impl MockViewHelper {
    /// Must be called inside a tokio runtime.
    pub fn from_recordings(recordings: Vec<RecordedCall>) -> Self {
        Self::with_config(recordings, ViewConfig::default())
    }

    pub fn with_config(recordings: Vec<RecordedCall>, config: ViewConfig) -> Self {
        let bridge = MockBridge::from_recordings(recordings).with_version("0.2.1.35");
        let mut adapter =
            BridgeAdapter::new(bridge.clone(), config).expect("adapter creation failed");
        adapter.start();
        Self { adapter, bridge }
    }

    pub fn push(&mut self, event: &str, payload: &str) {
        self.adapter
            .handle(event, payload)
            .unwrap_or_else(|e| panic!("{} failed: {}", event, e));
    }

    pub fn push_daemon(&mut self, status: &DaemonStatus) {
        let payload = serde_json::to_string(status).expect("daemon status encodes");
        self.push("updateDaemonState", &payload);
    }
}

pub fn test_vector_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/vectors")
        .join(filename)
}

pub fn read_vector(filename: &str) -> String {
    std::fs::read_to_string(test_vector_path(filename))
        .unwrap_or_else(|e| panic!("failed to read {}: {}", filename, e))
}

pub fn daemon_status(state: i64) -> DaemonStatus {
    DaemonStatus {
        daemon_network_state: state,
        text_state: "state".to_string(),
        height: 50,
        max_net_seen_height: 100,
        synchronization_start_height: 0,
        out_connections_count: 8,
        inc_connections_count: 0,
        difficulty: "1000".to_string(),
        hashrate: 42,
        last_build_available: "0.2.1".to_string(),
        last_build_displaymode: 0,
    }
}

pub fn transaction(hash: &str, is_income: bool) -> TransactionRecord {
    TransactionRecord {
        height: 1,
        tx_hash: hash.to_string(),
        amount: MoneyAmount(1_000_000_000_000),
        tx_blob_size: 300,
        is_income,
        timestamp: 1_402_878_665,
        td: None,
        recipient: SAMPLE_ADDRESS.to_string(),
        recipient_alias: String::new(),
    }
}
