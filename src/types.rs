//! Wire types exchanged with the native host.

use crate::money::MoneyAmount;
use serde::{Deserialize, Deserializer, Serialize};

/// Daemon snapshot pushed by `updateDaemonState`. Replaced wholesale on every push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonStatus {
    /// Raw network state; see [`NetworkState::from_raw`].
    pub daemon_network_state: i64,
    #[serde(default)]
    pub text_state: String,
    pub height: u64,
    #[serde(default)]
    pub max_net_seen_height: u64,
    #[serde(default)]
    pub synchronization_start_height: u64,
    #[serde(default)]
    pub out_connections_count: u64,
    #[serde(default)]
    pub inc_connections_count: u64,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub difficulty: String,
    #[serde(default)]
    pub hashrate: u64,
    #[serde(default)]
    pub last_build_available: String,
    /// Raw display mode; see [`VersionDisplayMode::from_raw`].
    #[serde(default)]
    pub last_build_displaymode: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkState {
    Connecting,
    Synchronizing,
    Online,
    Deinitializing,
}

impl NetworkState {
    pub fn from_raw(value: i64) -> Option<Self> {
        match value {
            0 => Some(NetworkState::Connecting),
            1 => Some(NetworkState::Synchronizing),
            2 => Some(NetworkState::Online),
            3 => Some(NetworkState::Deinitializing),
            _ => None,
        }
    }
}

/// Urgency of the "new client version" notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VersionDisplayMode {
    Hidden = 0,
    NewAvailable = 1,
    Calm = 2,
    Urgent = 3,
    Critical = 4,
}

impl VersionDisplayMode {
    pub fn from_raw(value: i64) -> Option<Self> {
        match value {
            0 => Some(VersionDisplayMode::Hidden),
            1 => Some(VersionDisplayMode::NewAvailable),
            2 => Some(VersionDisplayMode::Calm),
            3 => Some(VersionDisplayMode::Urgent),
            4 => Some(VersionDisplayMode::Critical),
            _ => None,
        }
    }
}

/// Payload of `updateWalletStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletStatus {
    pub wallet_state: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletSyncState {
    Syncing,
    Ready,
}

impl WalletSyncState {
    pub fn from_raw(value: i64) -> Option<Self> {
        match value {
            1 => Some(WalletSyncState::Syncing),
            2 => Some(WalletSyncState::Ready),
            _ => None,
        }
    }
}

/// Payload of `updateWalletInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub balance: MoneyAmount,
    pub unlocked_balance: MoneyAmount,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub path: String,
}

/// Per-output breakdown of a transaction. Either list may be missing on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rcv: Option<Vec<MoneyAmount>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spn: Option<Vec<MoneyAmount>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub height: u64,
    pub tx_hash: String,
    pub amount: MoneyAmount,
    #[serde(default)]
    pub tx_blob_size: u64,
    pub is_income: bool,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub td: Option<TransferDetails>,
    #[serde(default)]
    pub recipient: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub recipient_alias: String,
}

/// Payload of `moneyTransfer`: one new transaction plus the wallet totals after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub ti: TransactionRecord,
    pub balance: MoneyAmount,
    pub unlocked_balance: MoneyAmount,
}

/// Payload of `setRecentTransfers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentTransfers {
    #[serde(default)]
    pub history: Vec<TransactionRecord>,
}

/// Payload of `switchView`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchView {
    pub view: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub alias: String,
}

/// Result of `request_aliases`. A missing list means the host could not load it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasList {
    #[serde(default)]
    pub aliases: Option<Vec<AliasEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub address: String,
    pub amount: String,
}

/// Outbound `transfer` payload. Amount and fee are forwarded as the user typed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub destinations: Vec<Destination>,
    pub mixin_count: i64,
    pub payment_id: String,
    pub fee: String,
}

/// Inbound result of `transfer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResult {
    pub success: bool,
    #[serde(default)]
    pub tx_hash: String,
    #[serde(default)]
    pub tx_blob_size: u64,
}

fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daemon_status_difficulty_accepts_number_or_string() {
        let numeric: DaemonStatus = serde_json::from_str(
            r#"{"daemon_network_state": 2, "height": 10, "difficulty": 12345}"#,
        )
        .unwrap();
        assert_eq!(numeric.difficulty, "12345");

        let text: DaemonStatus = serde_json::from_str(
            r#"{"daemon_network_state": 2, "height": 10, "difficulty": "987654321987654321"}"#,
        )
        .unwrap();
        assert_eq!(text.difficulty, "987654321987654321");

        let bad = serde_json::from_str::<DaemonStatus>(
            r#"{"daemon_network_state": 2, "height": 10, "difficulty": [1]}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_transaction_record_optional_fields() {
        let tx: TransactionRecord = serde_json::from_str(
            r#"{"tx_hash": "aa", "amount": 5, "is_income": true, "timestamp": 0, "recipient_alias": null}"#,
        )
        .unwrap();
        assert_eq!(tx.td, None);
        assert_eq!(tx.recipient_alias, "");
        assert_eq!(tx.amount, MoneyAmount(5));
    }

    #[test]
    fn test_raw_enum_mapping() {
        assert_eq!(NetworkState::from_raw(3), Some(NetworkState::Deinitializing));
        assert_eq!(NetworkState::from_raw(4), None);
        assert_eq!(NetworkState::from_raw(-1), None);
        assert_eq!(WalletSyncState::from_raw(0), None);
        assert_eq!(VersionDisplayMode::from_raw(4), Some(VersionDisplayMode::Critical));
        assert!(VersionDisplayMode::Calm < VersionDisplayMode::Urgent);
    }

    #[test]
    fn test_negative_raw_states_decode() {
        let status: DaemonStatus =
            serde_json::from_str(r#"{"daemon_network_state": -1, "height": 5}"#).unwrap();
        assert_eq!(status.daemon_network_state, -1);
        let wallet: WalletStatus = serde_json::from_str(r#"{"wallet_state": -1}"#).unwrap();
        assert_eq!(wallet.wallet_state, -1);
        let view: SwitchView = serde_json::from_str(r#"{"view": -1}"#).unwrap();
        assert_eq!(view.view, -1);
    }

    #[test]
    fn test_alias_list_missing_vs_empty() {
        let missing: AliasList = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.aliases, None);
        let empty: AliasList = serde_json::from_str(r#"{"aliases": []}"#).unwrap();
        assert_eq!(empty.aliases, Some(vec![]));
    }
}
