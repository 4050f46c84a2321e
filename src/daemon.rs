//! Daemon status reducer.

use crate::types::{DaemonStatus, NetworkState, VersionDisplayMode};
use crate::view::{Control, Tab, VersionStyle, VersionVisibility};
use serde::Serialize;

pub const UNKNOWN_STATE_TEXT: &str = "Unknown state";

/// Fields refreshed for every recognised network state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaemonSummary {
    pub out_connections_text: String,
    pub out_connections_healthy: bool,
    pub height_text: String,
    pub difficulty_text: String,
    pub hashrate_text: String,
    pub version_text: String,
    /// `None` leaves the notice's visibility and style as they were.
    pub version_visibility: Option<VersionVisibility>,
}

/// Change to the synchronization bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SyncChange {
    Hide,
    ShowIndeterminate,
    /// Updates the value only; a hidden bar stays hidden.
    SetProgress(f64),
}

/// Changes produced by one daemon push. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DaemonUpdate {
    pub state: Option<NetworkState>,
    pub status_text: String,
    pub status_healthy: Option<bool>,
    pub sync_change: Option<SyncChange>,
    pub blocks_behind_text: Option<String>,
    pub controls: Vec<(Control, bool)>,
    pub wallet_tab_enabled: Option<bool>,
    pub close_wallet: bool,
    pub select_tab: Option<Tab>,
    pub refresh_aliases: bool,
    pub summary: Option<DaemonSummary>,
}

/// Synchronization progress in percent, clamped to `0..=100`.
///
/// Returns 0 without dividing when the target height does not exceed the start height.
pub fn sync_percent(height: u64, start_height: u64, max_seen_height: u64) -> f64 {
    if max_seen_height <= start_height {
        return 0.0;
    }
    let done = height as f64 - start_height as f64;
    let total = (max_seen_height - start_height) as f64;
    let raw = done * 100.0 / total;
    if !(0.0..=100.0).contains(&raw) {
        tracing::debug!(
            "sync progress {} out of range (height {}, start {}, max {})",
            raw,
            height,
            start_height,
            max_seen_height
        );
    }
    raw.clamp(0.0, 100.0)
}

/// Visibility and style for a raw version display mode; `None` for unknown modes.
pub fn update_last_ver_view(mode: i64) -> Option<VersionVisibility> {
    let mode = VersionDisplayMode::from_raw(mode)?;
    Some(match mode {
        VersionDisplayMode::Hidden => VersionVisibility::Hidden,
        VersionDisplayMode::NewAvailable => VersionVisibility::Shown(VersionStyle::New),
        VersionDisplayMode::Calm => VersionVisibility::Shown(VersionStyle::Calm),
        VersionDisplayMode::Urgent => VersionVisibility::Shown(VersionStyle::Urgent),
        VersionDisplayMode::Critical => VersionVisibility::Shown(VersionStyle::Critical),
    })
}

pub fn version_text(mode: i64, available: &str) -> String {
    if mode < VersionDisplayMode::Urgent as i64 {
        format!("(available version: {})", available)
    } else {
        format!("(Critical update: {})", available)
    }
}

pub struct DaemonStateReducer {
    healthy_connections: u64,
}

impl Default for DaemonStateReducer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_HEALTHY_CONNECTIONS)
    }
}

impl DaemonStateReducer {
    pub fn new(healthy_connections: u64) -> Self {
        Self {
            healthy_connections,
        }
    }

    pub fn reduce(&self, status: &DaemonStatus) -> DaemonUpdate {
        let state = match NetworkState::from_raw(status.daemon_network_state) {
            Some(state) => state,
            None => {
                tracing::warn!(
                    "unknown daemon network state {}",
                    status.daemon_network_state
                );
                return DaemonUpdate {
                    status_text: UNKNOWN_STATE_TEXT.to_string(),
                    ..Default::default()
                };
            }
        };

        let mut update = DaemonUpdate {
            state: Some(state),
            ..Default::default()
        };

        match state {
            NetworkState::Connecting => {}
            NetworkState::Synchronizing => {
                update.sync_change = Some(SyncChange::SetProgress(sync_percent(
                    status.height,
                    status.synchronization_start_height,
                    status.max_net_seen_height,
                )));
                if status.max_net_seen_height != 0 {
                    let behind = status.max_net_seen_height.saturating_sub(status.height);
                    update.blocks_behind_text = Some(format!("{} blocks behind", behind));
                }
                update.controls = vec![
                    (Control::OpenWallet, false),
                    (Control::GenerateWallet, false),
                    (Control::Mining, false),
                ];
            }
            NetworkState::Online => {
                update.sync_change = Some(SyncChange::Hide);
                update.status_healthy = Some(true);
                update.controls = vec![
                    (Control::OpenWallet, true),
                    (Control::GenerateWallet, true),
                ];
                update.wallet_tab_enabled = Some(true);
                update.refresh_aliases = true;
            }
            NetworkState::Deinitializing => {
                update.sync_change = Some(SyncChange::ShowIndeterminate);
                update.blocks_behind_text = Some(String::new());
                update.status_healthy = Some(false);
                update.controls = vec![
                    (Control::OpenWallet, false),
                    (Control::GenerateWallet, false),
                ];
                update.close_wallet = true;
                update.select_tab = Some(Tab::Dashboard);
                update.wallet_tab_enabled = Some(false);
            }
        }

        update.status_text = status.text_state.clone();
        update.summary = Some(self.summary(status));
        update
    }

    fn summary(&self, status: &DaemonStatus) -> DaemonSummary {
        DaemonSummary {
            out_connections_text: status.out_connections_count.to_string(),
            out_connections_healthy: status.out_connections_count >= self.healthy_connections,
            height_text: status.height.to_string(),
            difficulty_text: status.difficulty.clone(),
            hashrate_text: status.hashrate.to_string(),
            version_text: version_text(
                status.last_build_displaymode,
                &status.last_build_available,
            ),
            version_visibility: update_last_ver_view(status.last_build_displaymode),
        }
    }
}
