//! The display model the toolkit layer draws from.
//!
//! Reducers never touch this directly; they return deltas and `ViewState` applies each one
//! in a single call, so an observer never sees half of an update.

use crate::daemon::{DaemonUpdate, SyncChange};
use crate::history::{HistoryUpdate, LiveTransfer, TransferHistory};
use crate::money::{format_money, MoneyAmount};
use crate::render::RenderedEntry;
use crate::types::{Destination, NetworkState, TransferRequest, WalletSyncState};
use crate::wallet::WalletUpdate;
use crate::ViewError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Control {
    OpenWallet,
    GenerateWallet,
    Mining,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tab {
    Dashboard,
    Wallet,
}

/// Synchronization bar. Visibility and value change independently; `progress: None` draws
/// the bar as indeterminate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SyncIndicator {
    pub visible: bool,
    pub progress: Option<f64>,
}

impl Default for SyncIndicator {
    fn default() -> Self {
        Self {
            visible: true,
            progress: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VersionStyle {
    New,
    Calm,
    Urgent,
    Critical,
}

impl VersionStyle {
    pub fn class_name(self) -> &'static str {
        match self {
            VersionStyle::New => "daemon_view_param_value_last_ver_info_new",
            VersionStyle::Calm => "daemon_view_param_value_last_ver_info_calm",
            VersionStyle::Urgent => "daemon_view_param_value_last_ver_info_urgent",
            VersionStyle::Critical => "daemon_view_param_value_last_ver_info_critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VersionVisibility {
    Hidden,
    Shown(VersionStyle),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionNotice {
    pub text: String,
    pub visibility: VersionVisibility,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaemonPanel {
    pub state: Option<NetworkState>,
    pub status_text: String,
    pub status_healthy: bool,
    pub sync_indicator: SyncIndicator,
    pub blocks_behind_text: String,
    pub out_connections_text: String,
    pub out_connections_healthy: bool,
    pub height_text: String,
    pub difficulty_text: String,
    pub hashrate_text: String,
    pub version_notice: VersionNotice,
}

impl Default for DaemonPanel {
    fn default() -> Self {
        Self {
            state: None,
            status_text: String::new(),
            status_healthy: false,
            sync_indicator: SyncIndicator::default(),
            blocks_behind_text: String::new(),
            out_connections_text: String::new(),
            out_connections_healthy: false,
            height_text: String::new(),
            difficulty_text: String::new(),
            hashrate_text: String::new(),
            version_notice: VersionNotice {
                text: String::new(),
                visibility: VersionVisibility::Hidden,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletPanel {
    /// Workspace shown; otherwise the welcome placeholder is.
    pub workspace_visible: bool,
    pub sync_state: WalletSyncState,
    pub syncing_panel_visible: bool,
    pub synchronized_panel_visible: bool,
    pub balance: MoneyAmount,
    pub unlocked_balance: MoneyAmount,
    pub balance_text: String,
    pub unlocked_balance_text: String,
    pub address: String,
    pub path: String,
}

impl Default for WalletPanel {
    fn default() -> Self {
        Self {
            workspace_visible: false,
            sync_state: WalletSyncState::Syncing,
            syncing_panel_visible: true,
            synchronized_panel_visible: false,
            balance: MoneyAmount::default(),
            unlocked_balance: MoneyAmount::default(),
            balance_text: format_money(0),
            unlocked_balance_text: format_money(0),
            address: String::new(),
            path: String::new(),
        }
    }
}

impl WalletPanel {
    fn set_totals(&mut self, balance: MoneyAmount, unlocked: MoneyAmount) {
        self.balance = balance;
        self.unlocked_balance = unlocked;
        self.balance_text = balance.to_string();
        self.unlocked_balance_text = unlocked.to_string();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub open_wallet: bool,
    pub generate_wallet: bool,
    pub mining: bool,
    pub transfer: bool,
}

impl Controls {
    pub fn set(&mut self, control: Control, enabled: bool) {
        match control {
            Control::OpenWallet => self.open_wallet = enabled,
            Control::GenerateWallet => self.generate_wallet = enabled,
            Control::Mining => self.mining = enabled,
            Control::Transfer => self.transfer = enabled,
        }
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        match control {
            Control::OpenWallet => self.open_wallet,
            Control::GenerateWallet => self.generate_wallet,
            Control::Mining => self.mining,
            Control::Transfer => self.transfer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub selected: Tab,
    pub wallet_tab_enabled: bool,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            selected: Tab::Dashboard,
            wallet_tab_enabled: false,
        }
    }
}

/// Transfer input fields as last synced from the toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferForm {
    pub address: String,
    pub amount: String,
    pub payment_id: String,
    pub mixin_count: String,
    pub fee: String,
}

impl Default for TransferForm {
    fn default() -> Self {
        Self {
            address: String::new(),
            amount: String::new(),
            payment_id: String::new(),
            mixin_count: "0".to_string(),
            fee: String::new(),
        }
    }
}

impl TransferForm {
    /// Empties the inputs. The fee is kept, matching the host form.
    pub fn clear(&mut self) {
        let fee = std::mem::take(&mut self.fee);
        *self = TransferForm {
            fee,
            ..Default::default()
        };
    }

    /// Builds the outbound payload, checking the mixin count against `0..=max_mixin`.
    ///
    /// The amount and fee are forwarded as typed; the host parses them.
    pub fn to_request(&self, max_mixin: i64) -> Result<TransferRequest, ViewError> {
        let mixin_count = self
            .mixin_count
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|m| (0..=max_mixin).contains(m))
            .ok_or_else(|| ViewError::Validation(mixin_message(max_mixin)))?;

        Ok(TransferRequest {
            destinations: vec![Destination {
                address: self.address.clone(),
                amount: self.amount.clone(),
            }],
            mixin_count,
            payment_id: self.payment_id.clone(),
            fee: self.fee.clone(),
        })
    }
}

pub fn mixin_message(max_mixin: i64) -> String {
    format!(
        "Wrong Mixin parameter value, please set values in range 0-{}",
        max_mixin
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferNotice {
    pub text: String,
    /// Bumped on every new notice so a stale timer cannot dismiss a newer one.
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ViewState {
    pub daemon: DaemonPanel,
    pub wallet: WalletPanel,
    pub controls: Controls,
    pub navigation: Navigation,
    pub transfers: TransferHistory,
    pub form: TransferForm,
    pub notice: Option<TransferNotice>,
    /// Client version reported by the host at start-up.
    pub client_version: String,
}

impl ViewState {
    /// Boot layout: wallet hidden and syncing, wallet tab and wallet actions disabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_daemon(&mut self, update: DaemonUpdate) {
        tracing::debug!("daemon update: state {:?}", update.state);
        let panel = &mut self.daemon;
        if update.state.is_some() {
            panel.state = update.state;
        }
        match update.sync_change {
            Some(SyncChange::Hide) => panel.sync_indicator.visible = false,
            Some(SyncChange::ShowIndeterminate) => {
                panel.sync_indicator = SyncIndicator {
                    visible: true,
                    progress: None,
                };
            }
            Some(SyncChange::SetProgress(percent)) => {
                panel.sync_indicator.progress = Some(percent);
            }
            None => {}
        }
        if let Some(text) = update.blocks_behind_text {
            panel.blocks_behind_text = text;
        }
        if let Some(healthy) = update.status_healthy {
            panel.status_healthy = healthy;
        }
        for (control, enabled) in update.controls {
            self.controls.set(control, enabled);
        }
        if update.close_wallet {
            self.wallet.workspace_visible = false;
        }
        if let Some(tab) = update.select_tab {
            self.navigation.selected = tab;
        }
        if let Some(enabled) = update.wallet_tab_enabled {
            self.navigation.wallet_tab_enabled = enabled;
        }

        let panel = &mut self.daemon;
        panel.status_text = update.status_text;
        if let Some(summary) = update.summary {
            panel.out_connections_text = summary.out_connections_text;
            panel.out_connections_healthy = summary.out_connections_healthy;
            panel.height_text = summary.height_text;
            panel.difficulty_text = summary.difficulty_text;
            panel.hashrate_text = summary.hashrate_text;
            panel.version_notice.text = summary.version_text;
            if let Some(visibility) = summary.version_visibility {
                panel.version_notice.visibility = visibility;
            }
        }
    }

    pub fn apply_wallet(&mut self, update: WalletUpdate) {
        tracing::debug!("wallet update: {:?}", update);
        match update {
            WalletUpdate::Status(state) => {
                let ready = state == WalletSyncState::Ready;
                self.wallet.sync_state = state;
                self.controls.set(Control::Transfer, ready);
                self.wallet.syncing_panel_visible = !ready;
                self.wallet.synchronized_panel_visible = ready;
            }
            WalletUpdate::Info(info) => {
                self.wallet.set_totals(info.balance, info.unlocked_balance);
                self.wallet.address = info.address;
                self.wallet.path = info.path;
            }
            WalletUpdate::Show => {
                self.wallet.workspace_visible = true;
                self.transfers.clear();
            }
            WalletUpdate::Hide => {
                self.wallet.workspace_visible = false;
            }
            WalletUpdate::SwitchView(tab) => {
                self.navigation.selected = tab;
            }
        }
    }

    pub fn apply_history(&mut self, update: HistoryUpdate) {
        match update {
            HistoryUpdate::Append(rows) => self.append_history(rows),
            HistoryUpdate::Live(live) => self.apply_live_transfer(live),
        }
    }

    pub fn append_history(&mut self, rows: Vec<RenderedEntry>) {
        tracing::debug!("appending {} history entries", rows.len());
        self.transfers.append(rows);
    }

    /// Prepends the row and replaces the totals together.
    pub fn apply_live_transfer(&mut self, live: LiveTransfer) {
        tracing::debug!("live transfer {}", live.entry.tx_hash);
        self.transfers.prepend(live.entry);
        self.wallet.set_totals(live.balance, live.unlocked_balance);
    }

    /// Shows a transfer notice and returns its generation.
    pub fn show_notice(&mut self, text: String) -> u64 {
        let generation = self.notice.as_ref().map_or(1, |n| n.generation + 1);
        self.notice = Some(TransferNotice { text, generation });
        generation
    }

    /// Hides the notice only if it is still the one identified by `generation`.
    pub fn dismiss_notice(&mut self, generation: u64) -> bool {
        match &self.notice {
            Some(notice) if notice.generation == generation => {
                self.notice = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_layout() {
        let view = ViewState::new();
        assert!(!view.wallet.workspace_visible);
        assert!(!view.navigation.wallet_tab_enabled);
        assert_eq!(view.navigation.selected, Tab::Dashboard);
        assert_eq!(view.controls, Controls::default());
        assert!(view.daemon.sync_indicator.visible);
        assert_eq!(view.daemon.sync_indicator.progress, None);
        assert_eq!(view.wallet.balance_text, "0.000000000000");
    }

    #[test]
    fn test_notice_generations() {
        let mut view = ViewState::new();
        let first = view.show_notice("one".to_string());
        let second = view.show_notice("two".to_string());
        assert!(second > first);
        assert!(!view.dismiss_notice(first));
        assert!(view.notice.is_some());
        assert!(view.dismiss_notice(second));
        assert!(view.notice.is_none());
    }

    #[test]
    fn test_form_clear_resets_mixin() {
        let mut form = TransferForm {
            address: "@bob".to_string(),
            amount: "1.5".to_string(),
            payment_id: "ff".to_string(),
            mixin_count: "3".to_string(),
            fee: "0.01".to_string(),
        };
        form.clear();
        assert_eq!(form.address, "");
        assert_eq!(form.mixin_count, "0");
        assert_eq!(form.fee, "0.01");
    }

    #[test]
    fn test_form_to_request_bounds() {
        let mut form = TransferForm {
            address: "@bob".to_string(),
            amount: "1.5".to_string(),
            ..Default::default()
        };
        for bad in ["11", "-1", "abc", ""] {
            form.mixin_count = bad.to_string();
            let err = form.to_request(10).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Wrong Mixin parameter value, please set values in range 0-10"
            );
        }
        form.mixin_count = "10".to_string();
        let request = form.to_request(10).unwrap();
        assert_eq!(request.mixin_count, 10);
        assert_eq!(request.destinations[0].amount, "1.5");
    }
}
