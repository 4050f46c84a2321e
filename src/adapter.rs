//! Routes host pushes through the reducers and issues outbound bridge calls.

use crate::alias::{parse_destination, AliasCache};
use crate::bridge::{decode_event, HostBridge, HostEvent};
use crate::config::ViewConfig;
use crate::daemon::DaemonStateReducer;
use crate::history::TransferHistoryMerger;
use crate::render::TransactionRenderer;
use crate::types::TransferResult;
use crate::view::{TransferForm, ViewState};
use crate::wallet::{self, WalletUpdate};
use crate::{ViewError, ViewResult};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

fn lock_view(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct BridgeAdapter<B: HostBridge> {
    bridge: B,
    config: ViewConfig,
    state: Arc<Mutex<ViewState>>,
    aliases: AliasCache,
    daemon: DaemonStateReducer,
    history: TransferHistoryMerger,
    runtime: Handle,
    dismiss_handle: Option<JoinHandle<()>>,
}

impl<B: HostBridge> BridgeAdapter<B> {
    /// Creates an adapter on the current tokio runtime.
    pub fn new(bridge: B, config: ViewConfig) -> ViewResult<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| ViewError::Config(format!("no tokio runtime available: {}", e)))?;
        Ok(Self::with_runtime(bridge, config, runtime))
    }

    pub fn with_runtime(bridge: B, config: ViewConfig, runtime: Handle) -> Self {
        Self {
            aliases: AliasCache::new(config.alias_min_input),
            daemon: DaemonStateReducer::new(config.healthy_connections),
            history: TransferHistoryMerger::new(TransactionRenderer::new(
                config.address_preview_chars,
            )),
            bridge,
            config,
            state: Arc::new(Mutex::new(ViewState::new())),
            runtime,
            dismiss_handle: None,
        }
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn aliases(&self) -> &AliasCache {
        &self.aliases
    }

    /// Autocomplete tags for the transfer address field.
    pub fn alias_suggestions(&self, input: &str) -> Vec<String> {
        self.aliases.suggestions(input)
    }

    /// Shared handle to the display model.
    pub fn state(&self) -> Arc<Mutex<ViewState>> {
        Arc::clone(&self.state)
    }

    pub fn snapshot(&self) -> ViewState {
        lock_view(&self.state).clone()
    }

    pub fn state_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&*lock_view(&self.state))
    }

    /// Resets the view to the boot layout and fetches the client version.
    pub fn start(&mut self) {
        self.cancel_dismiss();
        let version = self.bridge.get_version();
        tracing::info!("starting view, client version {}", version);

        let mut state = lock_view(&self.state);
        *state = ViewState::new();
        state.client_version = version;
    }

    // ========================================================================
    // INBOUND
    // ========================================================================

    /// Decodes and applies one host push.
    pub fn handle(&mut self, event: &str, payload: &str) -> ViewResult<()> {
        let decoded = decode_event(event, payload).map_err(|e| {
            tracing::error!("{}", e);
            e
        })?;
        self.dispatch(decoded)
    }

    pub fn dispatch(&mut self, event: HostEvent) -> ViewResult<()> {
        tracing::debug!("dispatching {}", event.name());
        match event {
            HostEvent::UpdateDaemonState(status) => {
                let update = self.daemon.reduce(&status);
                if update.refresh_aliases {
                    self.aliases.refresh(&self.bridge);
                }
                lock_view(&self.state).apply_daemon(update);
            }
            HostEvent::UpdateWalletStatus(status) => {
                let update = self.report(wallet::reduce_wallet_status(&status))?;
                self.apply_wallet(update);
            }
            HostEvent::UpdateWalletInfo(info) => {
                self.apply_wallet(wallet::reduce_wallet_info(&info));
            }
            HostEvent::MoneyTransfer(transfer) => {
                let update = self.history.apply_live_transfer(&transfer);
                lock_view(&self.state).apply_history(update);
            }
            HostEvent::ShowWallet => self.apply_wallet(wallet::show()),
            HostEvent::HideWallet => self.apply_wallet(wallet::hide()),
            HostEvent::SwitchView(request) => {
                let update = self.report(wallet::switch_view(&request))?;
                self.apply_wallet(update);
            }
            HostEvent::SetRecentTransfers(batch) => {
                let update = self.history.load_history(&batch.history);
                lock_view(&self.state).apply_history(update);
            }
        }
        Ok(())
    }

    fn apply_wallet(&self, update: WalletUpdate) {
        lock_view(&self.state).apply_wallet(update);
    }

    /// Shows unknown-state errors to the user before handing them back.
    fn report<T>(&self, result: ViewResult<T>) -> ViewResult<T> {
        result.map_err(|e| {
            tracing::warn!("{}", e);
            if matches!(e, ViewError::UnknownState { .. }) {
                self.bridge.message_box(&e.to_string());
            }
            e
        })
    }

    // ========================================================================
    // OUTBOUND
    // ========================================================================

    /// Sends a transfer built from `form`.
    ///
    /// On success the form is cleared and a notice is shown until the dismiss timer fires.
    /// Validation failures never reach the host.
    pub fn transfer(&mut self, form: TransferForm) -> ViewResult<TransferResult> {
        lock_view(&self.state).form = form.clone();

        let request = form
            .to_request(self.config.max_mixin_count)
            .and_then(|request| parse_destination(&form.address).map(|_| request));
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("transfer rejected: {}", e);
                self.bridge.message_box(&e.to_string());
                return Err(e);
            }
        };

        let body = serde_json::to_string(&request).map_err(|e| ViewError::BridgeCall {
            call: "transfer",
            reason: format!("failed to encode request: {}", e),
        })?;
        let reply = self.bridge.transfer(&body);
        let result: TransferResult = serde_json::from_str(&reply).map_err(|e| {
            tracing::error!("undecodable transfer reply: {}", e);
            ViewError::BridgeCall {
                call: "transfer",
                reason: format!("undecodable reply: {}", e),
            }
        })?;
        if !result.success {
            tracing::error!("transfer failed on the host side");
            return Err(ViewError::BridgeCall {
                call: "transfer",
                reason: "host reported failure".to_string(),
            });
        }

        let text = format!(
            "Money successfully sent, transaction {}, {} bytes",
            result.tx_hash, result.tx_blob_size
        );
        let generation = {
            let mut state = lock_view(&self.state);
            state.form.clear();
            state.show_notice(text)
        };
        self.schedule_dismiss(generation);
        Ok(result)
    }

    pub fn open_wallet(&self) -> ViewResult<()> {
        self.pass_through("open_wallet", self.bridge.open_wallet())
    }

    pub fn generate_wallet(&self) -> ViewResult<()> {
        self.pass_through("generate_wallet", self.bridge.generate_wallet())
    }

    pub fn close_wallet(&self) -> ViewResult<()> {
        self.pass_through("close_wallet", self.bridge.close_wallet())
    }

    fn pass_through(&self, call: &'static str, ok: bool) -> ViewResult<()> {
        if ok {
            Ok(())
        } else {
            tracing::error!("{} returned false", call);
            Err(ViewError::BridgeCall {
                call,
                reason: "host returned false".to_string(),
            })
        }
    }

    // ========================================================================
    // NOTICE TIMER
    // ========================================================================

    fn schedule_dismiss(&mut self, generation: u64) {
        self.cancel_dismiss();

        let state = Arc::clone(&self.state);
        let timeout = self.config.notice_timeout;
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            if lock_view(&state).dismiss_notice(generation) {
                tracing::debug!("transfer notice {} dismissed", generation);
            }
        });

        self.dismiss_handle = Some(handle);
    }

    fn cancel_dismiss(&mut self) {
        if let Some(handle) = self.dismiss_handle.take() {
            handle.abort();
        }
    }

    /// True while a dismissal is scheduled and has not run yet.
    pub fn dismiss_pending(&self) -> bool {
        self.dismiss_handle
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }
}

impl<B: HostBridge> Drop for BridgeAdapter<B> {
    fn drop(&mut self) {
        self.cancel_dismiss();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_bridge::{MockBridge, RecordedCall, TRANSFER};

    #[tokio::test]
    async fn test_unknown_wallet_state_leaves_view_untouched() {
        let mock = MockBridge::from_recordings(vec![]);
        let mut adapter = BridgeAdapter::new(mock.clone(), ViewConfig::default()).unwrap();
        adapter.handle("updateWalletStatus", r#"{"wallet_state": 2}"#).unwrap();
        let before = adapter.snapshot();

        let err = adapter
            .handle("updateWalletStatus", r#"{"wallet_state": 7}"#)
            .unwrap_err();
        assert!(matches!(err, ViewError::UnknownState { kind: "wallet", value: 7 }));
        assert_eq!(adapter.snapshot(), before);
        assert_eq!(mock.messages(), vec!["Unknown wallet state: 7"]);
    }

    #[tokio::test]
    async fn test_failed_transfer_keeps_form() {
        let mock = MockBridge::from_recordings(vec![RecordedCall::new(
            TRANSFER,
            r#"{"success": false}"#,
        )]);
        let mut adapter = BridgeAdapter::new(mock.clone(), ViewConfig::default()).unwrap();
        let form = TransferForm {
            address: "@bob".to_string(),
            amount: "1.000000000000".to_string(),
            mixin_count: "2".to_string(),
            ..Default::default()
        };

        let err = adapter.transfer(form.clone()).unwrap_err();
        assert!(matches!(err, ViewError::BridgeCall { call: "transfer", .. }));
        let state = adapter.snapshot();
        assert_eq!(state.form, form);
        assert!(state.notice.is_none());
        assert!(!adapter.dismiss_pending());
    }
}
