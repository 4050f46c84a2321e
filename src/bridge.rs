//! Host bridge boundary: the outbound capability set and the inbound event decoder.

use crate::types::{
    DaemonStatus, RecentTransfers, SwitchView, TransferEvent, WalletInfo, WalletStatus,
};
use crate::ViewError;
use serde::de::DeserializeOwned;

pub const UPDATE_DAEMON_STATE: &str = "updateDaemonState";
pub const UPDATE_WALLET_STATUS: &str = "updateWalletStatus";
pub const UPDATE_WALLET_INFO: &str = "updateWalletInfo";
pub const MONEY_TRANSFER: &str = "moneyTransfer";
pub const SHOW_WALLET: &str = "showWallet";
pub const HIDE_WALLET: &str = "hideWallet";
pub const SWITCH_VIEW: &str = "switchView";
pub const SET_RECENT_TRANSFERS: &str = "setRecentTransfers";

/// Calls the core makes into the native host. All of them are synchronous.
///
/// `transfer` and `request_aliases` exchange JSON text. Replies are decoded by the caller.
pub trait HostBridge {
    fn open_wallet(&self) -> bool;
    fn generate_wallet(&self) -> bool;
    fn close_wallet(&self) -> bool;
    fn transfer(&self, request_json: &str) -> String;
    fn request_aliases(&self) -> String;
    fn message_box(&self, text: &str);
    fn get_version(&self) -> String;
}

impl<B: HostBridge + ?Sized> HostBridge for &B {
    fn open_wallet(&self) -> bool {
        (**self).open_wallet()
    }
    fn generate_wallet(&self) -> bool {
        (**self).generate_wallet()
    }
    fn close_wallet(&self) -> bool {
        (**self).close_wallet()
    }
    fn transfer(&self, request_json: &str) -> String {
        (**self).transfer(request_json)
    }
    fn request_aliases(&self) -> String {
        (**self).request_aliases()
    }
    fn message_box(&self, text: &str) {
        (**self).message_box(text)
    }
    fn get_version(&self) -> String {
        (**self).get_version()
    }
}

/// A decoded host push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    UpdateDaemonState(DaemonStatus),
    UpdateWalletStatus(WalletStatus),
    UpdateWalletInfo(WalletInfo),
    MoneyTransfer(TransferEvent),
    ShowWallet,
    HideWallet,
    SwitchView(SwitchView),
    SetRecentTransfers(RecentTransfers),
}

impl HostEvent {
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::UpdateDaemonState(_) => UPDATE_DAEMON_STATE,
            HostEvent::UpdateWalletStatus(_) => UPDATE_WALLET_STATUS,
            HostEvent::UpdateWalletInfo(_) => UPDATE_WALLET_INFO,
            HostEvent::MoneyTransfer(_) => MONEY_TRANSFER,
            HostEvent::ShowWallet => SHOW_WALLET,
            HostEvent::HideWallet => HIDE_WALLET,
            HostEvent::SwitchView(_) => SWITCH_VIEW,
            HostEvent::SetRecentTransfers(_) => SET_RECENT_TRANSFERS,
        }
    }
}

fn decode<T: DeserializeOwned>(event: &str, payload: &str) -> Result<T, ViewError> {
    serde_json::from_str(payload).map_err(|source| ViewError::Decode {
        event: event.to_string(),
        source,
    })
}

/// Decodes one host push. `showWallet` and `hideWallet` ignore their payload.
pub fn decode_event(event: &str, payload: &str) -> Result<HostEvent, ViewError> {
    let decoded = match event {
        UPDATE_DAEMON_STATE => HostEvent::UpdateDaemonState(decode(event, payload)?),
        UPDATE_WALLET_STATUS => HostEvent::UpdateWalletStatus(decode(event, payload)?),
        UPDATE_WALLET_INFO => HostEvent::UpdateWalletInfo(decode(event, payload)?),
        MONEY_TRANSFER => HostEvent::MoneyTransfer(decode(event, payload)?),
        SHOW_WALLET => HostEvent::ShowWallet,
        HIDE_WALLET => HostEvent::HideWallet,
        SWITCH_VIEW => HostEvent::SwitchView(decode(event, payload)?),
        SET_RECENT_TRANSFERS => HostEvent::SetRecentTransfers(decode(event, payload)?),
        other => return Err(ViewError::UnknownEvent(other.to_string())),
    };
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_events() {
        let event = decode_event(UPDATE_WALLET_STATUS, r#"{"wallet_state": 2}"#).unwrap();
        assert_eq!(
            event,
            HostEvent::UpdateWalletStatus(WalletStatus { wallet_state: 2 })
        );
        assert_eq!(decode_event(SHOW_WALLET, "").unwrap(), HostEvent::ShowWallet);
        assert_eq!(event.name(), UPDATE_WALLET_STATUS);
    }

    #[test]
    fn test_decode_malformed_payload() {
        let err = decode_event(SWITCH_VIEW, "{view: 1").unwrap_err();
        match err {
            ViewError::Decode { event, .. } => assert_eq!(event, SWITCH_VIEW),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_unknown_event() {
        assert!(matches!(
            decode_event("updateMiningState", "{}"),
            Err(ViewError::UnknownEvent(name)) if name == "updateMiningState"
        ));
    }

    #[test]
    fn test_recent_transfers_without_history_is_empty() {
        let event = decode_event(SET_RECENT_TRANSFERS, "{}").unwrap();
        assert_eq!(
            event,
            HostEvent::SetRecentTransfers(RecentTransfers::default())
        );
    }
}
