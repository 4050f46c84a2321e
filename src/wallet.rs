//! Wallet status, info and view-switch reducers.

use crate::types::{SwitchView, WalletInfo, WalletStatus, WalletSyncState};
use crate::view::Tab;
use crate::ViewError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletUpdate {
    Status(WalletSyncState),
    Info(WalletInfo),
    /// Show the workspace and start from an empty transfer list.
    Show,
    /// Show the welcome placeholder instead of the workspace.
    Hide,
    SwitchView(Tab),
}

pub fn reduce_wallet_status(status: &WalletStatus) -> Result<WalletUpdate, ViewError> {
    WalletSyncState::from_raw(status.wallet_state)
        .map(WalletUpdate::Status)
        .ok_or(ViewError::UnknownState {
            kind: "wallet",
            value: status.wallet_state,
        })
}

pub fn reduce_wallet_info(info: &WalletInfo) -> WalletUpdate {
    WalletUpdate::Info(info.clone())
}

pub fn switch_view(request: &SwitchView) -> Result<WalletUpdate, ViewError> {
    match request.view {
        1 => Ok(WalletUpdate::SwitchView(Tab::Dashboard)),
        2 => Ok(WalletUpdate::SwitchView(Tab::Wallet)),
        other => Err(ViewError::UnknownState {
            kind: "view",
            value: other,
        }),
    }
}

pub fn show() -> WalletUpdate {
    WalletUpdate::Show
}

pub fn hide() -> WalletUpdate {
    WalletUpdate::Hide
}
