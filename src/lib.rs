//! Presentation-state core of the Boolberry desktop client.
//!
//! Host pushes arrive as `(event, json)` pairs, are decoded into typed events, reduced into
//! deltas and applied to a [`ViewState`] that the toolkit layer draws. User actions go the
//! other way through an injected [`HostBridge`].

pub mod adapter;
pub mod alias;
pub mod bridge;
pub mod config;
pub mod daemon;
pub mod ffi;
pub mod history;
pub mod mock_bridge;
pub mod money;
pub mod render;
pub mod types;
pub mod view;
pub mod wallet;

pub use adapter::BridgeAdapter;
pub use alias::{parse_destination, AliasCache, TransferDestination};
pub use bridge::{decode_event, HostBridge, HostEvent};
pub use config::ViewConfig;
pub use ffi::{
    bv_free_string, bv_view_alias_suggestions, bv_view_close_wallet, bv_view_dispatch,
    bv_view_free, bv_view_generate_wallet, bv_view_new, bv_view_open_wallet, bv_view_start,
    bv_view_state_json, bv_view_transfer, HostCallbacks, ViewHandle,
};
pub use money::{format_money, parse_money, MoneyAmount, MoneyParseError};
pub use view::ViewState;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Failed to decode {event} payload: {source}")]
    Decode {
        event: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// Rejected locally before anything reached the host. The text is user-facing.
    #[error("{0}")]
    Validation(String),

    #[error("Unknown {kind} state: {value}")]
    UnknownState { kind: &'static str, value: i64 },

    #[error("Bridge call {call} failed: {reason}")]
    BridgeCall { call: &'static str, reason: String },

    #[error("Config error: {0}")]
    Config(String),
}

pub type ViewResult<T> = Result<T, ViewError>;
