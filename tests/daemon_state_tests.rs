mod test_helpers;

use boolberry_view::daemon::{
    update_last_ver_view, DaemonStateReducer, SyncChange, UNKNOWN_STATE_TEXT,
};
use boolberry_view::types::NetworkState;
use boolberry_view::view::{Control, SyncIndicator, Tab, VersionStyle, VersionVisibility, ViewState};
use test_helpers::daemon_status;

#[test]
fn test_version_modes() {
    assert_eq!(update_last_ver_view(0), Some(VersionVisibility::Hidden));

    let styles: Vec<VersionStyle> = (1..=4)
        .map(|mode| match update_last_ver_view(mode) {
            Some(VersionVisibility::Shown(style)) => style,
            other => panic!("mode {} gave {:?}", mode, other),
        })
        .collect();
    let classes: std::collections::HashSet<&str> =
        styles.iter().map(|s| s.class_name()).collect();
    assert_eq!(classes.len(), 4);
}

#[test]
fn test_version_text_per_mode() {
    let reducer = DaemonStateReducer::default();
    for mode in 0..=4 {
        let mut status = daemon_status(2);
        status.last_build_displaymode = mode;
        let summary = reducer.reduce(&status).summary.unwrap();
        assert_eq!(
            summary.version_text.starts_with("(Critical update"),
            mode >= 3,
            "mode {}",
            mode
        );
    }
}

#[test]
fn test_synchronizing_update() {
    let update = DaemonStateReducer::default().reduce(&daemon_status(1));

    assert_eq!(update.state, Some(NetworkState::Synchronizing));
    assert_eq!(update.sync_change, Some(SyncChange::SetProgress(50.0)));
    assert_eq!(update.blocks_behind_text.as_deref(), Some("50 blocks behind"));
    assert_eq!(
        update.controls,
        vec![
            (Control::OpenWallet, false),
            (Control::GenerateWallet, false),
            (Control::Mining, false),
        ]
    );
    assert!(!update.refresh_aliases);
}

#[test]
fn test_synchronizing_without_known_peers() {
    let mut status = daemon_status(1);
    status.max_net_seen_height = 0;
    let update = DaemonStateReducer::default().reduce(&status);
    assert_eq!(update.sync_change, Some(SyncChange::SetProgress(0.0)));
    assert_eq!(update.blocks_behind_text, None);
}

#[test]
fn test_online_then_deinitializing() {
    let reducer = DaemonStateReducer::default();
    let mut view = ViewState::new();
    view.wallet.workspace_visible = true;
    view.navigation.selected = Tab::Wallet;

    let online = reducer.reduce(&daemon_status(2));
    assert!(online.refresh_aliases);
    view.apply_daemon(online);
    assert!(view.daemon.status_healthy);
    assert!(view.controls.is_enabled(Control::OpenWallet));
    assert!(view.controls.is_enabled(Control::GenerateWallet));
    assert!(view.navigation.wallet_tab_enabled);
    assert!(!view.daemon.sync_indicator.visible);

    view.apply_daemon(reducer.reduce(&daemon_status(3)));
    assert!(!view.daemon.status_healthy);
    assert!(!view.controls.is_enabled(Control::OpenWallet));
    assert!(!view.wallet.workspace_visible);
    assert_eq!(view.navigation.selected, Tab::Dashboard);
    assert!(!view.navigation.wallet_tab_enabled);
    assert_eq!(
        view.daemon.sync_indicator,
        SyncIndicator {
            visible: true,
            progress: None
        }
    );
    assert_eq!(view.daemon.blocks_behind_text, "");
}

#[test]
fn test_unknown_state_stops_early() {
    let reducer = DaemonStateReducer::default();
    let mut view = ViewState::new();
    view.apply_daemon(reducer.reduce(&daemon_status(2)));
    let before = view.clone();

    let mut status = daemon_status(9);
    status.height = 999;
    status.out_connections_count = 1;
    let update = reducer.reduce(&status);
    assert_eq!(update.status_text, UNKNOWN_STATE_TEXT);
    assert!(update.summary.is_none());

    view.apply_daemon(update);
    assert_eq!(view.daemon.status_text, UNKNOWN_STATE_TEXT);
    assert_eq!(view.daemon.height_text, before.daemon.height_text);
    assert_eq!(
        view.daemon.out_connections_text,
        before.daemon.out_connections_text
    );
    assert_eq!(view.controls, before.controls);
}

#[test]
fn test_connection_health_threshold() {
    let reducer = DaemonStateReducer::new(8);
    let mut status = daemon_status(0);

    status.out_connections_count = 7;
    assert!(!reducer.reduce(&status).summary.unwrap().out_connections_healthy);
    status.out_connections_count = 8;
    assert!(reducer.reduce(&status).summary.unwrap().out_connections_healthy);
}

#[test]
fn test_connecting_only_refreshes_summary() {
    let update = DaemonStateReducer::default().reduce(&daemon_status(0));
    assert_eq!(update.state, Some(NetworkState::Connecting));
    assert!(update.controls.is_empty());
    assert_eq!(update.sync_change, None);
    let summary = update.summary.unwrap();
    assert_eq!(summary.height_text, "50");
    assert_eq!(summary.difficulty_text, "1000");
    assert_eq!(summary.hashrate_text, "42");
}

#[test]
fn test_unknown_display_mode_keeps_style() {
    let reducer = DaemonStateReducer::default();
    let mut view = ViewState::new();

    let mut status = daemon_status(2);
    status.last_build_displaymode = 4;
    view.apply_daemon(reducer.reduce(&status));
    status.last_build_displaymode = 9;
    view.apply_daemon(reducer.reduce(&status));

    assert_eq!(
        view.daemon.version_notice.visibility,
        VersionVisibility::Shown(VersionStyle::Critical)
    );
    assert_eq!(view.daemon.version_notice.text, "(Critical update: 0.2.1)");
}

#[test]
fn test_synchronizing_after_online_keeps_bar_hidden() {
    let reducer = DaemonStateReducer::default();
    let mut view = ViewState::new();

    view.apply_daemon(reducer.reduce(&daemon_status(1)));
    assert!(view.daemon.sync_indicator.visible);
    assert_eq!(view.daemon.sync_indicator.progress, Some(50.0));

    view.apply_daemon(reducer.reduce(&daemon_status(2)));
    let mut status = daemon_status(1);
    status.height = 75;
    view.apply_daemon(reducer.reduce(&status));

    assert!(!view.daemon.sync_indicator.visible);
    assert_eq!(view.daemon.sync_indicator.progress, Some(75.0));
}

#[test]
fn test_negative_network_state_is_unknown() {
    let update = DaemonStateReducer::default().reduce(&daemon_status(-1));
    assert_eq!(update.state, None);
    assert_eq!(update.status_text, UNKNOWN_STATE_TEXT);
    assert!(update.summary.is_none());
}
