use embassy_net::Stack;
use embassy_time::{Duration as EmbassyDuration, Timer, WithTimeout};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController};
use log::{debug, info, warn};
use watch_core::{
    config::NetworkList,
    connectivity::{JoinAttempt, JoinOutcome, JoinPlan, JoinPolicy, JoinStep, LinkStatus},
    error::WatchError,
    render::Screen,
};

use crate::{Display, show};

const DHCP_TIMEOUT_SECS: u64 = 15;

fn is_online(wifi_controller: &WifiController<'_>, stack: Stack<'_>) -> bool {
    matches!(wifi_controller.is_connected(), Ok(true))
        && stack.is_link_up()
        && stack.config_v4().is_some()
}

/// Joins the first reachable network, candidates in priority order, pass
/// after pass. `force_refresh` drops an existing association first.
pub async fn ensure_connected(
    wifi_controller: &mut WifiController<'_>,
    stack: Stack<'_>,
    networks: &NetworkList<'_>,
    policy: JoinPolicy,
    force_refresh: bool,
    display: &mut Display,
) -> Result<JoinOutcome, WatchError> {
    if networks.is_empty() {
        warn!("wifi: no networks configured");
        return Err(WatchError::NoNetworksConfigured);
    }

    if !force_refresh && is_online(wifi_controller, stack) {
        return Ok(JoinOutcome::AlreadyConnected);
    }

    show(
        display,
        &Screen::JoinStart {
            refresh: force_refresh,
        },
    );
    if let Err(err) = wifi_controller.disconnect_async().await {
        debug!("wifi: disconnect before join: {:?}", err);
    }

    let mut plan = JoinPlan::new(networks.len(), &policy);
    while let Some(index) = plan.next_candidate() {
        let candidate = &networks[index];
        show(
            display,
            &Screen::Connecting {
                label: candidate.label,
            },
        );
        info!("wifi: trying {}", candidate.label);

        let client_config = ClientConfig::default()
            .with_ssid(candidate.ssid.into())
            .with_password(candidate.password.into());
        if let Err(err) = wifi_controller.set_config(&ModeConfig::Client(client_config)) {
            warn!("wifi: config for {} rejected: {:?}", candidate.label, err);
            Timer::after_millis(u64::from(policy.candidate_gap_ms)).await;
            continue;
        }

        if !wifi_controller.is_started().unwrap_or(false)
            && let Err(err) = wifi_controller.start_async().await
        {
            warn!("wifi: start failed: {:?}", err);
            Timer::after_millis(u64::from(policy.candidate_gap_ms)).await;
            continue;
        }

        if join_candidate(wifi_controller, policy).await && wait_for_dhcp(stack).await {
            info!("wifi: joined {}", candidate.label);
            return Ok(JoinOutcome::Joined(index));
        }

        if let Err(err) = wifi_controller.disconnect_async().await {
            debug!("wifi: disconnect from {}: {:?}", candidate.label, err);
        }
        Timer::after_millis(u64::from(policy.candidate_gap_ms)).await;
    }

    warn!("wifi: unable to join any network");
    Err(WatchError::ConnectivityUnavailable)
}

async fn join_candidate(wifi_controller: &mut WifiController<'_>, policy: JoinPolicy) -> bool {
    let mut attempt = JoinAttempt::new(policy);

    loop {
        let status = match wifi_controller.connect_async().await {
            Ok(()) => LinkStatus::Connected,
            Err(err) => {
                info!("wifi: connect failed: {:?}", err);
                LinkStatus::ConnectFailed
            }
        };
        info!("wifi: {}", status.label());

        match attempt.observe(status) {
            JoinStep::Connected => return true,
            JoinStep::Wait(ms) => Timer::after_millis(u64::from(ms)).await,
            JoinStep::GiveUp => return false,
        }
    }
}

async fn wait_for_dhcp(stack: Stack<'_>) -> bool {
    match stack
        .wait_config_up()
        .with_timeout(EmbassyDuration::from_secs(DHCP_TIMEOUT_SECS))
        .await
    {
        Ok(()) => true,
        Err(_) => {
            info!("wifi: dhcp timeout");
            false
        }
    }
}
