use embassy_net::{
    IpAddress, Stack,
    dns::DnsQueryType,
    udp::{PacketMetadata, UdpSocket},
};
use embassy_time::{Duration as EmbassyDuration, WithTimeout};
use log::{debug, info};
use watch_core::{sntp, sync::TimeReading};

const LOCAL_PORT: u16 = 12_300;
const REPLY_TIMEOUT_MS: u64 = 1_000;
const DNS_TIMEOUT_MS: u64 = 3_000;

/// One SNTP exchange with an already resolved server. Every failure is an
/// invalid reading; the retry budget belongs to the caller.
pub async fn query(stack: Stack<'_>, address: IpAddress) -> TimeReading {
    let mut rx_meta = [PacketMetadata::EMPTY; 2];
    let mut rx_buffer = [0u8; 128];
    let mut tx_meta = [PacketMetadata::EMPTY; 2];
    let mut tx_buffer = [0u8; 128];
    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );

    if let Err(err) = socket.bind(LOCAL_PORT) {
        info!("ntp: bind failed: {:?}", err);
        return TimeReading::INVALID;
    }

    if let Err(err) = socket.send_to(&sntp::request(), (address, sntp::PORT)).await {
        debug!("ntp: send failed: {:?}", err);
        return TimeReading::INVALID;
    }

    let mut reply = [0u8; sntp::PACKET_LEN];
    match socket
        .recv_from(&mut reply)
        .with_timeout(EmbassyDuration::from_millis(REPLY_TIMEOUT_MS))
        .await
    {
        Ok(Ok((len, _meta))) => sntp::parse_reply(&reply[..len]),
        Ok(Err(err)) => {
            debug!("ntp: receive failed: {:?}", err);
            TimeReading::INVALID
        }
        Err(_) => {
            debug!("ntp: no reply within {}ms", REPLY_TIMEOUT_MS);
            TimeReading::INVALID
        }
    }
}

pub async fn resolve(stack: Stack<'_>, server: &str) -> Option<IpAddress> {
    match stack
        .dns_query(server, DnsQueryType::A)
        .with_timeout(EmbassyDuration::from_millis(DNS_TIMEOUT_MS))
        .await
    {
        Ok(Ok(addresses)) => addresses.first().copied(),
        Ok(Err(err)) => {
            debug!("ntp: dns lookup of {} failed: {:?}", server, err);
            None
        }
        Err(_) => {
            debug!("ntp: dns lookup of {} timed out", server);
            None
        }
    }
}
