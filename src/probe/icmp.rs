//! ICMP echo probe backed by `surge-ping`

use std::net::IpAddr;
use std::time::Instant;

use async_trait::async_trait;
use surge_ping::{Client, Config as IcmpConfig, PingIdentifier, PingSequence, SurgeError, ICMP};
use tokio::sync::OnceCell;
use tokio::time::timeout;

use super::{Probe, ProbeSettings};
use crate::logging::Logger;
use crate::models::ProbeOutcome;

/// Sends ICMP echo requests with a fixed payload size, TTL and reply timeout.
///
/// Raw sockets are opened lazily, once per address family, on the first probe
/// that needs them. If opening fails (typically missing privileges) every
/// probe for that family reports the same error instead of aborting the run.
pub struct IcmpProbe {
    settings: ProbeSettings,
    payload: Vec<u8>,
    v4: OnceCell<Result<Client, String>>,
    v6: OnceCell<Result<Client, String>>,
    logger: Logger,
}

impl IcmpProbe {
    pub fn new(settings: ProbeSettings, logger: Logger) -> Self {
        Self {
            payload: vec![0u8; settings.packet_size],
            settings,
            v4: OnceCell::new(),
            v6: OnceCell::new(),
            logger,
        }
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Payload carried by every echo request
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    async fn client_for(&self, ip: IpAddr) -> Result<Client, String> {
        let (cell, kind) = match ip {
            IpAddr::V4(_) => (&self.v4, ICMP::V4),
            IpAddr::V6(_) => (&self.v6, ICMP::V6),
        };

        cell.get_or_init(|| async { self.open_client(kind) })
            .await
            .clone()
    }

    fn open_client(&self, kind: ICMP) -> Result<Client, String> {
        let config = match kind {
            ICMP::V4 => IcmpConfig::builder()
                .kind(ICMP::V4)
                .ttl(u32::from(self.settings.ttl))
                .build(),
            // IP_TTL is not settable on ICMPv6 sockets; the hop limit stays at the system default
            ICMP::V6 => IcmpConfig::builder().kind(ICMP::V6).build(),
        };

        match Client::new(&config) {
            Ok(client) => {
                self.logger.debug("Opened ICMP socket")
                    .field("family", format!("{:?}", kind))
                    .field("ttl", self.settings.ttl)
                    .log();
                Ok(client)
            }
            Err(e) => {
                self.logger.warn("Failed to open ICMP socket")
                    .field("family", format!("{:?}", kind))
                    .field("error", e.to_string())
                    .log();
                Err(format!("cannot open ICMP socket: {}", e))
            }
        }
    }
}

/// Resolve hostname to IP address.
async fn resolve_host(host: &str) -> Result<IpAddr, std::io::Error> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let addrs = tokio::net::lookup_host(format!("{host}:0")).await?;
    addrs
        .into_iter()
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses found"))
}

#[async_trait]
impl Probe for IcmpProbe {
    async fn probe(&self, host: &str, seq: u16) -> ProbeOutcome {
        let ip = match resolve_host(host).await {
            Ok(ip) => ip,
            Err(e) => return ProbeOutcome::error(format!("failed to resolve {}: {}", host, e)),
        };

        let client = match self.client_for(ip).await {
            Ok(client) => client,
            Err(cause) => return ProbeOutcome::Error(cause),
        };

        let mut pinger = client.pinger(ip, PingIdentifier(rand::random())).await;
        pinger.timeout(self.settings.timeout);

        let start = Instant::now();
        let result = timeout(self.settings.timeout, pinger.ping(PingSequence(seq), &self.payload)).await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let outcome = match result {
            Ok(Ok(_)) => ProbeOutcome::reply(elapsed_ms),
            Ok(Err(SurgeError::Timeout { .. })) | Err(_) => ProbeOutcome::NoReply,
            Ok(Err(e)) => ProbeOutcome::error(e.to_string()),
        };

        self.logger.trace("Echo request finished")
            .field("host", host)
            .field("ip", ip.to_string())
            .field("seq", seq)
            .field("outcome", &outcome)
            .log();

        outcome
    }
}
