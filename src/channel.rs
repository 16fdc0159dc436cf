#![cfg(feature = "std")]

//! The turn channel: a message-passing seam over an unreliable,
//! unacknowledged, group-scoped broadcast medium.
//!
//! Sends are fire-and-forget. Receives take an explicit timeout and report
//! `TimedOut` as a value, so callers choose their own retry or abort
//! policy instead of blocking forever.

use std::collections::VecDeque;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use rand::Rng;
use tokio::net::UdpSocket;
use tokio::time::{Duration, Instant};

use crate::protocol::Message;

/// Outcome of one bounded receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Received {
    /// A well-formed message arrived.
    Message(Message),
    /// Nothing arrived before the deadline. Indistinguishable from an idle
    /// channel; that ambiguity is inherent to the medium.
    TimedOut,
}

/// Broadcast send plus bounded receive.
#[async_trait::async_trait]
pub trait TurnChannel: Send {
    /// Fire-and-forget broadcast to everyone sharing the channel. No
    /// delivery confirmation exists.
    async fn broadcast(&mut self, msg: Message) -> anyhow::Result<()>;

    /// Wait up to `wait` for the next message. Malformed traffic is an
    /// error; an elapsed deadline is `Received::TimedOut`.
    async fn recv(&mut self, wait: Duration) -> anyhow::Result<Received>;
}

type Inbox = Arc<Mutex<VecDeque<String>>>;

/// A shared in-process medium. Every endpoint that joins sees every other
/// endpoint's broadcasts, third parties included, which models the
/// cross-talk a shared radio group allows.
#[derive(Clone, Default)]
pub struct Airwave {
    endpoints: Arc<Mutex<Vec<Inbox>>>,
}

impl Airwave {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new endpoint to the medium.
    pub fn join(&self) -> InMemoryRadio {
        let inbox: Inbox = Arc::new(Mutex::new(VecDeque::new()));
        self.endpoints.lock().unwrap().push(inbox.clone());
        InMemoryRadio {
            air: self.clone(),
            inbox,
        }
    }

    /// Two endpoints on a fresh medium.
    pub fn pair() -> (InMemoryRadio, InMemoryRadio) {
        let air = Self::new();
        (air.join(), air.join())
    }
}

/// In-process broadcast endpoint. The workhorse for tests, demos and the
/// local two-session mode.
pub struct InMemoryRadio {
    air: Airwave,
    inbox: Inbox,
}

impl InMemoryRadio {
    /// Push raw wire text to every other endpoint. Used directly by tests
    /// that inject malformed or third-party traffic.
    pub fn broadcast_raw(&self, text: &str) {
        for inbox in self.air.endpoints.lock().unwrap().iter() {
            if !Arc::ptr_eq(inbox, &self.inbox) {
                inbox.lock().unwrap().push_back(text.to_owned());
            }
        }
    }
}

#[async_trait::async_trait]
impl TurnChannel for InMemoryRadio {
    async fn broadcast(&mut self, msg: Message) -> anyhow::Result<()> {
        log::debug!("radio send: {}", msg.encode());
        self.broadcast_raw(&msg.encode());
        Ok(())
    }

    async fn recv(&mut self, wait: Duration) -> anyhow::Result<Received> {
        let deadline = Instant::now() + wait;
        loop {
            let text = self.inbox.lock().unwrap().pop_front();
            if let Some(text) = text {
                let msg = Message::parse(&text)
                    .map_err(|e| anyhow::anyhow!("malformed radio message {:?}: {}", text, e))?;
                log::debug!("radio recv: {}", text);
                return Ok(Received::Message(msg));
            }
            if Instant::now() >= deadline {
                return Ok(Received::TimedOut);
            }
            tokio::task::yield_now().await;
        }
    }
}

/// Broadcast radio over UDP datagrams on the local network segment.
///
/// Each datagram is `<group> <origin> <payload>`: the shared group number
/// scopes who listens (an unauthenticated namespace, not a security
/// boundary) and the random origin id lets an endpoint drop its own
/// echoes. Datagrams from other groups are ignored silently.
pub struct UdpRadio {
    socket: UdpSocket,
    group: u8,
    origin: u32,
    target: SocketAddr,
}

impl UdpRadio {
    /// Bind to `port` on all interfaces and enable broadcast. One endpoint
    /// per machine; both machines must share the port and group.
    pub async fn bind(group: u8, port: u16) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, port)).await?;
        socket.set_broadcast(true)?;
        let origin: u32 = rand::rng().random();
        log::info!("radio up: group {} port {} origin {:08x}", group, port, origin);
        Ok(Self {
            socket,
            group,
            origin,
            target: (Ipv4Addr::BROADCAST, port).into(),
        })
    }

    /// Split a datagram into (group, origin, payload).
    fn split_datagram(text: &str) -> Option<(u8, u32, &str)> {
        let (group, rest) = text.split_once(' ')?;
        let (origin, payload) = rest.split_once(' ')?;
        Some((group.parse().ok()?, origin.parse().ok()?, payload))
    }
}

#[async_trait::async_trait]
impl TurnChannel for UdpRadio {
    async fn broadcast(&mut self, msg: Message) -> anyhow::Result<()> {
        let datagram = format!("{} {} {}", self.group, self.origin, msg.encode());
        log::debug!("radio send: {}", datagram);
        self.socket
            .send_to(datagram.as_bytes(), self.target)
            .await
            .map_err(|e| anyhow::anyhow!("broadcast failed: {}", e))?;
        Ok(())
    }

    async fn recv(&mut self, wait: Duration) -> anyhow::Result<Received> {
        let deadline = Instant::now() + wait;
        let mut buf = [0u8; 256];
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(Received::TimedOut);
            }
            let (len, from) =
                match tokio::time::timeout(remaining, self.socket.recv_from(&mut buf)).await {
                    Ok(result) => result.map_err(|e| anyhow::anyhow!("recv failed: {}", e))?,
                    Err(_) => return Ok(Received::TimedOut),
                };

            let text = match core::str::from_utf8(&buf[..len]) {
                Ok(text) => text,
                Err(_) => {
                    log::warn!("dropping non-text datagram from {}", from);
                    continue;
                }
            };
            let Some((group, origin, payload)) = Self::split_datagram(text) else {
                log::warn!("dropping unframed datagram from {}: {:?}", from, text);
                continue;
            };
            if group != self.group || origin == self.origin {
                continue;
            }
            log::debug!("radio recv: {}", payload);
            let msg = Message::parse(payload)
                .map_err(|e| anyhow::anyhow!("malformed radio message {:?}: {}", payload, e))?;
            return Ok(Received::Message(msg));
        }
    }
}
