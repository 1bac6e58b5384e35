use std::{
    net::{IpAddr, Ipv4Addr},
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use rocket::request::{self, FromRequest, Request};

use crate::config::ServerConfig;

#[derive(Debug)]
pub struct TokenBucket {
    last_refill: Instant,
    tokens: u32,
    capacity: u32,
    refill_rate: u32,
    refill_interval: Duration,
}

impl TokenBucket {
    fn new(capacity: u32, refill_rate: u32, refill_interval: Duration) -> Self {
        Self {
            last_refill: Instant::now(),
            tokens: capacity,
            capacity,
            refill_rate,
            refill_interval,
        }
    }

    fn try_consume(&mut self) -> bool {
        self.refill();
        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);
        let intervals = elapsed.as_secs() / self.refill_interval.as_secs().max(1);

        if intervals > 0 {
            let tokens_to_add = (intervals as u32).saturating_mul(self.refill_rate);
            self.tokens = self.tokens.saturating_add(tokens_to_add).min(self.capacity);
            self.last_refill = now;
        }
    }
}

/// Per-client token buckets guarding game creation.
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<DashMap<IpAddr, TokenBucket>>,
    capacity: u32,
}

impl RateLimiter {
    /// Allows `games_per_minute` creations per client, refilled every minute.
    pub fn new(games_per_minute: u32) -> Self {
        Self {
            buckets: Arc::new(DashMap::new()),
            capacity: games_per_minute,
        }
    }

    pub fn check(&self, client_ip: &ClientIp) -> bool {
        let refill_interval = Duration::from_secs(60);
        let refill_rate = self.capacity;

        let mut entry = self
            .buckets
            .entry(client_ip.0)
            .or_insert_with(|| TokenBucket::new(self.capacity, refill_rate, refill_interval));

        entry.try_consume()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Drops buckets that have refilled completely; they hold no state a
    /// fresh bucket would not.
    pub fn remove_idle(&self) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| {
            bucket.refill();
            bucket.tokens < bucket.capacity
        });
        before.saturating_sub(self.buckets.len())
    }
}

#[derive(Debug)]
pub struct ClientIp(pub IpAddr);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientIp {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let trust_proxy_header = req
            .rocket()
            .state::<ServerConfig>()
            .is_some_and(|config| config.trust_proxy_header);

        // Without a trusted proxy in front, any forwarded header is client input.
        let ip = if trust_proxy_header {
            req.client_ip()
        } else {
            req.remote().map(|remote| remote.ip())
        }
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

        request::Outcome::Success(ClientIp(ip))
    }
}
