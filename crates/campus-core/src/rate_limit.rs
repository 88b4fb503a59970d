//! Rate Limit Manager
//!
//! Request-count guard in front of the authentication entry points, keyed by
//! client IP, built on the governor crate's GCRA algorithm. Excess attempts
//! are rejected with a distinct `RateLimited` condition, never queued.
//!
//! Repeated authentication failures accrue penalties; enough of them ban the
//! address outright for a while.

use std::net::IpAddr;
use std::num::{NonZeroU32, NonZeroUsize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DashMapStateStore;
use governor::{Quota, RateLimiter};
use lru::LruCache;
use parking_lot::RwLock;

use crate::prelude::*;

type KeyedLimiter = RateLimiter<IpAddr, DashMapStateStore<IpAddr>, DefaultClock>;

#[derive(Debug)]
pub enum RateLimitError {
	/// Over quota; retry after the given duration
	RateLimited { retry_after: Duration },
	/// Address is banned following repeated penalties
	Banned { remaining: Duration },
}

impl From<RateLimitError> for Error {
	fn from(_err: RateLimitError) -> Self {
		// Both conditions surface to the caller as the same coarse kind
		Error::RateLimited
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PenaltyReason {
	AuthFailure,
}

impl PenaltyReason {
	fn failures_to_ban(self) -> u32 {
		match self {
			PenaltyReason::AuthFailure => 10,
		}
	}

	fn ban_duration(self) -> Duration {
		match self {
			PenaltyReason::AuthFailure => Duration::from_secs(900),
		}
	}
}

#[derive(Clone, Copy, Debug)]
pub struct RateLimitConfig {
	/// Attempts allowed per window (e.g. 5)
	pub max_attempts: NonZeroU32,
	/// Rolling window length (e.g. 60s)
	pub window: Duration,
	/// Bound on tracked addresses for penalty/ban bookkeeping
	pub max_tracked_ips: usize,
}

impl Default for RateLimitConfig {
	fn default() -> Self {
		const FIVE: NonZeroU32 = match NonZeroU32::new(5) {
			Some(v) => v,
			None => unreachable!(),
		};
		Self { max_attempts: FIVE, window: Duration::from_secs(60), max_tracked_ips: 100_000 }
	}
}

#[derive(Debug, Clone)]
struct BanEntry {
	expires_at: Instant,
}

impl BanEntry {
	fn is_expired(&self) -> bool {
		Instant::now() >= self.expires_at
	}
}

pub struct RateLimitManager {
	auth: Arc<KeyedLimiter>,
	penalties: RwLock<LruCache<IpAddr, u32>>,
	bans: RwLock<LruCache<IpAddr, BanEntry>>,
	total_limited: AtomicU64,
	total_bans: AtomicU64,
}

impl RateLimitManager {
	pub fn new(config: RateLimitConfig) -> Self {
		// GCRA: burst of `max_attempts`, one slot replenished every
		// window / max_attempts
		const ONE: NonZeroU32 = match NonZeroU32::new(1) {
			Some(v) => v,
			None => unreachable!(),
		};
		let quota = Quota::with_period(config.window / config.max_attempts.get())
			.unwrap_or_else(|| Quota::per_second(ONE))
			.allow_burst(config.max_attempts);

		const TEN_THOUSAND: NonZeroUsize = match NonZeroUsize::new(10_000) {
			Some(v) => v,
			None => unreachable!(),
		};
		let cap = NonZeroUsize::new(config.max_tracked_ips).unwrap_or(TEN_THOUSAND);

		Self {
			auth: Arc::new(RateLimiter::keyed(quota)),
			penalties: RwLock::new(LruCache::new(cap)),
			bans: RwLock::new(LruCache::new(cap)),
			total_limited: AtomicU64::new(0),
			total_bans: AtomicU64::new(0),
		}
	}

	/// Check whether a request from this address may proceed
	pub fn check(&self, addr: &IpAddr) -> Result<(), RateLimitError> {
		if let Some(remaining) = self.check_ban(addr) {
			return Err(RateLimitError::Banned { remaining });
		}

		if let Err(not_until) = self.auth.check_key(addr) {
			self.total_limited.fetch_add(1, Ordering::Relaxed);
			let retry_after = not_until.wait_time_from(DefaultClock::default().now());
			return Err(RateLimitError::RateLimited { retry_after });
		}

		Ok(())
	}

	/// Record a penalty (e.g. a failed login); enough of them trigger a ban
	pub fn penalize(&self, addr: &IpAddr, reason: PenaltyReason, amount: u32) {
		let mut penalties = self.penalties.write();
		let count = penalties.get_or_insert_mut(*addr, u32::default);
		*count = count.saturating_add(amount);
		let banned = *count >= reason.failures_to_ban();
		drop(penalties);

		if banned {
			debug!("Auto-banning {} after repeated {:?}", addr, reason);
			self.ban(addr, reason.ban_duration());
		}
	}

	/// Forgive penalties (e.g. after a successful login)
	pub fn grant(&self, addr: &IpAddr, amount: u32) {
		let mut penalties = self.penalties.write();
		if let Some(count) = penalties.get_mut(addr) {
			*count = count.saturating_sub(amount);
			if *count == 0 {
				penalties.pop(addr);
			}
		}
	}

	pub fn ban(&self, addr: &IpAddr, duration: Duration) {
		let entry = BanEntry { expires_at: Instant::now() + duration };
		self.bans.write().put(*addr, entry);
		self.total_bans.fetch_add(1, Ordering::Relaxed);
	}

	pub fn unban(&self, addr: &IpAddr) {
		self.bans.write().pop(addr);
	}

	pub fn is_banned(&self, addr: &IpAddr) -> bool {
		self.check_ban(addr).is_some()
	}

	fn check_ban(&self, addr: &IpAddr) -> Option<Duration> {
		let mut bans = self.bans.write();
		match bans.get(addr) {
			Some(ban) if ban.is_expired() => {
				bans.pop(addr);
				None
			}
			Some(ban) => Some(ban.expires_at.saturating_duration_since(Instant::now())),
			None => None,
		}
	}

	pub fn total_limited(&self) -> u64 {
		self.total_limited.load(Ordering::Relaxed)
	}

	pub fn total_bans(&self) -> u64 {
		self.total_bans.load(Ordering::Relaxed)
	}
}

impl Default for RateLimitManager {
	fn default() -> Self {
		Self::new(RateLimitConfig::default())
	}
}


// vim: ts=4
