//! Service registry module: a cached directory of known services.
//!
//! Reads are fronted by an in-memory cache keyed by the operation's
//! parameters with a fixed TTL. Every write bumps a registry-wide version
//! counter and entries remember the version they were cached under, so a
//! read issued right after a write can never observe a pre-write row even
//! inside the TTL window.

pub mod handler;

mod prelude;

use lru::LruCache;
use parking_lot::RwLock;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use campus_types::registry_adapter::ServiceEntry;

const CACHE_CAPACITY: usize = 1024;

struct Entry<T> {
	version: u64,
	inserted_at: Instant,
	value: T,
}

/// Read cache over the registry store. Registered as an AppState extension.
pub struct RegistryCache {
	lists: RwLock<LruCache<(i64, i64), Entry<Arc<Vec<ServiceEntry>>>>>,
	names: RwLock<LruCache<Box<str>, Entry<Arc<ServiceEntry>>>>,
	version: AtomicU64,
	ttl: Duration,
}

impl RegistryCache {
	pub fn new(ttl: Duration) -> Self {
		const CAP: NonZeroUsize = match NonZeroUsize::new(CACHE_CAPACITY) {
			Some(v) => v,
			None => unreachable!(),
		};

		Self {
			lists: RwLock::new(LruCache::new(CAP)),
			names: RwLock::new(LruCache::new(CAP)),
			version: AtomicU64::new(0),
			ttl,
		}
	}

	fn live<T: Clone>(&self, entry: &Entry<T>) -> Option<T> {
		if entry.version != self.version.load(Ordering::Acquire) {
			return None;
		}
		if entry.inserted_at.elapsed() >= self.ttl {
			return None;
		}
		Some(entry.value.clone())
	}

	pub fn get_list(&self, skip: i64, limit: i64) -> Option<Arc<Vec<ServiceEntry>>> {
		let mut lists = self.lists.write();
		let entry = lists.get(&(skip, limit))?;
		self.live(entry)
	}

	pub fn put_list(&self, skip: i64, limit: i64, services: Arc<Vec<ServiceEntry>>) {
		let entry = Entry {
			version: self.version.load(Ordering::Acquire),
			inserted_at: Instant::now(),
			value: services,
		};
		self.lists.write().put((skip, limit), entry);
	}

	pub fn get_name(&self, name: &str) -> Option<Arc<ServiceEntry>> {
		let mut names = self.names.write();
		let entry = names.get(name)?;
		self.live(entry)
	}

	pub fn put_name(&self, name: &str, service: Arc<ServiceEntry>) {
		let entry = Entry {
			version: self.version.load(Ordering::Acquire),
			inserted_at: Instant::now(),
			value: service,
		};
		self.names.write().put(Box::from(name), entry);
	}

	/// Called on every registry write. Entries cached under older versions
	/// become misses immediately.
	pub fn invalidate(&self) {
		self.version.fetch_add(1, Ordering::AcqRel);
	}
}

pub type SharedRegistryCache = Arc<RegistryCache>;


// vim: ts=4
