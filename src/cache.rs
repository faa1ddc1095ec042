//! Per-scope bearer-token cache with expiry-driven invalidation.
//!
//! Entries are invalidated by a detached one-shot timer scheduled at 75% of the
//! token's declared TTL. The under-approximation guarantees the cache never
//! serves a token past the provider's true expiry, allowing for clock skew and
//! in-flight request latency, at the cost of discarding up to a quarter of the
//! remaining validity.

// std
use std::{sync::Weak, time::Duration};
// self
use crate::{_prelude::*, auth::Scope};

/// TTL assumed when the token-exchange response omits `expires_in`, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 3600;

type EntryMap = Arc<Mutex<HashMap<Scope, CachedToken>>>;

/// Maps permission scopes to currently valid bearer tokens.
///
/// Lookups are pure map reads and never block on I/O. [`store`](Self::store)
/// schedules its invalidation timer with [`tokio::spawn`], so it must be called
/// from within a Tokio runtime. The timer task holds only a [`Weak`] reference
/// to the map: it never keeps the cache (or the process) alive and is safely
/// abandoned on shutdown.
#[derive(Clone, Debug, Default)]
pub struct TokenCache(EntryMap);
impl TokenCache {
	/// Returns the cached token for `scope`, if one is present.
	pub fn lookup(&self, scope: &Scope) -> Option<String> {
		self.0.lock().get(scope).map(|entry| entry.token.clone())
	}

	/// Caches `token` for `scope`, overwriting any existing entry.
	///
	/// Schedules invalidation at 75% of `ttl_secs`. Overwriting drops the previous
	/// entry, which aborts its timer; a stale timer that already fired at most
	/// deletes an entry that was due for regeneration anyway.
	pub fn store(&self, scope: Scope, token: impl Into<String>, ttl_secs: u64) {
		let entries = Arc::downgrade(&self.0);
		let key = scope.clone();
		// Anchor the deadline now; the task may not be polled immediately.
		let deadline = tokio::time::Instant::now() + invalidation_delay(ttl_secs);
		let invalidation = tokio::spawn(async move {
			tokio::time::sleep_until(deadline).await;

			let Some(entries) = Weak::upgrade(&entries) else { return };

			entries.lock().remove(&key);
		});

		self.0.lock().insert(scope, CachedToken { token: token.into(), invalidation });
	}

	/// Removes the entry for `scope`, aborting its invalidation timer.
	pub fn invalidate(&self, scope: &Scope) {
		self.0.lock().remove(scope);
	}
}

/// A cached bearer token and the handle of its scheduled invalidation.
struct CachedToken {
	token: String,
	invalidation: tokio::task::JoinHandle<()>,
}
impl Drop for CachedToken {
	fn drop(&mut self) {
		self.invalidation.abort();
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken").field("token", &"<redacted>").finish()
	}
}

fn invalidation_delay(ttl_secs: u64) -> Duration {
	Duration::from_secs(ttl_secs.saturating_mul(3) / 4)
}
