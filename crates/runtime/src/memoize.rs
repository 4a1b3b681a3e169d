// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Single-flight memoization.
//!
//! [`Memoize`] runs a loader at most once per key. The first caller for a key
//! spawns the load as a tokio task; callers arriving while it runs wait on the
//! same task; callers arriving afterwards get the stored value without
//! awaiting anything.
//!
//! Failed loads are not stored, so the next caller retries. A waiter that
//! goes away (its future is dropped) only detaches itself; the load is aborted
//! once the last waiter is gone, and the key is vacant again.

use std::{
	collections::HashMap,
	fmt,
	future::Future,
	hash::Hash,
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
};

use futures_util::{
	FutureExt,
	future::{BoxFuture, Shared},
};
use introspect_type::{Error, Result};
use parking_lot::Mutex;
use tokio::task::AbortHandle;
use tracing::trace;

type Pending<V> = Shared<BoxFuture<'static, Result<V>>>;

enum Slot<V> {
	Ready(V),
	Loading {
		generation: u64,
		pending: Pending<V>,
		abort: AbortHandle,
		waiters: usize,
	},
}

pub struct Memoize<K, V>(Arc<MemoizeInner<K, V>>);

struct MemoizeInner<K, V> {
	slots: Mutex<HashMap<K, Slot<V>>>,
	generation: AtomicU64,
}

impl<K, V> Clone for Memoize<K, V> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}

impl<K, V> Default for Memoize<K, V>
where
	K: Eq + Hash + Clone + Send + Sync + 'static,
	V: Clone + Send + Sync + 'static,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V> fmt::Debug for Memoize<K, V>
where
	K: Eq + Hash + Clone + Send + Sync + 'static,
	V: Clone + Send + Sync + 'static,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Memoize").field("ready", &self.len()).finish()
	}
}

enum Join<K, V>
where
	K: Eq + Hash + Clone + Send + Sync + 'static,
	V: Clone + Send + Sync + 'static,
{
	Ready(V),
	Waiting(Waiter<K, V>, Pending<V>),
}

/// Registration of one caller on an in-flight load.
struct Waiter<K, V>
where
	K: Eq + Hash + Clone + Send + Sync + 'static,
	V: Clone + Send + Sync + 'static,
{
	inner: Arc<MemoizeInner<K, V>>,
	key: K,
	generation: u64,
}

impl<K, V> Drop for Waiter<K, V>
where
	K: Eq + Hash + Clone + Send + Sync + 'static,
	V: Clone + Send + Sync + 'static,
{
	fn drop(&mut self) {
		self.inner.release(&self.key, self.generation);
	}
}

impl<K, V> Memoize<K, V>
where
	K: Eq + Hash + Clone + Send + Sync + 'static,
	V: Clone + Send + Sync + 'static,
{
	pub fn new() -> Self {
		Self(Arc::new(MemoizeInner {
			slots: Mutex::new(HashMap::new()),
			generation: AtomicU64::new(0),
		}))
	}

	/// The stored value for `key`, if its load has completed.
	pub fn get(&self, key: &K) -> Option<V> {
		match self.0.slots.lock().get(key) {
			Some(Slot::Ready(value)) => Some(value.clone()),
			_ => None,
		}
	}

	/// Store a value directly. An in-flight load for `key` is aborted and
	/// its waiters receive `value` instead.
	pub fn insert(&self, key: K, value: V) {
		let previous = self.0.slots.lock().insert(key, Slot::Ready(value));
		if let Some(Slot::Loading {
			generation,
			abort,
			..
		}) = previous
		{
			abort.abort();
			trace!(generation, "memoize: load superseded by insert");
		}
	}

	/// Number of stored values.
	pub fn len(&self) -> usize {
		self.0.slots.lock().values().filter(|slot| matches!(slot, Slot::Ready(_))).count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Return the value for `key`, running `load` if no load for `key` has
	/// completed or is in flight.
	pub async fn get_or_load<F, Fut>(&self, key: K, load: F) -> Result<V>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<V>> + Send + 'static,
	{
		let join = match self.join(&key) {
			Some(join) => join,
			None => self.start(key, load()),
		};

		match join {
			Join::Ready(value) => Ok(value),
			Join::Waiting(waiter, pending) => {
				let result = pending.await;
				let superseded = match &result {
					Err(Error::LoadAborted { .. }) => self.get(&waiter.key),
					_ => None,
				};
				drop(waiter);
				superseded.map_or(result, Ok)
			}
		}
	}

	fn join(&self, key: &K) -> Option<Join<K, V>> {
		let mut slots = self.0.slots.lock();
		self.attach(&mut slots, key)
	}

	fn attach(&self, slots: &mut HashMap<K, Slot<V>>, key: &K) -> Option<Join<K, V>> {
		match slots.get_mut(key)? {
			Slot::Ready(value) => Some(Join::Ready(value.clone())),
			Slot::Loading {
				generation,
				pending,
				waiters,
				..
			} => {
				*waiters += 1;
				let waiter = Waiter {
					inner: self.0.clone(),
					key: key.clone(),
					generation: *generation,
				};
				Some(Join::Waiting(waiter, pending.clone()))
			}
		}
	}

	fn start<Fut>(&self, key: K, future: Fut) -> Join<K, V>
	where
		Fut: Future<Output = Result<V>> + Send + 'static,
	{
		let mut slots = self.0.slots.lock();
		// another caller may have started the load since `join` released the lock
		if let Some(join) = self.attach(&mut slots, &key) {
			return join;
		}

		let generation = self.0.generation.fetch_add(1, Ordering::Relaxed);
		let inner = self.0.clone();
		let task_key = key.clone();
		let handle = tokio::spawn(async move {
			let result = future.await;
			inner.finish(&task_key, generation, &result);
			result
		});

		let abort = handle.abort_handle();
		let pending = handle
			.map(|joined| {
				joined.unwrap_or_else(|err| {
					Err(Error::LoadAborted {
						reason: err.to_string(),
					})
				})
			})
			.boxed()
			.shared();

		slots.insert(
			key.clone(),
			Slot::Loading {
				generation,
				pending: pending.clone(),
				abort,
				waiters: 1,
			},
		);
		trace!(generation, "memoize: load started");

		let waiter = Waiter {
			inner: self.0.clone(),
			key,
			generation,
		};
		Join::Waiting(waiter, pending)
	}
}

impl<K, V> MemoizeInner<K, V>
where
	K: Eq + Hash + Clone + Send + Sync + 'static,
	V: Clone + Send + Sync + 'static,
{
	fn finish(&self, key: &K, generation: u64, result: &Result<V>) {
		let mut slots = self.slots.lock();
		let current = matches!(slots.get(key), Some(Slot::Loading { generation: g, .. }) if *g == generation);
		if !current {
			return;
		}

		match result {
			Ok(value) => {
				slots.insert(key.clone(), Slot::Ready(value.clone()));
			}
			Err(err) => {
				slots.remove(key);
				trace!(generation, %err, "memoize: load failed, not stored");
			}
		}
	}

	fn release(&self, key: &K, generation: u64) {
		let mut slots = self.slots.lock();
		let abandoned = match slots.get_mut(key) {
			Some(Slot::Loading {
				generation: g,
				waiters,
				abort,
				..
			}) if *g == generation => {
				*waiters -= 1;
				if *waiters == 0 {
					abort.abort();
					true
				} else {
					false
				}
			}
			_ => false,
		};

		if abandoned {
			slots.remove(key);
			trace!(generation, "memoize: last waiter gone, load aborted");
		}
	}
}

#[cfg(test)]
mod tests {
	use std::{
		sync::atomic::{AtomicUsize, Ordering},
		time::Duration,
	};

	use futures_util::future::join_all;
	use tokio::{sync::Notify, time::sleep};

	use super::*;

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn test_single_flight() {
		let memo: Memoize<&'static str, Arc<String>> = Memoize::new();
		let calls = Arc::new(AtomicUsize::new(0));

		let callers = (0..50).map(|_| {
			let memo = memo.clone();
			let calls = calls.clone();
			tokio::spawn(async move {
				memo.get_or_load("X", || async move {
					calls.fetch_add(1, Ordering::SeqCst);
					sleep(Duration::from_millis(20)).await;
					Ok(Arc::new("value".to_string()))
				})
				.await
			})
		});

		let results: Vec<Arc<String>> =
			join_all(callers).await.into_iter().map(|joined| joined.unwrap().unwrap()).collect();

		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(results.len(), 50);
		assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
	}

	#[tokio::test]
	async fn test_value_retained() {
		let memo: Memoize<u32, u32> = Memoize::new();
		assert_eq!(memo.get_or_load(1, || async { Ok(10) }).await, Ok(10));
		// a second loader is never consulted
		assert_eq!(memo.get_or_load(1, || async { Ok(99) }).await, Ok(10));
		assert_eq!(memo.get(&1), Some(10));
		assert_eq!(memo.len(), 1);
	}

	#[tokio::test]
	async fn test_failure_not_cached() {
		let memo: Memoize<u32, u32> = Memoize::new();
		let calls = Arc::new(AtomicUsize::new(0));

		let load = |calls: Arc<AtomicUsize>| async move {
			if calls.fetch_add(1, Ordering::SeqCst) == 0 {
				Err(Error::query("connection reset"))
			} else {
				Ok(5)
			}
		};

		let first = memo.get_or_load(1, || load(calls.clone())).await;
		assert_eq!(first, Err(Error::query("connection reset")));
		assert!(memo.is_empty());

		let second = memo.get_or_load(1, || load(calls.clone())).await;
		assert_eq!(second, Ok(5));
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn test_dropped_waiter_keeps_shared_load() {
		let memo: Memoize<u32, u32> = Memoize::new();
		let release = Arc::new(Notify::new());
		let calls = Arc::new(AtomicUsize::new(0));

		let load = {
			let release = release.clone();
			let calls = calls.clone();
			move || async move {
				calls.fetch_add(1, Ordering::SeqCst);
				release.notified().await;
				Ok(42)
			}
		};

		let staying = tokio::spawn({
			let memo = memo.clone();
			async move { memo.get_or_load(7, load).await }
		});
		sleep(Duration::from_millis(10)).await;

		// this caller gives up while the load is in flight
		let leaving = memo.get_or_load(7, || async { Ok(0) });
		let timed_out = tokio::time::timeout(Duration::from_millis(10), leaving).await;
		assert!(timed_out.is_err());

		release.notify_one();
		assert_eq!(staying.await.unwrap(), Ok(42));
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(memo.get(&7), Some(42));
	}

	#[tokio::test]
	async fn test_last_waiter_gone_aborts_load() {
		let memo: Memoize<u32, u32> = Memoize::new();
		let started = Arc::new(AtomicUsize::new(0));

		let waiting = memo.get_or_load(3, {
			let started = started.clone();
			move || async move {
				started.fetch_add(1, Ordering::SeqCst);
				std::future::pending::<()>().await;
				Ok(1)
			}
		});
		let timed_out = tokio::time::timeout(Duration::from_millis(10), waiting).await;
		assert!(timed_out.is_err());
		assert_eq!(started.load(Ordering::SeqCst), 1);

		// nothing was stored, so the next caller loads again
		assert_eq!(memo.get_or_load(3, || async { Ok(2) }).await, Ok(2));
	}

	#[tokio::test]
	async fn test_insert_supersedes_load() {
		let memo: Memoize<u32, u32> = Memoize::new();
		let started = Arc::new(Notify::new());
		let finished = Arc::new(AtomicUsize::new(0));

		let waiting = tokio::spawn({
			let memo = memo.clone();
			let started = started.clone();
			let finished = finished.clone();
			async move {
				memo.get_or_load(4, move || async move {
					started.notify_one();
					sleep(Duration::from_millis(50)).await;
					finished.fetch_add(1, Ordering::SeqCst);
					Ok(1)
				})
				.await
			}
		});
		started.notified().await;

		memo.insert(4, 2);
		assert_eq!(waiting.await.unwrap(), Ok(2));

		sleep(Duration::from_millis(80)).await;
		assert_eq!(finished.load(Ordering::SeqCst), 0);
		assert_eq!(memo.get(&4), Some(2));
	}

	#[tokio::test]
	async fn test_insert_seeds_value() {
		let memo: Memoize<&'static str, u32> = Memoize::new();
		memo.insert("a", 1);
		assert_eq!(memo.get_or_load("a", || async { Ok(2) }).await, Ok(1));
	}
}
