//! Process-wide codec memo table.
//!
//! A slot is either `Ready` or `Building`. The first caller for a type
//! publishes a `Building` slot and constructs the codec without holding the
//! table lock. Every other request for that type, from a recursive build or
//! another thread, receives a forwarding codec which blocks on the slot's
//! condition variable until the real codec is published, then delegates.
//!
//! Failed builds are not cached: the slot is removed, waiters are woken with
//! the error, and the next request builds again.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

use bk_reflect::info::TypeInfo;
use bk_utils::TypeIdMap;

use crate::SchemaError;

// -----------------------------------------------------------------------------
// Forward

/// A codec that can stand in for one still being built.
pub(crate) trait Forward: Clone + Send + Sync + 'static {
    fn forward(pending: Arc<Pending<Self>>) -> Self;
}

// -----------------------------------------------------------------------------
// Pending

enum PendingState<F> {
    Building,
    Ready(F),
    Failed(SchemaError),
}

/// The rendezvous of one in-progress build.
pub(crate) struct Pending<F> {
    ty: &'static str,
    state: Mutex<PendingState<F>>,
    ready: Condvar,
}

impl<F: Clone> Pending<F> {
    fn new(ty: &'static str) -> Self {
        Self {
            ty,
            state: Mutex::new(PendingState::Building),
            ready: Condvar::new(),
        }
    }

    /// Blocks until the build finishes.
    pub(crate) fn wait(&self) -> Result<F, SchemaError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            match &*state {
                PendingState::Ready(codec) => return Ok(codec.clone()),
                PendingState::Failed(err) => return Err(err.clone()),
                PendingState::Building => {
                    state = self.ready.wait(state).unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }

    fn resolve(&self, outcome: PendingState<F>) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = outcome;
        self.ready.notify_all();
    }
}

// -----------------------------------------------------------------------------
// TypeCache

enum Slot<F> {
    Ready(F),
    Building(Arc<Pending<F>>),
}

/// Append-only `TypeId -> codec` table.
pub(crate) struct TypeCache<F> {
    slots: Mutex<TypeIdMap<Slot<F>>>,
}

impl<F: Forward> TypeCache<F> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Mutex::new(TypeIdMap::new()),
        }
    }

    /// Returns the cached codec of `info`, building it with `build` if absent.
    ///
    /// While a build is in progress, the returned codec may be a forwarding
    /// one; it must not be invoked before the outermost build returns on the
    /// building thread.
    pub(crate) fn get_or_build(
        &self,
        info: &'static TypeInfo,
        build: impl FnOnce() -> Result<F, SchemaError>,
    ) -> Result<F, SchemaError> {
        let id = info.ty_id();
        let pending = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            match slots.get(&id) {
                Some(Slot::Ready(codec)) => return Ok(codec.clone()),
                Some(Slot::Building(pending)) => return Ok(F::forward(pending.clone())),
                None => {
                    let pending = Arc::new(Pending::new(info.type_name()));
                    slots.insert(id, Slot::Building(pending.clone()));
                    pending
                }
            }
        };

        log::debug!("building JSON codec for `{}`", info.type_name());

        let mut guard = BuildGuard {
            cache: self,
            info,
            pending,
            finished: false,
        };
        let result = build();
        guard.finish(result.clone());
        result
    }

    #[cfg(test)]
    fn is_ready(&self, info: &'static TypeInfo) -> bool {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        matches!(slots.get(&info.ty_id()), Some(Slot::Ready(_)))
    }
}

// Resolves the pending slot even if `build` panics.
struct BuildGuard<'a, F: Forward> {
    cache: &'a TypeCache<F>,
    info: &'static TypeInfo,
    pending: Arc<Pending<F>>,
    finished: bool,
}

impl<F: Forward> BuildGuard<'_, F> {
    fn finish(&mut self, result: Result<F, SchemaError>) {
        self.finished = true;
        let mut slots = self.cache.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match result {
            Ok(codec) => {
                slots.insert(self.info.ty_id(), Slot::Ready(codec.clone()));
                drop(slots);
                self.pending.resolve(PendingState::Ready(codec));
            }
            Err(err) => {
                log::warn!("JSON codec for `{}` is misconfigured: {err}", self.info.type_name());
                slots.remove(&self.info.ty_id());
                drop(slots);
                self.pending.resolve(PendingState::Failed(err));
            }
        }
    }
}

impl<F: Forward> Drop for BuildGuard<'_, F> {
    fn drop(&mut self) {
        if !self.finished {
            let ty = self.pending.ty;
            self.finish(Err(SchemaError::Incomplete { ty }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bk_reflect::info::Typed;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[derive(Clone)]
    enum Probe {
        Real(u32),
        Forward(Arc<Pending<Probe>>),
    }

    impl Probe {
        fn resolve(&self) -> Result<u32, SchemaError> {
            match self {
                Self::Real(value) => Ok(*value),
                Self::Forward(pending) => pending.wait()?.resolve(),
            }
        }
    }

    impl Forward for Probe {
        fn forward(pending: Arc<Pending<Self>>) -> Self {
            Self::Forward(pending)
        }
    }

    #[test]
    fn builds_once() {
        static CACHE: TypeCache<Probe> = TypeCache::new();
        let builds = AtomicUsize::new(0);
        let info = <u8 as Typed>::type_info();

        for _ in 0..3 {
            let probe = CACHE
                .get_or_build(info, || {
                    builds.fetch_add(1, Ordering::Relaxed);
                    Ok(Probe::Real(7))
                })
                .unwrap();
            assert_eq!(probe.resolve(), Ok(7));
        }
        assert_eq!(builds.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn recursive_request_gets_forwarder() {
        static CACHE: TypeCache<Probe> = TypeCache::new();
        let info = <u16 as Typed>::type_info();

        let mut inner = None;
        CACHE
            .get_or_build(info, || {
                inner = Some(CACHE.get_or_build(info, || unreachable!())?);
                Ok(Probe::Real(16))
            })
            .unwrap();

        let inner = inner.unwrap();
        assert!(matches!(inner, Probe::Forward(_)));
        assert_eq!(inner.resolve(), Ok(16));
    }

    #[test]
    fn failures_are_not_cached() {
        static CACHE: TypeCache<Probe> = TypeCache::new();
        let info = <u32 as Typed>::type_info();
        let err = SchemaError::DuplicateExtras { ty: "u32" };

        let first = CACHE.get_or_build(info, || Err(err.clone()));
        assert_eq!(first.err(), Some(err));
        assert!(!CACHE.is_ready(info));

        let second = CACHE.get_or_build(info, || Ok(Probe::Real(32))).unwrap();
        assert_eq!(second.resolve(), Ok(32));
        assert!(CACHE.is_ready(info));
    }

    #[test]
    fn panicking_build_releases_waiters() {
        static CACHE: TypeCache<Probe> = TypeCache::new();
        let info = <i8 as Typed>::type_info();

        let mut forwarder = None;
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = CACHE.get_or_build(info, || {
                forwarder = Some(CACHE.get_or_build(info, || unreachable!()).unwrap());
                panic!("build failed");
            });
        }));
        assert!(outcome.is_err());

        let err = forwarder.unwrap().resolve().unwrap_err();
        assert!(matches!(err, SchemaError::Incomplete { .. }));
        assert!(!CACHE.is_ready(info));
    }

    #[test]
    fn concurrent_users_block_until_ready() {
        static CACHE: TypeCache<Probe> = TypeCache::new();
        let info = <i16 as Typed>::type_info();
        let (started_tx, started_rx) = std::sync::mpsc::channel();

        let builder = thread::spawn(move || {
            CACHE
                .get_or_build(info, || {
                    started_tx.send(()).unwrap();
                    thread::sleep(Duration::from_millis(50));
                    Ok(Probe::Real(99))
                })
                .unwrap()
        });

        started_rx.recv().unwrap();
        let waiter = CACHE.get_or_build(info, || unreachable!()).unwrap();
        assert!(matches!(waiter, Probe::Forward(_)));
        assert_eq!(waiter.resolve(), Ok(99));
        assert_eq!(builder.join().unwrap().resolve(), Ok(99));
    }
}
