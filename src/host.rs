//! [`Kernel`] for hosted targets: every OS thread is an execution context.
//!
//! The critical section is a re-entrant spin lock shared by all threads, wakes are
//! delivered through a per-thread notification slot, and one tick is one millisecond
//! since the kernel was created. ISR variants behave like their task counterparts.
//!
//! A thread's notification slot lives in thread-local storage; the kernel only keeps a
//! weak reference, so threads that exit stop being wakeable and their entries are
//! pruned on the next registration.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::thread;
use std::time::{Duration, Instant};

use crate::kernel::{Kernel, Ticks, WAIT_FOREVER};

/// Identity of a host thread.
pub type ThreadId = u64;

static NEXT_THREAD: AtomicU64 = AtomicU64::new(1);

std::thread_local! {
    static THREAD: ThreadId = NEXT_THREAD.fetch_add(1, Ordering::Relaxed);
    static NOTIFICATION: Arc<Notification> = Arc::default();
}

fn current_thread() -> ThreadId {
    THREAD.with(|id| *id)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct Notification {
    pending: Mutex<bool>,
    signal: Condvar,
}

/// [`Kernel`] backed by OS threads, for tests and host builds.
pub struct HostKernel {
    owner: AtomicU64,
    depth: AtomicUsize,
    threads: Mutex<HashMap<ThreadId, Weak<Notification>>>,
    epoch: Instant,
}

impl HostKernel {
    /// Kernel with the tick clock starting now.
    pub fn new() -> Self {
        Self {
            owner: AtomicU64::new(0),
            depth: AtomicUsize::new(0),
            threads: Mutex::new(HashMap::new()),
            epoch: Instant::now(),
        }
    }

    /// The running thread's slot, registered so other threads can wake it.
    fn own_notification(&self) -> Arc<Notification> {
        let slot = NOTIFICATION.with(Arc::clone);
        let mut threads = lock(&self.threads);
        threads.retain(|_, weak| weak.strong_count() > 0);
        threads
            .entry(current_thread())
            .or_insert_with(|| Arc::downgrade(&slot));
        slot
    }

    fn notification(&self, thread: ThreadId) -> Option<Arc<Notification>> {
        lock(&self.threads).get(&thread).and_then(Weak::upgrade)
    }

    fn acquire(&self) {
        let me = current_thread();
        if self.owner.load(Ordering::Acquire) == me {
            self.depth.fetch_add(1, Ordering::Relaxed);
            return;
        }
        while self
            .owner
            .compare_exchange_weak(0, me, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            thread::yield_now();
        }
        self.depth.store(1, Ordering::Relaxed);
    }

    fn release(&self) {
        debug_assert_eq!(self.owner.load(Ordering::Relaxed), current_thread());
        if self.depth.fetch_sub(1, Ordering::Relaxed) == 1 {
            self.owner.store(0, Ordering::Release);
        }
    }
}

impl Default for HostKernel {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: `acquire`/`release` form a re-entrant lock shared by every thread.
unsafe impl Kernel for HostKernel {
    type Context = ThreadId;
    type IsrMask = ();

    fn enter_critical(&self) {
        self.acquire();
    }

    fn exit_critical(&self) {
        self.release();
    }

    fn enter_critical_from_isr(&self) -> Self::IsrMask {
        self.acquire();
    }

    fn exit_critical_from_isr(&self, _mask: Self::IsrMask) {
        self.release();
    }

    fn current(&self) -> Self::Context {
        self.own_notification();
        current_thread()
    }

    fn clear_pending_wake(&self) {
        let slot = self.own_notification();
        *lock(&slot.pending) = false;
    }

    fn suspend(&self, timeout: Ticks) -> bool {
        let slot = self.own_notification();
        let mut pending = lock(&slot.pending);
        if timeout == WAIT_FOREVER {
            while !*pending {
                pending = slot
                    .signal
                    .wait(pending)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        } else {
            let deadline = Instant::now() + Duration::from_millis(u64::from(timeout));
            while !*pending {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                pending = slot
                    .signal
                    .wait_timeout(pending, deadline - now)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0;
            }
        }
        core::mem::replace(&mut *pending, false)
    }

    fn wake(&self, ctx: Self::Context) -> bool {
        let Some(slot) = self.notification(ctx) else {
            return false;
        };
        *lock(&slot.pending) = true;
        slot.signal.notify_one();
        true
    }

    fn wake_from_isr(&self, ctx: Self::Context, higher_priority_woken: &mut bool) -> bool {
        let woke = self.wake(ctx);
        *higher_priority_woken |= woke;
        woke
    }

    fn now(&self) -> Ticks {
        self.epoch.elapsed().as_millis() as Ticks
    }
}
