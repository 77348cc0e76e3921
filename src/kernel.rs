//! Scheduler services a channel borrows from the surrounding RTOS port.
//!
//! The channel never owns a scheduler. It needs four things from one:
//! - an exclusive region (critical section) usable from tasks and interrupts,
//! - the identity of the running execution context,
//! - a single-slot block/wake primitive with timeout, keyed by that identity,
//! - a tick counter to turn a timeout into a deadline.

use core::fmt::Debug;

/// Scheduler tick count. Wraps.
pub type Ticks = u32;

/// Timeout value that never expires.
pub const WAIT_FOREVER: Ticks = Ticks::MAX;

/// Scheduler services used by a channel.
///
/// # Safety
///
/// Implementations must guarantee that code between `enter_critical*` and the
/// matching `exit_critical*` never runs concurrently with any other such region
/// on any core, including from interrupt handlers. Regions must nest when the
/// same context enters twice. The channel stores its waiter slots in plain cells
/// protected only by this guarantee.
pub unsafe trait Kernel {
    /// Identity of an execution context that can be suspended and woken.
    type Context: Copy + Eq + Debug;

    /// Interrupt state saved by [`Kernel::enter_critical_from_isr`].
    type IsrMask: Copy;

    fn enter_critical(&self);
    fn exit_critical(&self);
    fn enter_critical_from_isr(&self) -> Self::IsrMask;
    fn exit_critical_from_isr(&self, mask: Self::IsrMask);

    /// The running task.
    fn current(&self) -> Self::Context;

    /// Drop any wake-up already pending for the running task, so a following
    /// [`Kernel::suspend`] only returns for a wake issued after this call.
    fn clear_pending_wake(&self);

    /// Block the running task until woken or until `timeout` ticks elapse.
    /// Returns `true` if woken.
    fn suspend(&self, timeout: Ticks) -> bool;

    /// Wake `ctx` from task context.
    fn wake(&self, ctx: Self::Context) -> bool;

    /// Wake `ctx` from an interrupt handler. Sets `higher_priority_woken` when
    /// the caller should request a context switch on leaving the interrupt.
    fn wake_from_isr(&self, ctx: Self::Context, higher_priority_woken: &mut bool) -> bool;

    /// Current tick count.
    fn now(&self) -> Ticks;
}

unsafe impl<K: Kernel + ?Sized> Kernel for &K {
    type Context = K::Context;
    type IsrMask = K::IsrMask;

    #[inline]
    fn enter_critical(&self) {
        (**self).enter_critical()
    }

    #[inline]
    fn exit_critical(&self) {
        (**self).exit_critical()
    }

    #[inline]
    fn enter_critical_from_isr(&self) -> Self::IsrMask {
        (**self).enter_critical_from_isr()
    }

    #[inline]
    fn exit_critical_from_isr(&self, mask: Self::IsrMask) {
        (**self).exit_critical_from_isr(mask)
    }

    #[inline]
    fn current(&self) -> Self::Context {
        (**self).current()
    }

    #[inline]
    fn clear_pending_wake(&self) {
        (**self).clear_pending_wake()
    }

    #[inline]
    fn suspend(&self, timeout: Ticks) -> bool {
        (**self).suspend(timeout)
    }

    #[inline]
    fn wake(&self, ctx: Self::Context) -> bool {
        (**self).wake(ctx)
    }

    #[inline]
    fn wake_from_isr(&self, ctx: Self::Context, higher_priority_woken: &mut bool) -> bool {
        (**self).wake_from_isr(ctx, higher_priority_woken)
    }

    #[inline]
    fn now(&self) -> Ticks {
        (**self).now()
    }
}

/// RAII critical section. The ISR flavor restores the saved mask on drop.
pub(crate) struct Critical<'k, K: Kernel> {
    kernel: &'k K,
    mask: Option<K::IsrMask>,
}

impl<'k, K: Kernel> Critical<'k, K> {
    #[inline]
    pub(crate) fn enter(kernel: &'k K, from_isr: bool) -> Self {
        let mask = if from_isr {
            Some(kernel.enter_critical_from_isr())
        } else {
            kernel.enter_critical();
            None
        };
        Self { kernel, mask }
    }
}

impl<K: Kernel> Drop for Critical<'_, K> {
    #[inline]
    fn drop(&mut self) {
        match self.mask {
            Some(mask) => self.kernel.exit_critical_from_isr(mask),
            None => self.kernel.exit_critical(),
        }
    }
}

/// Remaining-time bookkeeping for a blocking call that may suspend several times.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Deadline {
    start: Ticks,
    wait: Ticks,
}

impl Deadline {
    #[inline]
    pub(crate) fn start(now: Ticks, wait: Ticks) -> Self {
        Self { start: now, wait }
    }

    /// Ticks left before the deadline, or `None` once it has passed.
    /// [`WAIT_FOREVER`] never expires.
    pub(crate) fn remaining(&self, now: Ticks) -> Option<Ticks> {
        if self.wait == WAIT_FOREVER {
            return Some(WAIT_FOREVER);
        }
        let elapsed = now.wrapping_sub(self.start);
        if elapsed >= self.wait {
            None
        } else {
            Some(self.wait - elapsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Deadline, WAIT_FOREVER};

    #[test]
    fn deadline_counts_down() {
        let d = Deadline::start(100, 10);
        assert_eq!(d.remaining(100), Some(10));
        assert_eq!(d.remaining(104), Some(6));
        assert_eq!(d.remaining(110), None);
        assert_eq!(d.remaining(250), None);
    }

    #[test]
    fn deadline_survives_tick_wrap() {
        let d = Deadline::start(u32::MAX - 2, 5);
        assert_eq!(d.remaining(0), Some(2));
        assert_eq!(d.remaining(2), None);
    }

    #[test]
    fn forever_never_expires() {
        let d = Deadline::start(7, WAIT_FOREVER);
        assert_eq!(d.remaining(6), Some(WAIT_FOREVER));
    }

    #[test]
    fn zero_wait_is_already_expired() {
        let d = Deadline::start(3, 0);
        assert_eq!(d.remaining(3), None);
    }
}
