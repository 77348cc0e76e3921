//! Bounded SPSC byte channel with stream and message framing.
//!
//! # Overview
//! - One writer and one reader, each either a task or an interrupt handler, possibly on
//!   different cores.
//! - Storage of `L` bytes holds at most `L - 1`; `head == tail` always means empty.
//! - `head` is only advanced by the writer and `tail` only by the reader, so the data copy
//!   itself never takes a lock.
//! - The kernel's critical section guards the two waiter slots and the default wake.
//!
//! # Memory ordering
//! The writer copies a whole unit (header and payload in message mode) and then publishes
//! it with a single release store of `head`. The reader acquires `head`, copies, and frees
//! the space with a release store of `tail`. A reader therefore never observes part of a
//! message.
//!
//! # Waking
//! A blocked reader is woken by the writer once at least `trigger_level` bytes are
//! readable. A blocked writer is woken by every receive that moves data.

use core::cell::UnsafeCell;
use core::fmt;
use core::ptr;

#[cfg(not(feature = "portable-atomic"))]
use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
#[cfg(feature = "portable-atomic")]
use portable_atomic::{AtomicU8, AtomicUsize, Ordering};

#[cfg(feature = "alloc")]
use alloc::{boxed::Box, vec::Vec};

use crate::config::{CompletionHook, Config, LengthPrefix, Mode, Wake};
use crate::error::CreateError;
use crate::kernel::{Critical, Deadline, Kernel, Ticks};
use crate::trace;

const SENDING: u8 = 1 << 0;
const RECEIVING: u8 = 1 << 1;
const RESETTING: u8 = 1 << 2;

const WRITER_TAKEN: u8 = 1 << 0;
const READER_TAKEN: u8 = 1 << 1;

enum Storage<'a> {
    #[cfg(feature = "alloc")]
    Owned(Box<[UnsafeCell<u8>]>),
    Borrowed(&'a mut [UnsafeCell<u8>]),
}

impl Storage<'_> {
    #[inline]
    fn cells(&self) -> &[UnsafeCell<u8>] {
        match self {
            #[cfg(feature = "alloc")]
            Storage::Owned(cells) => cells,
            Storage::Borrowed(cells) => cells,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    Writer,
    Reader,
}

impl Side {
    const fn name(self) -> &'static str {
        match self {
            Side::Writer => "writer",
            Side::Reader => "reader",
        }
    }
}

/// Bounded single-writer/single-reader byte channel.
///
/// Data moves through a [`Writer`] and a [`Reader`]; at most one of each may exist at a
/// time. Introspection, reset and the out-of-band wakes are available on the channel.
pub struct Channel<'a, K: Kernel> {
    kernel: K,
    storage: Storage<'a>,
    len: usize,
    head: AtomicUsize,
    tail: AtomicUsize,
    trigger_level: AtomicUsize,
    mode: Mode,
    number: AtomicUsize,
    waiting_writer: UnsafeCell<Option<K::Context>>,
    waiting_reader: UnsafeCell<Option<K::Context>>,
    on_send_complete: Option<CompletionHook<K>>,
    on_receive_complete: Option<CompletionHook<K>>,
    activity: AtomicU8,
    handles: AtomicU8,
}

// SAFETY: cursors are atomic, buffer regions are partitioned between the single writer
// and the single reader by the cursors, and waiter slots are only accessed inside the
// kernel's critical section.
unsafe impl<K: Kernel + Sync> Sync for Channel<'_, K> where K::Context: Send {}

#[cfg(feature = "alloc")]
impl<K: Kernel> Channel<'static, K> {
    /// Create a channel that owns `capacity + 1` bytes of heap storage.
    pub fn new(kernel: K, capacity: usize, config: Config<K>) -> Result<Self, CreateError> {
        Self::validate(capacity, &config)?;
        let len = capacity
            .checked_add(1)
            .ok_or(CreateError::Alloc { bytes: usize::MAX })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| CreateError::Alloc { bytes: len })?;
        cells.resize_with(len, || UnsafeCell::new(0));

        Ok(Self::init(
            kernel,
            Storage::Owned(cells.into_boxed_slice()),
            len,
            config,
        ))
    }
}

impl<'a, K: Kernel> Channel<'a, K> {
    /// Create a channel over caller-supplied storage. Capacity is `storage.len() - 1`.
    pub fn with_storage(
        kernel: K,
        storage: &'a mut [u8],
        config: Config<K>,
    ) -> Result<Self, CreateError> {
        let len = storage.len();
        Self::validate(len.saturating_sub(1), &config)?;

        // SAFETY: `UnsafeCell<u8>` has the same layout as `u8`, and the exclusive borrow
        // is held for `'a`.
        let cells = unsafe { &mut *(storage as *mut [u8] as *mut [UnsafeCell<u8>]) };

        Ok(Self::init(kernel, Storage::Borrowed(cells), len, config))
    }

    fn validate(capacity: usize, config: &Config<K>) -> Result<(), CreateError> {
        let header = config.mode.header_width();
        if capacity == 0 || capacity <= header {
            return Err(CreateError::TooSmall {
                capacity,
                required: header,
            });
        }
        if config.trigger_level > capacity {
            return Err(CreateError::TriggerLevel {
                trigger_level: config.trigger_level,
                capacity,
            });
        }
        Ok(())
    }

    fn init(kernel: K, storage: Storage<'a>, len: usize, config: Config<K>) -> Self {
        trace::debug!(
            "create {:?} channel: capacity {}, trigger level {}",
            config.mode,
            len - 1,
            config.trigger_level
        );
        Self {
            kernel,
            storage,
            len,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            trigger_level: AtomicUsize::new(config.trigger_level.max(1)),
            mode: config.mode,
            number: AtomicUsize::new(0),
            waiting_writer: UnsafeCell::new(None),
            waiting_reader: UnsafeCell::new(None),
            on_send_complete: config.on_send_complete,
            on_receive_complete: config.on_receive_complete,
            activity: AtomicU8::new(0),
            handles: AtomicU8::new(0),
        }
    }

    /// Destroy the channel. Caller-supplied storage is zeroed and handed back;
    /// owned storage is freed.
    pub fn delete(self) -> Option<&'a mut [u8]> {
        trace::debug!("delete channel {}", self.number());
        match self.storage {
            #[cfg(feature = "alloc")]
            Storage::Owned(_) => None,
            Storage::Borrowed(cells) => {
                // SAFETY: same layout as above; the unique borrow returns to the caller.
                let bytes = unsafe { &mut *(cells as *mut [UnsafeCell<u8>] as *mut [u8]) };
                bytes.fill(0);
                Some(bytes)
            }
        }
    }

    /// Take the writer handle.
    ///
    /// # Panics
    /// If a writer handle is already active.
    pub fn writer(&self) -> Writer<'_, 'a, K> {
        match self.try_writer() {
            Some(writer) => writer,
            None => panic!("channel already has an active writer"),
        }
    }

    /// Take the writer handle unless one is already active.
    pub fn try_writer(&self) -> Option<Writer<'_, 'a, K>> {
        let prev = self.handles.fetch_or(WRITER_TAKEN, Ordering::Acquire);
        if prev & WRITER_TAKEN == 0 {
            Some(Writer { channel: self })
        } else {
            None
        }
    }

    /// Take the reader handle.
    ///
    /// # Panics
    /// If a reader handle is already active.
    pub fn reader(&self) -> Reader<'_, 'a, K> {
        match self.try_reader() {
            Some(reader) => reader,
            None => panic!("channel already has an active reader"),
        }
    }

    /// Take the reader handle unless one is already active.
    pub fn try_reader(&self) -> Option<Reader<'_, 'a, K>> {
        let prev = self.handles.fetch_or(READER_TAKEN, Ordering::Acquire);
        if prev & READER_TAKEN == 0 {
            Some(Reader { channel: self })
        } else {
            None
        }
    }

    /// Framing discipline chosen at creation.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// `true` for length-prefixed message framing.
    #[inline]
    pub fn is_message(&self) -> bool {
        matches!(self.mode, Mode::Message(_))
    }

    /// Largest number of bytes the channel can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.len - 1
    }

    /// Readable bytes required before a writer wakes a blocked reader.
    #[inline]
    pub fn trigger_level(&self) -> usize {
        self.trigger_level.load(Ordering::Relaxed)
    }

    /// Change the trigger level. `0` is treated as `1`; levels above capacity are
    /// rejected.
    pub fn set_trigger_level(&self, bytes: usize) -> bool {
        let bytes = bytes.max(1);
        if bytes > self.capacity() {
            trace::warning!(
                "trigger level {} rejected, capacity {}",
                bytes,
                self.capacity()
            );
            return false;
        }
        self.trigger_level.store(bytes, Ordering::Relaxed);
        trace::debug!("trigger level set to {}", bytes);
        true
    }

    /// Application tag, kept across [`Channel::reset`].
    #[inline]
    pub fn number(&self) -> usize {
        self.number.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_number(&self, number: usize) {
        self.number.store(number, Ordering::Relaxed);
    }

    /// Free bytes the writer could use right now, framing included.
    pub fn spaces_available(&self) -> usize {
        loop {
            let tail = self.tail.load(Ordering::Acquire);
            let head = self.head.load(Ordering::Acquire);
            let mut spaces = self.len + tail - head - 1;
            if spaces >= self.len {
                spaces -= self.len;
            }
            if self.tail.load(Ordering::Acquire) == tail {
                return spaces;
            }
        }
    }

    /// Bytes the reader could take right now, framing included.
    pub fn bytes_available(&self) -> usize {
        loop {
            let head = self.head.load(Ordering::Acquire);
            let tail = self.tail.load(Ordering::Acquire);
            let mut count = self.len + head - tail;
            if count >= self.len {
                count -= self.len;
            }
            if self.head.load(Ordering::Acquire) == head {
                return count;
            }
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// No room for another byte, or in message mode for another header plus payload.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.spaces_available() <= self.mode.header_width()
    }

    /// Return the channel to empty. Fails while a task is blocked on either side or a
    /// transfer is in progress; mode, capacity, trigger level, hooks and number are kept.
    pub fn reset(&self) -> bool {
        self.reset_inner(false)
    }

    /// [`Channel::reset`] from an interrupt handler.
    pub fn reset_from_isr(&self) -> bool {
        self.reset_inner(true)
    }

    fn reset_inner(&self, from_isr: bool) -> bool {
        let cs = Critical::enter(&self.kernel, from_isr);
        if self.peek_waiter(&cs, Side::Writer).is_some()
            || self.peek_waiter(&cs, Side::Reader).is_some()
        {
            trace::warning!("reset rejected: a task is blocked on channel {}", self.number());
            return false;
        }
        if self
            .activity
            .compare_exchange(0, RESETTING, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            trace::warning!("reset rejected: transfer in progress on channel {}", self.number());
            return false;
        }
        self.head.store(0, Ordering::Relaxed);
        self.tail.store(0, Ordering::Relaxed);
        self.activity.store(0, Ordering::Release);
        trace::debug!("reset channel {}", self.number());
        true
    }

    /// Wake the reader blocked on this channel, if any, without moving data.
    /// Returns whether a reader was waiting.
    pub fn wake_reader(&self, wake: Wake<'_>) -> bool {
        self.wake_waiter(Side::Reader, wake)
    }

    /// Wake the writer blocked on this channel, if any, without moving data.
    /// Returns whether a writer was waiting.
    pub fn wake_writer(&self, wake: Wake<'_>) -> bool {
        self.wake_waiter(Side::Writer, wake)
    }

    /// Unblock a waiting reader from an interrupt handler based on an out-of-band
    /// condition.
    #[inline]
    pub fn send_completed_from_isr(&self, higher_priority_woken: &mut bool) -> bool {
        self.wake_reader(Wake::Deferred(higher_priority_woken))
    }

    /// Unblock a waiting writer from an interrupt handler.
    #[inline]
    pub fn receive_completed_from_isr(&self, higher_priority_woken: &mut bool) -> bool {
        self.wake_writer(Wake::Deferred(higher_priority_woken))
    }

    fn wake_waiter(&self, side: Side, wake: Wake<'_>) -> bool {
        let cs = Critical::enter(&self.kernel, wake.from_isr());
        let Some(ctx) = self.take_waiter(&cs, side) else {
            return false;
        };
        trace::trace!("wake {} {:?}", side.name(), ctx);
        match wake {
            Wake::Direct => {
                self.kernel.wake(ctx);
            }
            Wake::Deferred(woken) => {
                self.kernel.wake_from_isr(ctx, woken);
            }
        }
        true
    }

    fn send_complete(&self, wake: Wake<'_>) {
        match self.on_send_complete {
            Some(hook) => hook(self, wake),
            None => {
                self.wake_reader(wake);
            }
        }
    }

    fn receive_complete(&self, wake: Wake<'_>) {
        match self.on_receive_complete {
            Some(hook) => hook(self, wake),
            None => {
                self.wake_writer(wake);
            }
        }
    }

    #[inline]
    fn slot(&self, side: Side) -> &UnsafeCell<Option<K::Context>> {
        match side {
            Side::Writer => &self.waiting_writer,
            Side::Reader => &self.waiting_reader,
        }
    }

    fn register_waiter(&self, _cs: &Critical<'_, K>, side: Side, ctx: K::Context) {
        // SAFETY: waiter slots are only touched while the critical section is held.
        let slot = unsafe { &mut *self.slot(side).get() };
        assert!(
            slot.is_none(),
            "channel already has a blocked {}",
            side.name()
        );
        *slot = Some(ctx);
    }

    fn take_waiter(&self, _cs: &Critical<'_, K>, side: Side) -> Option<K::Context> {
        // SAFETY: see `register_waiter`.
        unsafe { (*self.slot(side).get()).take() }
    }

    fn peek_waiter(&self, _cs: &Critical<'_, K>, side: Side) -> Option<K::Context> {
        // SAFETY: see `register_waiter`.
        unsafe { *self.slot(side).get() }
    }

    /// Mark a transfer in progress so `reset` cannot move the cursors underneath it.
    fn begin(&self, bit: u8) -> Activity<'_> {
        let mut current = self.activity.load(Ordering::Relaxed);
        loop {
            if current & RESETTING != 0 {
                core::hint::spin_loop();
                current = self.activity.load(Ordering::Relaxed);
                continue;
            }
            match self.activity.compare_exchange_weak(
                current,
                current | bit,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Activity { flags: &self.activity, bit },
                Err(actual) => current = actual,
            }
        }
    }

    #[inline]
    fn base(&self) -> *mut u8 {
        UnsafeCell::raw_get(self.storage.cells().as_ptr())
    }

    #[inline]
    fn advance(&self, offset: usize, by: usize) -> usize {
        let next = offset + by;
        if next >= self.len { next - self.len } else { next }
    }

    /// Copy `src` into the ring at `offset`, wrapping once. Returns the next offset.
    ///
    /// # Safety
    /// Only the writer may call this, and `src.len()` must not exceed the free space
    /// starting at `offset`.
    unsafe fn write_bytes(&self, src: &[u8], offset: usize) -> usize {
        debug_assert!(src.len() < self.len);
        let first = src.len().min(self.len - offset);
        let base = self.base();
        // SAFETY: both ranges lie inside the storage and in space the reader will not
        // touch until `head` is published.
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), base.add(offset), first);
            ptr::copy_nonoverlapping(src.as_ptr().add(first), base, src.len() - first);
        }
        self.advance(offset, src.len())
    }

    /// Copy out of the ring at `offset`, wrapping once. Returns the next offset.
    ///
    /// # Safety
    /// Only the reader may call this, and `dst.len()` must not exceed the readable bytes
    /// starting at `offset`.
    unsafe fn read_bytes(&self, dst: &mut [u8], offset: usize) -> usize {
        debug_assert!(dst.len() < self.len);
        let first = dst.len().min(self.len - offset);
        let base = self.base();
        // SAFETY: both ranges were published by the writer and stay untouched until
        // `tail` moves past them.
        unsafe {
            ptr::copy_nonoverlapping(base.add(offset), dst.as_mut_ptr(), first);
            ptr::copy_nonoverlapping(base, dst.as_mut_ptr().add(first), dst.len() - first);
        }
        self.advance(offset, dst.len())
    }

    fn send_inner(&self, data: &[u8], timeout: Ticks, wake: Wake<'_>) -> usize {
        let _active = self.begin(SENDING);
        let capacity = self.capacity();
        let mut timeout = timeout;

        let required = match self.mode {
            Mode::Message(prefix) => {
                assert!(
                    data.len() <= prefix.max_len(),
                    "message of {} bytes does not fit a {:?} length header",
                    data.len(),
                    prefix
                );
                let required = data.len().saturating_add(prefix.width());
                if required > capacity {
                    trace::trace!(
                        "message of {} bytes can never fit capacity {}",
                        data.len(),
                        capacity
                    );
                    timeout = 0;
                }
                required
            }
            Mode::Stream => data.len().min(capacity),
        };

        let mut sampled = None;
        if timeout != 0 {
            let deadline = Deadline::start(self.kernel.now(), timeout);
            while let Some(remaining) = deadline.remaining(self.kernel.now()) {
                {
                    let cs = Critical::enter(&self.kernel, false);
                    let spaces = self.spaces_available();
                    sampled = Some(spaces);
                    if spaces >= required {
                        break;
                    }
                    self.kernel.clear_pending_wake();
                    self.register_waiter(&cs, Side::Writer, self.kernel.current());
                }
                trace::trace!(
                    "send blocked: {} of {} bytes free, {} ticks left",
                    sampled.unwrap_or(0),
                    required,
                    remaining
                );
                self.kernel.suspend(remaining);
                let cs = Critical::enter(&self.kernel, false);
                self.take_waiter(&cs, Side::Writer);
            }
        }

        let spaces = match sampled {
            Some(spaces) if spaces >= required => spaces,
            _ => self.spaces_available(),
        };
        let written = self.write_unit(data, spaces, required);
        trace::trace!("sent {} of {} bytes", written, data.len());

        if written > 0 && self.bytes_available() >= self.trigger_level() {
            self.send_complete(wake);
        }
        written
    }

    fn write_unit(&self, data: &[u8], spaces: usize, required: usize) -> usize {
        if data.is_empty() {
            return 0;
        }
        let mut head = self.head.load(Ordering::Relaxed);
        let count = match self.mode {
            Mode::Stream => data.len().min(spaces),
            Mode::Message(prefix) => {
                if spaces < required {
                    return 0;
                }
                let header = prefix.encode(data.len());
                // SAFETY: `spaces >= required` covers header and payload.
                head = unsafe { self.write_bytes(&header[..prefix.width()], head) };
                data.len()
            }
        };
        if count == 0 {
            return 0;
        }
        // SAFETY: `count` is bounded by the free space sampled above.
        head = unsafe { self.write_bytes(&data[..count], head) };
        self.head.store(head, Ordering::Release);
        count
    }

    fn receive_inner(&self, buf: &mut [u8], timeout: Ticks, wake: Wake<'_>) -> usize {
        let _active = self.begin(RECEIVING);
        let header = self.mode.header_width();

        let mut sampled = None;
        if timeout != 0 {
            let deadline = Deadline::start(self.kernel.now(), timeout);
            while let Some(remaining) = deadline.remaining(self.kernel.now()) {
                {
                    let cs = Critical::enter(&self.kernel, false);
                    let bytes = self.bytes_available();
                    sampled = Some(bytes);
                    if bytes > header {
                        break;
                    }
                    self.kernel.clear_pending_wake();
                    self.register_waiter(&cs, Side::Reader, self.kernel.current());
                }
                trace::trace!("receive blocked, {} ticks left", remaining);
                self.kernel.suspend(remaining);
                let cs = Critical::enter(&self.kernel, false);
                self.take_waiter(&cs, Side::Reader);
            }
        }

        let available = match sampled {
            Some(bytes) if bytes > header => bytes,
            _ => self.bytes_available(),
        };
        if available <= header {
            return 0;
        }

        let received = self.read_unit(buf, available);
        trace::trace!("received {} bytes", received);
        if received > 0 {
            self.receive_complete(wake);
        }
        received
    }

    fn read_unit(&self, buf: &mut [u8], available: usize) -> usize {
        let mut tail = self.tail.load(Ordering::Relaxed);
        let count = match self.mode {
            Mode::Stream => buf.len().min(available),
            Mode::Message(prefix) => {
                let width = prefix.width();
                let mut raw = [0u8; 4];
                // SAFETY: `available > width`, so a whole header is readable.
                tail = unsafe { self.read_bytes(&mut raw[..width], tail) };
                let next = self.checked_message_len(prefix, raw);
                if next > buf.len() {
                    trace::trace!(
                        "next message is {} bytes, buffer holds {}; left queued",
                        next,
                        buf.len()
                    );
                    return 0;
                }
                next.min(available - width)
            }
        };
        if count == 0 {
            return 0;
        }
        // SAFETY: `count` is bounded by the readable bytes sampled above.
        tail = unsafe { self.read_bytes(&mut buf[..count], tail) };
        self.tail.store(tail, Ordering::Release);
        count
    }

    fn next_message_len(&self) -> usize {
        let _active = self.begin(RECEIVING);
        let Mode::Message(prefix) = self.mode else {
            return 0;
        };
        let width = prefix.width();
        if self.bytes_available() <= width {
            return 0;
        }
        let mut raw = [0u8; 4];
        // SAFETY: a whole header is readable; `tail` is not advanced.
        unsafe { self.read_bytes(&mut raw[..width], self.tail.load(Ordering::Relaxed)) };
        self.checked_message_len(prefix, raw)
    }

    /// Decode a header read from the ring. A length that cannot fit is a fatal
    /// consistency violation.
    fn checked_message_len(&self, prefix: LengthPrefix, raw: [u8; 4]) -> usize {
        let next = prefix.decode(raw);
        assert!(
            next <= self.capacity() - prefix.width(),
            "corrupt message header: length {} exceeds capacity {}",
            next,
            self.capacity()
        );
        next
    }
}

impl<K: Kernel> fmt::Debug for Channel<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("mode", &self.mode)
            .field("capacity", &self.capacity())
            .field("trigger_level", &self.trigger_level())
            .field("head", &self.head.load(Ordering::Relaxed))
            .field("tail", &self.tail.load(Ordering::Relaxed))
            .field("number", &self.number())
            .finish_non_exhaustive()
    }
}

struct Activity<'c> {
    flags: &'c AtomicU8,
    bit: u8,
}

impl Drop for Activity<'_> {
    #[inline]
    fn drop(&mut self) {
        self.flags.fetch_and(!self.bit, Ordering::Release);
    }
}

/// Sending side of a [`Channel`]. Only one may be active.
pub struct Writer<'c, 'a, K: Kernel> {
    channel: &'c Channel<'a, K>,
}

impl<'c, 'a, K: Kernel> Writer<'c, 'a, K> {
    /// Send `data`, waiting up to `timeout` ticks for room. Use
    /// [`WAIT_FOREVER`](crate::WAIT_FOREVER) to wait indefinitely.
    ///
    /// Streams accept a partial write; messages are written whole or not at all.
    /// Returns the number of payload bytes written, `0` if no progress was possible.
    ///
    /// # Panics
    /// If a message is longer than its length header can describe.
    pub fn send(&mut self, data: &[u8], timeout: Ticks) -> usize {
        self.channel.send_inner(data, timeout, Wake::Direct)
    }

    /// Non-blocking send from an interrupt handler. `higher_priority_woken` is set if
    /// the woken reader should run when the interrupt returns.
    pub fn send_from_isr(&mut self, data: &[u8], higher_priority_woken: &mut bool) -> usize {
        self.channel
            .send_inner(data, 0, Wake::Deferred(higher_priority_woken))
    }

    #[inline]
    pub fn spaces_available(&self) -> usize {
        self.channel.spaces_available()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }

    #[inline]
    pub fn channel(&self) -> &'c Channel<'a, K> {
        self.channel
    }
}

impl<K: Kernel> Drop for Writer<'_, '_, K> {
    fn drop(&mut self) {
        self.channel
            .handles
            .fetch_and(!WRITER_TAKEN, Ordering::Release);
    }
}

/// Receiving side of a [`Channel`]. Only one may be active.
pub struct Reader<'c, 'a, K: Kernel> {
    channel: &'c Channel<'a, K>,
}

impl<'c, 'a, K: Kernel> Reader<'c, 'a, K> {
    /// Receive into `buf`, waiting up to `timeout` ticks for data.
    ///
    /// Streams return whatever fits. Messages are returned whole; if `buf` is too small
    /// for the next message, `0` is returned and the message stays queued.
    pub fn receive(&mut self, buf: &mut [u8], timeout: Ticks) -> usize {
        self.channel.receive_inner(buf, timeout, Wake::Direct)
    }

    /// Non-blocking receive from an interrupt handler.
    pub fn receive_from_isr(&mut self, buf: &mut [u8], higher_priority_woken: &mut bool) -> usize {
        self.channel
            .receive_inner(buf, 0, Wake::Deferred(higher_priority_woken))
    }

    /// Length of the next queued message without consuming it; `0` if none is queued
    /// or the channel is a stream.
    pub fn next_message_len(&mut self) -> usize {
        self.channel.next_message_len()
    }

    #[inline]
    pub fn bytes_available(&self) -> usize {
        self.channel.bytes_available()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    #[inline]
    pub fn channel(&self) -> &'c Channel<'a, K> {
        self.channel
    }
}

impl<K: Kernel> Drop for Reader<'_, '_, K> {
    fn drop(&mut self) {
        self.channel
            .handles
            .fetch_and(!READER_TAKEN, Ordering::Release);
    }
}
