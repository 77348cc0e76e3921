//! Bounded SPSC stream and message buffers for RTOS ports.
//!
//! # Highlights
//! - One writer and one reader; either may be a task or an interrupt handler, on any core.
//! - Byte-stream mode with partial transfers, or message mode with length-prefixed units
//!   that are only ever seen whole.
//! - Blocking task entry points with timeouts and non-blocking ISR entry points.
//! - A trigger level decides when a writer wakes a blocked reader.
//! - The scheduler is supplied through the [`Kernel`] trait.
//!
//! # Quick start
//! ```
//! use ph_streambuf::host::HostKernel;
//! use ph_streambuf::{Channel, Config};
//!
//! let kernel = HostKernel::new();
//! let mut storage = [0u8; 33];
//! let channel = Channel::with_storage(&kernel, &mut storage, Config::message()).unwrap();
//! let mut writer = channel.writer();
//! let mut reader = channel.reader();
//!
//! assert_eq!(writer.send(b"hello", 0), 5);
//! assert_eq!(reader.next_message_len(), 5);
//!
//! let mut buf = [0u8; 8];
//! assert_eq!(reader.receive(&mut buf, 0), 5);
//! assert_eq!(&buf[..5], b"hello");
//! ```
//!
//! # No-std
//! The crate is `#![no_std]`. The default `std` feature adds [`host::HostKernel`];
//! `alloc` adds heap-owned storage through [`Channel::new`].
//!
//! # Safety and concurrency
//! This crate is SPSC by design: exactly one writer and one reader may be active.
//! `writer()`/`reader()` panic if called while another handle of the same kind is active.
//! Registering a second blocked task in one direction is a contract violation and panics.
//!
//! # Semantics
//! - Storage of `L` bytes holds at most `L - 1`.
//! - `0` transferred bytes means "no progress": timeout, no data, no room, or a
//!   receive buffer too small for the next message. None of these are errors.
//! - [`Channel::reset`] only succeeds while nothing is blocked or in flight.
#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc;

mod trace;

pub mod channel;
pub mod config;
pub mod error;
#[cfg(any(feature = "std", test))]
pub mod host;
pub mod kernel;

pub use channel::{Channel, Reader, Writer};
pub use config::{CompletionHook, Config, LengthPrefix, Mode, Wake};
pub use error::CreateError;
pub use kernel::{Kernel, Ticks, WAIT_FOREVER};
