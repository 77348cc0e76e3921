//! Construction-time configuration.

use crate::channel::Channel;
use crate::kernel::Kernel;

/// Width and range of the length header written in front of each message.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LengthPrefix {
    U8,
    #[default]
    U16,
    U32,
}

impl LengthPrefix {
    /// Header width in bytes.
    #[inline]
    pub const fn width(self) -> usize {
        match self {
            LengthPrefix::U8 => 1,
            LengthPrefix::U16 => 2,
            LengthPrefix::U32 => 4,
        }
    }

    /// Largest payload length the header can describe.
    #[inline]
    pub const fn max_len(self) -> usize {
        match self {
            LengthPrefix::U8 => u8::MAX as usize,
            LengthPrefix::U16 => u16::MAX as usize,
            // Clamped on 16-bit targets.
            LengthPrefix::U32 => {
                if usize::BITS < 32 {
                    usize::MAX
                } else {
                    u32::MAX as usize
                }
            }
        }
    }

    /// Little-endian header bytes; only the first `width()` are meaningful.
    #[inline]
    pub(crate) fn encode(self, len: usize) -> [u8; 4] {
        debug_assert!(len <= self.max_len());
        (len as u32).to_le_bytes()
    }

    #[inline]
    pub(crate) fn decode(self, bytes: [u8; 4]) -> usize {
        let raw = u32::from_le_bytes(bytes);
        match self {
            LengthPrefix::U8 => (raw & 0xff) as usize,
            LengthPrefix::U16 => (raw & 0xffff) as usize,
            LengthPrefix::U32 => raw as usize,
        }
    }
}

/// Framing discipline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Raw bytes; partial writes and reads are allowed.
    Stream,
    /// Discrete messages, each preceded by a length header and moved as a unit.
    Message(LengthPrefix),
}

impl Mode {
    /// Bytes of framing per unit: the header width, or 0 for streams.
    #[inline]
    pub const fn header_width(self) -> usize {
        match self {
            Mode::Stream => 0,
            Mode::Message(prefix) => prefix.width(),
        }
    }
}

/// How a completion hook must wake a blocked peer.
#[derive(Debug)]
pub enum Wake<'a> {
    /// Task context; wake immediately.
    Direct,
    /// Interrupt context; raise the flag if a higher-priority task was woken.
    /// The caller switches context after leaving the interrupt.
    Deferred(&'a mut bool),
}

impl Wake<'_> {
    #[inline]
    pub fn from_isr(&self) -> bool {
        matches!(self, Wake::Deferred(_))
    }
}

/// Replaces the default peer wake after a send or receive completes.
pub type CompletionHook<K> = fn(&Channel<'_, K>, Wake<'_>);

/// Channel settings other than storage.
pub struct Config<K: Kernel> {
    pub(crate) trigger_level: usize,
    pub(crate) mode: Mode,
    pub(crate) on_send_complete: Option<CompletionHook<K>>,
    pub(crate) on_receive_complete: Option<CompletionHook<K>>,
}

impl<K: Kernel> Config<K> {
    /// Byte stream, trigger level 1.
    pub fn stream() -> Self {
        Self {
            trigger_level: 1,
            mode: Mode::Stream,
            on_send_complete: None,
            on_receive_complete: None,
        }
    }

    /// Message framing with a `u16` length header.
    pub fn message() -> Self {
        Self {
            mode: Mode::Message(LengthPrefix::default()),
            ..Self::stream()
        }
    }

    /// Readable bytes required before a writer wakes a blocked reader.
    /// `0` is treated as `1`.
    pub fn trigger_level(mut self, bytes: usize) -> Self {
        self.trigger_level = bytes.max(1);
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Switches to message framing with the given header width.
    pub fn length_prefix(mut self, prefix: LengthPrefix) -> Self {
        self.mode = Mode::Message(prefix);
        self
    }

    pub fn on_send_complete(mut self, hook: CompletionHook<K>) -> Self {
        self.on_send_complete = Some(hook);
        self
    }

    pub fn on_receive_complete(mut self, hook: CompletionHook<K>) -> Self {
        self.on_receive_complete = Some(hook);
        self
    }
}

impl<K: Kernel> Clone for Config<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: Kernel> Copy for Config<K> {}

impl<K: Kernel> core::fmt::Debug for Config<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Config")
            .field("trigger_level", &self.trigger_level)
            .field("mode", &self.mode)
            .field("on_send_complete", &self.on_send_complete.is_some())
            .field("on_receive_complete", &self.on_receive_complete.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{LengthPrefix, Mode};

    #[test]
    fn header_widths() {
        assert_eq!(Mode::Stream.header_width(), 0);
        assert_eq!(Mode::Message(LengthPrefix::U8).header_width(), 1);
        assert_eq!(Mode::Message(LengthPrefix::U16).header_width(), 2);
        assert_eq!(Mode::Message(LengthPrefix::U32).header_width(), 4);
    }

    #[test]
    fn prefix_decodes_only_its_width() {
        let bytes = LengthPrefix::U16.encode(0x0203);
        assert_eq!(&bytes[..2], &[0x03, 0x02]);
        assert_eq!(LengthPrefix::U8.decode([0x05, 0xee, 0xee, 0xee]), 5);
        assert_eq!(LengthPrefix::U16.decode([0x03, 0x02, 0xee, 0xee]), 0x0203);
    }
}
