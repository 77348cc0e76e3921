//! Diagnostics hooks. Forward to the `log` facade when the `log` feature is
//! enabled; otherwise the arguments are type-checked and discarded.

#[cfg(feature = "log")]
macro_rules! trace {
    ($($arg:tt)+) => { ::log::trace!(target: "ph_streambuf", $($arg)+) };
}

#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($arg:tt)+) => {{
        if false {
            let _ = ::core::format_args!($($arg)+);
        }
    }};
}

#[cfg(feature = "log")]
macro_rules! debug {
    ($($arg:tt)+) => { ::log::debug!(target: "ph_streambuf", $($arg)+) };
}

#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($arg:tt)+) => {{
        if false {
            let _ = ::core::format_args!($($arg)+);
        }
    }};
}

#[cfg(feature = "log")]
macro_rules! warning {
    ($($arg:tt)+) => { ::log::warn!(target: "ph_streambuf", $($arg)+) };
}

#[cfg(not(feature = "log"))]
macro_rules! warning {
    ($($arg:tt)+) => {{
        if false {
            let _ = ::core::format_args!($($arg)+);
        }
    }};
}

pub(crate) use {debug, trace, warning};
