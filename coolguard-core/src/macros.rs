//! Optional logging
//!
//! Forwards to the `log` facade when the `log` feature is on, otherwise the
//! arguments are discarded at compile time.

#[cfg(feature = "log")]
macro_rules! mon_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! mon_debug {
    ($($arg:tt)*) => { () };
}

#[cfg(feature = "log")]
macro_rules! mon_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! mon_info {
    ($($arg:tt)*) => { () };
}

#[cfg(feature = "log")]
macro_rules! mon_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! mon_warn {
    ($($arg:tt)*) => { () };
}

#[cfg(feature = "log")]
macro_rules! mon_error {
    ($($arg:tt)*) => { log::error!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! mon_error {
    ($($arg:tt)*) => { () };
}
