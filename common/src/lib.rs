pub mod config;
pub mod style;
pub mod terminal;

#[doc(hidden)]
pub use tracing as __tracing;

/// Operator-facing informational line.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

/// Informational line rendered in the success style.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: $crate::SUCCESS_TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}

/// Event target the formatter recognizes as a success message.
pub const SUCCESS_TARGET: &str = "fleetmux::success";
