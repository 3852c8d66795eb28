//! log macro's for proximity logging

/// Writes a debug! message to the app::proximity logger
#[macro_export]
macro_rules! proximity_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "app::proximity", $($arg)+)
    };
}

/// Writes an info! message to the app::proximity logger
#[macro_export]
macro_rules! proximity_info {
    ($($arg:tt)+) => {
        log::info!(target: "app::proximity", $($arg)+)
    };
}

/// Writes an warn! message to the app::proximity logger
#[macro_export]
macro_rules! proximity_warn {
    ($($arg:tt)+) => {
        log::warn!(target: "app::proximity", $($arg)+)
    };
}

/// Writes an error! message to the app::proximity logger
#[macro_export]
macro_rules! proximity_error {
    ($($arg:tt)+) => {
        log::error!(target: "app::proximity", $($arg)+)
    };
}
