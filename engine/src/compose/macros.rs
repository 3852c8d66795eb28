//! log macro's for compose logging

/// Writes a debug! message to the app::compose logger
#[macro_export]
macro_rules! compose_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "app::compose", $($arg)+)
    };
}

/// Writes an info! message to the app::compose logger
#[macro_export]
macro_rules! compose_info {
    ($($arg:tt)+) => {
        log::info!(target: "app::compose", $($arg)+)
    };
}

/// Writes an warn! message to the app::compose logger
#[macro_export]
macro_rules! compose_warn {
    ($($arg:tt)+) => {
        log::warn!(target: "app::compose", $($arg)+)
    };
}

/// Writes an error! message to the app::compose logger
#[macro_export]
macro_rules! compose_error {
    ($($arg:tt)+) => {
        log::error!(target: "app::compose", $($arg)+)
    };
}
