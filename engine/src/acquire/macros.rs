//! log macro's for acquire logging

/// Writes a debug! message to the app::acquire logger
#[macro_export]
macro_rules! acquire_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "app::acquire", $($arg)+)
    };
}

/// Writes an info! message to the app::acquire logger
#[macro_export]
macro_rules! acquire_info {
    ($($arg:tt)+) => {
        log::info!(target: "app::acquire", $($arg)+)
    };
}

/// Writes an warn! message to the app::acquire logger
#[macro_export]
macro_rules! acquire_warn {
    ($($arg:tt)+) => {
        log::warn!(target: "app::acquire", $($arg)+)
    };
}

/// Writes an error! message to the app::acquire logger
#[macro_export]
macro_rules! acquire_error {
    ($($arg:tt)+) => {
        log::error!(target: "app::acquire", $($arg)+)
    };
}
