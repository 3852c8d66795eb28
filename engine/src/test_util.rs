//! log macro's for unit test logging

/// Writes a debug! message to the ut::test logger
#[macro_export]
macro_rules! ut_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "ut::test", $($arg)+)
    };
}

/// Writes an info! message to the ut::test logger
#[macro_export]
macro_rules! ut_info {
    ($($arg:tt)+) => {
        log::info!(target: "ut::test", $($arg)+)
    };
}

/// Writes an warn! message to the ut::test logger
#[macro_export]
macro_rules! ut_warn {
    ($($arg:tt)+) => {
        log::warn!(target: "ut::test", $($arg)+)
    };
}

/// Writes an error! message to the ut::test logger
#[macro_export]
macro_rules! ut_error {
    ($($arg:tt)+) => {
        log::error!(target: "ut::test", $($arg)+)
    };
}
