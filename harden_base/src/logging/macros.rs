//! Logging macros taking an explicit `LoggingService` handle
//!
//! Context values accept any `Display` type:
//!
//! ```ignore
//! log_info!(ctx.logger(), "Module completed", "module" => name, "records" => count);
//! ```

/// Log an error event with a code
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $code:expr, $message:expr) => {
        $logger.log_event($crate::logging::LogEvent::error($code, $message))
    };

    ($logger:expr, $code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let mut event = $crate::logging::LogEvent::error($code, $message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )+
        $logger.log_event(event)
    }};
}

/// Log a success event with a code
#[macro_export]
macro_rules! log_success {
    ($logger:expr, $code:expr, $message:expr) => {
        $logger.log_event($crate::logging::LogEvent::success($code, $message))
    };

    ($logger:expr, $code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let mut event = $crate::logging::LogEvent::success($code, $message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )+
        $logger.log_event(event)
    }};
}

/// Log an informational message
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $message:expr) => {
        $logger.log_event($crate::logging::LogEvent::info($message))
    };

    ($logger:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let mut event = $crate::logging::LogEvent::info($message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )+
        $logger.log_event(event)
    }};
}

/// Log a warning, optionally with a specific code
#[macro_export]
macro_rules! log_warning {
    ($logger:expr, code = $code:expr, $message:expr) => {
        $logger.log_event($crate::logging::LogEvent::warning_with_code($code, $message))
    };

    ($logger:expr, code = $code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let mut event = $crate::logging::LogEvent::warning_with_code($code, $message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )+
        $logger.log_event(event)
    }};

    ($logger:expr, $message:expr) => {
        $logger.log_event($crate::logging::LogEvent::warning($message))
    };

    ($logger:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let mut event = $crate::logging::LogEvent::warning($message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )+
        $logger.log_event(event)
    }};
}

/// Log a debug message; context is only formatted when debug is enabled
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $message:expr) => {
        $logger.log_event($crate::logging::LogEvent::debug($message))
    };

    ($logger:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let service = &$logger;
        if service.should_log($crate::logging::LogLevel::Debug) {
            let mut event = $crate::logging::LogEvent::debug($message);
            $(
                event = event.with_context($key, &format!("{}", $value));
            )+
            service.log_event(event)
        }
    }};
}
