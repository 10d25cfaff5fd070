//! Logging macros that record the calling function's name.
//!
//! ```rust,no_run
//! let logger = solelog::Logger::new(solelog::LoggerConfig::new())?;
//! solelog::info!(logger, "listening on port {}", 8080);
//! solelog::critical!(logger, "lost quorum");
//! # Ok::<(), solelog::Error>(())
//! ```

/// Log a formatted message at `level`, printing the console line when echo is on.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        if let ::std::option::Option::Some(line) = $logger.emit(
            $crate::CallSite::new(::std::file!(), ::std::module_path!(), ::std::line!())
                .with_function($crate::__function_name!()),
            $level,
            ::std::format!($($arg)+),
            $crate::Emit::default(),
        ) {
            ::std::println!("{}", line);
        }
    }};
}

/// Name of the function the macro is expanded in.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        $crate::record::function_name(::std::any::type_name_of_val(&f))
    }};
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical, $($arg)+)
    };
}
