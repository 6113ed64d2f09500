//! Console logging used across the crate.
//!
//! Every line is tagged with the crate name so it can be told apart from the
//! host application's own output. Debug lines are compiled out of release
//! builds.

#[macro_export]
#[doc(hidden)]
macro_rules! log {
    ($($arg:tt)*) => {
        println!("[quickdraw] info: {}", format_args!($($arg)*));
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! dbg_log {
    ($($arg:tt)*) => {
        #[cfg(debug_assertions)]
        println!("[quickdraw] debug: {}", format_args!($($arg)*));
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        eprintln!("[quickdraw] warning: {}", format_args!($($arg)*));
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! error_log {
    ($($arg:tt)*) => {
        eprintln!("[quickdraw] error: {}", format_args!($($arg)*));
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn macros_accept_format_arguments() {
        let size = (4, 3);

        crate::log!("opened {}x{}", size.0, size.1);
        crate::dbg_log!("{size:?}");
        crate::warn_log!("{}", "fallback");
        crate::error_log!("{:>4}", 7);
    }
}
