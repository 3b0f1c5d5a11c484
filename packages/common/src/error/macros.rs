//! Macros for error creation and handling

/// Create an error of the given kind with a formatted message
#[doc(hidden)]
#[macro_export]
macro_rules! err {
    ($kind:ident) => {
        $crate::error::Error::$kind()
    };
    ($kind:ident, $msg:literal) => {
        $crate::error::Error::$kind().context(format!($msg))
    };
    ($kind:ident, $msg:expr) => {
        $crate::error::Error::$kind().context($msg)
    };
    ($kind:ident, $fmt:expr, $($arg:tt)*) => {
        $crate::error::Error::$kind().context(format!($fmt, $($arg)*))
    };
}

/// Macro for bailing out with an error
#[doc(hidden)]
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::err!($($arg)*))
    };
}

/// Macro for ensuring a condition holds
#[doc(hidden)]
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::bail!($($arg)*);
        }
    };
}
