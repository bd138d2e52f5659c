//! # 错误处理宏

/// 快速创建配置错误的宏
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::AppError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::AppError::config(format!($fmt, $($arg)*))
    };
}

/// 快速创建业务错误的宏
#[macro_export]
macro_rules! business_error {
    ($msg:expr) => {
        $crate::error::AppError::business($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::AppError::business(format!($fmt, $($arg)*))
    };
}

/// 快速创建校验错误的宏，第一个参数为字段名
#[macro_export]
macro_rules! validation_error {
    ($field:expr, $msg:expr) => {
        $crate::error::AppError::validation($msg, Some($field))
    };
    ($field:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::error::AppError::validation(format!($fmt, $($arg)*), Some($field))
    };
}

/// 确保条件成立，否则返回配置错误
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::config_error!($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::config_error!($fmt, $($arg)*));
        }
    };
}

/// 确保条件成立，否则返回业务错误
#[macro_export]
macro_rules! ensure_business {
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::business_error!($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::business_error!($fmt, $($arg)*));
        }
    };
}

/// 确保条件成立，否则返回校验错误
#[macro_export]
macro_rules! ensure_validation {
    ($cond:expr, $field:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::validation_error!($field, $msg));
        }
    };
    ($cond:expr, $field:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::validation_error!($field, $fmt, $($arg)*));
        }
    };
}
