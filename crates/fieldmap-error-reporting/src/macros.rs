//! Macros for creating diagnostic messages.


/// Create a generic internal error with automatic file and line information.
///
/// # Example
///
/// ```
/// use fieldmap_error_reporting::generic_error;
///
/// let error = generic_error!("Node sequence lost its text carrier");
/// assert_eq!(error.code, Some("FM-0-99".to_string()));
/// assert!(error.title.contains(file!()));
/// ```
#[macro_export]
macro_rules! generic_error {
    ($message:expr) => {
        $crate::DiagnosticMessageBuilder::generic_error($message, file!(), line!())
    };
}

/// Create a generic internal warning with automatic file and line information.
#[macro_export]
macro_rules! generic_warning {
    ($message:expr) => {
        $crate::DiagnosticMessageBuilder::generic_warning($message, file!(), line!())
    };
}
