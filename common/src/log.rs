/// Target used for events announcing a completed step.
pub const SUCCESS_TARGET: &str = "netdiag::success";

/// Target used for raw console lines that must be printed verbatim.
pub const PRINT_TARGET: &str = "netdiag::print";

/// Logs an INFO event flagged as a success so formatters can highlight it.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "netdiag::success", $($arg)*)
    };
}
