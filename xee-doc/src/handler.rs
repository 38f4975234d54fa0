//! The process-wide error handler.
//!
//! Handles never call the handler themselves; the caller passes a handle's
//! [`last_error`](crate::Document::last_error) to [`handle_error`] when it
//! wants the record reported.

use std::sync::{LazyLock, PoisonError, RwLock};

use crate::error::ErrorRecord;

type Handler = Box<dyn Fn(&ErrorRecord) + Send + Sync>;

static HANDLER: LazyLock<RwLock<Handler>> = LazyLock::new(|| RwLock::new(Box::new(print_error)));

/// Replace the error handler.
pub fn set_error_handler(handler: impl Fn(&ErrorRecord) + Send + Sync + 'static) {
    *HANDLER.write().unwrap_or_else(PoisonError::into_inner) = Box::new(handler);
}

/// Restore the default handler, [`print_error`].
pub fn reset_error_handler() {
    set_error_handler(print_error);
}

/// Pass `record` to the current handler.
///
/// Nothing happens for an absent record or one at [`Level::NoError`](crate::Level::NoError).
pub fn handle_error(record: Option<&ErrorRecord>) {
    let Some(record) = record.filter(|record| record.is_error()) else {
        return;
    };
    let handler = HANDLER.read().unwrap_or_else(PoisonError::into_inner);
    handler(record);
}

/// The default handler: print the record to standard output.
pub fn print_error(record: &ErrorRecord) {
    if record.is_error() {
        println!("{}", record);
    }
}
