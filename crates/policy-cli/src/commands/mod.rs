//! Command implementations

mod sync;
mod validate;

pub use sync::run_sync;
pub use validate::run_validate;
