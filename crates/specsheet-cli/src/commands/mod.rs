//! Command implementations.

pub mod analyze;
pub mod attributes;
pub mod init;

pub use self::analyze::execute_analyze;
pub use self::attributes::execute_attributes;
pub use self::init::execute_init;
