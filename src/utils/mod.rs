pub mod elapsed;
pub mod error;
pub mod logger;
pub mod validation;
