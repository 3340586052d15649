pub mod iwlist;
pub mod parsing;
pub mod utils;

#[cfg(feature = "backend_mock")]
pub mod mock;
