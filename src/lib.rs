pub mod community;
pub mod core;
pub mod embed;
pub mod hierarchy;
#[cfg(feature = "logging")]
mod settings;
