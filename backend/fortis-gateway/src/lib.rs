pub mod actions;
pub mod configs;
pub mod error;
pub mod logger;
pub mod webhooks;

/// Name of the crate the macro is expanded in, used as the logging service name
#[macro_export]
macro_rules! service_name {
    () => {
        env!("CARGO_CRATE_NAME")
    };
}
