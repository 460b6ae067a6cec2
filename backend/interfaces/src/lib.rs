pub mod api;
pub mod structured_client;
pub mod webhooks;
