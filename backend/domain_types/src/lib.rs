pub mod connector_types;
pub mod errors;
pub mod payment_method_data;
pub mod payment_record;
pub mod router_response_types;
pub mod types;
