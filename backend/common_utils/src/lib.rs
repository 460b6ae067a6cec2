//! Common utilities shared by the Fortis gateway crates

pub mod consts;
pub mod errors;
pub mod ext_traits;
pub mod request;
pub mod types;

pub use errors::{CustomResult, ParsingError, ValidationError};
pub use request::{Method, Request, RequestBuilder, RequestContent};
pub use types::MinorUnit;
