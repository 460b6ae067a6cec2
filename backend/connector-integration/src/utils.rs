use domain_types::errors;
use error_stack::Report;

pub fn missing_field_err(
    message: &'static str,
) -> Box<dyn Fn() -> Report<errors::ConnectorError> + 'static> {
    Box::new(move || {
        errors::ConnectorError::MissingRequiredField {
            field_name: message,
        }
        .into()
    })
}
