/// OpenAPI documentation of the annotated routes.
pub mod documentation;
/// Sample forecast data.
pub mod forecast_service;
/// JSON formatting policies for health reports.
pub mod json_options;
/// Health report serialization.
pub mod report_formatter;
