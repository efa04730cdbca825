mod csrf_token;
mod driver_kind;
mod field_map;
mod sql_value;

pub use csrf_token::{CsrfToken, CSRF_TOKEN_BYTES};
pub use driver_kind::DriverKind;
pub use field_map::RequestFieldMap;
pub use sql_value::SqlValue;
