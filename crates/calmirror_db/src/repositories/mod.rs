//! Repository traits and their SQL implementations
//!
//! Each entity has a trait module and an `_sql` module implementing it for
//! [`crate::SqlStore`].

pub mod account;
pub mod account_sql;
pub mod field_mapping;
pub mod field_mapping_sql;
pub mod mirror_event;
pub mod mirror_event_sql;

pub use account::AccountRepository;
pub use field_mapping::FieldMappingRepository;
pub use mirror_event::MirrorEventRepository;

use sqlx::any::AnyRow;
use sqlx::{Row, ValueRef};

/// Reads a nullable TEXT column.
///
/// The Any driver rejects a SQL `NULL` when decoding into `Option<String>`, so
/// the raw value is checked first.
pub(crate) fn nullable_text(row: &AnyRow, column: &str) -> Result<Option<String>, sqlx::Error> {
    if row.try_get_raw(column)?.is_null() {
        return Ok(None);
    }
    row.try_get::<String, _>(column).map(Some)
}
