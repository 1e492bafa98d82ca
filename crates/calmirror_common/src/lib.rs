// --- File: crates/calmirror_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // HTTP responses and outgoing client
pub mod logging; // Logging setup
pub mod models; // Shared data structures
pub mod schedule; // Date + optional time value type
pub mod services; // Provider abstraction

pub use error::{
    config_error, external_service_error, internal_error, not_found, validation_error,
    CalmirrorError, HttpStatusCode,
};

pub use http::{client::create_client, IntoHttpResponse};

pub use models::{
    default_mapping_columns, Account, AccountCredentials, BatchOutcome, EventFieldsUpdate, FieldMapping,
    MappingColumn, MirrorEvent, ProviderEvent, ProviderEventDraft, ProviderTime, RecordFailure,
};
pub use schedule::{EventSchedule, ScheduleError};
pub use services::{BoxFuture, CalendarProvider, ProviderError};
