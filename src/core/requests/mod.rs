//! Developer requests and job postings: option catalogs, form schemas, backend
//! records and request bodies.

pub mod catalog;
pub mod lenient;
pub mod payload;
pub mod record;

pub use catalog::{DEVELOPER_REQUEST_FORM, JOB_POSTING_FORM};
pub use payload::{attach_media, build_payload, Payload};
pub use record::{JobRecord, Priority, RequestRecord, RequestStatus};
