//! Core types for the delta extractor.

pub mod date;
pub mod record;

pub use date::{ModDate, DateError, MDATE_FORMAT};
pub use record::{AuthorId, PublicationId, Author, Publication};
