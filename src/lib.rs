//! Inspect and rewrite timezone metadata in an Apple Photos library.
//!
//! Photos keeps each asset's timezone in its private `Photos.sqlite`
//! database, which it may hold open and mutate while this crate writes.
//! Writes bump the row's optimistic counter and retry with backoff when
//! the file is busy.
//!
//! WARNING: the schema is undocumented and owned by Photos. Back up your
//! library before updating anything.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod photo;
pub mod timezone;

pub use db::{Generation, PhotosDb, RetryPolicy, SchemaVersion, TimezoneUpdater};
pub use error::Error;
pub use photo::PhotoHandle;
pub use timezone::Timezone;
