pub mod currency;
pub mod fetch;
pub mod ingest;
pub mod listing;
pub mod report;
pub(crate) mod source;
pub mod stats;
