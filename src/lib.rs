//! Chart series for Japan's published COVID-19 open data.
//!
//! Raw feeds are downloaded with [`fetch`], decoded by [`ingest`] into a
//! [`store::RecordStore`], and turned into chart groups per region by
//! [`pipeline::assemble::assemble`]. [`output`] serializes the result.

pub mod feeds;
pub mod fetch;
pub mod ingest;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod regions;
pub mod store;
