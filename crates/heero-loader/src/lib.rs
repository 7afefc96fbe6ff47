//! Source Loader: fetches service-location sources, parses them into raw
//! rows and normalizes those into [`heero_core::LocationRecord`]s.

pub mod client;
pub mod error;
mod fetch;
pub mod formats;
pub mod normalize;
pub mod types;

pub use client::SourceLoader;
pub use error::{LoaderError, SourceFailure};
pub use normalize::normalize_rows;
pub use types::RawRow;
