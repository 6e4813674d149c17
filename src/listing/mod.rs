//! Host-page side of the pipeline: entry discovery, merging, presentation.

pub mod entry;
pub mod merge;
pub mod style;

pub use entry::ListingEntry;
pub use merge::{merge_entry, MergeReport};
