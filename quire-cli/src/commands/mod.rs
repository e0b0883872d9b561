//! CLI command implementations.

pub mod listing;
pub mod page;
pub mod site;

pub use listing::{parse_field, render_listing, ListingOptions};
pub use page::render_page;
pub use site::OutputArgs;
