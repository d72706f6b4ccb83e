//! Classified-listings marketplace: URL-backed browse filters, listing
//! projection, and the posting/feed plumbing around them.

pub mod backend;
pub mod config;
pub mod error;
pub mod feed;
pub mod filters;
pub mod models;
pub mod posting;

pub use config::Config;
pub use error::{MarketError, Result};
pub use feed::ListingFeed;
pub use filters::{FilterState, FilterStore, PriceRange, SortKey};
pub use models::{Listing, NewListing};
pub use posting::{post_listing, Photo};
