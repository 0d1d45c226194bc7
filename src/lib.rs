//! Read-only browser client for the Hacker News item API.
//!
//! [`internal::listing::ListingStore`] pages through ranked story lists and
//! [`internal::detail::StoryDetailView`] resolves a story's comment tree,
//! first partially and then in full on demand. Both talk to the API through
//! [`api::ItemSource`].

pub mod api;
pub mod config;
pub mod error;
pub mod internal;
pub mod utils;
