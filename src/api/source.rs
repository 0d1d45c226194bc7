use std::future::Future;

use anyhow::Result;

use super::StoryListType;
use crate::internal::models::Item;

/// Point lookups the resolver and listing store are written against.
///
/// `Ok(None)` means the item does not exist. `Err` is a transport failure;
/// callers decide whether that aborts the operation or just prunes a branch.
pub trait ItemSource: Sync {
    fn item(&self, id: u32) -> impl Future<Output = Result<Option<Item>>> + Send;

    fn story_ids(&self, list_type: StoryListType)
    -> impl Future<Output = Result<Vec<u32>>> + Send;
}
