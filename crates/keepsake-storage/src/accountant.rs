// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage accounting over loaded collections.
//!
//! Usage is the sum of the bytes each record occupies when written. Image
//! payloads are moved out of the category of the record that holds them
//! and into `images`, so the breakdown always adds up to usage.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use keepsake_core::KeepsakeError;
use keepsake_core::model::{ChatMessage, StorageBreakdown, StorageInfo, StorageStats};

use crate::codec;
use crate::store::Collections;

#[derive(Clone, Copy)]
enum Category {
    Sessions,
    ProfilesAndMemories,
    SnippetsAndWorkflows,
    Other,
}

struct Tally<'a> {
    cancel: &'a CancellationToken,
    breakdown: StorageBreakdown,
    stats: StorageStats,
}

impl Tally<'_> {
    /// Count one record of `bytes` bytes, `image_bytes` of which are image
    /// payload.
    fn add(&mut self, category: Category, bytes: usize, image_bytes: usize) -> Result<(), KeepsakeError> {
        if self.cancel.is_cancelled() {
            return Err(KeepsakeError::Cancelled);
        }
        let images = image_bytes.min(bytes);
        let own = (bytes - images) as u64;
        self.breakdown.images += images as u64;
        let slot = match category {
            Category::Sessions => &mut self.breakdown.sessions,
            Category::ProfilesAndMemories => &mut self.breakdown.profiles_and_memories,
            Category::SnippetsAndWorkflows => &mut self.breakdown.snippets_and_workflows,
            Category::Other => &mut self.breakdown.other,
        };
        *slot += own;
        Ok(())
    }

    fn record<T: Serialize + ?Sized>(
        &mut self,
        category: Category,
        value: &T,
        image_bytes: usize,
    ) -> Result<(), KeepsakeError> {
        let bytes = codec::encode(value)?.len();
        self.add(category, bytes, image_bytes)
    }
}

/// Image payload bytes carried by a message list, and how many images.
fn message_images(messages: &[ChatMessage]) -> (usize, u64) {
    messages
        .iter()
        .filter_map(|m| m.image_file.as_ref())
        .fold((0, 0), |(bytes, count), image| (bytes + image.data.len(), count + 1))
}

/// Compute usage and entity counts.
///
/// Returns [`KeepsakeError::Cancelled`] as soon as `cancel` fires; partial
/// totals are discarded and the walk must be rerun from the start.
pub fn compute(
    data: &Collections,
    quota: u64,
    cancel: &CancellationToken,
) -> Result<(StorageInfo, StorageStats), KeepsakeError> {
    let mut tally = Tally {
        cancel,
        breakdown: StorageBreakdown::default(),
        stats: StorageStats::default(),
    };

    for session in data.sessions.values() {
        let (image_bytes, images) = message_images(&session.messages);
        tally.record(Category::Sessions, &session.meta(), 0)?;
        tally.record(Category::Sessions, &session.messages_record(), image_bytes)?;
        tally.stats.sessions += 1;
        tally.stats.images += images;
    }

    for profile in data.profiles.values() {
        let (chat_bytes, chat_images) = message_images(&profile.chat_history);
        let gallery_bytes: usize = profile.gallery.iter().map(|g| g.url.len()).sum();
        tally.record(Category::ProfilesAndMemories, profile, chat_bytes + gallery_bytes)?;
        tally.stats.images += chat_images + profile.gallery.len() as u64;
    }
    for memory in data.memories.values() {
        tally.record(Category::ProfilesAndMemories, memory, 0)?;
    }

    for snippet in data.snippets.values() {
        tally.record(Category::SnippetsAndWorkflows, snippet, 0)?;
        tally.stats.snippets += 1;
    }
    for workflow in data.workflows.values() {
        tally.record(Category::SnippetsAndWorkflows, workflow, 0)?;
        tally.stats.workflows += 1;
    }

    for gem in data.gems.values() {
        tally.record(Category::Other, gem, 0)?;
        tally.stats.gems += 1;
    }
    for story in data.stories.values() {
        tally.record(Category::Other, story, 0)?;
    }
    for story in data.passion_stories.values() {
        let visuals = story.page_visuals();
        let visual_bytes: usize = visuals.values().map(|v| v.url.len()).sum();
        tally.record(Category::Other, story, visual_bytes)?;
        tally.stats.images += visuals.len() as u64;
    }
    for bookmark in data.bookmarks.values() {
        tally.record(Category::Other, bookmark, 0)?;
    }
    for favorite in data.favorites.values() {
        tally.record(Category::Other, favorite, 0)?;
    }
    tally.record(
        Category::Other,
        &data.settings,
        data.settings.background_image_url.len(),
    )?;
    if let Some(profile) = &data.user_profile {
        tally.record(Category::Other, profile, 0)?;
    }
    if let Some(profile) = &data.ai_profile {
        tally.record(Category::Other, profile, 0)?;
    }

    let info = StorageInfo {
        usage: tally.breakdown.total(),
        quota,
        breakdown: tally.breakdown,
    };
    debug!(usage = info.usage, quota, "storage accounted");
    Ok((info, tally.stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_test_utils::fixtures;

    fn populated() -> Collections {
        let mut data = Collections::default();
        for session in [fixtures::maximal_session("s1", Some("g1")), fixtures::minimal_session("s2")] {
            data.sessions.insert(session.id.clone(), session);
        }
        data.gems.insert("g1".into(), fixtures::maximal_gem("g1"));
        data.profiles.insert("p1".into(), fixtures::maximal_profile("p1"));
        data.memories.insert("m1".into(), fixtures::profile_memory("m1", "p1"));
        data.passion_stories.insert("pw".into(), fixtures::maximal_passion("pw"));
        data.snippets.insert("c1".into(), fixtures::maximal_snippet("c1"));
        data.workflows.insert("w1".into(), fixtures::maximal_workflow("w1"));
        data.bookmarks.insert("b1".into(), fixtures::bookmark("b1", "s1"));
        data.settings = fixtures::maximal_settings();
        data.user_profile = Some(fixtures::user_profile());
        data
    }

    /// Bytes the store would write for every record.
    fn written_bytes(data: &Collections) -> u64 {
        let mut total = 0;
        for s in data.sessions.values() {
            total += codec::encode(&s.meta()).unwrap().len();
            total += codec::encode(&s.messages_record()).unwrap().len();
        }
        total += data.gems.values().map(|v| codec::encode(v).unwrap().len()).sum::<usize>();
        total += data.profiles.values().map(|v| codec::encode(v).unwrap().len()).sum::<usize>();
        total += data.memories.values().map(|v| codec::encode(v).unwrap().len()).sum::<usize>();
        total += data.passion_stories.values().map(|v| codec::encode(v).unwrap().len()).sum::<usize>();
        total += data.snippets.values().map(|v| codec::encode(v).unwrap().len()).sum::<usize>();
        total += data.workflows.values().map(|v| codec::encode(v).unwrap().len()).sum::<usize>();
        total += data.bookmarks.values().map(|v| codec::encode(v).unwrap().len()).sum::<usize>();
        total += codec::encode(&data.settings).unwrap().len();
        total += codec::encode(data.user_profile.as_ref().unwrap()).unwrap().len();
        total as u64
    }

    #[test]
    fn breakdown_sums_to_usage_and_usage_matches_written_bytes() {
        let data = populated();
        let (info, _) = compute(&data, 1 << 20, &CancellationToken::new()).unwrap();
        assert_eq!(info.breakdown.total(), info.usage);
        assert_eq!(info.usage, written_bytes(&data));
        assert_eq!(info.quota, 1 << 20);
    }

    #[test]
    fn image_payloads_are_attributed_to_images() {
        let data = populated();
        let (info, stats) = compute(&data, 0, &CancellationToken::new()).unwrap();
        // Gallery image, page visual and background each carry the fixture
        // data URL.
        assert!(info.breakdown.images >= 3 * fixtures::IMAGE_DATA.len() as u64);
        assert!(info.breakdown.sessions > 0);
        assert!(info.breakdown.other > 0);
        assert_eq!(stats.sessions, 2);
        assert_eq!(stats.gems, 1);
        assert_eq!(stats.snippets, 1);
        assert_eq!(stats.workflows, 1);
    }

    #[test]
    fn empty_store_counts_only_default_settings() {
        let data = Collections::default();
        let (info, stats) = compute(&data, 10, &CancellationToken::new()).unwrap();
        assert_eq!(info.usage, info.breakdown.other);
        assert_eq!(info.breakdown.images, 0);
        assert_eq!(stats, StorageStats::default());
    }

    #[test]
    fn cancelled_token_stops_the_walk() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = compute(&populated(), 0, &cancel).unwrap_err();
        assert!(matches!(err, KeepsakeError::Cancelled));
    }
}
