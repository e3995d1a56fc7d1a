//! Language fallback reconciliation.
//!
//! Catalogs often answer a request for a missing localization with the
//! original-language text, or with a synthesized "Episode 7" title. The
//! functions here decide whether a record is deficient and merge a
//! fallback-language answer into it. They never fetch anything; the
//! aggregation engine issues at most one fallback fetch per call and hands
//! both sides to these rules.
//!
//! Correspondence between the two sides is positional for search lists and
//! keyed by `(season, episode)` for episode lists.

use std::collections::HashMap;

use tracing::debug;

use crate::language::{Language, language_part};
use crate::model::{MetadataRecord, SearchResult};

/// True for empty or whitespace-only text.
#[must_use]
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// True when the catalog echoed the original title instead of a translation.
///
/// The title must equal the original title while the declared original
/// language differs from the requested one.
#[must_use]
pub fn is_untranslated(
    title: &str,
    original_title: &str,
    original_language: &str,
    requested: Language,
) -> bool {
    title == original_title && language_part(original_language) != requested.language_part()
}

/// Whether a show or movie record warrants a fallback fetch.
#[must_use]
pub fn record_needs_fallback(record: &MetadataRecord, requested: Language) -> bool {
    is_untranslated(
        &record.title,
        &record.original_title,
        &record.original_language,
        requested,
    ) || is_blank(&record.plot)
}

/// Copies individually deficient fields from `fallback` into `primary`.
///
/// Populated primary fields are never overwritten. Returns whether anything
/// was copied.
pub fn merge_record(
    primary: &mut MetadataRecord,
    fallback: &MetadataRecord,
    requested: Language,
) -> bool {
    let mut patched = false;

    if is_blank(&primary.plot) && !is_blank(&fallback.plot) {
        primary.plot.clone_from(&fallback.plot);
        patched = true;
    }

    if is_untranslated(
        &primary.title,
        &primary.original_title,
        &primary.original_language,
        requested,
    ) && !is_blank(&fallback.title)
        && fallback.title != primary.title
    {
        debug!(from = %primary.title, to = %fallback.title, "title replaced from fallback");
        primary.title.clone_from(&fallback.title);
        patched = true;
    }

    if is_blank(&primary.original_title) && !is_blank(&fallback.original_title) {
        primary.original_title.clone_from(&fallback.original_title);
        patched = true;
    }

    patched
}

/// Whether any element of a search list is untranslated.
#[must_use]
pub fn search_needs_fallback(results: &[SearchResult], requested: Language) -> bool {
    results.iter().any(|r| result_untranslated(r, requested))
}

fn result_untranslated(result: &SearchResult, requested: Language) -> bool {
    is_untranslated(
        &result.title,
        &result.original_title,
        &result.original_language,
        requested,
    )
}

/// Merges a fallback search list into the primary one by position.
///
/// The element at index `i` is replaced by fallback element `i` when the
/// primary one is untranslated and the fallback title is non-blank and
/// different. Length and order of `primary` are preserved; indices past the
/// end of `fallback` are kept as-is.
///
/// Both lists are assumed to be ranked identically by the catalog. No id
/// cross-check is made.
#[must_use]
pub fn reconcile_search(
    primary: Vec<SearchResult>,
    fallback: Vec<SearchResult>,
    requested: Language,
) -> Vec<SearchResult> {
    let mut fallback = fallback.into_iter();
    primary
        .into_iter()
        .enumerate()
        .map(|(position, original)| match fallback.next() {
            Some(candidate)
                if result_untranslated(&original, requested)
                    && !is_blank(&candidate.title)
                    && candidate.title != original.title =>
            {
                debug!(
                    position,
                    from = %original.title,
                    to = %candidate.title,
                    "search result replaced from fallback"
                );
                candidate
            }
            _ => original,
        })
        .collect()
}

/// Detects a synthesized placeholder title such as `"Episode 7"`.
///
/// The name must split on whitespace into exactly two tokens, the second of
/// which parses as an integer equal to `episode_number`.
#[must_use]
pub fn is_default_episode_name(name: &str, episode_number: u32) -> bool {
    let mut tokens = name.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(_), Some(number), None) => number
            .parse::<i64>()
            .is_ok_and(|n| n == i64::from(episode_number)),
        _ => false,
    }
}

/// Whether an episode's title or overview is deficient.
///
/// `declared` is the episode number the caller asked for. Without it the
/// record's own number is used.
#[must_use]
pub fn episode_needs_fallback(episode: &MetadataRecord, declared: Option<u32>) -> bool {
    is_blank(&episode.title)
        || is_blank(&episode.plot)
        || declared
            .or(episode.episode_number)
            .is_some_and(|n| is_default_episode_name(&episode.title, n))
}

/// Patches a deficient episode from its fallback counterpart.
///
/// The title is replaced when blank, or when it is a placeholder and the
/// fallback title is not. The overview is replaced only when blank.
pub fn patch_episode(
    primary: &mut MetadataRecord,
    fallback: &MetadataRecord,
    declared: Option<u32>,
) -> bool {
    let number = declared.or(primary.episode_number);
    let is_default = |title: &str| number.is_some_and(|n| is_default_episode_name(title, n));
    let mut patched = false;

    if !is_blank(&fallback.title)
        && (is_blank(&primary.title) || (is_default(&primary.title) && !is_default(&fallback.title)))
    {
        primary.title.clone_from(&fallback.title);
        patched = true;
    }

    if is_blank(&primary.plot) && !is_blank(&fallback.plot) {
        primary.plot.clone_from(&fallback.plot);
        patched = true;
    }

    patched
}

/// `(season, episode)` key of an episode record.
#[must_use]
pub fn episode_key(episode: &MetadataRecord) -> Option<(u32, u32)> {
    Some((episode.season_number?, episode.episode_number?))
}

/// Merges one season's fallback episode list into the primary list by key.
///
/// Every deficient primary episode is patched from the fallback episode
/// with the same key. Episodes without a counterpart are kept unpatched;
/// fallback episodes absent from the primary list are never added.
#[must_use]
pub fn reconcile_season(
    primary: Vec<MetadataRecord>,
    fallback: &[MetadataRecord],
) -> Vec<MetadataRecord> {
    let by_key: HashMap<(u32, u32), &MetadataRecord> = fallback
        .iter()
        .filter_map(|ep| episode_key(ep).map(|key| (key, ep)))
        .collect();

    primary
        .into_iter()
        .map(|mut episode| {
            if !episode_needs_fallback(&episode, None) {
                return episode;
            }
            match episode_key(&episode).and_then(|key| by_key.get(&key)) {
                Some(candidate) => {
                    if patch_episode(&mut episode, candidate, None) {
                        debug!(key = ?episode_key(&episode), "episode patched from fallback");
                    }
                }
                None => {
                    debug!(key = ?episode_key(&episode), "no fallback counterpart for episode");
                }
            }
            episode
        })
        .collect()
}
