//! Q-Music Reconcile
//!
//! Merges optimistic local records with confirmed network listings.
//!
//! Publishing on the Content Network is eventually consistent: a freshly
//! published track or playlist is inserted into the local view immediately
//! (optimistic), and shows up in network listings some time later
//! (confirmed). Refreshing a listing naively either drops the optimistic
//! record (it vanishes until the network catches up) or shows it twice
//! (once optimistic, once confirmed). Reconciliation resolves both:
//!
//! - optimistic records survive a refresh while they are still young or
//!   belong to the viewing user;
//! - confirmed records that duplicate a surviving optimistic record are
//!   dropped, keeping the optimistic copy;
//! - the merged list is sorted newest first, with the user's protected
//!   records ahead of undated network records.
//!
//! Everything here is pure: inputs in, merged list out, no clocks or I/O.
//! The caller passes `now` explicitly, so behavior at the age boundary is
//! testable.

#![forbid(unsafe_code)]

use chrono::{DateTime, Duration, Utc};
use qmusic_core::{Playlist, ResourceKey, Track};
use std::collections::HashSet;
use tracing::debug;

/// Tunable reconciliation parameters.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReconcileConfig {
    /// How long an optimistic record survives refreshes on age alone.
    /// Past this window only records owned by the viewing user are kept.
    pub max_age_secs: i64,
    /// Two durations within this many seconds count as the same length
    /// when fuzzy-matching tracks.
    pub duration_tolerance_secs: u64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            max_age_secs: 60,
            duration_tolerance_secs: 5,
        }
    }
}

fn norm(s: &str) -> String {
    s.trim().to_lowercase()
}

fn within_age_window(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>, config: &ReconcileConfig) -> bool {
    // An undated optimistic record has no claim to recency.
    created_at
        .map(|created| now - created < Duration::seconds(config.max_age_secs))
        .unwrap_or(false)
}

/// Whether two tracks are plausibly the same recording published twice.
///
/// Exact key equality aside, a confirmed record duplicates an optimistic
/// one when title and artist agree (case- and whitespace-insensitive) and
/// the durations, where both are known, differ by at most the tolerance.
/// A known artist never matches an unknown one.
fn same_recording(a: &Track, b: &Track, config: &ReconcileConfig) -> bool {
    if a.key() == b.key() {
        return true;
    }
    if norm(&a.title) != norm(&b.title) {
        return false;
    }
    let artists_agree = match (&a.artist, &b.artist) {
        (Some(x), Some(y)) => norm(x) == norm(y),
        (None, None) => true,
        _ => false,
    };
    if !artists_agree {
        return false;
    }
    match (a.duration_secs, b.duration_secs) {
        (Some(x), Some(y)) => x.abs_diff(y) <= config.duration_tolerance_secs,
        _ => true,
    }
}

fn sort_newest_first<T>(
    records: &mut [T],
    protected: impl Fn(&T) -> bool,
    created_at: impl Fn(&T) -> Option<DateTime<Utc>>,
) {
    // Stable: ties keep their listing order, so the network's own
    // recency ordering survives among undated records.
    records.sort_by(|a, b| {
        (protected(b), created_at(b)).cmp(&(protected(a), created_at(a)))
    });
}

/// Merge optimistic tracks with a confirmed track listing.
///
/// 1. Optimistic records are kept while younger than the age window, or
///    indefinitely when owned by one of `self_owners`.
/// 2. Confirmed records that duplicate a kept record (exact key, or the
///    fuzzy [`same_recording`] match) are dropped; the kept copy wins.
///    Confirmed records repeating an already-seen key are dropped too.
/// 3. The merged list is stable-sorted: kept records first, then by
///    creation time descending, undated records last.
pub fn reconcile_tracks(
    optimistic: &[Track],
    confirmed: &[Track],
    self_owners: &[String],
    now: DateTime<Utc>,
    config: &ReconcileConfig,
) -> Vec<Track> {
    let is_own = |track: &Track| self_owners.iter().any(|owner| *owner == track.owner);

    let kept: Vec<Track> = optimistic
        .iter()
        .filter(|track| is_own(track) || within_age_window(track.created_at, now, config))
        .cloned()
        .collect();
    if kept.len() < optimistic.len() {
        debug!(
            dropped = optimistic.len() - kept.len(),
            "expired optimistic tracks"
        );
    }
    let kept_count = kept.len();

    let mut seen: HashSet<ResourceKey> = kept.iter().map(Track::key).collect();
    let mut merged = kept;
    for track in confirmed {
        if !seen.insert(track.key()) {
            continue;
        }
        if merged[..kept_count]
            .iter()
            .any(|kept| same_recording(kept, track, config))
        {
            debug!(identifier = %track.identifier, "confirmed track duplicates an optimistic one");
            continue;
        }
        merged.push(track.clone());
    }

    let protected: HashSet<ResourceKey> = merged[..kept_count].iter().map(Track::key).collect();
    sort_newest_first(
        &mut merged,
        |t| protected.contains(&t.key()),
        |t| t.created_at,
    );
    merged
}

/// Merge optimistic playlists with a confirmed playlist listing.
///
/// Same age-window and ordering rules as [`reconcile_tracks`], but
/// de-duplication is by key only: playlists carry no duration or artist
/// to fuzzy-match on, and two playlists with the same name are a
/// legitimate state of the network.
pub fn reconcile_playlists(
    optimistic: &[Playlist],
    confirmed: &[Playlist],
    self_owners: &[String],
    now: DateTime<Utc>,
    config: &ReconcileConfig,
) -> Vec<Playlist> {
    let is_own =
        |playlist: &Playlist| self_owners.iter().any(|owner| *owner == playlist.owner);

    let kept: Vec<Playlist> = optimistic
        .iter()
        .filter(|playlist| is_own(playlist) || within_age_window(playlist.created_at, now, config))
        .cloned()
        .collect();
    let kept_count = kept.len();

    let mut seen: HashSet<ResourceKey> = kept.iter().map(Playlist::key).collect();
    let mut merged = kept;
    for playlist in confirmed {
        if !seen.insert(playlist.key()) {
            debug!(identifier = %playlist.identifier, "confirmed playlist duplicates an optimistic one");
            continue;
        }
        merged.push(playlist.clone());
    }

    let protected: HashSet<ResourceKey> =
        merged[..kept_count].iter().map(Playlist::key).collect();
    sort_newest_first(
        &mut merged,
        |p| protected.contains(&p.key()),
        |p| p.created_at,
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmusic_core::ServiceKind;

    fn track(owner: &str, identifier: &str, title: &str) -> Track {
        Track {
            owner: owner.to_owned(),
            service: ServiceKind::Audio,
            identifier: identifier.to_owned(),
            title: title.to_owned(),
            artist: Some("Artist".to_owned()),
            duration_secs: Some(180),
            filename: None,
            created_at: None,
        }
    }

    fn aged(mut t: Track, now: DateTime<Utc>, age_secs: i64) -> Track {
        t.created_at = Some(now - Duration::seconds(age_secs));
        t
    }

    fn playlist(owner: &str, identifier: &str) -> Playlist {
        Playlist {
            owner: owner.to_owned(),
            service: ServiceKind::Playlist,
            identifier: identifier.to_owned(),
            name: "P".to_owned(),
            description: String::new(),
            entries: Vec::new(),
            thumbnail: None,
            created_at: None,
        }
    }

    mod age_window {
        use super::*;

        #[test]
        fn young_optimistic_records_survive() {
            let now = Utc::now();
            let fresh = aged(track("alice", "id_fresh", "Fresh"), now, 30);
            let merged =
                reconcile_tracks(&[fresh.clone()], &[], &[], now, &ReconcileConfig::default());
            assert_eq!(merged, vec![fresh]);
        }

        #[test]
        fn expired_optimistic_records_are_dropped() {
            let now = Utc::now();
            let stale = aged(track("alice", "id_stale", "Stale"), now, 61);
            let merged = reconcile_tracks(&[stale], &[], &[], now, &ReconcileConfig::default());
            assert!(merged.is_empty());
        }

        #[test]
        fn exactly_at_the_window_counts_as_expired() {
            let now = Utc::now();
            let boundary = aged(track("alice", "id", "T"), now, 60);
            let merged = reconcile_tracks(&[boundary], &[], &[], now, &ReconcileConfig::default());
            assert!(merged.is_empty());
        }

        #[test]
        fn own_records_outlive_the_window() {
            let now = Utc::now();
            let stale = aged(track("alice", "id_stale", "Stale"), now, 3600);
            let merged = reconcile_tracks(
                &[stale.clone()],
                &[],
                &["alice".to_owned()],
                now,
                &ReconcileConfig::default(),
            );
            assert_eq!(merged, vec![stale]);
        }

        #[test]
        fn undated_optimistic_records_need_ownership() {
            let now = Utc::now();
            let undated = track("alice", "id", "T");
            let config = ReconcileConfig::default();
            assert!(reconcile_tracks(&[undated.clone()], &[], &[], now, &config).is_empty());
            assert_eq!(
                reconcile_tracks(&[undated.clone()], &[], &["alice".to_owned()], now, &config),
                vec![undated]
            );
        }
    }

    mod dedup {
        use super::*;

        #[test]
        fn confirmed_copy_of_a_kept_record_is_dropped() {
            let now = Utc::now();
            let optimistic = aged(track("alice", "id_one", "Hello World"), now, 10);
            let confirmed = track("alice", "id_one", "Hello World");
            let merged = reconcile_tracks(
                &[optimistic.clone()],
                &[confirmed],
                &[],
                now,
                &ReconcileConfig::default(),
            );
            // the kept (dated) version wins
            assert_eq!(merged, vec![optimistic]);
        }

        #[test]
        fn fuzzy_match_catches_republished_identifiers() {
            let now = Utc::now();
            let optimistic = aged(track("alice", "qmusic_track_hello_AB12CD34", "Hello"), now, 10);
            let mut confirmed = track("alice", "qmusic_track_hello_ZZ99YY88", "  hello ");
            confirmed.duration_secs = Some(183);
            let merged = reconcile_tracks(
                &[optimistic.clone()],
                &[confirmed],
                &[],
                now,
                &ReconcileConfig::default(),
            );
            assert_eq!(merged, vec![optimistic]);
        }

        #[test]
        fn duration_beyond_tolerance_is_a_different_track() {
            let now = Utc::now();
            let optimistic = aged(track("alice", "id_one", "Hello"), now, 10);
            let mut confirmed = track("alice", "id_two", "Hello");
            confirmed.duration_secs = Some(186);
            let merged = reconcile_tracks(
                &[optimistic],
                &[confirmed],
                &[],
                now,
                &ReconcileConfig::default(),
            );
            assert_eq!(merged.len(), 2);
        }

        #[test]
        fn known_artist_never_matches_unknown() {
            let now = Utc::now();
            let optimistic = aged(track("alice", "id_one", "Hello"), now, 10);
            let mut confirmed = track("alice", "id_two", "Hello");
            confirmed.artist = None;
            let merged = reconcile_tracks(
                &[optimistic],
                &[confirmed],
                &[],
                now,
                &ReconcileConfig::default(),
            );
            assert_eq!(merged.len(), 2);
        }

        #[test]
        fn repeated_confirmed_keys_collapse() {
            let now = Utc::now();
            let confirmed = track("alice", "id_one", "Hello");
            let merged = reconcile_tracks(
                &[],
                &[confirmed.clone(), confirmed],
                &[],
                now,
                &ReconcileConfig::default(),
            );
            assert_eq!(merged.len(), 1);
        }

        #[test]
        fn distinct_confirmed_records_are_never_fuzzy_collapsed() {
            // Two genuine network records with the same title are a
            // legitimate state (covers, re-uploads by other users).
            let now = Utc::now();
            let a = track("alice", "id_one", "Hello");
            let b = track("bob", "id_two", "Hello");
            let merged =
                reconcile_tracks(&[], &[a, b], &[], now, &ReconcileConfig::default());
            assert_eq!(merged.len(), 2);
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn kept_records_come_first_then_newest() {
            let now = Utc::now();
            let mine = aged(track("alice", "id_mine", "Mine"), now, 30);
            let newer = aged(track("bob", "id_new", "New"), now, 5);
            let older = aged(track("carol", "id_old", "Old"), now, 500);
            let merged = reconcile_tracks(
                &[mine.clone()],
                &[older.clone(), newer.clone()],
                &[],
                now,
                &ReconcileConfig::default(),
            );
            assert_eq!(merged, vec![mine, newer, older]);
        }

        #[test]
        fn undated_records_keep_listing_order_at_the_end() {
            let now = Utc::now();
            let first = track("alice", "id_first", "First");
            let second = track("bob", "id_second", "Second");
            let dated = aged(track("carol", "id_dated", "Dated"), now, 10);
            let merged = reconcile_tracks(
                &[],
                &[first.clone(), second.clone(), dated.clone()],
                &[],
                now,
                &ReconcileConfig::default(),
            );
            assert_eq!(merged, vec![dated, first, second]);
        }

        #[test]
        fn reconcile_is_idempotent() {
            let now = Utc::now();
            let optimistic = [aged(track("alice", "id_mine", "Mine"), now, 10)];
            let confirmed = [
                aged(track("bob", "id_a", "A"), now, 100),
                track("carol", "id_b", "B"),
            ];
            let config = ReconcileConfig::default();
            let once = reconcile_tracks(&optimistic, &confirmed, &[], now, &config);
            let twice = reconcile_tracks(&optimistic, &once, &[], now, &config);
            assert_eq!(once, twice);
        }
    }

    mod playlists {
        use super::*;

        #[test]
        fn key_dedup_keeps_the_optimistic_copy() {
            let now = Utc::now();
            let mut optimistic = playlist("alice", "qmusic_playlist_p_abc");
            optimistic.created_at = Some(now - Duration::seconds(10));
            optimistic.name = "My Playlist".to_owned();
            let confirmed = playlist("alice", "qmusic_playlist_p_abc");
            let merged = reconcile_playlists(
                &[optimistic.clone()],
                &[confirmed],
                &[],
                now,
                &ReconcileConfig::default(),
            );
            assert_eq!(merged, vec![optimistic]);
        }

        #[test]
        fn same_name_is_not_a_duplicate() {
            let now = Utc::now();
            let mut optimistic = playlist("alice", "qmusic_playlist_p_abc");
            optimistic.created_at = Some(now - Duration::seconds(10));
            let confirmed = playlist("bob", "qmusic_playlist_p_def");
            let merged = reconcile_playlists(
                &[optimistic],
                &[confirmed],
                &[],
                now,
                &ReconcileConfig::default(),
            );
            assert_eq!(merged.len(), 2);
        }

        #[test]
        fn expired_optimistic_playlists_are_dropped() {
            let now = Utc::now();
            let mut stale = playlist("alice", "qmusic_playlist_p_abc");
            stale.created_at = Some(now - Duration::seconds(600));
            let merged =
                reconcile_playlists(&[stale], &[], &[], now, &ReconcileConfig::default());
            assert!(merged.is_empty());
        }
    }
}
