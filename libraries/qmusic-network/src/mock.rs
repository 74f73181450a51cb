//! Deterministic mock dataset for detached (bridge-less) operation.
//!
//! When the host injected no bridge, every read degrades to this fixed
//! dataset so the rest of the pipeline stays exercisable. Writes never
//! touch it; they fail fast instead.

use chrono::{DateTime, Utc};
use qmusic_core::ids;
use qmusic_core::{Playlist, PlaylistEntry, ServiceKind, Track};
use qmusic_metadata::{extract, RecordSource};

fn fixed_time(epoch_secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(epoch_secs, 0).unwrap_or_else(Utc::now)
}

fn mock_track(owner: &str, identifier: &str, description: Option<&str>, epoch_secs: i64) -> Track {
    let meta = extract(&RecordSource {
        owner,
        identifier,
        description,
        title_hint: None,
    });
    Track {
        owner: owner.to_owned(),
        service: ServiceKind::Audio,
        identifier: identifier.to_owned(),
        title: meta.title,
        artist: Some(meta.artist),
        duration_secs: None,
        filename: None,
        created_at: Some(fixed_time(epoch_secs)),
    }
}

/// The fixed track listing served in detached mode.
pub fn mock_tracks() -> Vec<Track> {
    vec![
        mock_track(
            "TestUser1",
            "qmusic_song_john_doe_hello_world_ABC123",
            Some("title=Hello World;author=John Doe"),
            1_754_000_000,
        ),
        mock_track(
            "TestUser2",
            "qmusic_track_amazing_grace_DEF456",
            None,
            1_753_900_000,
        ),
        mock_track(
            "iffi",
            "qmusic_song_iffi_vaba_mees_GHI789",
            Some("title=Vaba Mees Mashup;author=Iffi"),
            1_754_100_000,
        ),
    ]
}

fn mock_playlist_record(
    owner: &str,
    identifier: &str,
    description: &str,
    epoch_secs: i64,
) -> Playlist {
    Playlist {
        owner: owner.to_owned(),
        service: ServiceKind::Playlist,
        identifier: identifier.to_owned(),
        name: ids::extract_title(identifier).unwrap_or_else(|| "Unnamed Playlist".to_owned()),
        description: description.to_owned(),
        entries: Vec::new(),
        thumbnail: None,
        created_at: Some(fixed_time(epoch_secs)),
    }
}

/// The fixed playlist listing served in detached mode. Entries stay empty
/// until a playlist is fetched individually, like live listings.
pub fn mock_playlists() -> Vec<Playlist> {
    vec![
        mock_playlist_record(
            "user1",
            "qmusic_playlist_summer_hits_abc123",
            "My favorite summer tracks",
            1_753_000_000,
        ),
        mock_playlist_record(
            "user2",
            "qmusic_playlist_workout_mix_def456",
            "Songs to get you pumped",
            1_752_000_000,
        ),
    ]
}

/// Detached-mode stand-in for fetching one playlist: a playlist derived
/// from the requested identifier, populated with two fixed entries.
pub fn mock_playlist(owner: &str, identifier: &str) -> Playlist {
    let name = ids::extract_title(identifier).unwrap_or_else(|| "Mock Playlist".to_owned());
    Playlist {
        owner: owner.to_owned(),
        service: ServiceKind::Playlist,
        identifier: identifier.to_owned(),
        name,
        description: "This is a mock playlist for development".to_owned(),
        entries: vec![
            PlaylistEntry {
                owner: "mock_user".to_owned(),
                identifier: "qmusic_song_mock_song_1_xyz123".to_owned(),
                filename: Some("mock_song_1.mp3".to_owned()),
                title: Some("Mock Song 1".to_owned()),
            },
            PlaylistEntry {
                owner: "mock_user".to_owned(),
                identifier: "qmusic_song_mock_song_2_abc456".to_owned(),
                filename: Some("mock_song_2.mp3".to_owned()),
                title: Some("Mock Song 2".to_owned()),
            },
        ],
        thumbnail: None,
        created_at: Some(fixed_time(1_753_500_000)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_is_deterministic() {
        assert_eq!(mock_tracks(), mock_tracks());
        assert_eq!(mock_playlists(), mock_playlists());
    }

    #[test]
    fn mock_tracks_are_fully_enriched() {
        let tracks = mock_tracks();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].title, "Hello World");
        assert_eq!(tracks[0].artist.as_deref(), Some("John Doe"));
        // No description: title comes from the identifier
        assert_eq!(tracks[1].title, "amazing grace");
    }

    #[test]
    fn mock_playlist_derives_name_from_identifier() {
        let playlist = mock_playlist("mock_user", "qmusic_playlist_summer_hits_abc123");
        assert_eq!(playlist.name, "summer hits");
        assert_eq!(playlist.entries.len(), 2);
    }
}
