//! Resource path helpers.
//!
//! Every fetched binary resource is addressable by a path of the shape
//! `/arbitrary/<SERVICE>/<owner>/<identifier>[/<filename>]`, with the
//! owner, identifier, and filename segments URL-component-encoded
//! individually.

use qmusic_core::ServiceKind;

const ARBITRARY_BASE: &str = "/arbitrary";

/// Path for a resource's content.
pub fn resource_url(
    service: ServiceKind,
    owner: &str,
    identifier: &str,
    filename: Option<&str>,
) -> String {
    let mut url = format!(
        "{}/{}/{}/{}",
        ARBITRARY_BASE,
        service.as_str(),
        urlencoding::encode(owner),
        urlencoding::encode(identifier),
    );
    if let Some(filename) = filename {
        url.push('/');
        url.push_str(&urlencoding::encode(filename));
    }
    url
}

/// Path for the audio content of a track.
pub fn audio_url(owner: &str, identifier: &str, filename: Option<&str>) -> String {
    resource_url(ServiceKind::Audio, owner, identifier, filename)
}

/// Path for the thumbnail published under the same `(owner, identifier)`
/// pair as its resource.
pub fn thumbnail_url(owner: &str, identifier: &str) -> String {
    resource_url(ServiceKind::Thumbnail, owner, identifier, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_segments() {
        assert_eq!(
            resource_url(ServiceKind::Audio, "alice", "qmusic_track_x_AB12", None),
            "/arbitrary/AUDIO/alice/qmusic_track_x_AB12"
        );
    }

    #[test]
    fn filename_segment_is_appended() {
        assert_eq!(
            audio_url("alice", "id", Some("song.mp3")),
            "/arbitrary/AUDIO/alice/id/song.mp3"
        );
    }

    #[test]
    fn segments_are_encoded_individually() {
        let url = resource_url(
            ServiceKind::Playlist,
            "alice smith",
            "id/with/slashes",
            Some("My List.json"),
        );
        assert_eq!(
            url,
            "/arbitrary/PLAYLIST/alice%20smith/id%2Fwith%2Fslashes/My%20List.json"
        );
    }

    #[test]
    fn thumbnail_shares_the_resource_identifier() {
        assert_eq!(
            thumbnail_url("alice", "qmusic_playlist_alice_abc"),
            "/arbitrary/THUMBNAIL/alice/qmusic_playlist_alice_abc"
        );
    }
}
