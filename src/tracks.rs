//! Track listing model and parsers for the two inspector wire formats:
//! mkvmerge's JSON identify output (primary) and mkvinfo's human-readable
//! text output (fallback).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::error::Result;

/// Matroska track class as reported by the MKVToolNix tools. Anything the
/// tools report outside the three canonical classes collapses to `Unknown`
/// and is skipped by the rename step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Video,
    Audio,
    Subtitles,
    #[serde(other)]
    Unknown,
}

impl TrackType {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "video" => TrackType::Video,
            "audio" => TrackType::Audio,
            "subtitles" => TrackType::Subtitles,
            _ => TrackType::Unknown,
        }
    }

    /// True for the track classes the rename step acts on.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, TrackType::Unknown)
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrackType::Video => "video",
            TrackType::Audio => "audio",
            TrackType::Subtitles => "subtitles",
            TrackType::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// One track of a container, numbered the way mkvpropedit addresses tracks
/// (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackDescriptor {
    pub number: u64,
    pub track_type: TrackType,
}

#[derive(Debug, Deserialize)]
struct IdentifyOutput {
    #[serde(default)]
    tracks: Vec<IdentifyTrack>,
}

#[derive(Debug, Deserialize)]
struct IdentifyTrack {
    id: u64,
    #[serde(rename = "type")]
    track_type: TrackType,
}

/// Parse `mkvmerge --identification-format json --identify` output.
///
/// mkvmerge track ids are 0-based while mkvpropedit's `track:N` selector is
/// 1-based, so the descriptor number is id + 1.
pub fn parse_identify_json(json: &str) -> Result<Vec<TrackDescriptor>> {
    let identify: IdentifyOutput = serde_json::from_str(json)?;

    Ok(identify
        .tracks
        .into_iter()
        .map(|track| TrackDescriptor {
            number: track.id + 1,
            track_type: track.track_type,
        })
        .collect())
}

static TRACK_INFO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\+ Track number: (\d+).*?\+ Track type: (\w+)").unwrap()
});

/// Scan mkvinfo's text output for (track number, track type) pairs, in
/// report order. Track numbers here are already the 1-based mkvpropedit
/// numbering.
pub fn parse_mkvinfo_text(output: &str) -> Vec<TrackDescriptor> {
    TRACK_INFO_RE
        .captures_iter(output)
        .filter_map(|caps| {
            let number = caps.get(1)?.as_str().parse::<u64>().ok()?;
            let track_type = TrackType::from_label(caps.get(2)?.as_str());
            Some(TrackDescriptor { number, track_type })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MKVINFO_SAMPLE: &str = "\
+ EBML head
+ Segment: size 1234567
|+ Segment information
| + Title: Some Movie
|+ Tracks
| + Track
|  + Track number: 1 (track ID for mkvmerge & mkvextract: 0)
|  + Track UID: 1493619965
|  + Track type: video
|  + Codec ID: V_MPEG4/ISO/AVC
| + Track
|  + Track number: 2 (track ID for mkvmerge & mkvextract: 1)
|  + Track UID: 3442966448
|  + Track type: audio
|  + Codec ID: A_AAC
| + Track
|  + Track number: 3 (track ID for mkvmerge & mkvextract: 2)
|  + Track UID: 2201807622
|  + Track type: subtitles
|  + Codec ID: S_TEXT/ASS
";

    #[test]
    fn test_parse_mkvinfo_text_returns_ordered_pairs() {
        let tracks = parse_mkvinfo_text(MKVINFO_SAMPLE);

        assert_eq!(
            tracks,
            vec![
                TrackDescriptor { number: 1, track_type: TrackType::Video },
                TrackDescriptor { number: 2, track_type: TrackType::Audio },
                TrackDescriptor { number: 3, track_type: TrackType::Subtitles },
            ]
        );
    }

    #[test]
    fn test_parse_mkvinfo_text_maps_unknown_type() {
        let output = "\
| + Track
|  + Track number: 1 (track ID for mkvmerge & mkvextract: 0)
|  + Track type: buttons
";
        let tracks = parse_mkvinfo_text(output);

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].track_type, TrackType::Unknown);
        assert!(!tracks[0].track_type.is_recognized());
    }

    #[test]
    fn test_parse_mkvinfo_text_empty_output() {
        assert!(parse_mkvinfo_text("").is_empty());
        assert!(parse_mkvinfo_text("+ EBML head\n+ Segment\n").is_empty());
    }

    #[test]
    fn test_parse_identify_json_offsets_track_ids() {
        let json = r#"{
            "container": {"recognized": true, "supported": true, "type": "Matroska"},
            "tracks": [
                {"id": 0, "type": "video", "codec": "AVC/H.264/MPEG-4p10"},
                {"id": 1, "type": "audio", "codec": "AAC"},
                {"id": 2, "type": "subtitles", "codec": "SubStationAlpha"}
            ]
        }"#;

        let tracks = parse_identify_json(json).unwrap();

        assert_eq!(
            tracks,
            vec![
                TrackDescriptor { number: 1, track_type: TrackType::Video },
                TrackDescriptor { number: 2, track_type: TrackType::Audio },
                TrackDescriptor { number: 3, track_type: TrackType::Subtitles },
            ]
        );
    }

    #[test]
    fn test_parse_identify_json_unknown_type_is_carried_through() {
        let json = r#"{"tracks": [{"id": 0, "type": "buttons", "codec": "VobBtn"}]}"#;

        let tracks = parse_identify_json(json).unwrap();
        assert_eq!(tracks[0].number, 1);
        assert_eq!(tracks[0].track_type, TrackType::Unknown);
    }

    #[test]
    fn test_parse_identify_json_rejects_malformed_input() {
        assert!(parse_identify_json("not json at all").is_err());
    }

    #[test]
    fn test_track_type_from_label_trims_whitespace() {
        assert_eq!(TrackType::from_label(" video "), TrackType::Video);
        assert_eq!(TrackType::from_label("audio\n"), TrackType::Audio);
        assert_eq!(TrackType::from_label("Video"), TrackType::Unknown);
    }
}
