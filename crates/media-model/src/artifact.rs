//! Encoded output: chunks produced mid-session and the finalized artifact.

use serde::{Deserialize, Serialize};

/// MIME type for VP9 video in a WebM container.
pub const WEBM_VP9_MIME: &str = "video/webm;codecs=vp9";

/// MIME type for animated GIF output.
pub const GIF_MIME: &str = "image/gif";

/// The container format an artifact was encoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    WebmVp9,
    Gif,
}

impl MediaType {
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::WebmVp9 => WEBM_VP9_MIME,
            MediaType::Gif => GIF_MIME,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::WebmVp9 => "webm",
            MediaType::Gif => "gif",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime())
    }
}

/// A fragment of encoded output delivered while the session is live.
///
/// Chunks are opaque byte runs; only their arrival order matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedChunk {
    pub bytes: Vec<u8>,
}

impl EncodedChunk {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A finalized recording: every delivered chunk joined in arrival order,
/// tagged with its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaArtifact {
    media_type: MediaType,
    bytes: Vec<u8>,
}

impl MediaArtifact {
    /// Join chunks in the order they arrived.
    pub fn from_chunks(media_type: MediaType, chunks: Vec<EncodedChunk>) -> Self {
        let total: usize = chunks.iter().map(EncodedChunk::len).sum();
        let mut bytes = Vec::with_capacity(total);
        for chunk in chunks {
            bytes.extend_from_slice(&chunk.bytes);
        }
        Self { media_type, bytes }
    }

    /// A zero-byte artifact that still carries a well-formed media type.
    pub fn empty(media_type: MediaType) -> Self {
        Self {
            media_type,
            bytes: Vec::new(),
        }
    }

    pub fn from_bytes(media_type: MediaType, bytes: Vec<u8>) -> Self {
        Self { media_type, bytes }
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn mime(&self) -> &'static str {
        self.media_type.mime()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mime_strings() {
        assert_eq!(MediaType::WebmVp9.mime(), "video/webm;codecs=vp9");
        assert_eq!(MediaType::Gif.mime(), "image/gif");
    }

    #[test]
    fn test_media_type_serde_round_trip() {
        let json = serde_json::to_string(&MediaType::WebmVp9).unwrap();
        assert_eq!(json, "\"webm_vp9\"");
        let back: MediaType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MediaType::WebmVp9);
    }

    #[test]
    fn test_empty_artifact_keeps_its_type() {
        let artifact = MediaArtifact::empty(MediaType::WebmVp9);
        assert!(artifact.is_empty());
        assert_eq!(artifact.mime(), WEBM_VP9_MIME);
    }

    #[test]
    fn test_from_chunks_preserves_arrival_order() {
        let artifact = MediaArtifact::from_chunks(
            MediaType::WebmVp9,
            vec![
                EncodedChunk::new(vec![1, 2]),
                EncodedChunk::new(vec![]),
                EncodedChunk::new(vec![3]),
            ],
        );
        assert_eq!(artifact.bytes(), &[1, 2, 3]);
    }

    proptest! {
        #[test]
        fn test_concat_length_matches_chunk_sum(
            chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..16)
        ) {
            let total: usize = chunks.iter().map(Vec::len).sum();
            let flat: Vec<u8> = chunks.iter().flatten().copied().collect();
            let artifact = MediaArtifact::from_chunks(
                MediaType::Gif,
                chunks.into_iter().map(EncodedChunk::new).collect(),
            );
            prop_assert_eq!(artifact.len(), total);
            prop_assert_eq!(artifact.bytes(), flat.as_slice());
        }
    }
}
