use std::io::Cursor;
use std::sync::Arc;

use crate::error::AudioError;

/// Encoded sound file bytes (wav, ogg, mp3 or flac), cheap to clone.
#[derive(Debug, Clone)]
pub struct SoundData(Arc<[u8]>);

impl SoundData {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::from(bytes.into()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Opens a decoder over the bytes; also used to validate freshly fetched files.
    pub fn decoder(&self) -> Result<rodio::Decoder<Cursor<SoundData>>, AudioError> {
        Ok(rodio::Decoder::new(Cursor::new(self.clone()))?)
    }
}

impl AsRef<[u8]> for SoundData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
