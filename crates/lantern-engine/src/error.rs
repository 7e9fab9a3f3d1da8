//! Typed errors for the fallible boundaries of the runtime.
//!
//! Most public service methods degrade (log and continue) instead of returning these;
//! the lower-level APIs that can fail expose them directly.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("unknown scene '{0}'")]
    UnknownScene(String),
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio backend unavailable")]
    Unavailable,

    #[error("failed to open audio output: {0}")]
    Init(String),

    #[error("failed to decode sound: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("playback failed: {0}")]
    Playback(String),

    #[error("failed to read sound file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to fetch '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image '{url}': {source}")]
    Image {
        url: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to decode sound '{url}': {source}")]
    Sound {
        url: String,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("invalid asset manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must start with '#': '{0}'")]
    MissingHash(String),

    #[error("expected 3, 6 or 8 hex digits, got {0}")]
    BadLength(usize),

    #[error("invalid hex digit in '{0}'")]
    BadDigit(String),
}

/// Returned by `FontSystem::load_font`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("font load error: {0}")]
pub struct FontLoadError(pub String);
