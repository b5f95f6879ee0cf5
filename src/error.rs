//! Error taxonomy for the processing pipeline.
//!
//! Three severity tiers:
//! - transport errors terminate the session (handled in the server loop),
//! - [`FormatError`] / [`TranscriptionError`] abort the current audio unit
//!   (the session continues and the client is notified),
//! - extraction and enrichment failures are recovered locally into empty
//!   sets or placeholder records and never abort a unit.

use std::time::Duration;
use thiserror::Error;

/// The input bytes could not be interpreted under the configured source layout.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("audio unit is empty")]
    Empty,

    #[error("unsupported sample width: {0} bytes (expected 2 or 4)")]
    UnsupportedWidth(u16),

    #[error("buffer length {len} is not a multiple of frame size {frame}")]
    Truncated { len: usize, frame: usize },

    #[error("failed to stage normalized waveform: {0}")]
    Staging(#[from] std::io::Error),

    #[error("WAV encoding failed: {0}")]
    Encode(#[from] hound::Error),
}

/// The speech-to-text engine failed for one unit.
#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("transcription request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("transcription engine returned {status}: {body}")]
    Engine { status: u16, body: String },

    #[error("transcription timed out after {0:?}")]
    Timeout(Duration),

    #[error("could not read staged waveform: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed engine reply: {0}")]
    Malformed(String),
}

/// The entity-extraction model call failed. Always recovered into an
/// all-empty entity set at the extractor boundary.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("extraction request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("extraction model returned {status}: {body}")]
    Model { status: u16, body: String },

    #[error("extraction timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed model reply: {0}")]
    Malformed(String),
}

/// A single enrichment lookup failed. Always recovered into a placeholder
/// record for that entity only.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("lookup request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("lookup service returned {status}")]
    Service { status: u16 },

    #[error("no result for {0:?}")]
    NotFound(String),

    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed lookup reply: {0}")]
    Malformed(String),
}

/// Unit-fatal errors: the unit is abandoned, the client is notified, and
/// the session keeps accumulating the next unit.
#[derive(Error, Debug)]
pub enum UnitError {
    #[error("audio format error: {0}")]
    Format(#[from] FormatError),

    #[error("transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),
}
