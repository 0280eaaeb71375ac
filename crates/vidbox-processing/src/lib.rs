//! Upload validation and video normalization.
//!
//! `VideoValidator` gates incoming files before any bytes touch storage;
//! `Transcoder` wraps the external ffmpeg binary that normalizes accepted
//! containers to the canonical MP4 format.

pub mod transcode;
pub mod validator;

pub use transcode::{TranscodeError, Transcoder};
pub use validator::{needs_transcode, ValidationError, VideoValidator, CANONICAL_EXTENSION};
