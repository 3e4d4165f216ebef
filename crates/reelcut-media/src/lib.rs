//! Reelcut Media - FFmpeg integration for video/audio I/O
//!
//! This crate handles:
//! - Media file probing (ffprobe, JSON output)
//! - Clip decoding to rawvideo RGBA at the output frame rate
//! - Full up-front decoding of the background track to PCM
//! - Encoding and muxing through a spawned FFmpeg process
//!
//! FFmpeg runs as a sidecar subprocess; no native dev headers are
//! required. Binary paths come from `ffmpeg-sidecar`.

pub mod audio_decoder;
pub mod decoder;
pub mod encoder;
pub mod ffmpeg;
pub mod probe;

pub use audio_decoder::decode_background_track;
pub use decoder::{ClipDecoder, DecodedFrame};
pub use encoder::FfmpegSink;
pub use ffmpeg::{ffmpeg_available, ffmpeg_path, ffprobe_path};
pub use probe::{AudioStreamInfo, MediaProbe, VideoStreamInfo};
