//! Error types for track sampling, configuration and the simulation driver.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by track loading and pixel sampling.
#[derive(Debug, Error)]
pub enum TrackError {
    /// A pixel outside the raster was sampled.
    ///
    /// Tracks whose road reaches the image border produce this error when a
    /// sensor ray walks off the edge. It is treated as a broken asset, not
    /// clamped.
    #[error("pixel ({x}, {y}) lies outside the {width}x{height} track raster")]
    OutOfBounds {
        /// Sampled column.
        x: i32,
        /// Sampled row.
        y: i32,
        /// Raster width in pixels.
        width: u32,
        /// Raster height in pixels.
        height: u32,
    },
    /// The image bytes could not be decoded.
    #[error("failed to decode track image {name}: {message}")]
    Decode {
        /// Name of the track being decoded.
        name: String,
        /// Decoder message.
        message: String,
    },
    /// The image file could not be read.
    #[error("failed to read track image {path}")]
    Io {
        /// Path of the image file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Pixel buffer length does not match the declared dimensions.
    #[error("track {name} has {actual} pixels, expected {expected}")]
    PixelCount {
        /// Name of the track.
        name: String,
        /// Number of pixels implied by width and height.
        expected: usize,
        /// Number of pixels supplied.
        actual: usize,
    },
    /// A track with zero width or height was requested.
    #[error("track {0} has zero width or height")]
    EmptyImage(String),
    /// A track set was built without any track.
    #[error("track set contains no tracks")]
    EmptyTrackSet,
}

/// Failures raised while loading or validating [`super::params::Params`].
#[derive(Debug, Error)]
pub enum ParamsError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON for `Params`.
    #[error("failed to parse config")]
    Parse(#[from] serde_json::Error),
    /// A parameter value is out of range.
    #[error("invalid parameter: {0}")]
    Invalid(String),
}

/// Errors surfaced by [`super::race::Simulator`] and [`super::evolution::Trainer`].
#[derive(Debug, Error)]
pub enum SimError {
    /// Track sampling or loading failed.
    #[error(transparent)]
    Track(#[from] TrackError),
    /// Configuration is invalid.
    #[error(transparent)]
    Params(#[from] ParamsError),
}
