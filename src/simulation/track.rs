//! Raster racetracks.
//!
//! A track is an image whose pixel colour tells drivable road apart from
//! everything else. The simulation only ever asks for the colour under a
//! pixel, through [`TrackMap::color_at`].

use std::path::Path;

use log::{debug, info};
use macroquad::texture::Image;
use serde::{Deserialize, Serialize};

use super::error::TrackError;
use super::params::Params;

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Asphalt grey used by the bundled maps.
    pub const ROAD: Rgba = Rgba([58, 58, 60, 255]);
    /// Grass green used for the verge of the built-in track.
    pub const GRASS: Rgba = Rgba([62, 140, 58, 255]);
}

/// Read-only pixel access to a racetrack.
pub trait TrackMap {
    /// Raster width in pixels.
    fn width(&self) -> u32;

    /// Raster height in pixels.
    fn height(&self) -> u32;

    /// Samples the colour at `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`TrackError::OutOfBounds`] when the pixel lies outside the raster.
    fn color_at(&self, x: i32, y: i32) -> Result<Rgba, TrackError>;

    /// Whether `(x, y)` is a valid pixel of this raster.
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }
}

/// A track held as a row-major pixel buffer.
#[derive(Debug, Clone)]
pub struct RasterTrack {
    name: String,
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl RasterTrack {
    /// Builds a track from a row-major pixel buffer.
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        pixels: Vec<Rgba>,
    ) -> Result<Self, TrackError> {
        let name = name.into();
        if width == 0 || height == 0 {
            return Err(TrackError::EmptyImage(name));
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(TrackError::PixelCount {
                name,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            name,
            width,
            height,
            pixels,
        })
    }

    /// A track painted with a single colour.
    pub fn filled(name: impl Into<String>, width: u32, height: u32, color: Rgba) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// The built-in elliptical ring track.
    ///
    /// The road is the band between two concentric ellipses centred on the
    /// raster, everything else is `verge`. With the default 960x540 raster the
    /// default start pose sits on the bottom straight facing right.
    pub fn oval(width: u32, height: u32, road: Rgba, verge: Rgba) -> Self {
        let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
        let (outer_a, outer_b) = (width as f32 * 0.4375, height as f32 * 0.4444);
        let (inner_a, inner_b) = (width as f32 * 0.27, height as f32 * 0.2222);

        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let outer = (dx / outer_a).powi(2) + (dy / outer_b).powi(2);
                let inner = (dx / inner_a).powi(2) + (dy / inner_b).powi(2);
                if outer <= 1.0 && inner > 1.0 { road } else { verge }
            })
            .collect();

        Self {
            name: "oval".to_string(),
            width,
            height,
            pixels,
        }
    }

    /// Converts a decoded image, scaling it to `width` x `height` with
    /// nearest-neighbour sampling.
    pub fn from_image(
        name: impl Into<String>,
        image: &Image,
        width: u32,
        height: u32,
    ) -> Result<Self, TrackError> {
        let name = name.into();
        let (src_w, src_h) = (u32::from(image.width), u32::from(image.height));
        if src_w == 0 || src_h == 0 || width == 0 || height == 0 {
            return Err(TrackError::EmptyImage(name));
        }

        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            let sy = (u64::from(y) * u64::from(src_h) / u64::from(height)) as usize;
            for x in 0..width {
                let sx = (u64::from(x) * u64::from(src_w) / u64::from(width)) as usize;
                let i = (sy * src_w as usize + sx) * 4;
                let rgba = image.bytes.get(i..i + 4).ok_or_else(|| TrackError::PixelCount {
                    name: name.clone(),
                    expected: src_w as usize * src_h as usize * 4,
                    actual: image.bytes.len(),
                })?;
                pixels.push(Rgba([rgba[0], rgba[1], rgba[2], rgba[3]]));
            }
        }

        Self::new(name, width, height, pixels)
    }

    /// Decodes image bytes (PNG maps) into a track of the given size.
    pub fn from_png_bytes(
        name: impl Into<String>,
        bytes: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Self, TrackError> {
        let name = name.into();
        let image = Image::from_file_with_format(bytes, None).map_err(|e| {
            TrackError::Decode {
                name: name.clone(),
                message: e.to_string(),
            }
        })?;
        Self::from_image(name, &image, width, height)
    }

    /// Reads and decodes a PNG map from disk.
    pub fn load(path: impl AsRef<Path>, width: u32, height: u32) -> Result<Self, TrackError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| TrackError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        let track = Self::from_png_bytes(name, &bytes, width, height)?;
        info!("loaded track {} from {}", track.name, path.display());
        Ok(track)
    }

    /// Paints an axis-aligned rectangle, clipped to the raster.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for row in y.min(self.height)..y_end {
            let start = (row * self.width) as usize;
            for col in x.min(self.width)..x_end {
                self.pixels[start + col as usize] = color;
            }
        }
    }

    /// Name used in logs and the UI.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copies the raster into a macroquad image for drawing.
    pub fn to_image(&self) -> Image {
        Image {
            bytes: self.pixels.iter().flat_map(|p| p.0).collect(),
            width: self.width as u16,
            height: self.height as u16,
        }
    }
}

impl TrackMap for RasterTrack {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color_at(&self, x: i32, y: i32) -> Result<Rgba, TrackError> {
        if !self.contains(x, y) {
            return Err(TrackError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.pixels[y as usize * self.width as usize + x as usize])
    }
}

/// The tracks a run cycles through.
///
/// The map index only moves on an explicit [`TrackSet::advance`]; it never
/// depends on how a generation went.
#[derive(Debug, Clone)]
pub struct TrackSet {
    tracks: Vec<RasterTrack>,
    index: usize,
}

impl TrackSet {
    /// Creates a set starting at the first track.
    pub fn new(tracks: Vec<RasterTrack>) -> Result<Self, TrackError> {
        if tracks.is_empty() {
            return Err(TrackError::EmptyTrackSet);
        }
        Ok(Self { tracks, index: 0 })
    }

    /// Loads every PNG in `paths`, or falls back to the built-in oval when
    /// `paths` is empty.
    pub fn load<P: AsRef<Path>>(paths: &[P], params: &Params) -> Result<Self, TrackError> {
        if paths.is_empty() {
            info!("no maps given, using the built-in oval track");
            return Self::new(vec![RasterTrack::oval(
                params.track_width,
                params.track_height,
                params.road_color,
                Rgba::GRASS,
            )]);
        }
        let tracks = paths
            .iter()
            .map(|p| RasterTrack::load(p, params.track_width, params.track_height))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(tracks)
    }

    /// The track currently in use.
    pub fn current(&self) -> &RasterTrack {
        &self.tracks[self.index]
    }

    /// Position of the current track within the set.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Switches to the next track, wrapping after the last one.
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.tracks.len();
        debug!(
            "switched to track {} ({})",
            self.index,
            self.tracks[self.index].name()
        );
        self.index
    }

    /// All tracks in cycling order.
    pub fn tracks(&self) -> &[RasterTrack] {
        &self.tracks
    }

    /// Number of tracks in the set.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false; a set holds at least one track.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
