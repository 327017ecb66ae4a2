//! Content-addressed PNG cache for scalar-field color images.
//!
//! This module is feature-gated behind `png` (default on). The key is a
//! heuristic fingerprint: a fixed PRNG sequence places a handful of sample
//! points in the raster frame, the scalar is evaluated there, and the outputs
//! are hashed together with the gradient and raster parameters. Two scalars
//! that agree on every sample share an image. The pixel buffer itself comes
//! from [`crate::raster`].

use fieldviz_core::error::FieldError;
use fieldviz_core::field::ScalarField;
use fieldviz_core::gradient::RgbGradient;
use fieldviz_core::prng::Xorshift64;
use glam::DVec3;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::raster::{rasterize, RasterConfig};

/// Number of field samples folded into a fingerprint.
pub const FINGERPRINT_POINTS: usize = 10;

/// Fixed PRNG seed for fingerprint point placement.
const FINGERPRINT_SEED: u64 = 2;

/// 16-byte BLAKE3 prefix identifying a rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Fingerprint points: `FINGERPRINT_POINTS` uniform draws over the raster frame at `z = 0`.
pub fn fingerprint_points(raster: &RasterConfig) -> Vec<DVec3> {
    let (hw, hh) = (raster.frame_width / 2.0, raster.frame_height / 2.0);
    let mut rng = Xorshift64::new(FINGERPRINT_SEED);
    (0..FINGERPRINT_POINTS)
        .map(|_| {
            let x = rng.next_range(-hw, hw);
            let y = rng.next_range(-hh, hh);
            DVec3::new(x, y, 0.0)
        })
        .collect()
}

/// Hashes gradient bounds and colors, raster geometry and sampled outputs.
pub fn fingerprint<S>(scalar: &S, gradient: &RgbGradient, raster: &RasterConfig) -> Fingerprint
where
    S: ScalarField + ?Sized,
{
    let mut hasher = blake3::Hasher::new();
    hasher.update(&gradient.min_value().to_le_bytes());
    hasher.update(&gradient.max_value().to_le_bytes());
    for c in gradient.colors() {
        for channel in [c.r, c.g, c.b] {
            hasher.update(&channel.to_le_bytes());
        }
    }
    hasher.update(&(raster.pixel_width as u64).to_le_bytes());
    hasher.update(&(raster.pixel_height as u64).to_le_bytes());
    hasher.update(&raster.frame_width.to_le_bytes());
    hasher.update(&raster.frame_height.to_le_bytes());
    for p in fingerprint_points(raster) {
        hasher.update(&scalar.value_at(p).to_le_bytes());
    }
    let hash = hasher.finalize();
    let mut out = [0u8; 16];
    out.copy_from_slice(&hash.as_bytes()[0..16]);
    Fingerprint(out)
}

/// Whether a request was served from disk or rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    Hit,
    Rendered,
}

/// Result of a cache request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedImage {
    pub path: PathBuf,
    pub fingerprint: Fingerprint,
    pub status: CacheStatus,
}

/// Directory of `<fingerprint>.png` images rendered at one raster size.
#[derive(Debug, Clone)]
pub struct ImageCache {
    dir: PathBuf,
    raster: RasterConfig,
}

impl ImageCache {
    pub fn new(dir: impl Into<PathBuf>, raster: RasterConfig) -> Self {
        Self {
            dir: dir.into(),
            raster,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn raster(&self) -> &RasterConfig {
        &self.raster
    }

    pub fn path_for(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.dir.join(format!("{fingerprint}.png"))
    }

    /// Returns the cached image for `scalar`, rendering it on a miss.
    ///
    /// A hit costs only the fingerprint samples.
    pub fn get_or_render<S>(&self, scalar: &S, gradient: &RgbGradient) -> Result<CachedImage, FieldError>
    where
        S: ScalarField + ?Sized,
    {
        self.raster.validate()?;
        let fingerprint = fingerprint(scalar, gradient, &self.raster);
        let path = self.path_for(&fingerprint);
        if path.is_file() {
            log::debug!("color field image {fingerprint} found in cache");
            return Ok(CachedImage {
                path,
                fingerprint,
                status: CacheStatus::Hit,
            });
        }
        self.render_to(scalar, gradient, fingerprint, path)
    }

    /// Renders and stores the image even if a cached copy exists.
    pub fn render_fresh<S>(&self, scalar: &S, gradient: &RgbGradient) -> Result<CachedImage, FieldError>
    where
        S: ScalarField + ?Sized,
    {
        self.raster.validate()?;
        let fingerprint = fingerprint(scalar, gradient, &self.raster);
        let path = self.path_for(&fingerprint);
        self.render_to(scalar, gradient, fingerprint, path)
    }

    fn render_to<S>(
        &self,
        scalar: &S,
        gradient: &RgbGradient,
        fingerprint: Fingerprint,
        path: PathBuf,
    ) -> Result<CachedImage, FieldError>
    where
        S: ScalarField + ?Sized,
    {
        log::info!("rendering color field image {fingerprint}");
        let rgb = rasterize(scalar, gradient, &self.raster)?;
        self.write_atomic(rgb, &path)?;
        Ok(CachedImage {
            path,
            fingerprint,
            status: CacheStatus::Rendered,
        })
    }

    /// Encodes into a temporary file in the cache directory, then renames it
    /// into place so readers never observe a partial image.
    fn write_atomic(&self, rgb: Vec<u8>, path: &Path) -> Result<(), FieldError> {
        let w = u32::try_from(self.raster.pixel_width).map_err(|_| FieldError::InvalidDimensions)?;
        let h = u32::try_from(self.raster.pixel_height).map_err(|_| FieldError::InvalidDimensions)?;
        let img = image::RgbImage::from_raw(w, h, rgb)
            .ok_or_else(|| FieldError::Io("RGB buffer size mismatch".into()))?;

        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let mut writer = BufWriter::new(tmp);
        img.write_to(&mut writer, image::ImageFormat::Png)
            .map_err(|e| FieldError::Io(e.to_string()))?;
        let tmp = writer
            .into_inner()
            .map_err(|e| FieldError::Io(e.error().to_string()))?;
        tmp.persist(path).map_err(|e| io_error(path, e.error))?;
        Ok(())
    }
}

fn io_error(path: &Path, e: std::io::Error) -> FieldError {
    FieldError::Io(format!("{}: {e}", path.display()))
}
