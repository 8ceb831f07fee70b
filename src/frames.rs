//! Batch assembly from the frame-directory convention the upstream
//! video-extraction stage produces:
//!
//! ```text
//! <root>/<category>/<series>/Frames/<series>_frame_<zero-padded index>.jpg
//! ```
//!
//! This module never touches video files; it only discovers `Frames`
//! directories, orders the extracted stills by frame index, and decodes up
//! to a caller-supplied threshold into an [`ImageBatch`].

use crate::batch::ImageBatch;
use anyhow::{anyhow, bail, ensure, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const FRAMES_DIR_NAME: &str = "Frames";
const FRAME_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// One series' extracted frames: `<root>/<category>/<series>/Frames`.
#[derive(Debug, Clone)]
pub struct SeriesFrames {
    category: String,
    series: String,
    frames_dir: PathBuf,
}

impl SeriesFrames {
    /// Walks `root` and lists every `<category>/<series>/Frames` directory,
    /// sorted by category then series for a stable iteration order.
    pub fn discover(root: impl AsRef<Path>) -> Result<Vec<SeriesFrames>> {
        let root = root.as_ref();
        let metadata = fs::metadata(root)
            .with_context(|| format!("Failed to access frame root: {}", root.display()))?;
        if !metadata.is_dir() {
            bail!("Frame root is not a directory: {}", root.display());
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(root).min_depth(3).max_depth(3) {
            let entry = entry.map_err(|e| anyhow!("Failed to read directory entry: {}", e))?;
            if !entry.file_type().is_dir() || entry.file_name() != FRAMES_DIR_NAME {
                continue;
            }

            let series_dir = entry
                .path()
                .parent()
                .ok_or_else(|| anyhow!("Frames directory has no parent: {}", entry.path().display()))?;
            let category_dir = series_dir
                .parent()
                .ok_or_else(|| anyhow!("Series directory has no parent: {}", series_dir.display()))?;

            found.push(SeriesFrames {
                category: dir_name(category_dir)?,
                series: dir_name(series_dir)?,
                frames_dir: entry.path().to_path_buf(),
            });
        }

        found.sort_by(|a, b| (&a.category, &a.series).cmp(&(&b.category, &b.series)));
        Ok(found)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn frames_dir(&self) -> &Path {
        &self.frames_dir
    }

    /// Lists up to `threshold` frame paths in frame-index order.
    ///
    /// Files without a parseable `_frame_<index>` suffix or with an
    /// unrecognized extension are skipped.
    pub fn frame_paths(&self, threshold: usize) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.frames_dir).with_context(|| {
            format!("Failed to read frames directory: {}", self.frames_dir.display())
        })?;

        let mut frames = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| anyhow!("Failed to read directory entry: {}", e))?;
            let path = entry.path();
            if !path.is_file() || !has_frame_extension(&path) {
                continue;
            }
            let Some(index) = frame_index(&path) else {
                continue;
            };
            frames.push((index, path));
        }

        frames.sort();
        frames.truncate(threshold);
        Ok(frames.into_iter().map(|(_, path)| path).collect())
    }

    /// Decodes up to `threshold` frames into a batch.
    ///
    /// All frames of a series share the source video's resolution, which is
    /// exactly the shape invariant [`ImageBatch::new`] enforces.
    pub fn load_batch(&self, threshold: usize) -> Result<ImageBatch> {
        ensure!(threshold > 0, "Frame threshold must be positive");

        let paths = self.frame_paths(threshold)?;
        ensure!(
            !paths.is_empty(),
            "No frames found under {}",
            self.frames_dir.display()
        );

        let mut images = Vec::with_capacity(paths.len());
        for path in &paths {
            let image = image::open(path)
                .with_context(|| format!("Failed to decode frame: {}", path.display()))?
                .to_rgb8();
            images.push(image);
        }
        ImageBatch::new(images)
    }
}

fn dir_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| anyhow!("Directory has no readable name: {}", path.display()))
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            FRAME_EXTENSIONS.contains(&ext.to_lowercase().as_str())
        })
}

/// Parses the numeric index out of `<series>_frame_<index>.<ext>`.
fn frame_index(path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    let (_, index) = stem.rsplit_once("_frame_")?;
    index.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    fn write_frame(dir: &Path, series: &str, index: u32, shade: u8) {
        let image = RgbImage::from_pixel(4, 4, Rgb([shade; 3]));
        let name = format!("{}_frame_{:04}.png", series, index);
        image.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_discover_finds_frames_directories() -> Result<()> {
        let root = tempdir()?;
        let frames_a = root.path().join("Real/showA/Frames");
        let frames_b = root.path().join("Animated/showB/Frames");
        fs::create_dir_all(&frames_a)?;
        fs::create_dir_all(&frames_b)?;
        // A sibling directory that is not a Frames dir must be skipped.
        fs::create_dir_all(root.path().join("Real/showA/Video"))?;

        let series = SeriesFrames::discover(root.path())?;
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].category(), "Animated");
        assert_eq!(series[0].series(), "showB");
        assert_eq!(series[1].category(), "Real");
        Ok(())
    }

    #[test]
    fn test_discover_rejects_missing_root() {
        assert!(SeriesFrames::discover("/no/such/frame/root").is_err());
    }

    #[test]
    fn test_frame_paths_ordered_and_thresholded() -> Result<()> {
        let root = tempdir()?;
        let frames = root.path().join("Real/showA/Frames");
        fs::create_dir_all(&frames)?;
        // Written out of order on purpose.
        write_frame(&frames, "showA", 10, 10);
        write_frame(&frames, "showA", 2, 2);
        write_frame(&frames, "showA", 7, 7);
        fs::write(frames.join("notes.txt"), b"ignored")?;

        let series = SeriesFrames::discover(root.path())?;
        let paths = series[0].frame_paths(2)?;
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("showA_frame_0002.png"));
        assert!(paths[1].ends_with("showA_frame_0007.png"));
        Ok(())
    }

    #[test]
    fn test_load_batch_orders_frames_by_index() -> Result<()> {
        let root = tempdir()?;
        let frames = root.path().join("Real/showA/Frames");
        fs::create_dir_all(&frames)?;
        write_frame(&frames, "showA", 3, 30);
        write_frame(&frames, "showA", 1, 10);

        let series = SeriesFrames::discover(root.path())?;
        let batch = series[0].load_batch(5)?;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.get(0).unwrap().get_pixel(0, 0).0, [10; 3]);
        assert_eq!(batch.get(1).unwrap().get_pixel(0, 0).0, [30; 3]);
        Ok(())
    }

    #[test]
    fn test_load_batch_fails_on_empty_frames_dir() -> Result<()> {
        let root = tempdir()?;
        let frames = root.path().join("Real/showA/Frames");
        fs::create_dir_all(&frames)?;

        let series = SeriesFrames::discover(root.path())?;
        assert!(series[0].load_batch(5).is_err());
        assert!(series[0].load_batch(0).is_err());
        Ok(())
    }

    #[test]
    fn test_frame_index_parsing() {
        assert_eq!(frame_index(Path::new("showA_frame_0042.jpg")), Some(42));
        assert_eq!(frame_index(Path::new("showA_frame_x.jpg")), None);
        assert_eq!(frame_index(Path::new("cover.jpg")), None);
    }
}
