use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use image::imageops::FilterType;
use wortdeck_types::MediaRef;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Which pronunciation a saved audio file belongs to
#[derive(Debug, Clone, Copy)]
pub enum AudioSlot {
    Word,
    /// Zero-based example index
    Example(usize),
}

/// Materializes generated media bytes as files under a single media root.
/// Returned references are file names relative to that root.
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, MediaError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn save_audio(
        &self,
        word: &str,
        slot: AudioSlot,
        bytes: &[u8],
    ) -> Result<MediaRef, MediaError> {
        let file_name = match slot {
            AudioSlot::Word => format!("{}.mp3", file_stem(word)),
            AudioSlot::Example(index) => {
                format!("{}_example_{}.mp3", file_stem(word), index + 1)
            }
        };

        tokio::fs::write(self.root.join(&file_name), bytes).await?;
        Ok(MediaRef::new(file_name))
    }

    /// Decode, resize to a square canvas and persist as JPEG
    pub async fn save_image(
        &self,
        word: &str,
        bytes: &[u8],
        canvas: u32,
    ) -> Result<MediaRef, MediaError> {
        let decoded = image::load_from_memory(bytes)?;
        let resized = decoded.resize_exact(canvas, canvas, FilterType::Triangle);

        let mut encoded = Cursor::new(Vec::new());
        resized.write_to(&mut encoded, ImageFormat::Jpeg)?;

        let file_name = format!("{}_image.jpg", file_stem(word));
        tokio::fs::write(self.root.join(&file_name), encoded.into_inner()).await?;
        Ok(MediaRef::new(file_name))
    }
}

/// Words go into file names verbatim where possible; anything that is not
/// alphanumeric becomes an underscore so paths stay portable.
fn file_stem(word: &str) -> String {
    word.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn sample_png() -> Vec<u8> {
        let img = RgbImage::from_pixel(8, 8, image::Rgb([120, 40, 200]));
        let mut encoded = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut encoded, ImageFormat::Png)
            .unwrap();
        encoded.into_inner()
    }

    #[tokio::test]
    async fn audio_files_are_named_per_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path()).unwrap();

        let word = store
            .save_audio("Haus", AudioSlot::Word, b"mp3-bytes")
            .await
            .unwrap();
        let example = store
            .save_audio("Haus", AudioSlot::Example(0), b"mp3-bytes")
            .await
            .unwrap();

        assert_eq!(word.file_name, "Haus.mp3");
        assert_eq!(example.file_name, "Haus_example_1.mp3");
        assert_eq!(
            std::fs::read(word.resolve(store.root())).unwrap(),
            b"mp3-bytes"
        );
    }

    #[tokio::test]
    async fn images_are_resized_to_the_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path()).unwrap();

        let saved = store.save_image("Haus", &sample_png(), 32).await.unwrap();

        assert_eq!(saved.file_name, "Haus_image.jpg");
        let reloaded = image::open(saved.resolve(store.root())).unwrap();
        assert_eq!(reloaded.width(), 32);
        assert_eq!(reloaded.height(), 32);
    }

    #[tokio::test]
    async fn garbage_image_bytes_are_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path()).unwrap();

        let result = store.save_image("Haus", b"not an image", 32).await;
        assert!(matches!(result, Err(MediaError::Image(_))));
    }

    #[test]
    fn file_stems_stay_portable() {
        assert_eq!(file_stem("Haus"), "Haus");
        assert_eq!(file_stem("auf Wiedersehen"), "auf_Wiedersehen");
        assert_eq!(file_stem("schön"), "schön");
    }
}
