//! Background image fetching.
//!
//! Each source is loaded once on a worker thread. Results come back over a
//! channel that the renderer drains once per frame with [`ImageLoader::poll`].

use peniko::{Blob, ImageAlphaType, ImageData, ImageFormat};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use thiserror::Error;

/// Errors from fetching or decoding an image source.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image loader thread could not be started: {0}")]
    Spawn(std::io::Error),
}

/// Load state of one source.
#[derive(Debug, Clone)]
pub enum ImageStatus {
    Pending,
    Ready(ImageData),
    Failed,
}

type LoadResult = (String, Result<ImageData, ImageLoadError>);

/// Cache of images keyed by source, filled asynchronously.
pub struct ImageLoader {
    entries: HashMap<String, ImageStatus>,
    tx: Sender<LoadResult>,
    rx: Receiver<LoadResult>,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            entries: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Start loading `source` unless it is already known.
    pub fn request(&mut self, source: &str) {
        if self.entries.contains_key(source) {
            return;
        }

        let tx = self.tx.clone();
        let owned = source.to_owned();
        let spawned = thread::Builder::new()
            .name("image-loader".into())
            .spawn(move || {
                let result = load_source(&owned);
                // The loader may have been dropped; nothing to report then.
                let _ = tx.send((owned, result));
            });

        match spawned {
            Ok(_) => {
                log::debug!("loading image {source}");
                self.entries.insert(source.to_owned(), ImageStatus::Pending);
            }
            Err(err) => {
                log::warn!("{}", ImageLoadError::Spawn(err));
                self.entries.insert(source.to_owned(), ImageStatus::Failed);
            }
        }
    }

    /// Drain finished loads. Returns how many sources changed state.
    pub fn poll(&mut self) -> usize {
        let mut changed = 0;
        while let Ok((source, result)) = self.rx.try_recv() {
            let status = match result {
                Ok(image) => {
                    log::info!("loaded image {source} ({}x{})", image.width, image.height);
                    ImageStatus::Ready(image)
                }
                Err(err) => {
                    log::warn!("image {source} unavailable: {err}");
                    ImageStatus::Failed
                }
            };
            self.entries.insert(source, status);
            changed += 1;
        }
        changed
    }

    pub fn status(&self, source: &str) -> Option<&ImageStatus> {
        self.entries.get(source)
    }

    /// The decoded bitmap, once ready.
    pub fn get(&self, source: &str) -> Option<&ImageData> {
        match self.entries.get(source) {
            Some(ImageStatus::Ready(image)) => Some(image),
            _ => None,
        }
    }

    /// Whether any request is still in flight.
    pub fn has_pending(&self) -> bool {
        self.entries
            .values()
            .any(|status| matches!(status, ImageStatus::Pending))
    }
}

/// Fetch (`http://`, `https://`) or read `source` and decode it.
pub fn load_source(source: &str) -> Result<ImageData, ImageLoadError> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch(source)?
    } else {
        std::fs::read(source).map_err(|source_err| ImageLoadError::Io {
            path: source.to_owned(),
            source: source_err,
        })?
    };
    decode(&bytes)
}

fn fetch(url: &str) -> Result<Vec<u8>, ImageLoadError> {
    let fetch_err = |source| ImageLoadError::Fetch {
        url: url.to_owned(),
        source,
    };
    let response = reqwest::blocking::get(url)
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(fetch_err)?;
    let bytes = response.bytes().map_err(fetch_err)?;
    Ok(bytes.to_vec())
}

/// Decode encoded bytes (PNG, JPEG, WebP) into RGBA8 image data.
pub fn decode(bytes: &[u8]) -> Result<ImageData, ImageLoadError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ImageData {
        data: Blob::new(Arc::new(rgba.into_vec())),
        format: ImageFormat::Rgba8,
        width,
        height,
        alpha_type: ImageAlphaType::Alpha,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn wait_for(loader: &mut ImageLoader, source: &str) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while matches!(loader.status(source), Some(ImageStatus::Pending)) {
            assert!(Instant::now() < deadline, "image load timed out");
            loader.poll();
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_decode_png() {
        let image = decode(&png_bytes(3, 2)).unwrap();
        assert_eq!(image.width, 3);
        assert_eq!(image.height, 2);
        assert_eq!(image.data.data().len(), 3 * 2 * 4);
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(decode(b"not an image"), Err(ImageLoadError::Decode(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_source("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, ImageLoadError::Io { .. }));
    }

    #[test]
    fn test_loader_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        std::fs::write(&path, png_bytes(4, 4)).unwrap();
        let source = path.to_string_lossy().into_owned();

        let mut loader = ImageLoader::new();
        loader.request(&source);
        assert!(loader.has_pending());
        wait_for(&mut loader, &source);

        let image = loader.get(&source).unwrap();
        assert_eq!((image.width, image.height), (4, 4));
        assert!(!loader.has_pending());
    }

    #[test]
    fn test_loader_marks_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"garbage").unwrap();
        let source = path.to_string_lossy().into_owned();

        let mut loader = ImageLoader::new();
        loader.request(&source);
        // A second request for the same source is ignored.
        loader.request(&source);
        wait_for(&mut loader, &source);

        assert!(matches!(loader.status(&source), Some(ImageStatus::Failed)));
        assert!(loader.get(&source).is_none());
    }
}
