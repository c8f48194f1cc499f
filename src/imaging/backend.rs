//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the boundary to the codec library. It covers
//! the primitives the transform pipeline needs: identify, decode, crop,
//! resize, rotate (expanding the canvas), mirror, color-mode conversion,
//! sharpening, and encoding to each output format.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust and statically
//! linked. Tests use a recording mock so pipeline ordering can be checked
//! without touching pixels.

use super::params::{PixelBox, QualityOp, Sharpening};
use crate::format::OutputFormat;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("No {} encoder available", .0.codec_name())]
    Unsupported(OutputFormat),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Trait for image codec backends.
///
/// Pixel operations consume the image and return the derived one; they
/// cannot fail once their inputs are valid (the command parsers guarantee
/// that). Only I/O-facing operations return `Result`.
pub trait ImageBackend: Sync {
    /// Get image dimensions without a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode the image at `path`.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Crop to a box already clamped to the image bounds.
    fn crop(&self, image: DynamicImage, region: PixelBox) -> DynamicImage;

    /// Resample to exactly `width × height`.
    fn resize(&self, image: DynamicImage, width: u32, height: u32) -> DynamicImage;

    /// Rotate counter-clockwise, growing the canvas to hold the whole image.
    fn rotate(&self, image: DynamicImage, degrees: u32) -> DynamicImage;

    /// Mirror about the vertical axis.
    fn flip_horizontal(&self, image: DynamicImage) -> DynamicImage;

    /// Convert to the color mode selected by the quality command.
    fn convert(&self, image: DynamicImage, quality: QualityOp) -> DynamicImage;

    /// Apply an unsharp mask.
    fn sharpen(&self, image: DynamicImage, sharpening: Sharpening) -> DynamicImage;

    /// Encode to the bytes of `format`.
    fn encode(&self, image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::calculations::rotated_canvas;
    use std::sync::Mutex;

    /// Mock backend that records operations and tracks dimensions without
    /// touching pixels. Every image it hands out is blank.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub identify_results: Mutex<Vec<Dimensions>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Decode(String),
        Crop {
            x: u32,
            y: u32,
            width: u32,
            height: u32,
        },
        Resize {
            width: u32,
            height: u32,
        },
        Rotate(u32),
        FlipHorizontal,
        Convert(QualityOp),
        Sharpen {
            sigma: f32,
            threshold: i32,
        },
        Encode(OutputFormat),
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<Dimensions>) -> Self {
            Self {
                identify_results: Mutex::new(dims),
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn record(&self, op: RecordedOp) {
            self.operations.lock().unwrap().push(op);
        }

        fn next_dimensions(&self) -> Result<Dimensions, BackendError> {
            self.identify_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::ProcessingFailed("No mock dimensions".to_string()))
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.record(RecordedOp::Identify(path.to_string_lossy().to_string()));
            self.next_dimensions()
        }

        fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
            self.record(RecordedOp::Decode(path.to_string_lossy().to_string()));
            let dims = self.next_dimensions()?;
            Ok(DynamicImage::new_rgb8(dims.width, dims.height))
        }

        fn crop(&self, _image: DynamicImage, region: PixelBox) -> DynamicImage {
            self.record(RecordedOp::Crop {
                x: region.x0 as u32,
                y: region.y0 as u32,
                width: region.width(),
                height: region.height(),
            });
            DynamicImage::new_rgb8(region.width(), region.height())
        }

        fn resize(&self, _image: DynamicImage, width: u32, height: u32) -> DynamicImage {
            self.record(RecordedOp::Resize { width, height });
            DynamicImage::new_rgb8(width, height)
        }

        fn rotate(&self, image: DynamicImage, degrees: u32) -> DynamicImage {
            self.record(RecordedOp::Rotate(degrees));
            let (w, h) = rotated_canvas((image.width(), image.height()), degrees);
            DynamicImage::new_rgb8(w, h)
        }

        fn flip_horizontal(&self, image: DynamicImage) -> DynamicImage {
            self.record(RecordedOp::FlipHorizontal);
            image
        }

        fn convert(&self, image: DynamicImage, quality: QualityOp) -> DynamicImage {
            self.record(RecordedOp::Convert(quality));
            match quality {
                QualityOp::Default | QualityOp::Color => image,
                QualityOp::Gray | QualityOp::Bitonal => {
                    DynamicImage::new_luma8(image.width(), image.height())
                }
            }
        }

        fn sharpen(&self, image: DynamicImage, sharpening: Sharpening) -> DynamicImage {
            self.record(RecordedOp::Sharpen {
                sigma: sharpening.sigma,
                threshold: sharpening.threshold,
            });
            image
        }

        fn encode(
            &self,
            image: &DynamicImage,
            format: OutputFormat,
        ) -> Result<Vec<u8>, BackendError> {
            self.record(RecordedOp::Encode(format));
            if format == OutputFormat::Jp2 {
                return Err(BackendError::Unsupported(format));
            }
            Ok(format!("{}:{}x{}", format, image.width(), image.height()).into_bytes())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 800,
            height: 600,
        }]);

        let result = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_decode_produces_blank_image() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 40,
            height: 30,
        }]);
        let image = backend.decode(Path::new("/media/a.png")).unwrap();
        assert_eq!(Dimensions::of(&image).as_tuple(), (40, 30));
    }

    #[test]
    fn mock_decode_without_dimensions_errors() {
        let backend = MockBackend::new();
        assert!(backend.decode(Path::new("/media/missing.png")).is_err());
    }

    #[test]
    fn mock_rotate_expands_canvas() {
        let backend = MockBackend::new();
        let rotated = backend.rotate(DynamicImage::new_rgb8(200, 100), 90);
        assert_eq!(Dimensions::of(&rotated).as_tuple(), (100, 200));
        assert_eq!(backend.get_operations(), vec![RecordedOp::Rotate(90)]);
    }

    #[test]
    fn unsupported_error_names_codec() {
        let err = BackendError::Unsupported(OutputFormat::Jp2);
        assert_eq!(err.to_string(), "No JPEG 2000 encoder available");
    }
}
