use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use thiserror::Error;

use crate::types::RecognizeResponse;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image encoding failed: {0}")]
    Encoding(String),
    #[error("Recognition service error: {0}")]
    Gateway(String),
}

/// JPEG compression quality for the upload payload.
const JPEG_QUALITY: u8 = 95;
/// Guard against empty/corrupt image data reaching the service.
const MIN_PAYLOAD_CHARS: usize = 100;

/// Compress a normalized image to JPEG and base64-encode it for upload.
/// An implausibly small payload is rejected before any request is made.
pub fn encode_for_upload(img: &DynamicImage) -> Result<String, OcrError> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    img.write_with_encoder(encoder)
        .map_err(|e| OcrError::Encoding(e.to_string()))?;

    let payload = BASE64.encode(&buf);
    if payload.len() < MIN_PAYLOAD_CHARS {
        return Err(OcrError::Encoding(format!(
            "encoded payload implausibly small ({} chars)",
            payload.len()
        )));
    }
    Ok(payload)
}

/// Abstraction over the table-recognition service.
///
/// Implementations accept a base64-encoded JPEG payload and return the
/// service's structured cell list. The pipeline is generic over this trait
/// so batch and reconstruction logic test against [`MockRecognizer`]
/// without any network dependency.
pub trait TableRecognizer: Send + Sync {
    fn recognize(
        &self,
        image_base64: &str,
    ) -> impl Future<Output = Result<RecognizeResponse, OcrError>> + Send;
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Replays a scripted sequence of responses, one per call, in order.
pub struct MockRecognizer {
    script: Mutex<VecDeque<Result<RecognizeResponse, OcrError>>>,
}

impl MockRecognizer {
    pub fn new(script: Vec<Result<RecognizeResponse, OcrError>>) -> Self {
        MockRecognizer { script: Mutex::new(script.into()) }
    }

    /// A mock that answers a single call.
    pub fn single(response: RecognizeResponse) -> Self {
        MockRecognizer::new(vec![Ok(response)])
    }
}

impl TableRecognizer for MockRecognizer {
    async fn recognize(&self, _image_base64: &str) -> Result<RecognizeResponse, OcrError> {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(OcrError::Gateway("mock script exhausted".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn encode_produces_plausible_base64_jpeg() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, image::Rgb([200, 10, 10])));
        let payload = encode_for_upload(&img).unwrap();
        assert!(payload.len() >= MIN_PAYLOAD_CHARS);
        // JPEG magic bytes survive the base64 round trip.
        let decoded = BASE64.decode(&payload).unwrap();
        assert_eq!(&decoded[..2], &[0xFF, 0xD8]);
    }

    #[tokio::test]
    async fn mock_replays_script_in_order() {
        let mock = MockRecognizer::new(vec![
            Ok(RecognizeResponse::default()),
            Err(OcrError::Gateway("down".into())),
        ]);
        assert!(mock.recognize("a").await.is_ok());
        let err = mock.recognize("b").await.unwrap_err();
        assert!(matches!(err, OcrError::Gateway(_)));
        // Exhausted script keeps failing rather than panicking.
        assert!(mock.recognize("c").await.is_err());
    }
}
