pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod reconstruct;
pub mod tencent;
pub mod types;

pub use pipeline::{BatchOutcome, BatchPipeline, FileOutcome, FileStatus, PipelineError};
pub use preprocess::normalize;
pub use recognizer::{encode_for_upload, MockRecognizer, OcrError, TableRecognizer};
pub use reconstruct::reconstruct;
pub use tencent::{TencentCredentials, TencentRecognizer};
pub use types::{RecognizeRequest, RecognizeResponse, TableCell, TableDetection};
