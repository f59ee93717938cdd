use tabcap_core::{MergeError, ProcessingMode, Table};
use thiserror::Error;

use crate::preprocess;
use crate::reconstruct;
use crate::recognizer::{encode_for_upload, OcrError, TableRecognizer};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to merge recognized tables: {0}")]
    Merge(#[from] MergeError),
}

/// Per-file failures stay inside the file they belong to; only the final
/// merge can fail the batch.
#[derive(Debug, Error)]
enum FileError {
    #[error("Image decode failed: {0}")]
    Decode(String),
    #[error(transparent)]
    Ocr(#[from] OcrError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Recognized { rows: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub file: String,
    pub outcome: FileOutcome,
}

impl FileStatus {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, FileOutcome::Recognized { .. })
    }
}

/// The result of one batch run: the merged table (when at least one file
/// produced data) plus one status record per input file, in input order.
#[derive(Debug)]
pub struct BatchOutcome {
    pub merged: Option<Table>,
    pub statuses: Vec<FileStatus>,
}

/// Runs normalize → recognize → reconstruct for each input file in order,
/// isolating per-file failures, then merges every recognized table into
/// one provenance-tagged result.
pub struct BatchPipeline<R: TableRecognizer> {
    recognizer: R,
    mode: ProcessingMode,
}

impl<R: TableRecognizer> BatchPipeline<R> {
    pub fn new(recognizer: R, mode: ProcessingMode) -> Self {
        BatchPipeline { recognizer, mode }
    }

    /// Process a named set of image byte streams, strictly sequentially.
    ///
    /// A failing file is recorded in its status and never aborts the
    /// batch. When no file yields a table the merged result is `None`;
    /// a merge failure across successful tables is batch-fatal.
    pub async fn run(&self, files: &[(String, Vec<u8>)]) -> Result<BatchOutcome, PipelineError> {
        let mut tables = Vec::new();
        let mut statuses = Vec::new();

        for (name, data) in files {
            match self.process_file(data).await {
                Ok(Some(mut table)) => {
                    let rows = table.row_count();
                    table.tag_source(name);
                    tables.push(table);
                    tracing::info!(file = %name, rows, "table recognized");
                    statuses.push(FileStatus {
                        file: name.clone(),
                        outcome: FileOutcome::Recognized { rows },
                    });
                }
                Ok(None) => {
                    tracing::warn!(file = %name, "no table data found");
                    statuses.push(FileStatus {
                        file: name.clone(),
                        outcome: FileOutcome::Failed { reason: "no table data found".into() },
                    });
                }
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "file processing failed");
                    statuses.push(FileStatus {
                        file: name.clone(),
                        outcome: FileOutcome::Failed { reason: e.to_string() },
                    });
                }
            }
        }

        let merged = if tables.is_empty() {
            None
        } else {
            Some(Table::merge(tables)?)
        };
        Ok(BatchOutcome { merged, statuses })
    }

    async fn process_file(&self, data: &[u8]) -> Result<Option<Table>, FileError> {
        let img = image::load_from_memory(data).map_err(|e| FileError::Decode(e.to_string()))?;
        let img = preprocess::normalize(img, self.mode);
        let payload = encode_for_upload(&img)?;
        let response = self.recognizer.recognize(&payload).await?;
        Ok(reconstruct::reconstruct(&response, self.mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::MockRecognizer;
    use crate::types::{RecognizeResponse, TableCell};
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::Cursor;
    use tabcap_core::SOURCE_COLUMN;

    fn tiny_png() -> Vec<u8> {
        let img = RgbImage::from_pixel(8, 8, Rgb([120, 120, 120]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn one_cell_response(text: &str) -> RecognizeResponse {
        RecognizeResponse::single(vec![TableCell::new(0, 0, 1, 1, text)])
    }

    #[tokio::test]
    async fn batch_isolates_a_failing_file() {
        // File 2 carries undecodable bytes; the mock only answers for 1 and 3.
        let mock = MockRecognizer::new(vec![
            Ok(one_cell_response("alpha")),
            Ok(one_cell_response("gamma")),
        ]);
        let pipeline = BatchPipeline::new(mock, ProcessingMode::Raw);

        let files = vec![
            ("one.png".to_string(), tiny_png()),
            ("two.png".to_string(), b"not an image".to_vec()),
            ("three.png".to_string(), tiny_png()),
        ];
        let outcome = pipeline.run(&files).await.unwrap();

        assert!(outcome.statuses[0].succeeded());
        assert!(!outcome.statuses[1].succeeded());
        assert!(outcome.statuses[2].succeeded());

        let merged = outcome.merged.unwrap();
        assert_eq!(merged.row_count(), 2);
        assert_eq!(merged.column_names(), ["0", SOURCE_COLUMN]);
        assert_eq!(merged.rows()[0], ["alpha", "one.png"]);
        assert_eq!(merged.rows()[1], ["gamma", "three.png"]);
    }

    #[tokio::test]
    async fn gateway_failure_is_per_file() {
        let mock = MockRecognizer::new(vec![
            Err(OcrError::Gateway("service unavailable".into())),
            Ok(one_cell_response("ok")),
        ]);
        let pipeline = BatchPipeline::new(mock, ProcessingMode::Raw);

        let files = vec![
            ("down.png".to_string(), tiny_png()),
            ("up.png".to_string(), tiny_png()),
        ];
        let outcome = pipeline.run(&files).await.unwrap();

        match &outcome.statuses[0].outcome {
            FileOutcome::Failed { reason } => assert!(reason.contains("service unavailable")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(outcome.statuses[1].succeeded());
        assert_eq!(outcome.merged.unwrap().row_count(), 1);
    }

    #[tokio::test]
    async fn empty_recognition_is_a_soft_failure() {
        let mock = MockRecognizer::single(RecognizeResponse::default());
        let pipeline = BatchPipeline::new(mock, ProcessingMode::Enhanced);

        let files = vec![("blank.png".to_string(), tiny_png())];
        let outcome = pipeline.run(&files).await.unwrap();

        assert_eq!(
            outcome.statuses[0].outcome,
            FileOutcome::Failed { reason: "no table data found".into() }
        );
        assert!(outcome.merged.is_none());
    }

    #[tokio::test]
    async fn all_failures_yield_no_merged_table() {
        let pipeline = BatchPipeline::new(MockRecognizer::new(vec![]), ProcessingMode::Raw);
        let files = vec![
            ("a.png".to_string(), b"garbage".to_vec()),
            ("b.png".to_string(), b"also garbage".to_vec()),
        ];
        let outcome = pipeline.run(&files).await.unwrap();

        assert!(outcome.merged.is_none());
        assert!(outcome.statuses.iter().all(|s| !s.succeeded()));
    }

    #[tokio::test]
    async fn statuses_keep_input_order() {
        let mock = MockRecognizer::new(vec![
            Ok(one_cell_response("1")),
            Ok(one_cell_response("2")),
            Ok(one_cell_response("3")),
        ]);
        let pipeline = BatchPipeline::new(mock, ProcessingMode::Raw);

        let files = vec![
            ("c.png".to_string(), tiny_png()),
            ("a.png".to_string(), tiny_png()),
            ("b.png".to_string(), tiny_png()),
        ];
        let outcome = pipeline.run(&files).await.unwrap();

        let names: Vec<&str> = outcome.statuses.iter().map(|s| s.file.as_str()).collect();
        assert_eq!(names, ["c.png", "a.png", "b.png"]);
        let merged = outcome.merged.unwrap();
        let sources: Vec<&str> = merged
            .rows()
            .iter()
            .map(|r| r.last().unwrap().as_str())
            .collect();
        assert_eq!(sources, ["c.png", "a.png", "b.png"]);
    }
}
