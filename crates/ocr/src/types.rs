use serde::{Deserialize, Serialize};

fn default_span() -> u32 {
    1
}

/// One detected cell, possibly spanning multiple grid positions (merged cell).
/// Field names follow the recognition service's wire schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Top-left row of the cell's span.
    #[serde(rename = "RowTl")]
    pub row_tl: u32,
    /// Top-left column of the cell's span.
    #[serde(rename = "ColTl")]
    pub col_tl: u32,
    #[serde(rename = "RowSpan", default = "default_span")]
    pub row_span: u32,
    #[serde(rename = "ColSpan", default = "default_span")]
    pub col_span: u32,
    #[serde(rename = "Text", default)]
    pub text: String,
}

impl TableCell {
    pub fn new(row_tl: u32, col_tl: u32, row_span: u32, col_span: u32, text: &str) -> Self {
        TableCell { row_tl, col_tl, row_span, col_span, text: text.to_string() }
    }
}

/// One recognized table within a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDetection {
    #[serde(rename = "Cells", default)]
    pub cells: Vec<TableCell>,
}

/// The consumed subset of the recognition service's response. Every other
/// field the service returns is ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizeResponse {
    #[serde(rename = "TableDetections", default)]
    pub table_detections: Vec<TableDetection>,
}

impl RecognizeResponse {
    /// Convenience constructor for a response carrying a single detection.
    pub fn single(cells: Vec<TableCell>) -> Self {
        RecognizeResponse { table_detections: vec![TableDetection { cells }] }
    }
}

/// The request body submitted to the recognition service.
#[derive(Debug, Clone, Serialize)]
pub struct RecognizeRequest {
    #[serde(rename = "ImageBase64")]
    pub image_base64: String,
    #[serde(rename = "TableLanguage")]
    pub table_language: String,
    #[serde(rename = "EnableDetectText")]
    pub enable_detect_text: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_spans_default_to_one() {
        let cell: TableCell =
            serde_json::from_str(r#"{"RowTl": 2, "ColTl": 3, "Text": "x"}"#).unwrap();
        assert_eq!(cell.row_span, 1);
        assert_eq!(cell.col_span, 1);
        assert_eq!(cell.text, "x");
    }

    #[test]
    fn response_ignores_unknown_fields() {
        let json = r#"{
            "TableDetections": [
                {"Cells": [{"RowTl": 0, "ColTl": 0, "RowSpan": 1, "ColSpan": 2, "Text": "hi"}],
                 "Type": 1,
                 "TableCoordPoint": []}
            ],
            "Angle": 0.5,
            "RequestId": "abc"
        }"#;
        let resp: RecognizeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.table_detections.len(), 1);
        assert_eq!(resp.table_detections[0].cells[0].col_span, 2);
    }

    #[test]
    fn empty_body_deserializes_to_no_detections() {
        let resp: RecognizeResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.table_detections.is_empty());
    }

    #[test]
    fn request_serializes_with_wire_names() {
        let req = RecognizeRequest {
            image_base64: "abcd".into(),
            table_language: "zh".into(),
            enable_detect_text: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["ImageBase64"], "abcd");
        assert_eq!(json["TableLanguage"], "zh");
        assert_eq!(json["EnableDetectText"], true);
    }
}
