use serde::{Deserialize, Serialize};

/// 上傳的檔案：名稱與內容
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadFile {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownResponse {
    pub markdown: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordFilePayload {
    pub filename: String,
    #[serde(alias = "data")]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordResponse {
    pub files: Vec<WordFilePayload>,
    #[serde(default, alias = "archive")]
    pub zip: Option<String>,
}

/// 已解碼的轉換結果
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordConversion {
    pub documents: Vec<ConvertedDocument>,
    pub archive: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub python_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleTheme {
    pub filename: String,
    pub bytes: Vec<u8>,
}
