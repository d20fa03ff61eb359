use base64::{engine::general_purpose, Engine};
use log::{info, warn};
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use crate::config::ports::AppConfig;
use crate::error::ConvertError;
use crate::models::conversion::{
    ConvertedDocument, HealthStatus, MarkdownResponse, SampleTheme, UploadFile, WordConversion, WordResponse,
};
use crate::utils::file::file_extension;
use crate::utils::zip::list_archive_entries;

pub const WORD_TO_MD_PATH: &str = "/api/convert/word-to-md";
pub const MD_TO_WORD_PATH: &str = "/api/convert/md-to-word";
pub const SAMPLE_THEME_PATH: &str = "/api/download/sample-theme";
pub const HEALTH_PATH: &str = "/health";

pub const DOCUMENT_EXTENSIONS: [&str; 2] = [".docx", ".pdf"];
pub const MARKDOWN_EXTENSIONS: [&str; 2] = [".md", ".markdown"];
pub const THEME_EXTENSIONS: [&str; 1] = [".docx"];

const DEFAULT_THEME_NAME: &str = "sample-theme.docx";

/// 轉換服務的客戶端，每次呼叫都是單次請求，不重試
pub struct ConversionClient {
    http: reqwest::Client,
    base_url: String,
    max_upload_bytes: usize,
}

impl ConversionClient {
    pub fn new(base_url: impl Into<String>, max_upload_bytes: usize) -> Self {
        ConversionClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_upload_bytes,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.api_url.clone(), config.max_upload_bytes)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 送出前的本地檢查：副檔名、空檔案與大小
    pub fn validate_upload(&self, file: &UploadFile, allowed: &[&str]) -> Result<(), ConvertError> {
        let extension = file_extension(&file.filename);
        if !allowed.contains(&extension.as_str()) {
            return Err(ConvertError::UnsupportedFileType {
                extension: if extension.is_empty() { "（無）".to_string() } else { extension },
                allowed: allowed.join(", "),
            });
        }
        if file.size() == 0 {
            return Err(ConvertError::EmptyFile {
                filename: file.filename.clone(),
            });
        }
        if file.size() > self.max_upload_bytes {
            return Err(ConvertError::FileTooLarge {
                filename: file.filename.clone(),
                size: file.size(),
                limit: self.max_upload_bytes,
            });
        }
        Ok(())
    }

    /// Word 或 PDF 轉 Markdown，回傳 Markdown 原文
    pub async fn convert_word_or_pdf_to_markdown(&self, file: UploadFile) -> Result<String, ConvertError> {
        self.validate_upload(&file, &DOCUMENT_EXTENSIONS)?;
        info!("上傳 {}（{} 位元組）轉換為 Markdown", file.filename, file.size());

        let form = Form::new().part("file", upload_part(file));
        let resp = self.http.post(self.endpoint(WORD_TO_MD_PATH)).multipart(form).send().await?;
        let resp = ensure_success(resp).await?;
        let body: MarkdownResponse = resp.json().await?;
        Ok(body.markdown)
    }

    /// Markdown 轉 Word，可附帶樣式範本
    pub async fn convert_markdown_to_word(
        &self,
        files: Vec<UploadFile>,
        theme: Option<UploadFile>,
    ) -> Result<WordConversion, ConvertError> {
        if files.is_empty() {
            return Err(ConvertError::NoInputFiles);
        }
        for file in &files {
            self.validate_upload(file, &MARKDOWN_EXTENSIONS)?;
        }
        if let Some(ref theme) = theme {
            self.validate_upload(theme, &THEME_EXTENSIONS)?;
        }
        info!(
            "上傳 {} 個 Markdown 檔案轉換為 Word{}",
            files.len(),
            if theme.is_some() { "（含樣式範本）" } else { "" }
        );

        let mut form = Form::new();
        for file in files {
            form = form.part("files", upload_part(file));
        }
        if let Some(theme) = theme {
            form = form.part("theme", upload_part(theme));
        }

        let resp = self.http.post(self.endpoint(MD_TO_WORD_PATH)).multipart(form).send().await?;
        let resp = ensure_success(resp).await?;
        let body: WordResponse = resp.json().await?;
        decode_word_response(body)
    }

    pub async fn health(&self) -> Result<HealthStatus, ConvertError> {
        let resp = self.http.get(self.endpoint(HEALTH_PATH)).send().await?;
        let resp = ensure_success(resp).await?;
        Ok(resp.json().await?)
    }

    pub async fn download_sample_theme(&self) -> Result<SampleTheme, ConvertError> {
        let resp = self.http.get(self.endpoint(SAMPLE_THEME_PATH)).send().await?;
        let resp = ensure_success(resp).await?;
        let filename = resp
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| DEFAULT_THEME_NAME.to_string());
        let bytes = resp.bytes().await?.to_vec();
        Ok(SampleTheme { filename, bytes })
    }
}

fn upload_part(file: UploadFile) -> Part {
    Part::bytes(file.bytes).file_name(file.filename)
}

// 非 2xx 時原封不動保留伺服器回傳的文字
async fn ensure_success(resp: Response) -> Result<Response, ConvertError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    warn!("伺服器回應 {}：{}", status, body);
    Err(ConvertError::ServerError {
        status: status.as_u16(),
        body,
    })
}

/// 解碼 Markdown 轉 Word 的回應；多於一個檔案時必須附壓縮檔
pub fn decode_word_response(resp: WordResponse) -> Result<WordConversion, ConvertError> {
    if resp.files.is_empty() {
        return Err(ConvertError::InvalidPayload("回應沒有任何檔案".to_string()));
    }
    if resp.files.len() > 1 && resp.zip.is_none() {
        return Err(ConvertError::MissingArchive { count: resp.files.len() });
    }

    let documents = resp
        .files
        .into_iter()
        .map(|f| -> Result<ConvertedDocument, ConvertError> {
            let bytes = decode_base64(&f.content, &f.filename)?;
            Ok(ConvertedDocument { filename: f.filename, bytes })
        })
        .collect::<Result<Vec<_>, ConvertError>>()?;

    let archive = match resp.zip {
        Some(encoded) => {
            let bytes = decode_base64(&encoded, "zip")?;
            let entries = list_archive_entries(&bytes).map_err(|e| ConvertError::InvalidPayload(e.to_string()))?;
            info!("壓縮檔包含 {} 個項目", entries.len());
            Some(bytes)
        }
        None => None,
    };

    Ok(WordConversion { documents, archive })
}

fn decode_base64(encoded: &str, label: &str) -> Result<Vec<u8>, ConvertError> {
    general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| ConvertError::InvalidPayload(format!("{} 的 Base64 無法解碼：{}", label, e)))
}

pub fn filename_from_disposition(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|part| {
        part.strip_prefix("filename=")
            .map(|name| name.trim_matches('"').to_string())
            .filter(|name| !name.is_empty())
    })
}
