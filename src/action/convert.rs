use std::io;
use std::path::Path;
use log::info;
use crate::config::config::{validate_input_path, ConvertCommand};
use crate::config::ports::AppConfig;
use crate::service::convert_client::ConversionClient;
use crate::utils::file::{load_upload, write_output};
use crate::utils::utils::format_file_size;
use crate::utils::zip::list_archive_entries;

const ARCHIVE_NAME: &str = "converted.zip";

pub async fn process_convert(config: &AppConfig, direction: ConvertCommand) -> io::Result<String> {
    let client = ConversionClient::from_config(config);
    match direction {
        ConvertCommand::ToMd { input, output } => convert_to_markdown(&client, &input, &output).await,
        ConvertCommand::ToWord { inputs, theme, output } => {
            let mut files = Vec::with_capacity(inputs.len());
            for input in &inputs {
                files.push(load_upload(validate_input_path(input)?)?);
            }
            let theme = match theme {
                Some(ref path) => Some(load_upload(validate_input_path(path)?)?),
                None => None,
            };

            let conversion = client.convert_markdown_to_word(files, theme).await?;
            for document in &conversion.documents {
                let path = write_output(&output, &document.filename, &document.bytes)?;
                println!("已輸出：{}（{}）", path.display(), format_file_size(document.bytes.len()));
            }
            if let Some(ref archive) = conversion.archive {
                let path = write_output(&output, ARCHIVE_NAME, archive)?;
                let entries = list_archive_entries(archive)?;
                println!("已輸出壓縮檔：{}（{} 個檔案）", path.display(), entries.len());
            }
            Ok(format!("轉換完成，共 {} 個 Word 檔案，輸出目錄：{}", conversion.documents.len(), output.display()))
        }
    }
}

async fn convert_to_markdown(client: &ConversionClient, input: &Path, output: &Path) -> io::Result<String> {
    let upload = load_upload(validate_input_path(input)?)?;
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "converted".to_string());
    let markdown = client.convert_word_or_pdf_to_markdown(upload).await?;
    let path = write_output(output, &format!("{}.md", stem), markdown.as_bytes())?;
    info!("Markdown 長度：{} 字元", markdown.chars().count());
    println!("已輸出：{}", path.display());
    Ok(format!("轉換完成，輸出檔案：{}", path.display()))
}

pub async fn process_health(config: &AppConfig) -> io::Result<String> {
    let client = ConversionClient::from_config(config);
    let status = client.health().await?;
    println!(
        "後端狀態：{}，Python 版本：{}",
        status.status,
        status.python_version.as_deref().unwrap_or("未知")
    );
    Ok(format!("後端狀態：{}", status.status))
}

pub async fn process_sample_theme(config: &AppConfig, output: &Path) -> io::Result<String> {
    let client = ConversionClient::from_config(config);
    let theme = client.download_sample_theme().await?;
    let path = write_output(output, &theme.filename, &theme.bytes)?;
    println!("已下載範例樣式：{}", path.display());
    Ok(format!("範例樣式：{}", path.display()))
}
