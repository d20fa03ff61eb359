use std::io::{self, Cursor};
use zip::ZipArchive;

/// 列出壓縮檔內的檔名，無法解析時回傳 InvalidData
pub fn list_archive_entries(data: &[u8]) -> io::Result<Vec<String>> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("無效的 ZIP 檔案: {}", e)))?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("讀取 ZIP 項目失敗: {}", e)))?;
        names.push(entry.name().to_string());
    }
    Ok(names)
}
