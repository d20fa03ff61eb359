use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use crate::models::conversion::UploadFile;

pub fn read_file_content(file_path: &Path) -> io::Result<(Vec<u8>, usize)> {
    let mut file = File::open(file_path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    let file_size = buffer.len();
    Ok((buffer, file_size))
}

/// 取得小寫副檔名（含點），沒有副檔名時回傳空字串
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!(".{}", ext.to_lowercase()),
        _ => String::new(),
    }
}

pub fn load_upload(path: &Path) -> io::Result<UploadFile> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, format!("無效的檔案路徑: {}", path.display())))?;
    let (bytes, size) = read_file_content(path)?;
    log::info!("讀取檔案：{}，大小：{} 位元組", path.display(), size);
    Ok(UploadFile::new(filename, bytes))
}

/// 將輸出寫入目錄，只保留檔名部分
pub fn write_output(output_dir: &Path, filename: &str, data: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let safe_name = Path::new(filename)
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, format!("無效的輸出檔名: {}", filename)))?;
    let target = output_dir.join(safe_name);
    fs::write(&target, data)?;
    log::info!("寫入檔案：{}，大小：{} 位元組", target.display(), data.len());
    Ok(target)
}
