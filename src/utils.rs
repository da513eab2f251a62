// src/utils.rs
use anyhow::{Context, Result};
use std::path::Path;

pub const RESUME_EXTENSIONS: [&str; 4] = ["pdf", "docx", "doc", "txt"];

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<()> {
    let ext = get_file_extension(filename)
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", filename))?;

    if !allowed.contains(&ext.as_str()) {
        anyhow::bail!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext,
            allowed
        );
    }

    Ok(())
}

/// Content type sent with an uploaded résumé. Unknown formats go out as
/// octet-stream and the server decides.
pub fn resume_content_type(filename: &str) -> &'static str {
    match get_file_extension(filename).as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("doc") => "application/msword",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Read a résumé from disk, returning its file name and bytes
pub async fn read_resume_file(path: &Path) -> Result<(String, Vec<u8>)> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Invalid file path: {}", path.display()))?;

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    Ok((file_name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("test.pdf"), Some("pdf".to_string()));
        assert_eq!(
            get_file_extension("document.DOCX"),
            Some("docx".to_string())
        );
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("test.pdf", &RESUME_EXTENSIONS).is_ok());
        assert!(validate_file_extension("test.png", &RESUME_EXTENSIONS).is_err());
        assert!(validate_file_extension("noext", &["pdf"]).is_err());
    }

    #[test]
    fn test_resume_content_type() {
        assert_eq!(resume_content_type("cv.PDF"), "application/pdf");
        assert_eq!(
            resume_content_type("cv.docx"),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(resume_content_type("cv"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_read_resume_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, "Experience Education Skills").unwrap();

        let (name, bytes) = read_resume_file(&path).await.unwrap();
        assert_eq!(name, "cv.txt");
        assert_eq!(bytes.len(), 27);

        assert!(read_resume_file(&dir.path().join("missing.pdf")).await.is_err());
    }
}
