//! File store adapters. Implement FileStorePort.
//!
//! Two interchangeable strategies behind one port: inline base64 for the
//! spreadsheet-script endpoint, object-store upload for the hosted
//! platform. Configuration selects one per deployment.

pub mod inline;
pub mod object_store;

use crate::domain::{DomainError, EncodingError, FileAttachment};
use std::path::Path;

/// Read a local file into an attachment. The declared MIME type comes from
/// the filename extension, falling back to application/octet-stream.
pub async fn load_attachment(path: &Path) -> Result<FileAttachment, DomainError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| EncodingError::FileRead(format!("{}: {}", path.display(), e)))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(FileAttachment { name, mime, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn load_attachment_reads_bytes_and_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theory.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"%PDF-1.4 test").unwrap();

        let attachment = load_attachment(&path).await.unwrap();
        assert_eq!(attachment.name, "theory.pdf");
        assert_eq!(attachment.mime, "application/pdf");
        assert_eq!(attachment.bytes, b"%PDF-1.4 test");
    }

    #[tokio::test]
    async fn load_attachment_missing_file_is_read_error() {
        let err = load_attachment(Path::new("/no/such/file.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Encoding(EncodingError::FileRead(_))
        ));
    }
}
