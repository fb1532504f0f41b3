//! Inline transport. Implements FileStorePort by base64-encoding the file
//! content for the spreadsheet-script endpoint.

use crate::domain::{DomainError, FileAttachment, FileReference, GroupCode};
use crate::ports::FileStorePort;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

/// Base64 encoder. The produced text carries no data-URI prefix; the
/// receiving script decodes it back to the original bytes.
pub struct InlineEncoder;

impl InlineEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InlineEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl FileStorePort for InlineEncoder {
    async fn store(
        &self,
        _group: GroupCode,
        file: &FileAttachment,
    ) -> Result<FileReference, DomainError> {
        let data = STANDARD.encode(&file.bytes);
        debug!(
            file = %file.name,
            bytes = file.bytes.len(),
            encoded_len = data.len(),
            "file encoded inline"
        );
        Ok(FileReference::Inline {
            name: file.name.clone(),
            mime: file.mime.clone(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(bytes: Vec<u8>) -> FileAttachment {
        FileAttachment {
            name: "piece.mp4".to_string(),
            mime: "video/mp4".to_string(),
            bytes,
        }
    }

    #[tokio::test]
    async fn round_trip_is_byte_identical() {
        let source: Vec<u8> = (0u16..=600).map(|i| (i % 251) as u8).collect();
        let encoder = InlineEncoder::new();

        let reference = encoder
            .store(GroupCode::G, &attachment(source.clone()))
            .await
            .unwrap();

        let FileReference::Inline { name, mime, data } = reference else {
            panic!("inline encoder must produce an inline reference");
        };
        assert_eq!(name, "piece.mp4");
        assert_eq!(mime, "video/mp4");
        assert!(!data.starts_with("data:"));
        assert_eq!(STANDARD.decode(&data).unwrap(), source);
    }

    #[tokio::test]
    async fn empty_file_encodes_to_empty_payload() {
        let encoder = InlineEncoder::new();
        let reference = encoder.store(GroupCode::B, &attachment(vec![])).await.unwrap();
        assert!(matches!(
            reference,
            FileReference::Inline { ref data, .. } if data.is_empty()
        ));
    }
}
