//! Two-phase file download.
//!
//! `Pending` → `MetadataResolved` → `ContentFetched`. Each call to
//! [`FileFetch::advance`] performs exactly one request, so a caller (or a
//! test) can stop after any phase and look at where it got.

use super::MediaRetriever;
use crate::error::{Error, Result};
use crate::types::{FileMetadata, RetrievedFile};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

const TOKEN_HEADER: &str = "X-Access-Token";

#[derive(Serialize)]
struct FileDataRequest<'a> {
    file_ids: [&'a str; 1],
}

#[derive(Deserialize)]
struct FileDataRecord {
    file_data: FileMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileFetch {
    Pending {
        conversation_id: String,
        file_id: String,
    },
    MetadataResolved {
        conversation_id: String,
        file_id: String,
        metadata: FileMetadata,
    },
    ContentFetched(RetrievedFile),
}

impl FileFetch {
    pub fn new(conversation_id: impl Into<String>, file_id: impl Into<String>) -> Self {
        FileFetch::Pending {
            conversation_id: conversation_id.into(),
            file_id: file_id.into(),
        }
    }

    pub fn metadata(&self) -> Option<&FileMetadata> {
        match self {
            FileFetch::Pending { .. } => None,
            FileFetch::MetadataResolved { metadata, .. } => Some(metadata),
            FileFetch::ContentFetched(file) => Some(&file.metadata),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, FileFetch::ContentFetched(_))
    }

    /// Run the next phase. Advancing a finished fetch is a no-op.
    pub async fn advance(self, media: &MediaRetriever) -> Result<FileFetch> {
        match self {
            FileFetch::Pending {
                conversation_id,
                file_id,
            } => {
                let metadata = media.file_metadata(&conversation_id, &file_id).await?;
                Ok(FileFetch::MetadataResolved {
                    conversation_id,
                    file_id,
                    metadata,
                })
            }
            FileFetch::MetadataResolved {
                conversation_id,
                file_id,
                metadata,
            } => {
                let bytes = media.file_content(&conversation_id, &file_id).await?;
                Ok(FileFetch::ContentFetched(RetrievedFile { bytes, metadata }))
            }
            done @ FileFetch::ContentFetched(_) => Ok(done),
        }
    }
}

impl MediaRetriever {
    async fn file_metadata(&self, conversation_id: &str, file_id: &str) -> Result<FileMetadata> {
        let url = format!("{}/v1/{}/fileData", self.file_base, conversation_id);
        let body = serde_json::to_vec(&FileDataRequest { file_ids: [file_id] })?;

        let response = self
            .http
            .post(&url)
            .header(TOKEN_HEADER, self.token.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .inspect_err(|e| self.log.error(&format!("Failed to get file data: {}", e)))?;

        let raw = response
            .bytes()
            .await
            .inspect_err(|e| self.log.error(&format!("Failed to read file data: {}", e)))?;
        let records: Vec<FileDataRecord> = serde_json::from_slice(&raw)
            .inspect_err(|e| self.log.error(&format!("Failed to decode file data: {}", e)))?;

        match records.into_iter().next() {
            Some(record) => Ok(record.file_data),
            None => {
                self.log.warn(&format!("No file data found for {}", file_id));
                Err(Error::EmptyMetadata {
                    file_id: file_id.to_string(),
                })
            }
        }
    }

    // Authenticated by header only. The service has never needed the token
    // as a query parameter too.
    async fn file_content(&self, conversation_id: &str, file_id: &str) -> Result<Vec<u8>> {
        let url = format!("{}/v1/{}/files/{}", self.file_base, conversation_id, file_id);
        let response = self
            .http
            .post(&url)
            .header(TOKEN_HEADER, self.token.as_str())
            .send()
            .await
            .inspect_err(|e| self.log.error(&format!("Failed to download file: {}", e)))?;

        let bytes = response
            .bytes()
            .await
            .inspect_err(|e| self.log.error(&format!("Failed to read file body: {}", e)))?;
        Ok(bytes.to_vec())
    }
}
