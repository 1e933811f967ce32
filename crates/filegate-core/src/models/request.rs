//! Incoming upload submission.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Result the transport layer reported for the upload transfer.
///
/// Anything but `Completed` means the payload cannot be trusted and no
/// further inspection is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportStatus {
    /// Transfer finished and all bytes were received.
    Completed,
    /// Transfer ended before the declared length was reached.
    Truncated,
    /// Client or server aborted the transfer.
    Aborted,
    /// The request carried no file part at all.
    NoFile,
}

impl TransportStatus {
    pub fn is_completed(self) -> bool {
        matches!(self, TransportStatus::Completed)
    }
}

/// One raw submission, as handed over by the transport layer.
///
/// `data` holds the bytes the runtime actually received; the declared
/// filename and content type are client-supplied and advisory only.
/// The request is ephemeral: it is borrowed for the duration of a single
/// validation call and owned by the caller.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub data: Bytes,
    pub declared_filename: String,
    pub declared_content_type: String,
    pub transport: TransportStatus,
}

impl UploadRequest {
    pub fn new(
        data: impl Into<Bytes>,
        declared_filename: impl Into<String>,
        declared_content_type: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            declared_filename: declared_filename.into(),
            declared_content_type: declared_content_type.into(),
            transport: TransportStatus::Completed,
        }
    }

    pub fn with_transport(mut self, transport: TransportStatus) -> Self {
        self.transport = transport;
        self
    }

    /// Size of the payload as actually received, in bytes.
    ///
    /// This is the authoritative size for limit checks; client-declared
    /// sizes are never consulted.
    pub fn received_size(&self) -> usize {
        self.data.len()
    }
}
