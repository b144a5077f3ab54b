//! Upload limits shared by the grid maker and the retouch editor.
//!
//! Each candidate is screened on its own: an oversized file is rejected
//! with a reason while the remaining files are still accepted.

use serde::Serialize;

use crate::error::CoreError;

/// Maximum size of a single uploaded image (15 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 15 * 1024 * 1024;

/// Maximum number of source images for one generation request.
pub const MAX_GENERATION_IMAGES: usize = 4;

/// Minimum number of source images for one generation request.
pub const MIN_GENERATION_IMAGES: usize = 1;

/// A file offered for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadCandidate {
    pub name: String,
    pub size_bytes: u64,
}

/// A candidate that was turned away, with a user-facing reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedUpload {
    pub candidate: UploadCandidate,
    pub reason: String,
}

/// Outcome of screening a batch of candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadScreening {
    pub accepted: Vec<UploadCandidate>,
    pub rejected: Vec<RejectedUpload>,
}

/// Validate the size of a single file.
pub fn validate_upload_size(size_bytes: u64) -> Result<(), CoreError> {
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(format!(
            "File exceeds the maximum size of {} MB (got {:.1} MB)",
            MAX_UPLOAD_BYTES / (1024 * 1024),
            size_bytes as f64 / (1024.0 * 1024.0)
        )));
    }
    Ok(())
}

/// Accept candidates in order until `max_count` are accepted; reject
/// oversized files and any beyond the limit.
pub fn screen_uploads(candidates: Vec<UploadCandidate>, max_count: usize) -> UploadScreening {
    let mut screening = UploadScreening::default();
    for candidate in candidates {
        if let Err(e) = validate_upload_size(candidate.size_bytes) {
            screening.rejected.push(RejectedUpload {
                candidate,
                reason: e.to_string(),
            });
        } else if screening.accepted.len() >= max_count {
            screening.rejected.push(RejectedUpload {
                candidate,
                reason: format!("At most {max_count} images can be uploaded"),
            });
        } else {
            screening.accepted.push(candidate);
        }
    }
    screening
}
