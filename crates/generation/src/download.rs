//! Saving result images to disk.

use std::path::{Path, PathBuf};

use crate::api::JobApi;
use crate::error::GenerationError;
use crate::task::GeneratedImage;

/// Longest file stem written, in characters.
const MAX_FILE_STEM_CHARS: usize = 200;

/// File name for `image`: its id made filesystem-safe, plus `.png`.
///
/// Ids embed the source URL, so anything outside `[A-Za-z0-9._-]` is
/// replaced with `_`.
pub fn image_file_name(image: &GeneratedImage) -> String {
    let stem: String = image
        .id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILE_STEM_CHARS)
        .collect();
    let stem = stem.trim_start_matches('.');
    let stem = if stem.is_empty() { "image" } else { stem };
    format!("{stem}.png")
}

/// Fetch `image` and write it to `dir/<imageId>.png`.
pub async fn download_image<A: JobApi + ?Sized>(
    api: &A,
    image: &GeneratedImage,
    dir: &Path,
) -> Result<PathBuf, GenerationError> {
    let bytes = match api.fetch_bytes(&image.url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(image_id = %image.id, error = %e, "Failed to fetch image");
            return Err(e.into());
        }
    };

    let path = dir.join(image_file_name(image));
    tokio::fs::write(&path, &bytes).await?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Image downloaded");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- image_file_name --

    #[test]
    fn url_characters_are_replaced() {
        let image = GeneratedImage::new(1700, 0, "https://cdn.example/a b.png?x=1".into());
        assert_eq!(
            image_file_name(&image),
            "1700-0-https___cdn.example_a_b.png_x_1.png"
        );
    }

    #[test]
    fn long_ids_are_capped() {
        let image = GeneratedImage::new(1, 2, "u".repeat(500));
        let name = image_file_name(&image);
        assert_eq!(name.len(), MAX_FILE_STEM_CHARS + ".png".len());
    }

    #[test]
    fn leading_dots_are_stripped() {
        let image = GeneratedImage {
            id: "..".into(),
            url: String::new(),
        };
        assert_eq!(image_file_name(&image), "image.png");
    }
}
