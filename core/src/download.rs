//! Binary download handling: temp-file placement and `Content-Disposition`
//! filename extraction.
//!
//! # Design
//! A [`DownloadedFile`] owns the file it points at. Dropping it deletes the
//! file (and the scratch directory created to host a server-suggested
//! filename); [`DownloadedFile::persist`] detaches cleanup and hands the
//! path to the caller. This replaces best-effort delete-on-exit hooks with
//! explicit scoped ownership.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempDir};

use crate::error::ApiError;

/// Extract the `filename=` token from a `Content-Disposition` header value.
///
/// Accepts bare, single-quoted, and double-quoted forms; the value ends at
/// the closing quote, whitespace, or `;`. Returns `None` when no usable
/// filename is present.
pub fn content_disposition_filename(header: &str) -> Option<String> {
    let start = header.find("filename=")? + "filename=".len();
    let rest = &header[start..];
    let (rest, quote) = match rest.as_bytes().first() {
        Some(&q @ (b'"' | b'\'')) => (&rest[1..], Some(q as char)),
        _ => (rest, None),
    };
    let end = rest
        .find(|c: char| Some(c) == quote || c.is_whitespace() || (quote.is_none() && c == ';'))
        .unwrap_or(rest.len());
    let name = &rest[..end];
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Reject names that would escape the scratch directory.
fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

enum Cleanup {
    /// Scratch directory hosting a server-named file; removed on drop.
    Dir(TempDir),
    /// Anonymous temp file; removed on drop.
    File(NamedTempFile),
    /// Ownership was handed to the caller.
    Detached,
}

/// A completed binary download.
///
/// The file is fully written and closed by the time a value of this type is
/// returned. The value owns the file: dropping it deletes the file, calling
/// [`persist`](Self::persist) transfers ownership to the caller.
pub struct DownloadedFile {
    path: PathBuf,
    cleanup: Cleanup,
}

impl DownloadedFile {
    /// Stream a response body to disk, choosing the destination from the
    /// optional `Content-Disposition` header value.
    ///
    /// A safe server-suggested filename gets a fresh scratch directory so
    /// the name is preserved verbatim; anything else lands in an anonymous
    /// temp file. Write failures are decoding errors; nothing partial is
    /// ever reported as success.
    pub(crate) fn write(
        operation_id: &str,
        disposition: Option<&str>,
        mut body: impl Read,
    ) -> Result<Self, ApiError> {
        let filename = disposition
            .and_then(content_disposition_filename)
            .filter(|name| is_safe_filename(name));

        let io_error = |e: std::io::Error| {
            ApiError::decoding(
                format!("could not write download for {operation_id}: {e}"),
                e,
            )
        };

        match filename {
            Some(name) => {
                let dir = TempDir::new().map_err(io_error)?;
                let path = dir.path().join(&name);
                let mut file = File::create(&path).map_err(io_error)?;
                std::io::copy(&mut body, &mut file).map_err(io_error)?;
                file.flush().map_err(io_error)?;
                Ok(DownloadedFile {
                    path,
                    cleanup: Cleanup::Dir(dir),
                })
            }
            None => {
                let mut file = tempfile::Builder::new()
                    .prefix("download-")
                    .tempfile()
                    .map_err(io_error)?;
                std::io::copy(&mut body, file.as_file_mut()).map_err(io_error)?;
                file.as_file_mut().flush().map_err(io_error)?;
                let path = file.path().to_path_buf();
                Ok(DownloadedFile {
                    path,
                    cleanup: Cleanup::File(file),
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, as the server suggested it (or the anonymous
    /// temp name).
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Detach cleanup and hand the path to the caller, who now owns the
    /// file and is responsible for deleting it.
    pub fn persist(mut self) -> PathBuf {
        match std::mem::replace(&mut self.cleanup, Cleanup::Detached) {
            Cleanup::Dir(dir) => {
                let _ = dir.keep();
            }
            Cleanup::File(file) => {
                let _ = file.keep();
            }
            Cleanup::Detached => {}
        }
        std::mem::take(&mut self.path)
    }
}

impl std::fmt::Debug for DownloadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadedFile")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_double_quoted_filename() {
        let name = content_disposition_filename(r#"attachment; filename="clip.mp4""#);
        assert_eq!(name.as_deref(), Some("clip.mp4"));
    }

    #[test]
    fn parses_single_quoted_filename() {
        let name = content_disposition_filename("attachment; filename='clip.mp4'");
        assert_eq!(name.as_deref(), Some("clip.mp4"));
    }

    #[test]
    fn parses_bare_filename() {
        let name = content_disposition_filename("attachment; filename=clip.mp4; size=12");
        assert_eq!(name.as_deref(), Some("clip.mp4"));
    }

    #[test]
    fn missing_filename_yields_none() {
        assert_eq!(content_disposition_filename("attachment"), None);
        assert_eq!(content_disposition_filename("attachment; filename=\"\""), None);
    }

    #[test]
    fn suggested_name_is_kept() {
        let bytes = b"fake mp4 bytes";
        let download = DownloadedFile::write(
            "getDownload",
            Some(r#"attachment; filename="clip.mp4""#),
            &bytes[..],
        )
        .unwrap();
        assert_eq!(download.file_name(), Some("clip.mp4"));
        assert_eq!(std::fs::read(download.path()).unwrap(), bytes);
    }

    #[test]
    fn unsafe_name_falls_back_to_anonymous() {
        let download = DownloadedFile::write(
            "getDownload",
            Some("attachment; filename=../../etc/passwd"),
            &b"x"[..],
        )
        .unwrap();
        let name = download.file_name().unwrap();
        assert!(name.starts_with("download-"), "unexpected name: {name}");
    }

    #[test]
    fn anonymous_download_without_disposition() {
        let download = DownloadedFile::write("getDownload", None, &b"abc"[..]).unwrap();
        assert_eq!(std::fs::read(download.path()).unwrap(), b"abc");
    }

    #[test]
    fn drop_removes_the_file() {
        let download = DownloadedFile::write("getDownload", None, &b"abc"[..]).unwrap();
        let path = download.path().to_path_buf();
        drop(download);
        assert!(!path.exists());
    }

    #[test]
    fn persist_detaches_cleanup() {
        let download = DownloadedFile::write(
            "getDownload",
            Some(r#"attachment; filename="keep.bin""#),
            &b"abc"[..],
        )
        .unwrap();
        let path = download.persist();
        assert!(path.exists());
        let dir = path.parent().unwrap().to_path_buf();
        std::fs::remove_dir_all(dir).unwrap();
    }
}
