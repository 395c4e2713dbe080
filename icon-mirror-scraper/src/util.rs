use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Sibling path used while a file is being written.
pub(crate) fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

/// Write `bytes` next to `dest` and rename into place, so `dest` either
/// holds the previous contents or the complete new ones.
pub(crate) async fn write_atomic(dest: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = partial_path(dest);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, dest).await
}
