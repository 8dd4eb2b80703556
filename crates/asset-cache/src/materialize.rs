//! Write-to-temp-then-rename helpers for cache files.
//!
//! Every cache target is a pure function of immutable input, so concurrent
//! writers of the same target produce the same bytes and the last rename wins.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::warn;

/// Unique sibling of `dest`, ending in the same file name so tools that infer
/// the output format from the name see the same suffix
pub(crate) fn temp_sibling(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_name = format!(".{}.{}", uuid::Uuid::new_v4().simple(), name);
    match dest.parent() {
        Some(parent) => parent.join(temp_name),
        None => PathBuf::from(temp_name),
    }
}

async fn ensure_parent(dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// Move a finished temp file into place, removing it if the rename fails
pub(crate) async fn commit(temp: &Path, dest: &Path) -> io::Result<()> {
    if let Err(e) = fs::rename(temp, dest).await {
        discard(temp).await;
        return Err(e);
    }
    Ok(())
}

/// Best-effort removal of a temp file
pub(crate) async fn discard(temp: &Path) {
    if let Err(e) = fs::remove_file(temp).await {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = ?temp, error = %e, "Failed to remove temp file");
        }
    }
}

/// Stream `reader` into `dest`, returning the number of bytes written
pub(crate) async fn write_stream<R>(dest: &Path, reader: &mut R) -> io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    ensure_parent(dest).await?;
    let temp = temp_sibling(dest);

    let written = async {
        let mut file = fs::File::create(&temp).await?;
        let written = tokio::io::copy(reader, &mut file).await?;
        file.flush().await?;
        Ok::<_, io::Error>(written)
    }
    .await;

    match written {
        Ok(written) => {
            commit(&temp, dest).await?;
            Ok(written)
        }
        Err(e) => {
            discard(&temp).await;
            Err(e)
        }
    }
}

/// Write a whole buffer to `dest`
pub(crate) async fn write_bytes(dest: &Path, data: &[u8]) -> io::Result<()> {
    let mut reader = data;
    write_stream(dest, &mut reader).await.map(|_| ())
}

/// Move `src` to `dest`, replacing any existing file.
///
/// A plain rename is atomic; when it fails (e.g. `src` lives on another
/// filesystem) the file is copied to a sibling temp and renamed instead.
pub(crate) async fn relocate(src: &Path, dest: &Path) -> io::Result<()> {
    ensure_parent(dest).await?;

    if fs::rename(src, dest).await.is_ok() {
        return Ok(());
    }

    let temp = temp_sibling(dest);
    if let Err(e) = fs::copy(src, &temp).await {
        discard(&temp).await;
        return Err(e);
    }
    commit(&temp, dest).await?;
    discard(src).await;
    Ok(())
}
