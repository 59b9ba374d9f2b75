//! Local file helpers / 本地文件工具

use bytes::Bytes;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Local file information / 本地文件信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalFileInfo {
    pub path: PathBuf,
    pub name: String,
    pub extension: String,
    pub size: u64,
    pub mime: String,
}

/// Check whether a local path exists / 检查本地路径是否存在
pub async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Base file name of a path, empty if there is none / 获取文件名
pub fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string()
}

/// Collect size and MIME type for a local file / 获取本地文件信息
pub async fn file_info(path: &Path) -> Result<LocalFileInfo> {
    let metadata = tokio::fs::metadata(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Ok(LocalFileInfo {
        path: path.to_path_buf(),
        name,
        extension,
        size: metadata.len(),
        mime: mime.essence_str().to_string(),
    })
}

pub async fn read_file(path: &Path) -> Result<Bytes> {
    let data = tokio::fs::read(path).await?;
    Ok(Bytes::from(data))
}

/// Write bytes, creating parent directories and overwriting / 写入文件（自动创建父目录，覆盖已有文件）
pub async fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, data).await?;
    Ok(())
}

/// Join an object key under a local directory, refusing `..` segments and
/// keys that name no file / 将对象键拼接到本地目录下
pub fn join_key(local_dir: &Path, key: &str) -> Result<PathBuf> {
    let key = key.replace('\\', "/");
    let mut full_path = local_dir.to_path_buf();
    let mut pushed = 0;

    for component in key.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if component == ".." {
            return Err(Error::invalid_argument(format!(
                "Remote key {} escapes the local directory",
                key
            )));
        }
        full_path.push(component);
        pushed += 1;
    }

    if pushed == 0 {
        return Err(Error::invalid_argument(format!(
            "Remote key {} does not name a file",
            key
        )));
    }

    Ok(full_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("local/cat.png"), "cat.png");
        assert_eq!(base_name("cat.png"), "cat.png");
        assert_eq!(base_name("/"), "");
        assert_eq!(base_name(""), "");
    }

    #[test]
    fn test_join_key() {
        let dir = Path::new("dest");
        assert_eq!(join_key(dir, "a/b/c.txt").unwrap(), Path::new("dest").join("a").join("b").join("c.txt"));
        assert_eq!(join_key(dir, "/c.txt").unwrap(), Path::new("dest").join("c.txt"));
        assert!(matches!(join_key(dir, "../etc/passwd"), Err(Error::InvalidArgument(_))));
        // must land under the directory, never on it
        for key in ["/", ".", "//", "./"] {
            assert!(matches!(join_key(dir, key), Err(Error::InvalidArgument(_))));
        }
    }

    #[tokio::test]
    async fn test_file_info_and_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("page.html");

        write_file(&path, b"<p>hi</p>").await.unwrap();
        assert!(exists(&path).await);

        let info = file_info(&path).await.unwrap();
        assert_eq!(info.name, "page.html");
        assert_eq!(info.extension, "html");
        assert_eq!(info.size, 9);
        assert_eq!(info.mime, "text/html");

        write_file(&path, b"x").await.unwrap();
        assert_eq!(read_file(&path).await.unwrap(), Bytes::from_static(b"x"));
    }

    #[tokio::test]
    async fn test_unknown_extension_is_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.zzzunknown");
        write_file(&path, b"1").await.unwrap();
        assert_eq!(file_info(&path).await.unwrap().mime, "application/octet-stream");
    }
}
