//! Object storage facade / 对象存储门面
//!
//! Validates arguments, derives the object key, then hands the call to the
//! storage client. All per-call state (key, file info) stays in locals, so a
//! single `ObjectStorage` can be shared across tasks.

use std::path::Path;

use crate::config::{FacadeConfig, StorageSettings};
use crate::error::{Error, Result};
use crate::local;
use crate::storage::{ObjectClient, S3ObjectClient, UPLOAD_ACL};

/// Result of a confirmed delete / 删除确认结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Object is no longer visible / 对象已不可见
    Confirmed,
    /// Backend accepted the delete but the object is still visible / 后端已受理但对象仍可见
    Acknowledged,
}

pub struct ObjectStorage {
    settings: StorageSettings,
    client: Box<dyn ObjectClient>,
}

impl ObjectStorage {
    /// Build a facade backed by S3. Credentials are moved into the client
    /// and never kept by the facade. / 创建S3门面
    pub fn new(config: FacadeConfig) -> Result<Self> {
        let (credentials, settings) = config.into_parts()?;
        let client = S3ObjectClient::new(
            &settings.region,
            &settings.endpoint_host,
            settings.tls_verify,
            credentials,
        )?;

        tracing::info!(
            "Object storage ready: bucket={}, region={}, endpoint={}",
            settings.bucket,
            settings.region,
            settings.endpoint_host
        );

        Ok(Self {
            settings,
            client: Box::new(client),
        })
    }

    /// Build a facade over any storage client / 使用自定义客户端创建门面
    pub fn with_client(settings: StorageSettings, client: Box<dyn ObjectClient>) -> Result<Self> {
        settings.validate()?;
        tracing::debug!("Object storage using {} client, bucket={}", client.name(), settings.bucket);
        Ok(Self { settings, client })
    }

    /// Retained settings (no secrets) / 保留的配置
    pub fn settings(&self) -> &StorageSettings {
        &self.settings
    }

    /// Upload a local file, optionally under `remote_dir`. Always public-read.
    /// 上传本地文件
    pub async fn put(&self, local_path: &str, remote_dir: Option<&str>) -> Result<()> {
        let path = check_local_path(local_path).await?;

        let filename = local::base_name(local_path);
        check_remote_key(&filename)?;

        let key = object_key(&filename, remote_dir);
        let info = local::file_info(path).await?;
        let body = local::read_file(path).await?;

        tracing::debug!(
            "put: bucket={}, key={}, size={}, mime={}",
            self.settings.bucket,
            key,
            info.size,
            info.mime
        );

        self.client
            .write_object(&self.settings.bucket, &key, body, &info.mime, UPLOAD_ACL)
            .await
    }

    /// Download `remote_key` to `local_path/remote_key` / 下载对象到本地
    pub async fn get(&self, remote_key: &str, local_path: &str) -> Result<()> {
        check_remote_key(remote_key)?;
        if local_path.is_empty() {
            return Err(Error::invalid_argument(
                "You must set a localPath (i.e where to save the file)",
            ));
        }
        let target = local::join_key(Path::new(local_path), remote_key)?;

        let body = self
            .client
            .read_object(&self.settings.bucket, remote_key)
            .await?;

        tracing::debug!(
            "get: bucket={}, key={}, size={}, target={:?}",
            self.settings.bucket,
            remote_key,
            body.len(),
            target
        );

        local::write_file(&target, &body).await
    }

    /// Delete a remote object. Success means the backend acknowledged the
    /// request; it does not prove the object is gone (see `delete_confirmed`).
    /// 删除远程对象
    pub async fn delete(&self, remote_key: &str) -> Result<()> {
        check_remote_key(remote_key)?;
        tracing::debug!("delete: bucket={}, key={}", self.settings.bucket, remote_key);
        self.client
            .delete_object(&self.settings.bucket, remote_key)
            .await
    }

    /// Whether a remote object is visible / 检查对象是否存在
    pub async fn exists(&self, remote_key: &str) -> Result<bool> {
        check_remote_key(remote_key)?;
        self.client
            .object_exists(&self.settings.bucket, remote_key)
            .await
    }

    /// Delete, then check the object is really gone / 删除并确认
    pub async fn delete_confirmed(&self, remote_key: &str) -> Result<DeleteOutcome> {
        self.delete(remote_key).await?;

        if self.exists(remote_key).await? {
            tracing::warn!(
                "delete acknowledged but object still visible: bucket={}, key={}",
                self.settings.bucket,
                remote_key
            );
            Ok(DeleteOutcome::Acknowledged)
        } else {
            Ok(DeleteOutcome::Confirmed)
        }
    }

    /// Public URL of an object / 获取对象公开链接
    pub fn public_url(&self, remote_key: &str, use_tls: bool) -> String {
        let scheme = if use_tls { "https" } else { "http" };
        let key = remote_key.strip_prefix('/').unwrap_or(remote_key);
        format!(
            "{}://{}.{}/{}",
            scheme, self.settings.bucket, self.settings.endpoint_host, key
        )
    }
}

fn check_remote_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::invalid_argument(
            "You must specify the file you are fetching (e.g remote_dir/file.txt)",
        ));
    }
    Ok(())
}

async fn check_local_path(local_path: &str) -> Result<&Path> {
    if local_path.is_empty() {
        return Err(Error::invalid_argument(
            "You must set a localPath (i.e where to save the file)",
        ));
    }
    let path = Path::new(local_path);
    if !local::exists(path).await {
        return Err(Error::invalid_argument("The localPath you set does not exist"));
    }
    Ok(path)
}

/// Object key from filename and optional remote dir (one leading and one
/// trailing slash stripped) / 生成对象键
fn object_key(filename: &str, remote_dir: Option<&str>) -> String {
    let dir = remote_dir
        .map(|d| d.strip_prefix('/').unwrap_or(d))
        .map(|d| d.strip_suffix('/').unwrap_or(d))
        .unwrap_or("");

    if dir.is_empty() {
        filename.to_string()
    } else {
        format!("{}/{}", dir, filename)
    }
}
