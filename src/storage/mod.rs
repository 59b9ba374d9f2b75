//! Storage client interface and backends / 存储客户端接口与实现

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;

/// Canned ACL attached to written objects / 对象访问控制
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectAcl {
    Private,
    PublicRead,
}

impl ObjectAcl {
    /// Header value (`x-amz-acl`) / 请求头取值
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectAcl::Private => "private",
            ObjectAcl::PublicRead => "public-read",
        }
    }
}

/// Every upload is public-read; callers cannot request private objects.
/// 上传固定使用 public-read
pub const UPLOAD_ACL: ObjectAcl = ObjectAcl::PublicRead;

/// Storage client handle (all network and auth work lives behind it) / 存储客户端接口
#[async_trait]
pub trait ObjectClient: Send + Sync {
    /// Client name / 客户端名称
    fn name(&self) -> &str;

    /// Write an object / 写入对象
    async fn write_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
        acl: ObjectAcl,
    ) -> Result<()>;

    /// Read a whole object / 读取对象
    async fn read_object(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// Delete an object. Success means acknowledged, not confirmed / 删除对象
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Check whether an object is visible / 检查对象是否存在
    async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool>;
}

/// Shared client handle / 共享客户端
#[async_trait]
impl<T: ObjectClient + ?Sized> ObjectClient for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn write_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
        acl: ObjectAcl,
    ) -> Result<()> {
        (**self).write_object(bucket, key, body, content_type, acl).await
    }

    async fn read_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        (**self).read_object(bucket, key).await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        (**self).delete_object(bucket, key).await
    }

    async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool> {
        (**self).object_exists(bucket, key).await
    }
}

pub mod memory;
pub mod s3;

pub use memory::{ClientCall, MemoryObjectClient, StoredObject};
pub use self::s3::S3ObjectClient;
