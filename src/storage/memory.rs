//! In-memory storage client / 内存存储客户端
//!
//! Keeps objects in a map and records every call, so callers can check
//! exactly what reached the client.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::{ObjectAcl, ObjectClient};
use crate::error::{Error, Result};

/// Stored object / 已存储对象
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
    pub acl: ObjectAcl,
}

/// Recorded client call / 调用记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    Write { bucket: String, key: String },
    Read { bucket: String, key: String },
    Delete { bucket: String, key: String },
    Exists { bucket: String, key: String },
}

#[derive(Default)]
pub struct MemoryObjectClient {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    calls: Mutex<Vec<ClientCall>>,
    /// Acknowledge deletes without removing anything (lagging backend) / 模拟删除未生效
    lagging_deletes: bool,
}

impl MemoryObjectClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deletes succeed but objects stay visible / 删除返回成功但对象仍可见
    pub fn with_lagging_deletes() -> Self {
        Self {
            lagging_deletes: true,
            ..Self::default()
        }
    }

    /// Seed an object directly / 直接写入对象
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Bytes>) {
        self.objects.lock().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: body.into(),
                content_type: "application/octet-stream".to_string(),
                acl: ObjectAcl::Private,
            },
        );
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn calls(&self) -> Vec<ClientCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: ClientCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl ObjectClient for MemoryObjectClient {
    fn name(&self) -> &str {
        "memory"
    }

    async fn write_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
        acl: ObjectAcl,
    ) -> Result<()> {
        self.record(ClientCall::Write {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        self.objects.lock().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.to_string(),
                acl,
            },
        );
        Ok(())
    }

    async fn read_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.record(ClientCall::Read {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        self.objects
            .lock()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|obj| obj.body.clone())
            .ok_or_else(|| Error::storage(format!("NoSuchKey: {}/{}", bucket, key)))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.record(ClientCall::Delete {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        if !self.lagging_deletes {
            self.objects
                .lock()
                .remove(&(bucket.to_string(), key.to_string()));
        }
        Ok(())
    }

    async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool> {
        self.record(ClientCall::Exists {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        Ok(self
            .objects
            .lock()
            .contains_key(&(bucket.to_string(), key.to_string())))
    }
}
