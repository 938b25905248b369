//! Blocking object transfer on top of the async `object_store` clients.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path as LocalPath;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use futures::TryStreamExt;
use object_store::{aws::AmazonS3Builder, path::Path, ObjectStore};
use tokio::runtime::Runtime;
use tracing::{debug, instrument};

use raster_common::{ReclassError, ReclassResult};

use crate::config::ObjectStorageConfig;
use crate::location::S3Location;

/// Synchronous upload and download of whole objects.
///
/// Each bucket gets its own client, built from the connection settings the
/// first time the bucket is used. Other backends can be registered per bucket
/// with [`ObjectTransfer::register_bucket`].
///
/// Owns a current-thread tokio runtime and blocks on every call, so it must
/// not be used from inside another runtime.
pub struct ObjectTransfer {
    runtime: Runtime,
    config: ObjectStorageConfig,
    stores: Mutex<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl ObjectTransfer {
    /// Create a transfer client from config.
    pub fn new(config: ObjectStorageConfig) -> ReclassResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ReclassError::transfer(format!("Failed to start runtime: {}", e)))?;

        Ok(Self {
            runtime,
            config,
            stores: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &ObjectStorageConfig {
        &self.config
    }

    /// Serve `bucket` from `store` instead of an S3 client.
    pub fn register_bucket(&self, bucket: impl Into<String>, store: Arc<dyn ObjectStore>) {
        self.stores().insert(bucket.into(), store);
    }

    /// The bucket map stays consistent across a panic, so a poisoned lock is
    /// recovered.
    fn stores(&self) -> MutexGuard<'_, HashMap<String, Arc<dyn ObjectStore>>> {
        self.stores.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn store_for(&self, bucket: &str) -> ReclassResult<Arc<dyn ObjectStore>> {
        let mut stores = self.stores();

        if let Some(store) = stores.get(bucket) {
            return Ok(Arc::clone(store));
        }

        let mut builder = AmazonS3Builder::new()
            .with_endpoint(self.config.endpoint_url())
            .with_bucket_name(bucket)
            .with_access_key_id(&self.config.access_key_id)
            .with_secret_access_key(&self.config.secret_access_key)
            .with_region(&self.config.region)
            .with_allow_http(self.config.allow_http);

        if let Some(token) = &self.config.session_token {
            builder = builder.with_token(token);
        }

        let store: Arc<dyn ObjectStore> = Arc::new(builder.build().map_err(|e| {
            ReclassError::transfer(format!("Failed to create S3 client for {}: {}", bucket, e))
        })?);

        debug!(bucket = %bucket, endpoint = %self.config.endpoint_url(), "Created S3 client");
        stores.insert(bucket.to_string(), Arc::clone(&store));
        Ok(store)
    }

    /// Read a whole object.
    #[instrument(skip(self), fields(location = %location))]
    pub fn get_bytes(&self, location: &S3Location) -> ReclassResult<Bytes> {
        let store = self.store_for(location.bucket())?;
        let path = Path::from(location.key());

        let bytes = self
            .runtime
            .block_on(async {
                let result = store.get(&path).await?;
                result.bytes().await
            })
            .map_err(|e| ReclassError::transfer(format!("Failed to read {}: {}", location, e)))?;

        debug!(size = bytes.len(), "Read object");
        Ok(bytes)
    }

    /// Write a whole object, replacing any existing one.
    #[instrument(skip(self, data), fields(location = %location))]
    pub fn put_bytes(&self, location: &S3Location, data: Bytes) -> ReclassResult<()> {
        let store = self.store_for(location.bucket())?;
        let path = Path::from(location.key());
        debug!(size = data.len(), "Writing object");

        self.runtime
            .block_on(store.put(&path, data.into()))
            .map_err(|e| ReclassError::transfer(format!("Failed to write {}: {}", location, e)))?;

        Ok(())
    }

    /// Check if an object exists.
    pub fn exists(&self, location: &S3Location) -> ReclassResult<bool> {
        let store = self.store_for(location.bucket())?;
        let path = Path::from(location.key());

        match self.runtime.block_on(store.head(&path)) {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(ReclassError::transfer(format!(
                "Failed to check {}: {}",
                location, e
            ))),
        }
    }

    /// Download an object into `local_path`, streaming it chunk by chunk.
    ///
    /// Parent directories are created as needed. Returns the number of bytes
    /// written.
    #[instrument(skip(self, local_path), fields(location = %location, local = %local_path.display()))]
    pub fn fetch(&self, location: &S3Location, local_path: &LocalPath) -> ReclassResult<u64> {
        let store = self.store_for(location.bucket())?;
        let path = Path::from(location.key());

        let written = self.runtime.block_on(async {
            let mut stream = store
                .get(&path)
                .await
                .map_err(|e| ReclassError::transfer(format!("Failed to read {}: {}", location, e)))?
                .into_stream();

            if let Some(parent) = local_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut file = std::fs::File::create(local_path)?;

            let mut written: u64 = 0;
            while let Some(chunk) = stream
                .try_next()
                .await
                .map_err(|e| ReclassError::transfer(format!("Download of {} failed: {}", location, e)))?
            {
                file.write_all(&chunk)?;
                written += chunk.len() as u64;
            }
            file.flush()?;
            Ok::<u64, ReclassError>(written)
        })?;

        debug!(size = written, "Downloaded object");
        Ok(written)
    }

    /// Upload the file at `local_path` as `location`.
    #[instrument(skip(self, local_path), fields(location = %location, local = %local_path.display()))]
    pub fn store(&self, location: &S3Location, local_path: &LocalPath) -> ReclassResult<()> {
        let data = std::fs::read(local_path).map_err(|e| {
            ReclassError::Io(format!("Cannot read {}: {}", local_path.display(), e))
        })?;
        self.put_bytes(location, Bytes::from(data))
    }
}
