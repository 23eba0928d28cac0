//! Shared handles to loaded resources

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbaImage;

/// Global counter for resource ids
static NEXT_ASSET_ID: AtomicU64 = AtomicU64::new(1);

/// Cheaply clonable, reference-counted handle to a loaded resource.
///
/// Two handles are equal when they come from the same load, whatever the
/// content.
#[derive(Debug)]
pub struct AssetHandle<T> {
    id: u64,
    source: Option<Arc<PathBuf>>,
    inner: Arc<T>,
}

/// Decoded bitmap
pub type ImageHandle = AssetHandle<RgbaImage>;

/// Encoded sound clip
pub type SoundHandle = AssetHandle<SoundClip>;

/// Raw bytes of an audio file, decoded at play time
#[derive(Debug, Clone)]
pub struct SoundClip {
    /// File contents
    pub bytes: Arc<[u8]>,
}

impl SoundClip {
    /// Wrap file contents
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl<T> AssetHandle<T> {
    /// Wrap a value that was not loaded from disk
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            id: NEXT_ASSET_ID.fetch_add(1, Ordering::Relaxed),
            source: None,
            inner: Arc::new(value),
        }
    }

    /// Wrap a value loaded from `path`
    #[must_use]
    pub fn from_path(value: T, path: impl AsRef<Path>) -> Self {
        let mut handle = Self::new(value);
        handle.source = Some(Arc::new(path.as_ref().to_path_buf()));
        handle
    }

    /// Unique id of the load
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// File the resource came from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref().map(PathBuf::as_path)
    }

    /// Number of live handles to this resource
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            source: self.source.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> Hash for AssetHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> std::ops::Deref for AssetHandle<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
