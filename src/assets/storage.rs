//! Path-deduplicated resource storage

use std::path::{Path, PathBuf};

use image::RgbaImage;
use rustc_hash::FxHashMap;

use super::handle::{AssetHandle, ImageHandle, SoundClip, SoundHandle};

/// Resources of one type, keyed by the path they were loaded from
#[derive(Debug)]
pub struct Assets<T> {
    by_path: FxHashMap<PathBuf, AssetHandle<T>>,
}

impl<T> Assets<T> {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_path: FxHashMap::default(),
        }
    }

    /// Handle previously stored under `path`
    pub fn get(&self, path: impl AsRef<Path>) -> Option<AssetHandle<T>> {
        self.by_path.get(path.as_ref()).cloned()
    }

    /// Return the stored handle for `path`, loading it with `load` on first use
    pub fn get_or_load(
        &mut self,
        path: impl AsRef<Path>,
        load: impl FnOnce(&Path) -> Option<T>,
    ) -> Option<AssetHandle<T>> {
        let path = path.as_ref();
        if let Some(handle) = self.by_path.get(path) {
            return Some(handle.clone());
        }
        let handle = AssetHandle::from_path(load(path)?, path);
        self.by_path.insert(path.to_path_buf(), handle.clone());
        Some(handle)
    }

    /// Store a value under `path`, replacing any previous one
    pub fn insert(&mut self, path: impl AsRef<Path>, value: T) -> AssetHandle<T> {
        let handle = AssetHandle::from_path(value, path.as_ref());
        self.by_path.insert(path.as_ref().to_path_buf(), handle.clone());
        handle
    }

    /// Whether `path` is loaded
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.by_path.contains_key(path.as_ref())
    }

    /// Number of stored resources
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Drop every stored handle (live clones stay valid)
    pub fn clear(&mut self) {
        self.by_path.clear();
    }
}

impl<T> Default for Assets<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Images and sounds used by the game, loaded synchronously and cached.
///
/// Paths are resolved against an optional root directory. Failures are
/// logged and reported as `None`; the caller is expected to cope with a
/// missing resource.
#[derive(Debug, Default)]
pub struct ResourceCache {
    root: Option<PathBuf>,
    images: Assets<RgbaImage>,
    sounds: Assets<SoundClip>,
}

impl ResourceCache {
    /// Create a cache resolving paths as given
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Decode an image file into RGBA
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Option<ImageHandle> {
        let path = self.resolve(path.as_ref());
        self.images.get_or_load(&path, |path| match image::open(path) {
            Ok(image) => {
                log::debug!("Loaded image {}", path.display());
                Some(image.to_rgba8())
            }
            Err(e) => {
                log::error!("Failed to load image {}: {e}", path.display());
                None
            }
        })
    }

    /// Read a sound file
    pub fn load_sound(&mut self, path: impl AsRef<Path>) -> Option<SoundHandle> {
        let path = self.resolve(path.as_ref());
        self.sounds.get_or_load(&path, |path| match std::fs::read(path) {
            Ok(bytes) => {
                log::debug!("Loaded sound {} ({} bytes)", path.display(), bytes.len());
                Some(SoundClip::new(bytes))
            }
            Err(e) => {
                log::error!("Failed to load sound {}: {e}", path.display());
                None
            }
        })
    }

    /// Register a generated image under a pseudo path
    pub fn insert_image(&mut self, path: impl AsRef<Path>, image: RgbaImage) -> ImageHandle {
        let path = self.resolve(path.as_ref());
        self.images.insert(path, image)
    }

    /// Cached images
    pub fn images(&self) -> &Assets<RgbaImage> {
        &self.images
    }

    /// Cached sounds
    pub fn sounds(&self) -> &Assets<SoundClip> {
        &self.sounds
    }

    /// Drop every cached resource
    pub fn clear(&mut self) {
        self.images.clear();
        self.sounds.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_path_loads_once() {
        let mut assets = Assets::<u32>::new();
        let mut calls = 0;
        let first = assets.get_or_load("a", |_| {
            calls += 1;
            Some(1)
        });
        let second = assets.get_or_load("a", |_| {
            calls += 1;
            Some(2)
        });

        assert_eq!(calls, 1);
        assert_eq!(first, second);
        assert_eq!(second.map(|h| *h), Some(1));
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let mut assets = Assets::<u32>::new();
        assert!(assets.get_or_load("missing", |_| None).is_none());
        assert!(!assets.contains("missing"));
        assert!(assets.is_empty());
    }

    #[test]
    fn test_missing_files_return_none() {
        let mut cache = ResourceCache::new().with_root("/definitely/not/here");
        assert!(cache.load_image("player.png").is_none());
        assert!(cache.load_sound("coin.wav").is_none());
    }

    #[test]
    fn test_generated_images_resolve_by_path() {
        let mut cache = ResourceCache::new().with_root("res");
        let handle = cache.insert_image("gen/dot.png", RgbaImage::new(2, 2));
        let again = cache.load_image("gen/dot.png");
        assert_eq!(again, Some(handle));
        assert_eq!(cache.images().len(), 1);
    }
}
