//! Tessera Asset Registry
//!
//! Keeps track of which textures a scene may reference. Decoding and GPU
//! upload belong to the renderer; this crate only answers "does texture
//! `id` exist, and where does it come from".

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Asset handle (opaque ID)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AssetHandle(u64);

impl AssetHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("unknown texture id `{id}`")]
    UnknownTexture { id: String },

    #[error("failed to read asset manifest {}", path.display())]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid asset manifest {}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A registered texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    pub handle: AssetHandle,
    /// Resolved path of the source file.
    pub path: PathBuf,
}

/// On-disk list of textures to preload, keyed by texture id.
#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    textures: BTreeMap<String, PathBuf>,
}

/// Texture id → source file registry.
pub struct TextureRegistry {
    root: Option<PathBuf>,
    next_id: u64,
    textures: HashMap<String, TextureInfo>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self {
            root: None,
            next_id: 1,
            textures: HashMap::new(),
        }
    }

    /// Resolve relative texture paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::new()
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Register the texture at `path` under `id`.
    ///
    /// If `id` is already registered the existing handle is returned and the
    /// path is ignored. Otherwise the file must exist.
    pub fn load_texture(
        &mut self,
        id: &str,
        path: impl AsRef<Path>,
    ) -> Result<AssetHandle, AssetError> {
        if let Some(existing) = self.textures.get(id) {
            return Ok(existing.handle);
        }

        let path = self.resolve(path.as_ref());
        if !path.is_file() {
            tracing::warn!(texture = id, path = %path.display(), "texture file not found");
            return Err(AssetError::NotFound { path });
        }

        let handle = AssetHandle(self.next_id);
        self.next_id += 1;
        tracing::debug!(texture = id, path = %path.display(), handle = handle.0, "registered texture");
        self.textures
            .insert(id.to_string(), TextureInfo { handle, path });
        Ok(handle)
    }

    /// Register every texture listed in a JSON manifest of the form
    /// `{ "textures": { "<id>": "<path>" } }`. Relative paths resolve against
    /// the registry root. Returns the number of entries processed.
    pub fn load_manifest(&mut self, manifest_path: impl AsRef<Path>) -> Result<usize, AssetError> {
        let manifest_path = self.resolve(manifest_path.as_ref());
        let text = std::fs::read_to_string(&manifest_path).map_err(|source| {
            AssetError::ManifestIo {
                path: manifest_path.clone(),
                source,
            }
        })?;
        let manifest: Manifest =
            serde_json::from_str(&text).map_err(|source| AssetError::ManifestParse {
                path: manifest_path.clone(),
                source,
            })?;

        for (id, path) in &manifest.textures {
            self.load_texture(id, path)?;
        }
        Ok(manifest.textures.len())
    }

    pub fn get(&self, id: &str) -> Option<&TextureInfo> {
        self.textures.get(id)
    }

    /// Like [`get`](Self::get), but reports unknown ids as an error.
    pub fn require(&self, id: &str) -> Result<&TextureInfo, AssetError> {
        self.textures
            .get(id)
            .ok_or_else(|| AssetError::UnknownTexture { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.textures.contains_key(id)
    }

    /// Forget a texture. Returns whether it was registered.
    pub fn unload(&mut self, id: &str) -> bool {
        self.textures.remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crate_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn load_existing_file() {
        let mut registry = TextureRegistry::with_root(crate_dir());
        let handle = registry.load_texture("manifest", "Cargo.toml").unwrap();
        assert!(registry.contains("manifest"));
        assert_eq!(registry.get("manifest").unwrap().handle, handle);
        assert_eq!(registry.require("manifest").unwrap().path, crate_dir().join("Cargo.toml"));
    }

    #[test]
    fn missing_file_is_reported() {
        let mut registry = TextureRegistry::with_root(crate_dir());
        let err = registry.load_texture("nope", "does/not/exist.png").unwrap_err();
        assert!(matches!(err, AssetError::NotFound { .. }));
        assert!(!registry.contains("nope"));
    }

    #[test]
    fn reloading_an_id_returns_the_same_handle() {
        let mut registry = TextureRegistry::new();
        let path = crate_dir().join("Cargo.toml");
        let first = registry.load_texture("a", &path).unwrap();
        let second = registry.load_texture("a", "ignored.png").unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);

        let other = registry.load_texture("b", &path).unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn unload_and_clear() {
        let mut registry = TextureRegistry::with_root(crate_dir());
        registry.load_texture("a", "Cargo.toml").unwrap();
        registry.load_texture("b", "src/lib.rs").unwrap();

        assert!(registry.unload("a"));
        assert!(!registry.unload("a"));
        assert!(matches!(
            registry.require("a"),
            Err(AssetError::UnknownTexture { .. })
        ));

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn manifest_registers_textures() {
        let dir = std::env::temp_dir().join(format!("tessera-asset-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("hero.png"), b"png").unwrap();
        std::fs::write(
            dir.join("assets.json"),
            r#"{ "textures": { "hero": "hero.png" } }"#,
        )
        .unwrap();

        let mut registry = TextureRegistry::with_root(&dir);
        assert_eq!(registry.load_manifest("assets.json").unwrap(), 1);
        assert_eq!(registry.get("hero").unwrap().path, dir.join("hero.png"));

        std::fs::write(dir.join("broken.json"), "{ not json").unwrap();
        assert!(matches!(
            registry.load_manifest("broken.json"),
            Err(AssetError::ManifestParse { .. })
        ));
        std::fs::remove_dir_all(&dir).ok();
    }
}
