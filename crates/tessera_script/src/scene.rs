//! Script-driven scene
//!
//! A scene owns one JavaScript file. `init` builds a fresh entity manager,
//! texture registry and QuickJS runtime, loads the script and calls its
//! `init()`. The per-frame hooks `update(dt)` and `render()` are forwarded
//! if the script defines them. Lifecycle functions the script leaves out
//! are skipped.

use crate::{EngineBindings, ScriptError, ScriptRuntime};
use std::cell::{Ref, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tessera_asset::TextureRegistry;
use tessera_core::ecs::EntityManager;
use tessera_core::render::{collect_sprite_draws, SpriteDraw};

struct Loaded {
    runtime: ScriptRuntime,
    bindings: EngineBindings,
}

pub struct ScriptableScene {
    script_path: PathBuf,
    asset_root: PathBuf,
    texture_manifest: Option<PathBuf>,
    loaded: Option<Loaded>,
}

impl ScriptableScene {
    pub fn new(script_path: impl Into<PathBuf>, asset_root: impl Into<PathBuf>) -> Self {
        Self {
            script_path: script_path.into(),
            asset_root: asset_root.into(),
            texture_manifest: None,
            loaded: None,
        }
    }

    /// Preload the textures listed in `manifest` on every `init`, before the
    /// script runs. A relative path resolves against the asset root.
    pub fn with_texture_manifest(mut self, manifest: impl Into<PathBuf>) -> Self {
        self.texture_manifest = Some(manifest.into());
        self
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    pub fn is_initialized(&self) -> bool {
        self.loaded.is_some()
    }

    /// Load the script and run its `init()`.
    ///
    /// Calling `init` on a running scene cleans it up first, so every
    /// initialization starts from an empty entity manager.
    pub fn init(&mut self) -> Result<(), ScriptError> {
        if self.is_initialized() {
            self.cleanup()?;
        }

        let entities = Rc::new(RefCell::new(EntityManager::new()));
        let mut registry = TextureRegistry::with_root(&self.asset_root);
        if let Some(manifest) = &self.texture_manifest {
            let count = registry.load_manifest(manifest)?;
            tracing::debug!(manifest = %manifest.display(), count, "preloaded textures");
        }
        let textures = Rc::new(RefCell::new(registry));
        let bindings = EngineBindings::new(entities, textures);

        let runtime = ScriptRuntime::new()?;
        bindings.install(&runtime, &self.asset_root)?;
        runtime.execute_file(&self.script_path)?;

        tracing::info!(script = %self.script_path.display(), "scene script loaded");
        let loaded = self.loaded.insert(Loaded { runtime, bindings });
        call_hook(&loaded.runtime, "init", ())
    }

    /// Forward one simulation step to the script.
    pub fn update(&mut self, dt: f32) -> Result<(), ScriptError> {
        let loaded = self.loaded.as_ref().ok_or(ScriptError::NotInitialized)?;
        call_hook(&loaded.runtime, "update", (dt,))
    }

    /// Run the script's `render()` and return this frame's sprite draws.
    pub fn render(&mut self) -> Result<Vec<SpriteDraw>, ScriptError> {
        let loaded = self.loaded.as_ref().ok_or(ScriptError::NotInitialized)?;
        call_hook(&loaded.runtime, "render", ())?;
        Ok(collect_sprite_draws(&loaded.bindings.entities().borrow()))
    }

    /// Run the script's `cleanup()` and drop all scene state.
    ///
    /// Safe to call more than once. State is dropped even if the script's
    /// hook throws; the error is still returned.
    pub fn cleanup(&mut self) -> Result<(), ScriptError> {
        let Some(loaded) = self.loaded.take() else {
            return Ok(());
        };
        let result = call_hook(&loaded.runtime, "cleanup", ());
        tracing::info!(script = %self.script_path.display(), "scene cleaned up");
        result
    }

    /// The scene's entity manager, while initialized.
    pub fn entities(&self) -> Option<Ref<'_, EntityManager>> {
        self.loaded
            .as_ref()
            .map(|loaded| loaded.bindings.entities().borrow())
    }

    pub fn runtime(&self) -> Option<&ScriptRuntime> {
        self.loaded.as_ref().map(|loaded| &loaded.runtime)
    }
}

impl Drop for ScriptableScene {
    fn drop(&mut self) {
        if let Err(err) = self.cleanup() {
            tracing::warn!(error = %err, "script cleanup failed");
        }
    }
}

fn call_hook<A>(runtime: &ScriptRuntime, name: &str, args: A) -> Result<(), ScriptError>
where
    A: for<'js> rquickjs::function::IntoArgs<'js>,
{
    if !runtime.has_function(name) {
        tracing::trace!(hook = name, "script hook not defined");
        return Ok(());
    }
    runtime.call_function(name, args)
}
