//! Tessera Scripting System
//!
//! JavaScript execution via QuickJS.
//!
//! ## Architecture
//!
//! - **Runtime:** one QuickJS runtime + full context per scene
//! - **Bindings:** a global `engine` object whose functions take plain
//!   numbers, strings and integer entity ids; failures surface as JS
//!   exceptions, never as host panics
//! - **Scene:** [`ScriptableScene`] drives the script's `init`, `update`,
//!   `render` and `cleanup` hooks against a fresh entity manager

pub mod bindings;
pub mod error;
pub mod runtime;
pub mod scene;

pub use bindings::{BindingError, EngineBindings};
pub use error::ScriptError;
pub use rquickjs;
pub use runtime::ScriptRuntime;
pub use scene::ScriptableScene;
