//! Script runtime management
//!
//! Wraps a QuickJS runtime and context. Exceptions thrown by scripts are
//! caught at this boundary and converted into [`ScriptError::Exception`].

use crate::ScriptError;
use rquickjs::function::IntoArgs;
use rquickjs::{Context, Ctx, FromJs, Function, Runtime, Value};
use std::path::Path;

/// Script execution context
pub struct ScriptRuntime {
    #[allow(dead_code)] // Kept alive for context lifetime
    runtime: Runtime,
    context: Context,
}

/// Turn a pending JS exception into a host error.
pub(crate) fn catch(ctx: &Ctx<'_>, err: rquickjs::Error) -> ScriptError {
    if !matches!(err, rquickjs::Error::Exception) {
        return ScriptError::Engine(err);
    }

    let value = ctx.catch();
    let (message, stack) = match value.as_exception() {
        Some(exception) => (exception.message().unwrap_or_default(), exception.stack()),
        None => {
            let message = value
                .as_string()
                .and_then(|s| s.to_string().ok())
                .unwrap_or_else(|| format!("non-error value thrown ({:?})", value.type_of()));
            (message, None)
        }
    };
    tracing::warn!(%message, "uncaught script exception");
    ScriptError::Exception { message, stack }
}

impl ScriptRuntime {
    pub fn new() -> Result<Self, ScriptError> {
        let runtime = Runtime::new()?;
        let context = Context::full(&runtime)?;

        Ok(Self { runtime, context })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn execute_file(&self, path: &Path) -> Result<(), ScriptError> {
        let source = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "executing script file");
        self.execute(&source)
    }

    /// Run `source` as a global script. Top-level function declarations
    /// become globals callable through [`call_function`](Self::call_function).
    pub fn execute(&self, source: &str) -> Result<(), ScriptError> {
        self.context
            .with(|ctx| ctx.eval::<(), _>(source).map_err(|err| catch(&ctx, err)))
    }

    /// Evaluate an expression and convert its result.
    pub fn eval<T>(&self, source: &str) -> Result<T, ScriptError>
    where
        T: for<'js> FromJs<'js>,
    {
        self.context
            .with(|ctx| ctx.eval::<T, _>(source).map_err(|err| catch(&ctx, err)))
    }

    /// Whether a global function called `name` is defined.
    pub fn has_function(&self, name: &str) -> bool {
        self.context.with(|ctx| {
            ctx.globals()
                .get::<_, Value>(name)
                .map(|value| value.is_function())
                .unwrap_or(false)
        })
    }

    /// Call a global JavaScript function by name.
    pub fn call_function<A>(&self, name: &str, args: A) -> Result<(), ScriptError>
    where
        A: for<'js> IntoArgs<'js>,
    {
        self.context.with(|ctx| {
            let func: Function = ctx.globals().get(name).map_err(|err| catch(&ctx, err))?;
            func.call::<_, ()>(args).map_err(|err| catch(&ctx, err))
        })
    }
}
