// src/render/template.rs
use minijinja::{path_loader, Environment, UndefinedBehavior, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::filters::sequential_group_by;
use crate::error::{RenderError, Result};

/// A loaded template plus the environment it renders in.
pub struct TemplateEngine {
    env: Environment<'static>,
    name: String,
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    // a missing field prints empty; attribute access on it still fails
    env.set_undefined_behavior(UndefinedBehavior::Lenient);
    // python-style methods such as `row.items()` and `name.upper()`
    env.set_unknown_method_callback(minijinja_contrib::pycompat::unknown_method_callback);
    minijinja_contrib::add_to_environment(&mut env);
    env.add_filter("sequential_group_by", sequential_group_by);
    env
}

impl TemplateEngine {
    /// Load `path`. Its directory becomes the loader root, so sibling
    /// templates can be included or extended. Parse errors surface here.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                RenderError::config(format!("not a template file path: `{}`", path.display()))
            })?
            .to_string();
        let root: PathBuf = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut env = base_environment();
        env.set_loader(path_loader(root.clone()));
        env.get_template(&name)?;
        debug!(template = %name, root = %root.display(), "template loaded");

        Ok(TemplateEngine { env, name })
    }

    /// Register an in-memory template under `name`.
    pub fn from_source(name: &str, source: &str) -> Result<Self> {
        let mut env = base_environment();
        env.add_template_owned(name.to_string(), source.to_string())?;
        Ok(TemplateEngine {
            env,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, bindings: Value) -> Result<String> {
        let template = self.env.get_template(&self.name)?;
        Ok(template.render(bindings)?)
    }
}
