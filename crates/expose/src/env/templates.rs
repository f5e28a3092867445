// Copyright (c) 2025 Zensical and contributors

// SPDX-License-Identifier: MIT
// Third-party contributions licensed under DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! MiniJinja template environment.

use minijinja::value::ValueKind;
use minijinja::{context, AutoEscape, Value};

use crate::error::Result;

use super::config::Config;
use super::loader::Loader;
use super::{Environment, Renderer};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// MiniJinja template environment.
///
/// Templates are either loaded from the configured directories on first use,
/// or added from memory with [`Templates::add_template`]. When rendering, map
/// values are used as the template context, so their keys become variables,
/// while all other values are available as `value`.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use expose::{Environment, Templates};
/// use minijinja::context;
///
/// // Create environment and add template
/// let mut env = Templates::new();
/// env.add_template("hello.txt", "Hello, {{ name }}!")?;
///
/// // Render template
/// let render = env.get_renderer("hello.txt")?;
/// assert_eq!(render(context! { name => "world" })?, "Hello, world!");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Templates {
    /// Template environment.
    env: minijinja::Environment<'static>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Templates {
    /// Creates an environment without template directories.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Creates an environment from the given configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut env = minijinja::Environment::new();
        if !config.dirs.is_empty() {
            let loader = Loader::new(config.dirs.iter().cloned());
            env.set_loader(move |name| loader.load(name));
        }

        // MiniJinja escapes by file extension, which we keep unless disabled
        if !config.auto_escape {
            env.set_auto_escape_callback(|_| AutoEscape::None);
        }
        Self { env }
    }

    /// Adds a template from memory.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Template`][], if the template has syntax
    /// errors.
    ///
    /// [`Error::Template`]: crate::Error::Template
    pub fn add_template<N, S>(&mut self, name: N, source: S) -> Result
    where
        N: Into<String>,
        S: Into<String>,
    {
        self.env.add_template_owned(name.into(), source.into())?;
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Environment for Templates {
    /// Returns the renderer for the template with the given name.
    ///
    /// # Errors
    ///
    /// If the template doesn't exist or can't be loaded, the MiniJinja error
    /// is returned unmodified.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self))
    )]
    fn get_renderer(&self, name: &str) -> Result<Renderer<'_>> {
        let template = self.env.get_template(name)?;
        Ok(Box::new(move |value: Value| {
            let output = if value.kind() == ValueKind::Map {
                template.render(value)
            } else {
                template.render(context! { value })
            };
            output.map_err(Into::into)
        }))
    }
}

impl Default for Templates {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use super::*;
    use crate::Error;

    #[test]
    fn test_render_map_as_context() {
        let mut env = Templates::new();
        env.add_template("greet.txt", "{{ greeting }}, {{ name }}!")
            .expect("template");
        let render = env.get_renderer("greet.txt").expect("renderer");
        let value = Value::from_serialize(
            [("greeting", "Hi"), ("name", "Ferris")]
                .into_iter()
                .collect::<std::collections::BTreeMap<_, _>>(),
        );
        assert_eq!(render(value).expect("render"), "Hi, Ferris!");
    }

    #[test]
    fn test_render_other_values_as_value() {
        let mut env = Templates::new();
        env.add_template("list.txt", "{{ value | join(',') }}")
            .expect("template");
        let render = env.get_renderer("list.txt").expect("renderer");
        let value = Value::from_serialize([1, 2, 3]);
        assert_eq!(render(value).expect("render"), "1,2,3");
    }

    #[test]
    fn test_html_templates_escape_by_default() {
        let mut env = Templates::new();
        env.add_template("page.html", "<p>{{ value }}</p>")
            .expect("template");
        let render = env.get_renderer("page.html").expect("renderer");
        let output = render(Value::from("<b>")).expect("render");
        assert_eq!(output, "<p>&lt;b&gt;</p>");
    }

    #[test]
    fn test_auto_escape_can_be_disabled() {
        let config = Config {
            auto_escape: false,
            ..Config::default()
        };
        let mut env = Templates::from_config(&config);
        env.add_template("page.html", "<p>{{ value }}</p>")
            .expect("template");
        let render = env.get_renderer("page.html").expect("renderer");
        assert_eq!(render(Value::from("<b>")).expect("render"), "<p><b></p>");
    }

    #[test]
    fn test_missing_template() {
        let env = Templates::new();
        match env.get_renderer("missing.html") {
            Err(Error::Template(err)) => assert_eq!(
                err.kind(),
                minijinja::ErrorKind::TemplateNotFound
            ),
            other => panic!("unexpected result: {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_load_from_directory() {
        let dir = env::temp_dir()
            .join(format!("expose-templates-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("directory");
        fs::write(dir.join("about.txt"), "About {{ value }}").expect("write");

        let config = Config {
            dirs: vec![dir.clone()],
            ..Config::default()
        };
        let env = Templates::from_config(&config);
        let render = env.get_renderer("about.txt").expect("renderer");
        assert_eq!(render(Value::from("us")).expect("render"), "About us");
        let _ = fs::remove_dir_all(dir);
    }
}
