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

//! Template loader.

use minijinja::{Error, ErrorKind};
use std::path::{Component, Path, PathBuf};
use std::{fs, io};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Template loader searching a list of directories.
///
/// Directories are searched in order, so templates in earlier directories
/// shadow those of the same name in later ones. Template names are resolved
/// relative to each directory and may never leave it.
#[derive(Clone, Debug)]
pub struct Loader {
    /// Template search directories.
    dirs: Vec<PathBuf>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Loader {
    /// Creates a template loader.
    pub fn new<I>(dirs: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().collect(),
        }
    }

    /// Loads a template by name.
    ///
    /// Absolute names and names with `.` or `..` components are treated as
    /// missing, so views can't reach files outside the search directories.
    ///
    /// # Errors
    ///
    /// Missing files fall through to the next directory, but any other I/O
    /// error fails the lookup, naming the file that couldn't be read.
    pub fn load(&self, name: &str) -> Result<Option<String>, Error> {
        let Some(name) = relative(name) else {
            return Ok(None);
        };
        self.dirs
            .iter()
            .map(|dir| dir.join(name))
            .find_map(|path| read(&path).transpose())
            .transpose()
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns the name as a path, if it only consists of normal components.
fn relative(name: &str) -> Option<&Path> {
    let path = Path::new(name);
    path.components()
        .all(|component| matches!(component, Component::Normal(_)))
        .then_some(path)
}

/// Reads a template file, returning nothing if it doesn't exist.
fn read(path: &Path) -> Result<Option<String>, Error> {
    match fs::read_to_string(path) {
        Ok(source) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(path = %path.display(), "loaded template");
            Ok(Some(source))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => {
            let detail = format!("could not read {}", path.display());
            let inner = Error::new(ErrorKind::InvalidOperation, detail);
            Err(inner.with_source(err))
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = env::temp_dir()
            .join(format!("expose-loader-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).expect("scratch directory");
        dir
    }

    #[test]
    fn test_earlier_directories_take_precedence() {
        let a = scratch("a");
        let b = scratch("b");
        fs::write(a.join("page.html"), "from a").expect("write");
        fs::write(b.join("page.html"), "from b").expect("write");
        fs::write(b.join("only.html"), "only b").expect("write");

        let loader = Loader::new([a.clone(), b.clone()]);
        let load = |name| loader.load(name).expect("load");
        assert_eq!(load("page.html").as_deref(), Some("from a"));
        assert_eq!(load("only.html").as_deref(), Some("only b"));
        assert_eq!(load("missing.html"), None);

        let _ = fs::remove_dir_all(a);
        let _ = fs::remove_dir_all(b);
    }

    #[test]
    fn test_traversal_is_missing() {
        let dir = scratch("c");
        let loader = Loader::new([dir.join("nested")]);
        fs::write(dir.join("secret.txt"), "secret").expect("write");
        assert_eq!(loader.load("../secret.txt").ok().flatten(), None);
        assert_eq!(loader.load("./secret.txt").ok().flatten(), None);
        assert_eq!(loader.load("/etc/passwd").ok().flatten(), None);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_unreadable_templates_fail() {
        let dir = scratch("d");
        fs::create_dir_all(dir.join("page.html")).expect("directory");
        let loader = Loader::new([dir.clone()]);
        let err = loader.load("page.html").expect_err("unreadable");
        assert!(err.to_string().contains("page.html"));
        let _ = fs::remove_dir_all(dir);
    }
}
