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

//! Environment.

use minijinja::Value;

use super::error::Result;

mod config;
mod loader;
mod templates;

pub use config::Config;
pub use templates::Templates;

// ----------------------------------------------------------------------------
// Type aliases
// ----------------------------------------------------------------------------

/// Renderer, turning a value into the rendered output.
pub type Renderer<'a> = Box<dyn Fn(Value) -> Result<String> + 'a>;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Environment.
///
/// The environment is handed to every action, and supplies the renderers that
/// a [`TemplateView`][] uses to turn plain values into responses. [`Templates`]
/// is the MiniJinja-backed implementation, but anything that can resolve a
/// template name to a renderer will do.
///
/// [`TemplateView`]: crate::TemplateView
pub trait Environment {
    /// Returns the renderer for the template with the given name.
    fn get_renderer(&self, name: &str) -> Result<Renderer<'_>>;
}
