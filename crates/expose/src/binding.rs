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

//! Binding.

use expose_http::{Method, Request};
use std::fmt;
use std::sync::Arc;

use super::action::{Action, Params};
use super::env::Environment;
use super::error::Result;
use super::reply::Reply;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Binding.
///
/// A binding associates a name, an HTTP method and an optional content type
/// with an action, and is the unit a [`Dispatcher`][] resolves requests to.
/// Bindings are immutable once created, and cheap to clone, as the action is
/// shared between all bindings of the same view.
///
/// [`Dispatcher`]: crate::Dispatcher
#[derive(Clone)]
pub struct Binding {
    /// Binding name.
    name: String,
    /// Bound method.
    method: Method,
    /// Bound content type.
    content_type: Option<String>,
    /// Bound action.
    action: Arc<dyn Action>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Binding {
    /// Creates a binding.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use expose::http::{Method, Request, Response};
    /// use expose::{Binding, Environment, Params};
    ///
    /// // Create binding
    /// let action = |_: &dyn Environment, _: &Request, _: &Params| {
    ///     Response::new()
    /// };
    /// let action = Arc::new(action);
    /// let binding = Binding::new("index", action, Method::Get, None);
    /// assert_eq!(binding.name(), "index");
    /// ```
    pub fn new<N>(
        name: N, action: Arc<dyn Action>, method: Method,
        content_type: Option<String>,
    ) -> Self
    where
        N: Into<String>,
    {
        Self {
            name: name.into(),
            method,
            content_type,
            action,
        }
    }

    /// Invokes the bound action.
    #[inline]
    pub fn call(
        &self, env: &dyn Environment, req: &Request, params: &Params,
    ) -> Result<Reply> {
        self.action.call(env, req, params)
    }

    /// Returns the binding name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bound method.
    #[inline]
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the bound content type, if any.
    #[inline]
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the bound action.
    #[inline]
    #[must_use]
    pub fn action(&self) -> &Arc<dyn Action> {
        &self.action
    }
}

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Binding factory.
///
/// Views are binding factories, producing one binding for each method they
/// answer. The factory is consumed behind an [`Arc`], so bindings can share
/// the view itself as their action.
pub trait BindingFactory: Send + Sync + 'static {
    /// Returns the bindings of the factory.
    fn get_bindings(self: Arc<Self>) -> Vec<Binding>;
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Debug for Binding {
    /// Formats the binding for debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}
