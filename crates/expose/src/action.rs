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

//! Action.

use expose_http::Request;
use std::collections::BTreeMap;
use std::fmt;

use super::env::Environment;
use super::error::Result;
use super::reply::{IntoReply, Reply};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Action parameters.
///
/// Besides the environment and request, actions receive positional and named
/// arguments, which are typically extracted from the request by whoever owns
/// the routing, and passed along when dispatching.
///
/// # Examples
///
/// ```
/// use expose::Params;
///
/// // Create parameters
/// let params = Params::new()
///     .arg("2024")
///     .kwarg("slug", "hello-world");
///
/// assert_eq!(params.nth(0), Some("2024"));
/// assert_eq!(params.get("slug"), Some("hello-world"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    /// Positional arguments.
    pub args: Vec<String>,
    /// Named arguments.
    pub kwargs: BTreeMap<String, String>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Params {
    /// Creates empty parameters.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    #[inline]
    #[must_use]
    pub fn arg<V>(mut self, value: V) -> Self
    where
        V: Into<String>,
    {
        self.args.push(value.into());
        self
    }

    /// Sets a named argument.
    #[inline]
    #[must_use]
    pub fn kwarg<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.kwargs.insert(key.into(), value.into());
        self
    }

    /// Returns the positional argument at the given index.
    #[inline]
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Returns the named argument with the given key.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.kwargs.get(key).map(String::as_str)
    }
}

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Action.
///
/// An action is invoked with the [`Environment`], the [`Request`] and the
/// [`Params`], and answers with a [`Reply`]. Functions and closures with the
/// matching signature are actions, as long as they return something that
/// implements [`IntoReply`]. Views are actions themselves, wrapping another
/// action and post-processing its reply.
///
/// Actions are shared between bindings and threads, which is why they must be
/// `Send`, `Sync` and `'static`.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use expose::http::{Request, Response, ResponseExt};
/// use expose::{Action, Environment, Params, Templates};
///
/// // Create action
/// let action = |_: &dyn Environment, _: &Request, params: &Params| {
///     let name = params.nth(0).unwrap_or("world");
///     Response::from_text(format!("Hello, {name}!"))
/// };
///
/// // Invoke action
/// let env = Templates::new();
/// let reply = action.call(&env, &Request::new(), &Params::new().arg("you"))?;
/// let res = reply.into_response().expect("response");
/// assert_eq!(res.body, b"Hello, you!");
/// # Ok(())
/// # }
/// ```
pub trait Action: Send + Sync + 'static {
    /// Invokes the action.
    fn call(
        &self, env: &dyn Environment, req: &Request, params: &Params,
    ) -> Result<Reply>;
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Debug for dyn Action {
    /// Formats the action for debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn Action")
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<F, R> Action for F
where
    F: Fn(&dyn Environment, &Request, &Params) -> R + Send + Sync + 'static,
    R: IntoReply,
{
    #[inline]
    fn call(
        &self, env: &dyn Environment, req: &Request, params: &Params,
    ) -> Result<Reply> {
        self(env, req, params).into_reply()
    }
}
