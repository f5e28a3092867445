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

//! Views.

use expose_http::{Method, Request};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::action::{Action, Params};
use super::binding::{Binding, BindingFactory};
use super::env::Environment;
use super::error::Result;
use super::reply::Reply;

mod class;
mod json;
mod template;

pub use class::ClassView;
pub use json::{JsonView, JSON};
pub use template::{Template, TemplateView};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// View.
///
/// A view wraps an action, so it can be bound to a name in a [`Dispatcher`][],
/// answering each of the configured methods, which default to `GET`. Invoking
/// the view delegates to the action and returns its reply unmodified, which
/// is why plain views are mostly useful as the base of other views.
///
/// [`Dispatcher`]: crate::Dispatcher
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use expose::http::{Method, Request, Response};
/// use expose::{BindingFactory, Environment, Params, View};
///
/// fn article(_: &dyn Environment, _: &Request, _: &Params) -> Response {
///     Response::new()
/// }
///
/// // Create view and obtain bindings
/// let view = View::new("article", article)
///     .methods([Method::Get, Method::Post]);
/// let bindings = Arc::new(view).get_bindings();
/// assert_eq!(bindings.len(), 2);
/// ```
#[derive(Debug)]
pub struct View<A> {
    /// View name.
    name: String,
    /// Methods to bind.
    methods: BTreeSet<Method>,
    /// Content type to bind.
    content_type: Option<String>,
    /// Wrapped action.
    action: A,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<A> View<A>
where
    A: Action,
{
    /// Creates a view answering `GET`.
    pub fn new<N>(name: N, action: A) -> Self
    where
        N: Into<String>,
    {
        Self {
            name: name.into(),
            methods: BTreeSet::from([Method::Get]),
            content_type: None,
            action,
        }
    }

    /// Replaces the methods the view answers.
    #[must_use]
    pub fn methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Sets the content type the view produces.
    #[must_use]
    pub fn content_type<C>(mut self, content_type: C) -> Self
    where
        C: Into<String>,
    {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns the view name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates one binding per method, all sharing the given action.
    ///
    /// Views that wrap this view pass themselves, so the bindings invoke the
    /// outermost view rather than this one.
    pub(crate) fn bind(&self, action: &Arc<dyn Action>) -> Vec<Binding> {
        let iter = self.methods.iter().map(|&method| {
            Binding::new(
                self.name.clone(),
                Arc::clone(action),
                method,
                self.content_type.clone(),
            )
        });
        iter.collect()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<A> Action for View<A>
where
    A: Action,
{
    /// Invokes the wrapped action, returning its reply unmodified.
    #[inline]
    fn call(
        &self, env: &dyn Environment, req: &Request, params: &Params,
    ) -> Result<Reply> {
        self.action.call(env, req, params)
    }
}

impl<A> BindingFactory for View<A>
where
    A: Action,
{
    fn get_bindings(self: Arc<Self>) -> Vec<Binding> {
        let action: Arc<dyn Action> = self.clone();
        self.bind(&action)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use expose_http::{Response, ResponseExt};

    use super::*;
    use crate::Templates;

    fn article(_: &dyn Environment, _: &Request, params: &Params) -> Reply {
        Reply::value(params.get("slug"))
    }

    #[test]
    fn test_bindings_per_method() {
        let view = View::new("article", article)
            .methods([Method::Get, Method::Post])
            .content_type("text/html");

        let bindings = Arc::new(view).get_bindings();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].method(), Method::Get);
        assert_eq!(bindings[1].method(), Method::Post);
        for binding in &bindings {
            assert_eq!(binding.name(), "article");
            assert_eq!(binding.content_type(), Some("text/html"));
        }
    }

    #[test]
    fn test_defaults_to_get_without_content_type() {
        let bindings = Arc::new(View::new("article", article)).get_bindings();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].method(), Method::Get);
        assert_eq!(bindings[0].content_type(), None);
    }

    #[test]
    fn test_call_returns_reply_unmodified() {
        let env = Templates::new();
        let view = View::new("article", article);
        let params = Params::new().kwarg("slug", "hello");
        let reply = view.call(&env, &Request::new(), &params).expect("reply");
        match reply {
            Reply::Value(value) => assert_eq!(value.as_str(), Some("hello")),
            Reply::Response(_) => panic!("expected value"),
        }

        // Responses are passed through as well
        let view = View::new(
            "teapot",
            |_: &dyn Environment, _: &Request, _: &Params| {
                Response::from_text("short and stout")
            },
        );
        let reply = view.call(&env, &Request::new(), &params).expect("reply");
        assert_eq!(
            reply.into_response().map(|res| res.body),
            Some(b"short and stout".to_vec())
        );
    }

    #[test]
    fn test_bindings_invoke_the_view() {
        let env = Templates::new();
        let bindings = Arc::new(View::new("article", article)).get_bindings();
        let params = Params::new().kwarg("slug", "bound");
        let reply = bindings[0].call(&env, &Request::new(), &params);
        assert!(matches!(
            reply,
            Ok(Reply::Value(value)) if value.as_str() == Some("bound")
        ));
    }

    #[test]
    fn test_action_errors_propagate() {
        let env = Templates::new();
        let view = View::new(
            "broken",
            |_: &dyn Environment, _: &Request, _: &Params| {
                Err::<Reply, _>(crate::Error::action("boom"))
            },
        );
        let err = view.call(&env, &Request::new(), &Params::new());
        assert!(matches!(err, Err(crate::Error::Action(_))));
    }
}
