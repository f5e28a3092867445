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

//! Class view.

use expose_http::Method;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::action::Action;
use crate::binding::{Binding, BindingFactory};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Class view.
///
/// A named resource with one handler per method, where handlers can be set
/// for `GET`, `HEAD`, `POST`, `PUT` and `DELETE`. Each handler present yields
/// exactly one binding, with the handler itself as the action, and without
/// any content type. Handlers may capture shared state, so they can act like
/// the methods of a single instance.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use expose::http::{Request, Response};
/// use expose::{BindingFactory, ClassView, Environment, Params};
///
/// fn show(_: &dyn Environment, _: &Request, _: &Params) -> Response {
///     Response::new()
/// }
///
/// // Create class view and obtain bindings
/// let view = ClassView::new("article").get(show).post(show);
/// assert_eq!(Arc::new(view).get_bindings().len(), 2);
/// ```
#[derive(Debug)]
pub struct ClassView {
    /// View name.
    name: String,
    /// Map methods to handlers.
    handlers: BTreeMap<Method, Arc<dyn Action>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl ClassView {
    /// Methods that can be handled.
    pub const METHODS: [Method; 5] = [
        Method::Get,
        Method::Head,
        Method::Post,
        Method::Put,
        Method::Delete,
    ];

    /// Creates a class view without handlers.
    pub fn new<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        Self {
            name: name.into(),
            handlers: BTreeMap::new(),
        }
    }

    /// Sets the `GET` handler.
    #[inline]
    #[must_use]
    pub fn get<A>(self, action: A) -> Self
    where
        A: Action,
    {
        self.handle(Method::Get, action)
    }

    /// Sets the `HEAD` handler.
    #[inline]
    #[must_use]
    pub fn head<A>(self, action: A) -> Self
    where
        A: Action,
    {
        self.handle(Method::Head, action)
    }

    /// Sets the `POST` handler.
    #[inline]
    #[must_use]
    pub fn post<A>(self, action: A) -> Self
    where
        A: Action,
    {
        self.handle(Method::Post, action)
    }

    /// Sets the `PUT` handler.
    #[inline]
    #[must_use]
    pub fn put<A>(self, action: A) -> Self
    where
        A: Action,
    {
        self.handle(Method::Put, action)
    }

    /// Sets the `DELETE` handler.
    #[inline]
    #[must_use]
    pub fn delete<A>(self, action: A) -> Self
    where
        A: Action,
    {
        self.handle(Method::Delete, action)
    }

    /// Returns the view name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether a handler is set for the given method.
    #[inline]
    #[must_use]
    pub fn has(&self, method: Method) -> bool {
        self.handlers.contains_key(&method)
    }

    /// Sets the handler for a method, replacing any previous one.
    fn handle<A>(mut self, method: Method, action: A) -> Self
    where
        A: Action,
    {
        self.handlers.insert(method, Arc::new(action));
        self
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl BindingFactory for ClassView {
    fn get_bindings(self: Arc<Self>) -> Vec<Binding> {
        let iter = Self::METHODS.into_iter().filter_map(|method| {
            self.handlers.get(&method).map(|action| {
                let action = Arc::clone(action);
                Binding::new(self.name.clone(), action, method, None)
            })
        });
        iter.collect()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use expose_http::{Request, Response, ResponseExt};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{Environment, Params, Reply, Templates};

    fn ok(_: &dyn Environment, _: &Request, _: &Params) -> Response {
        Response::from_text("ok")
    }

    #[test]
    fn test_bindings_for_present_handlers_only() {
        let view = ClassView::new("article").get(ok).post(ok);
        let bindings = Arc::new(view).get_bindings();
        let methods = bindings.iter().map(Binding::method).collect::<Vec<_>>();
        assert_eq!(methods, [Method::Get, Method::Post]);
        for binding in &bindings {
            assert_eq!(binding.name(), "article");
            assert_eq!(binding.content_type(), None);
        }
    }

    #[test]
    fn test_all_candidate_methods() {
        let view = ClassView::new("article")
            .get(ok)
            .head(ok)
            .post(ok)
            .put(ok)
            .delete(ok);
        assert!(ClassView::METHODS.iter().all(|&method| view.has(method)));
        assert_eq!(Arc::new(view).get_bindings().len(), 5);
    }

    #[test]
    fn test_no_handlers_no_bindings() {
        let view = ClassView::new("empty");
        assert!(Arc::new(view).get_bindings().is_empty());
    }

    #[test]
    fn test_handlers_share_state() {
        let counter = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&counter);
        let view = ClassView::new("counter")
            .post(move |_: &dyn Environment, _: &Request, _: &Params| {
                hits.fetch_add(1, Ordering::SeqCst);
                Response::new()
            })
            .get(ok);

        let env = Templates::new();
        for binding in Arc::new(view).get_bindings() {
            let reply = binding.call(&env, &Request::new(), &Params::new());
            assert!(matches!(reply, Ok(Reply::Response(_))));
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
