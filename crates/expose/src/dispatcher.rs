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

//! Dispatcher.

use expose_http::{Method, Request};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::action::Params;
use super::binding::{Binding, BindingFactory};
use super::env::Environment;
use super::error::{Error, Result};
use super::reply::Reply;

mod accept;

use accept::Accept;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Dispatcher.
///
/// The dispatcher is a registry of bindings, which are grouped by name and
/// method, and resolves a name, method and `Accept` header to a binding. It
/// doesn't know anything about paths, as matching requests to names is left
/// to the caller. Registration happens through `&mut self`, so once built,
/// the dispatcher can be shared and used concurrently.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use expose::http::{Method, Request, Response, ResponseExt};
/// use expose::{Dispatcher, Environment, Params, View};
///
/// fn index(_: &dyn Environment, _: &Request, _: &Params) -> Response {
///     Response::from_text("Welcome")
/// }
///
/// // Create dispatcher and add view
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.add(View::new("index", index))?;
///
/// // Resolve binding
/// let binding = dispatcher.lookup("index", Method::Get, None)?;
/// assert_eq!(binding.name(), "index");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Dispatcher {
    /// Map names to methods to bindings, in order of registration.
    bindings: BTreeMap<String, BTreeMap<Method, Vec<Binding>>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Dispatcher {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds all bindings of the given factory.
    ///
    /// Either all bindings are added, or none of them.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Duplicate`], if a binding with the same
    /// name, method and content type is already registered.
    pub fn add<F>(&mut self, factory: F) -> Result
    where
        F: BindingFactory,
    {
        let bindings = Arc::new(factory).get_bindings();

        // Check all bindings before registering any of them, which includes
        // checking them against each other
        for (index, binding) in bindings.iter().enumerate() {
            let duplicate = self
                .bindings_for(binding.name(), binding.method())
                .iter()
                .chain(&bindings[..index])
                .any(|other| conflicts(binding, other));
            if duplicate {
                return Err(Error::Duplicate {
                    name: binding.name().to_string(),
                    method: binding.method(),
                    content_type: binding.content_type().map(String::from),
                });
            }
        }

        // Register bindings
        for binding in bindings {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                name = binding.name(),
                method = %binding.method(),
                content_type = binding.content_type(),
                "registered binding"
            );
            self.bindings
                .entry(binding.name().to_string())
                .or_default()
                .entry(binding.method())
                .or_default()
                .push(binding);
        }
        Ok(())
    }

    /// Resolves a binding.
    ///
    /// Requests for `HEAD` are answered by `GET` bindings, unless there are
    /// dedicated `HEAD` bindings. If several bindings exist for the method,
    /// the one with the highest quality weight in the `Accept` header wins,
    /// where ties are broken by registration order.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::NotFound`] for unknown names,
    /// [`Error::MethodNotAllowed`] if the name isn't bound to the method, and
    /// [`Error::NotAcceptable`] if no binding is acceptable.
    pub fn lookup(
        &self, name: &str, method: Method, accept: Option<&str>,
    ) -> Result<&Binding> {
        let methods = self
            .bindings
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        // Resolve candidates for the method, falling back to GET for HEAD
        let candidates = match methods.get(&method) {
            Some(candidates) => candidates,
            None if method == Method::Head => {
                methods.get(&Method::Get).ok_or_else(|| {
                    not_allowed(name, method, methods)
                })?
            }
            None => return Err(not_allowed(name, method, methods)),
        };

        // Negotiate content type, keeping the first of equally good bindings
        let accept = Accept::parse(accept);
        let mut best: Option<(f32, &Binding)> = None;
        for binding in candidates {
            let quality = accept.quality(binding.content_type());
            if quality > best.map_or(0.0, |(q, _)| q) {
                best = Some((quality, binding));
            }
        }

        // Return best binding, if any
        let (_, binding) =
            best.ok_or_else(|| Error::NotAcceptable(name.to_string()))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            name,
            method = %method,
            bound = %binding.method(),
            content_type = binding.content_type(),
            "resolved binding"
        );
        Ok(binding)
    }

    /// Dispatches a request to the binding with the given name.
    ///
    /// The binding is resolved from the request's method and `Accept` header,
    /// and invoked with the environment, request and parameters.
    ///
    /// # Errors
    ///
    /// Errors from resolving the binding are returned as by
    /// [`Dispatcher::lookup`], errors from the invoked action unmodified.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "debug",
            skip(self, env, req, params),
            fields(method = %req.method)
        )
    )]
    pub fn dispatch(
        &self, env: &dyn Environment, req: &Request, name: &str,
        params: &Params,
    ) -> Result<Reply> {
        let binding = self.lookup(name, req.method, req.accept())?;
        binding.call(env, req, params)
    }

    /// Returns the methods a name is bound to.
    ///
    /// `HEAD` is included whenever `GET` is bound, as it's answered by `GET`
    /// bindings. Unknown names are bound to no methods.
    #[must_use]
    pub fn allowed(&self, name: &str) -> Vec<Method> {
        self.bindings
            .get(name)
            .map(allowed_methods)
            .unwrap_or_default()
    }

    /// Returns an iterator over all bound names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Returns an iterator over all bindings of a name.
    pub fn bindings(&self, name: &str) -> impl Iterator<Item = &Binding> {
        self.bindings
            .get(name)
            .into_iter()
            .flat_map(BTreeMap::values)
            .flatten()
    }

    /// Returns the total number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Returns whether there are no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns the bindings registered for a name and method.
    fn bindings_for(&self, name: &str, method: Method) -> &[Binding] {
        self.bindings
            .get(name)
            .and_then(|methods| methods.get(&method))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns whether two bindings can't be told apart.
fn conflicts(a: &Binding, b: &Binding) -> bool {
    a.name() == b.name()
        && a.method() == b.method()
        && a.content_type() == b.content_type()
}

/// Returns the allowed methods, including `HEAD` if `GET` is bound.
fn allowed_methods(methods: &BTreeMap<Method, Vec<Binding>>) -> Vec<Method> {
    let mut allowed = methods.keys().copied().collect::<Vec<_>>();
    let has = |method: Method| methods.contains_key(&method);
    if has(Method::Get) && !has(Method::Head) {
        allowed.push(Method::Head);
        allowed.sort();
    }
    allowed
}

/// Creates a method not allowed error.
fn not_allowed(
    name: &str, method: Method, methods: &BTreeMap<Method, Vec<Binding>>,
) -> Error {
    Error::MethodNotAllowed {
        name: name.to_string(),
        method,
        allowed: allowed_methods(methods),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use expose_http::{Header, Response, ResponseExt, Status};

    use super::*;
    use crate::{ClassView, JsonView, Templates, TemplateView, View};

    fn page(_: &dyn Environment, _: &Request, _: &Params) -> Reply {
        Reply::value(BTreeMap::from([("title", "Hello")]))
    }

    fn ok(_: &dyn Environment, _: &Request, _: &Params) -> Response {
        Response::from_text("ok")
    }

    fn setup() -> (Dispatcher, Templates) {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let mut env = Templates::new();
        env.add_template("page.html", "<h1>{{ title }}</h1>")
            .expect("template");

        // Bind the same name as HTML and JSON
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .add(
                TemplateView::new("page", page)
                    .methods([Method::Get, Method::Post])
                    .template("page.html")
                    .content_type("text/html"),
            )
            .expect("html view");
        dispatcher
            .add(JsonView::new("page", page))
            .expect("json view");
        (dispatcher, env)
    }

    fn unpack(reply: Result<Reply>) -> (Option<String>, Vec<u8>) {
        let res = reply
            .ok()
            .and_then(Reply::into_response)
            .expect("response");
        (res.content_type().map(String::from), res.body)
    }

    #[test]
    fn test_negotiates_content_type() {
        let (dispatcher, env) = setup();
        let test_cases = [
            (None, "text/html", "<h1>Hello</h1>"),
            (Some("text/json"), "text/json", r#"{"title":"Hello"}"#),
            (
                Some("text/html;q=0.5, text/json"),
                "text/json",
                r#"{"title":"Hello"}"#,
            ),
            (Some("text/*"), "text/html", "<h1>Hello</h1>"),
        ];
        for (accept, expected_type, expected_body) in test_cases {
            let mut req = Request::new();
            if let Some(accept) = accept {
                req = req.header(Header::Accept, accept);
            }
            let reply =
                dispatcher.dispatch(&env, &req, "page", &Params::new());
            let (content_type, body) = unpack(reply);
            assert_eq!(
                content_type.as_deref(),
                Some(expected_type),
                "Failed for {accept:?}"
            );
            assert_eq!(
                body,
                expected_body.as_bytes(),
                "Failed for {accept:?}"
            );
        }
    }

    #[test]
    fn test_not_acceptable() {
        let (dispatcher, env) = setup();
        let req = Request::new().header(Header::Accept, "image/png");
        let err = dispatcher.dispatch(&env, &req, "page", &Params::new());
        assert!(matches!(
            err,
            Err(Error::NotAcceptable(name)) if name == "page"
        ));
    }

    #[test]
    fn test_head_falls_back_to_get() {
        let (dispatcher, _) = setup();
        let binding = dispatcher
            .lookup("page", Method::Head, Some("text/json"))
            .expect("binding");
        assert_eq!(binding.method(), Method::Get);
        assert_eq!(binding.content_type(), Some("text/json"));
    }

    #[test]
    fn test_method_not_allowed() {
        let (dispatcher, env) = setup();
        let req = Request::new().method(Method::Delete);
        match dispatcher.dispatch(&env, &req, "page", &Params::new()) {
            Err(err @ Error::MethodNotAllowed { .. }) => {
                let res = Response::from(err);
                assert_eq!(res.status, Status::MethodNotAllowed);
                assert_eq!(
                    res.headers.get(Header::Allow),
                    Some("GET, HEAD, POST")
                );
            }
            other => panic!("unexpected result: {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_not_found() {
        let (dispatcher, env) = setup();
        let req = Request::new();
        let err = dispatcher.dispatch(&env, &req, "nope", &Params::new());
        assert!(matches!(err, Err(Error::NotFound(name)) if name == "nope"));
        assert!(dispatcher.allowed("nope").is_empty());
    }

    #[test]
    fn test_duplicates_are_rejected_atomically() {
        let (mut dispatcher, _) = setup();
        assert_eq!(dispatcher.len(), 3);

        // The POST binding is new, but GET conflicts, so neither is added
        let view = TemplateView::new("page", page)
            .methods([Method::Get, Method::Put])
            .content_type("text/html");
        let err = dispatcher.add(view);
        assert!(matches!(
            err,
            Err(Error::Duplicate { method: Method::Get, .. })
        ));
        assert_eq!(dispatcher.len(), 3);
        assert_eq!(
            dispatcher.allowed("page"),
            [Method::Get, Method::Head, Method::Post]
        );
    }

    #[test]
    fn test_introspection() {
        let mut dispatcher = Dispatcher::new();
        assert!(dispatcher.is_empty());
        dispatcher
            .add(ClassView::new("article").get(ok).delete(ok))
            .expect("class view");
        dispatcher.add(View::new("index", ok)).expect("view");

        let names = dispatcher.names().collect::<Vec<_>>();
        assert_eq!(names, ["article", "index"]);
        assert_eq!(dispatcher.bindings("article").count(), 2);
        assert_eq!(
            dispatcher.allowed("article"),
            [Method::Get, Method::Head, Method::Delete]
        );
        assert_eq!(dispatcher.len(), 3);
    }

    #[test]
    fn test_dispatch_passes_params() {
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .add(View::new(
                "echo",
                |_: &dyn Environment, _: &Request, params: &Params| {
                    Response::from_text(params.get("id").unwrap_or_default())
                },
            ))
            .expect("view");

        let env = Templates::new();
        let params = Params::new().kwarg("id", "42");
        let req = Request::new();
        let reply = dispatcher.dispatch(&env, &req, "echo", &params);
        assert_eq!(unpack(reply).1, b"42");
    }

    #[test]
    fn test_dispatch_passes_request_body() {
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .add(ClassView::new("comments").get(ok).post(
                |_: &dyn Environment, req: &Request, _: &Params| {
                    Response::from_body(req.body.clone(), "text/plain")
                },
            ))
            .expect("class view");

        let env = Templates::new();
        let req = Request::new().method(Method::Post).body("First!");
        let reply = dispatcher.dispatch(&env, &req, "comments", &Params::new());
        assert_eq!(unpack(reply).1, b"First!");
    }
}
