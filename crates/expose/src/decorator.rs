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

//! Decorators.

use expose_http::Method;
use std::collections::BTreeSet;

use super::action::Action;
use super::dispatcher::Dispatcher;
use super::error::Result;
use super::view::{JsonView, Template, TemplateView};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Decorator exposing a function as a [`TemplateView`].
///
/// Created by [`expose`] and [`expose_html`]. The options mirror those of
/// [`TemplateView`], and are applied when decorating.
#[derive(Debug)]
#[must_use = "decorators do nothing unless `decorate` is called"]
pub struct Expose<'a> {
    /// Dispatcher to register with.
    dispatcher: &'a mut Dispatcher,
    /// View name.
    name: String,
    /// Methods to bind, if not the default.
    methods: Option<BTreeSet<Method>>,
    /// Template to render values with.
    template: Option<Template>,
    /// Content type to bind.
    content_type: Option<String>,
}

/// Decorator exposing a function as a [`JsonView`].
///
/// Created by [`expose_json`].
#[derive(Debug)]
#[must_use = "decorators do nothing unless `decorate` is called"]
pub struct ExposeJson<'a> {
    /// Dispatcher to register with.
    dispatcher: &'a mut Dispatcher,
    /// View name.
    name: String,
    /// Methods to bind, if not the default.
    methods: Option<BTreeSet<Method>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Expose<'_> {
    /// Replaces the methods the view answers.
    pub fn methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.methods = Some(methods.into_iter().collect());
        self
    }

    /// Sets the template to render values with.
    pub fn template<T>(mut self, template: T) -> Self
    where
        T: Into<Template>,
    {
        self.template = Some(template.into());
        self
    }

    /// Sets the content type the view produces.
    pub fn content_type<C>(mut self, content_type: C) -> Self
    where
        C: Into<String>,
    {
        self.content_type = Some(content_type.into());
        self
    }

    /// Exposes the given function, and returns it unmodified.
    ///
    /// # Errors
    ///
    /// Registration errors of the [`Dispatcher`] are returned.
    pub fn decorate<A>(self, action: A) -> Result<A>
    where
        A: Action + Clone,
    {
        let mut view = TemplateView::new(self.name, action.clone());
        if let Some(methods) = self.methods {
            view = view.methods(methods);
        }
        if let Some(template) = self.template {
            view = view.template(template);
        }
        if let Some(content_type) = self.content_type {
            view = view.content_type(content_type);
        }

        // Register view, and hand back the function
        self.dispatcher.add(view)?;
        Ok(action)
    }
}

impl ExposeJson<'_> {
    /// Replaces the methods the view answers.
    pub fn methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.methods = Some(methods.into_iter().collect());
        self
    }

    /// Exposes the given function, and returns it unmodified.
    ///
    /// # Errors
    ///
    /// Registration errors of the [`Dispatcher`] are returned.
    pub fn decorate<A>(self, action: A) -> Result<A>
    where
        A: Action + Clone,
    {
        let mut view = JsonView::new(self.name, action.clone());
        if let Some(methods) = self.methods {
            view = view.methods(methods);
        }

        // Register view, and hand back the function
        self.dispatcher.add(view)?;
        Ok(action)
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Creates a decorator exposing a function as a [`TemplateView`].
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use expose::http::{Method, Request};
/// use expose::{expose, Dispatcher, Environment, Params, Reply};
///
/// fn article(_: &dyn Environment, _: &Request, _: &Params) -> Reply {
///     Reply::value("Hello")
/// }
///
/// // Create dispatcher and expose function
/// let mut dispatcher = Dispatcher::new();
/// let article = expose(&mut dispatcher, "article")
///     .methods([Method::Get, Method::Post])
///     .template("article.html")
///     .decorate(article)?;
///
/// assert_eq!(dispatcher.len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn expose<N>(dispatcher: &mut Dispatcher, name: N) -> Expose<'_>
where
    N: Into<String>,
{
    Expose {
        dispatcher,
        name: name.into(),
        methods: None,
        template: None,
        content_type: None,
    }
}

/// Creates a decorator exposing a function as an HTML [`TemplateView`].
///
/// Equivalent to [`expose`] with content type `text/html`, which can still be
/// overridden with [`Expose::content_type`].
pub fn expose_html<N>(dispatcher: &mut Dispatcher, name: N) -> Expose<'_>
where
    N: Into<String>,
{
    expose(dispatcher, name).content_type("text/html")
}

/// Creates a decorator exposing a function as a [`JsonView`].
pub fn expose_json<N>(dispatcher: &mut Dispatcher, name: N) -> ExposeJson<'_>
where
    N: Into<String>,
{
    ExposeJson {
        dispatcher,
        name: name.into(),
        methods: None,
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use expose_http::{Request, Response, ResponseExt, Status};
    use std::collections::BTreeMap;

    use super::*;
    use crate::{Environment, Params, Reply, Templates};

    fn created(_: &dyn Environment, _: &Request, _: &Params) -> Response {
        Response::from_status(Status::NoContent)
    }

    fn stats(_: &dyn Environment, _: &Request, _: &Params) -> Reply {
        Reply::value(BTreeMap::from([("visits", 7)]))
    }

    #[test]
    fn test_expose_passes_responses_through() {
        let mut dispatcher = Dispatcher::new();
        let f = expose(&mut dispatcher, "created")
            .decorate(created)
            .expect("exposed");

        let env = Templates::new();
        let req = Request::new();
        let reply = dispatcher
            .dispatch(&env, &req, "created", &Params::new())
            .ok()
            .and_then(Reply::into_response)
            .expect("response");

        // The decorated function is still usable directly
        let direct = f(&env, &req, &Params::new());
        assert_eq!(reply, direct);
    }

    #[test]
    fn test_expose_html_defaults_content_type() {
        let mut dispatcher = Dispatcher::new();
        expose_html(&mut dispatcher, "page")
            .decorate(created)
            .expect("exposed");
        let binding = dispatcher
            .lookup("page", Method::Get, None)
            .expect("binding");
        assert_eq!(binding.content_type(), Some("text/html"));
    }

    #[test]
    fn test_expose_html_content_type_can_be_overridden() {
        let mut dispatcher = Dispatcher::new();
        expose_html(&mut dispatcher, "page")
            .content_type("application/xhtml+xml")
            .decorate(created)
            .expect("exposed");
        let binding = dispatcher.lookup("page", Method::Get, None);
        assert_eq!(
            binding.ok().and_then(|b| b.content_type()),
            Some("application/xhtml+xml")
        );
    }

    #[test]
    fn test_expose_renders_template() {
        let mut dispatcher = Dispatcher::new();
        expose_html(&mut dispatcher, "stats")
            .template("stats.html")
            .decorate(stats)
            .expect("exposed");

        let mut env = Templates::new();
        env.add_template("stats.html", "<p>{{ visits }} visits</p>")
            .expect("template");
        let res = dispatcher
            .dispatch(&env, &Request::new(), "stats", &Params::new())
            .ok()
            .and_then(Reply::into_response)
            .expect("response");
        assert_eq!(res.body, b"<p>7 visits</p>");
        assert_eq!(res.content_type(), Some("text/html"));
    }

    #[test]
    fn test_expose_json_encodes_values() {
        let mut dispatcher = Dispatcher::new();
        expose_json(&mut dispatcher, "stats")
            .methods([Method::Get, Method::Post])
            .decorate(stats)
            .expect("exposed");
        assert_eq!(dispatcher.len(), 2);

        let env = Templates::new();
        let req = Request::new().method(Method::Post);
        let res = dispatcher
            .dispatch(&env, &req, "stats", &Params::new())
            .ok()
            .and_then(Reply::into_response)
            .expect("response");
        assert_eq!(res.content_type(), Some("text/json"));
        assert_eq!(res.body, br#"{"visits":7}"#);
    }

    #[test]
    fn test_exposing_twice_fails() {
        let mut dispatcher = Dispatcher::new();
        expose_json(&mut dispatcher, "stats")
            .decorate(stats)
            .expect("exposed");
        let err = expose_json(&mut dispatcher, "stats").decorate(stats);
        assert!(err.is_err());
    }
}
