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

//! Template view.

use expose_http::response::TEXT_PLAIN;
use expose_http::{Method, Request, Response, ResponseExt};
use minijinja::Value;
use std::fmt;
use std::sync::Arc;

use crate::action::{Action, Params};
use crate::binding::{Binding, BindingFactory};
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::reply::Reply;

use super::View;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Template.
///
/// Either the name of a template that is looked up in the [`Environment`] at
/// render time, or a transform that renders the value directly.
#[derive(Clone)]
pub enum Template {
    /// Template name.
    Name(String),
    /// Template transform.
    Transform(Arc<dyn Fn(Value) -> Result<String> + Send + Sync>),
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Template view.
///
/// Like [`View`], but if the reply of the action isn't a formed response, the
/// value is rendered with the configured [`Template`], and the output wrapped
/// in a response, using the view's content type if set, or plain text.
///
/// Rendered responses carry the view's content type, so views registered with
/// [`expose_html`][] answer with `text/html` unless overridden.
///
/// [`expose_html`]: crate::expose_html
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use expose::http::Request;
/// use expose::{Action, Environment, Params, Reply, TemplateView, Templates};
///
/// fn hello(_: &dyn Environment, _: &Request, _: &Params) -> Reply {
///     Reply::value("world")
/// }
///
/// // Create environment and view
/// let mut env = Templates::new();
/// env.add_template("hello.html", "<h1>Hello, {{ value }}!</h1>")?;
/// let view = TemplateView::new("hello", hello)
///     .template("hello.html")
///     .content_type("text/html");
///
/// // Invoke view
/// let reply = view.call(&env, &Request::new(), &Params::new())?;
/// let res = reply.into_response().expect("rendered");
/// assert_eq!(res.body, b"<h1>Hello, world!</h1>");
/// assert_eq!(res.content_type(), Some("text/html"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TemplateView<A> {
    /// Wrapped view.
    view: View<A>,
    /// Template to render values with.
    template: Option<Template>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Template {
    /// Creates a template from a transform.
    pub fn transform<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<String> + Send + Sync + 'static,
    {
        Template::Transform(Arc::new(f))
    }

    /// Renders the given value.
    pub fn render(
        &self, env: &dyn Environment, value: Value,
    ) -> Result<String> {
        match self {
            Template::Name(name) => {
                let render = env.get_renderer(name)?;
                render(value)
            }
            Template::Transform(f) => f(value),
        }
    }
}

impl<A> TemplateView<A>
where
    A: Action,
{
    /// Creates a template view answering `GET`, without a template.
    pub fn new<N>(name: N, action: A) -> Self
    where
        N: Into<String>,
    {
        Self {
            view: View::new(name, action),
            template: None,
        }
    }

    /// Replaces the methods the view answers.
    #[must_use]
    pub fn methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.view = self.view.methods(methods);
        self
    }

    /// Sets the content type the view produces.
    #[must_use]
    pub fn content_type<C>(mut self, content_type: C) -> Self
    where
        C: Into<String>,
    {
        self.view = self.view.content_type(content_type);
        self
    }

    /// Sets the template to render values with.
    #[must_use]
    pub fn template<T>(mut self, template: T) -> Self
    where
        T: Into<Template>,
    {
        self.template = Some(template.into());
        self
    }

    /// Returns the view name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.view.name()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<A> Action for TemplateView<A>
where
    A: Action,
{
    /// Invokes the action and renders its value, if necessary.
    ///
    /// # Errors
    ///
    /// Errors of the action and the renderer are propagated unmodified. If the
    /// action replies with a value, but no template is configured, this method
    /// returns [`Error::MissingTemplate`].
    fn call(
        &self, env: &dyn Environment, req: &Request, params: &Params,
    ) -> Result<Reply> {
        let value = match self.view.call(env, req, params)? {
            Reply::Response(res) => return Ok(Reply::Response(res)),
            Reply::Value(value) => value,
        };

        // Render the value, and wrap the output in a response
        let template = self
            .template
            .as_ref()
            .ok_or_else(|| Error::MissingTemplate(self.name().to_string()))?;
        let body = template.render(env, value)?;
        let content_type =
            self.view.content_type.as_deref().unwrap_or(TEXT_PLAIN);
        Ok(Reply::Response(Response::from_body(body, content_type)))
    }
}

impl<A> BindingFactory for TemplateView<A>
where
    A: Action,
{
    fn get_bindings(self: Arc<Self>) -> Vec<Binding> {
        let action: Arc<dyn Action> = self.clone();
        self.view.bind(&action)
    }
}

// ----------------------------------------------------------------------------

impl From<&str> for Template {
    #[inline]
    fn from(name: &str) -> Self {
        Template::Name(name.to_string())
    }
}

impl From<String> for Template {
    #[inline]
    fn from(name: String) -> Self {
        Template::Name(name)
    }
}

impl fmt::Debug for Template {
    /// Formats the template for debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Template::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Template::Transform(_) => f.write_str("Transform"),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use expose_http::Status;

    use super::*;
    use crate::Templates;

    fn listing(_: &dyn Environment, _: &Request, _: &Params) -> Reply {
        Reply::value(["a", "b"])
    }

    fn redirect(_: &dyn Environment, _: &Request, _: &Params) -> Response {
        Response::from_status(Status::NoContent)
    }

    #[test]
    fn test_responses_skip_rendering() {
        let env = Templates::new();
        let view = TemplateView::new("gone", redirect).template("missing.html");
        let reply = view.call(&env, &Request::new(), &Params::new());
        let res = reply.ok().and_then(Reply::into_response);
        assert_eq!(res.map(|res| res.status), Some(Status::NoContent));
    }

    #[test]
    fn test_named_template_uses_environment() {
        let mut env = Templates::new();
        env.add_template("list.txt", "{{ value | join('+') }}")
            .expect("template");
        let view = TemplateView::new("listing", listing).template("list.txt");
        let res = view
            .call(&env, &Request::new(), &Params::new())
            .ok()
            .and_then(Reply::into_response)
            .expect("response");
        assert_eq!(res.body, b"a+b");
        assert_eq!(res.content_type(), Some(TEXT_PLAIN));
    }

    #[test]
    fn test_transform_bypasses_environment() {
        let env = Templates::new();
        let view = TemplateView::new("listing", listing)
            .content_type("text/csv")
            .template(Template::transform(|value| {
                let items = value
                    .try_iter()?
                    .map(|item| item.to_string())
                    .collect::<Vec<_>>();
                Ok(items.join(","))
            }));
        let res = view
            .call(&env, &Request::new(), &Params::new())
            .ok()
            .and_then(Reply::into_response)
            .expect("response");
        assert_eq!(res.body, b"a,b");
        assert_eq!(res.content_type(), Some("text/csv"));
    }

    #[test]
    fn test_missing_template() {
        let env = Templates::new();
        let view = TemplateView::new("listing", listing);
        let err = view.call(&env, &Request::new(), &Params::new());
        assert!(matches!(
            err,
            Err(Error::MissingTemplate(name)) if name == "listing"
        ));
    }

    #[test]
    fn test_render_errors_propagate() {
        let env = Templates::new();
        let view = TemplateView::new("listing", listing).template("nope.html");
        let err = view.call(&env, &Request::new(), &Params::new());
        assert!(matches!(err, Err(Error::Template(_))));
    }

    #[test]
    fn test_bindings_invoke_template_view() {
        let env = Templates::new();
        let view = TemplateView::new("listing", listing)
            .methods([Method::Get, Method::Head])
            .template(Template::transform(|_| Ok(String::from("rendered"))));
        let bindings = Arc::new(view).get_bindings();
        assert_eq!(bindings.len(), 2);
        for binding in bindings {
            let res = binding
                .call(&env, &Request::new(), &Params::new())
                .ok()
                .and_then(Reply::into_response)
                .expect("response");
            assert_eq!(res.body, b"rendered");
        }
    }
}
