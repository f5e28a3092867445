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

//! Bind named views to HTTP methods and content types.
//!
//! A view adapts a plain function into one or more [`Binding`]s, one for each
//! HTTP method it answers, which are registered with a [`Dispatcher`]. Views
//! can post-process their action's result: a [`TemplateView`] renders plain
//! values through a template obtained from the [`Environment`], a [`JsonView`]
//! encodes them as JSON. Results that are already a formed [`Response`] are
//! always passed through unchanged.
//!
//! The [`expose`], [`expose_html`] and [`expose_json`] decorators combine view
//! construction and registration, handing back the decorated function.
//!
//! [`Response`]: expose_http::Response
//!
//! # Examples
//!
//! ```
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! use expose::http::{Header, Request};
//! use expose::{expose_json, Dispatcher, Environment, Params, Reply};
//! use expose::Templates;
//!
//! fn articles(_: &dyn Environment, _: &Request, _: &Params) -> Reply {
//!     Reply::value(["hello", "world"])
//! }
//!
//! // Create dispatcher and expose function
//! let mut dispatcher = Dispatcher::new();
//! expose_json(&mut dispatcher, "articles").decorate(articles)?;
//!
//! // Dispatch request by name
//! let env = Templates::new();
//! let req = Request::new().header(Header::Accept, "text/json");
//! let res = dispatcher
//!     .dispatch(&env, &req, "articles", &Params::new())?
//!     .into_response()
//!     .expect("json views always respond");
//! assert_eq!(res.body, br#"["hello","world"]"#);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]

mod action;
mod binding;
mod decorator;
pub mod dispatcher;
pub mod env;
mod error;
mod reply;
pub mod view;

pub use action::{Action, Params};
pub use binding::{Binding, BindingFactory};
pub use decorator::{expose, expose_html, expose_json, Expose, ExposeJson};
pub use dispatcher::Dispatcher;
pub use env::{Environment, Renderer, Templates};
pub use error::{Error, Result};
pub use reply::{IntoReply, Reply};
pub use view::{ClassView, JsonView, Template, TemplateView, View};

// Re-export toolkit, so views can be written against a single crate
pub use expose_http as http;
