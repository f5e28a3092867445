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

//! JSON view.

use expose_http::{Method, Request, Response, ResponseExt};
use minijinja::value::{Value, ValueKind};
use serde::ser::Error as _;
use std::sync::Arc;

use crate::action::{Action, Params};
use crate::binding::{Binding, BindingFactory};
use crate::env::Environment;
use crate::error::Result;
use crate::reply::Reply;

use super::View;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Content type of JSON views.
pub const JSON: &str = "text/json";

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// JSON view.
///
/// Like [`View`], but if the reply of the action isn't a formed response, the
/// value is encoded as JSON. The content type is always `text/json`.
#[derive(Debug)]
pub struct JsonView<A> {
    /// Wrapped view.
    view: View<A>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<A> JsonView<A>
where
    A: Action,
{
    /// Creates a JSON view answering `GET`.
    pub fn new<N>(name: N, action: A) -> Self
    where
        N: Into<String>,
    {
        Self {
            view: View::new(name, action).content_type(JSON),
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

impl<A> Action for JsonView<A>
where
    A: Action,
{
    /// Invokes the action and encodes its value, if necessary.
    ///
    /// # Errors
    ///
    /// Errors of the action are propagated unmodified. If the value can't be
    /// encoded, [`Error::Json`][] is returned.
    ///
    /// [`Error::Json`]: crate::Error::Json
    fn call(
        &self, env: &dyn Environment, req: &Request, params: &Params,
    ) -> Result<Reply> {
        match self.view.call(env, req, params)? {
            Reply::Response(res) => Ok(Reply::Response(res)),
            Reply::Value(value) => {
                let body = encode(&value)?;
                Ok(Reply::Response(Response::from_body(body, JSON)))
            }
        }
    }
}

impl<A> BindingFactory for JsonView<A>
where
    A: Action,
{
    fn get_bindings(self: Arc<Self>) -> Vec<Binding> {
        let action: Arc<dyn Action> = self.clone();
        self.view.bind(&action)
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Encodes a value as JSON.
///
/// MiniJinja serializes invalid values as `null`, so the value tree is checked
/// for values that failed to serialize before encoding.
fn encode(value: &Value) -> Result<String> {
    match find_invalid(value) {
        Some(invalid) => {
            Err(serde_json::Error::custom(invalid.to_string()).into())
        }
        None => serde_json::to_string(value).map_err(Into::into),
    }
}

/// Returns the first invalid value in the given value tree, if any.
fn find_invalid(value: &Value) -> Option<Value> {
    match value.kind() {
        ValueKind::Invalid => Some(value.clone()),
        ValueKind::Seq => value
            .try_iter()
            .ok()?
            .find_map(|item| find_invalid(&item)),
        ValueKind::Map => value.try_iter().ok()?.find_map(|key| {
            let item = value.get_item(&key).ok()?;
            find_invalid(&item)
        }),
        _ => None,
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use expose_http::Status;
    use serde::ser::{Error as _, Serializer};
    use serde::Serialize;
    use std::collections::BTreeMap;

    use super::*;
    use crate::{Error, Templates};

    /// Value that refuses to be serialized.
    struct Opaque;

    impl Serialize for Opaque {
        fn serialize<S>(&self, _: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            Err(S::Error::custom("opaque values can't be serialized"))
        }
    }

    fn invoke<A>(view: &JsonView<A>) -> Result<Response>
    where
        A: Action,
    {
        let env = Templates::new();
        view.call(&env, &Request::new(), &Params::new())
            .map(|reply| reply.into_response().expect("response"))
    }

    fn opaque(_: &dyn Environment, _: &Request, _: &Params) -> Reply {
        Reply::value(Opaque)
    }

    #[test]
    fn test_encodes_values() {
        let input = serde_json::json!({ "title": "Hello" });
        let expected = serde_json::to_vec(&input).expect("encode");
        let view = JsonView::new(
            "article",
            move |_: &dyn Environment, _: &Request, _: &Params| {
                Reply::value(&input)
            },
        );
        let res = invoke(&view).expect("response");
        assert_eq!(res.status, Status::Ok);
        assert_eq!(res.content_type(), Some(JSON));
        assert_eq!(res.body, expected);
    }

    #[test]
    fn test_responses_are_passed_through() {
        let view = JsonView::new(
            "raw",
            |_: &dyn Environment, _: &Request, _: &Params| {
                Response::from_text("not json")
            },
        );
        let res = invoke(&view).expect("response");
        assert_eq!(res.body, b"not json");
        assert_ne!(res.content_type(), Some(JSON));
    }

    #[test]
    fn test_unserializable_values_fail() {
        let view = JsonView::new("opaque", opaque);
        match invoke(&view) {
            Err(Error::Json(err)) => {
                assert!(err.to_string().contains("opaque values"));
            }
            res => panic!("expected JSON error, got {res:?}"),
        }
    }

    #[test]
    fn test_nested_unserializable_values_fail() {
        let view = JsonView::new(
            "nested",
            |_: &dyn Environment, _: &Request, _: &Params| {
                let items = vec![Value::from(1), Value::from_serialize(Opaque)];
                let mut page = BTreeMap::new();
                page.insert("items", Value::from(items));
                Value::from(page)
            },
        );
        assert!(matches!(invoke(&view), Err(Error::Json(_))));
    }

    #[test]
    fn test_bindings_carry_json_content_type() {
        let view = JsonView::new(
            "article",
            |_: &dyn Environment, _: &Request, _: &Params| Reply::value(()),
        )
        .methods([Method::Get, Method::Put]);
        let bindings = Arc::new(view).get_bindings();
        assert_eq!(bindings.len(), 2);
        assert!(bindings.iter().all(|b| b.content_type() == Some(JSON)));
    }
}
