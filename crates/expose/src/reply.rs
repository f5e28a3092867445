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

//! Reply.

use expose_http::Response;
use minijinja::Value;
use serde::Serialize;

use super::error::{Error, Result};

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Reply of an action.
///
/// Actions either answer with a formed [`Response`], which every view passes
/// through unchanged, or with a plain value, which is left to the view to turn
/// into a response, e.g., by rendering a template or encoding it as JSON.
#[derive(Clone, Debug)]
pub enum Reply {
    /// Formed response.
    Response(Response),
    /// Plain value.
    Value(Value),
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Reply {
    /// Creates a reply from a serializable value.
    ///
    /// Conversion is infallible, as values that fail to serialize are kept as
    /// invalid values. Template views fail when rendering them, and JSON views
    /// refuse to encode them, returning [`Error::Json`] instead of `null`.
    ///
    /// # Examples
    ///
    /// ```
    /// use expose::Reply;
    ///
    /// // Create reply from value
    /// let reply = Reply::value([1, 2, 3]);
    /// assert!(!reply.is_response());
    /// ```
    pub fn value<T>(value: T) -> Self
    where
        T: Serialize,
    {
        Reply::Value(Value::from_serialize(value))
    }

    /// Returns whether the reply is a formed response.
    #[inline]
    #[must_use]
    pub fn is_response(&self) -> bool {
        matches!(self, Reply::Response(_))
    }

    /// Returns the formed response, if any.
    #[must_use]
    pub fn into_response(self) -> Option<Response> {
        match self {
            Reply::Response(res) => Some(res),
            Reply::Value(_) => None,
        }
    }
}

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Conversion into a reply.
///
/// This trait is implemented for all types that actions may return, which
/// includes fallible results, so errors can be propagated with `?`.
pub trait IntoReply {
    /// Converts into a reply.
    fn into_reply(self) -> Result<Reply>;
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl From<Response> for Reply {
    #[inline]
    fn from(res: Response) -> Self {
        Reply::Response(res)
    }
}

impl From<Value> for Reply {
    #[inline]
    fn from(value: Value) -> Self {
        Reply::Value(value)
    }
}

// ----------------------------------------------------------------------------

impl IntoReply for Reply {
    #[inline]
    fn into_reply(self) -> Result<Reply> {
        Ok(self)
    }
}

impl IntoReply for Response {
    #[inline]
    fn into_reply(self) -> Result<Reply> {
        Ok(Reply::Response(self))
    }
}

impl IntoReply for Value {
    #[inline]
    fn into_reply(self) -> Result<Reply> {
        Ok(Reply::Value(self))
    }
}

impl<T, E> IntoReply for std::result::Result<T, E>
where
    T: IntoReply,
    E: Into<Error>,
{
    #[inline]
    fn into_reply(self) -> Result<Reply> {
        self.map_err(Into::into).and_then(IntoReply::into_reply)
    }
}
