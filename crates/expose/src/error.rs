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

//! Error.

use expose_http::{Header, Method, Response, ResponseExt, Status};
use std::{error, io, result};
use thiserror::Error;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Error.
///
/// Errors raised by actions, template rendering and JSON encoding are passed
/// through unmodified, so callers see exactly what went wrong. The remaining
/// variants are raised by the [`Dispatcher`][] when resolving bindings.
///
/// [`Dispatcher`]: crate::Dispatcher
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Template error.
    #[error(transparent)]
    Template(#[from] minijinja::Error),

    /// JSON error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Action error.
    #[error(transparent)]
    Action(Box<dyn error::Error + Send + Sync>),

    /// View has no template to render values with.
    #[error("no template configured for view: {0}")]
    MissingTemplate(String),

    /// No binding with the given name.
    #[error("no view named: {0}")]
    NotFound(String),

    /// Binding exists, but not for the given method.
    #[error("method {method} not allowed for view: {name}")]
    MethodNotAllowed {
        /// View name.
        name: String,
        /// Requested method.
        method: Method,
        /// Methods the view is bound to.
        allowed: Vec<Method>,
    },

    /// Binding exists, but none matches the accepted content types.
    #[error("no acceptable representation for view: {0}")]
    NotAcceptable(String),

    /// Binding is already registered.
    #[error("duplicate binding for view: {method} {name}")]
    Duplicate {
        /// View name.
        name: String,
        /// Bound method.
        method: Method,
        /// Bound content type.
        content_type: Option<String>,
    },
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Error {
    /// Wraps an arbitrary error raised by an action.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io;
    /// use expose::Error;
    ///
    /// // Wrap error
    /// let err = Error::action(io::Error::other("database is gone"));
    /// assert_eq!(err.to_string(), "database is gone");
    /// ```
    pub fn action<E>(err: E) -> Self
    where
        E: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Error::Action(err.into())
    }

    /// Returns the HTTP status that best describes the error.
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Error::NotFound(_) => Status::NotFound,
            Error::MethodNotAllowed { .. } => Status::MethodNotAllowed,
            Error::NotAcceptable(_) => Status::NotAcceptable,
            _ => Status::InternalServerError,
        }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl From<Error> for Response {
    /// Creates a response from an error.
    ///
    /// The response carries the status returned by [`Error::status`], and for
    /// [`Error::MethodNotAllowed`], the `Allow` header listing the methods the
    /// view is bound to.
    fn from(err: Error) -> Self {
        let res = Response::from_status(err.status());
        if let Error::MethodNotAllowed { allowed, .. } = &err {
            let allowed = allowed
                .iter()
                .map(Method::name)
                .collect::<Vec<_>>()
                .join(", ");
            res.header(Header::Allow, allowed)
        } else {
            res
        }
    }
}

// ----------------------------------------------------------------------------
// Type aliases
// ----------------------------------------------------------------------------

/// Result.
pub type Result<T = ()> = result::Result<T, Error>;

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let err = Error::MethodNotAllowed {
            name: String::from("article"),
            method: Method::Put,
            allowed: vec![Method::Get, Method::Head, Method::Post],
        };
        let res = Response::from(err);
        assert_eq!(res.status, Status::MethodNotAllowed);
        assert_eq!(res.headers.get(Header::Allow), Some("GET, HEAD, POST"));
    }

    #[test]
    fn test_action_errors_are_internal() {
        let err = Error::action("boom");
        assert_eq!(err.status(), Status::InternalServerError);
        assert_eq!(err.to_string(), "boom");
    }
}
