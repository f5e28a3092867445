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

//! HTTP response constructors.

use crate::{Header, Status};

use super::Response;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Content type of plain text responses.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Extension trait for the `Response` type providing additional functionality.
pub trait ResponseExt: Sized {
    /// Creates a `200 OK` response from a body and content type.
    ///
    /// # Examples
    ///
    /// ```
    /// use expose_http::{Response, ResponseExt};
    ///
    /// // Create response from body
    /// let res = Response::from_body("[1, 2]", "text/json");
    /// assert_eq!(res.content_type(), Some("text/json"));
    /// ```
    fn from_body<B, C>(body: B, content_type: C) -> Response
    where
        B: Into<Vec<u8>>,
        C: ToString,
    {
        let body = body.into();
        Response::new()
            .status(Status::Ok)
            .header(Header::ContentType, content_type)
            .header(Header::ContentLength, body.len())
            .body(body)
    }

    /// Creates a `200 OK` response from plain text.
    fn from_text<S>(content: S) -> Response
    where
        S: Into<String>,
    {
        Response::from_body(content.into(), TEXT_PLAIN)
    }

    /// Creates a response from a status code.
    ///
    /// The reason phrase is used as the text body, which is handy when
    /// answering errors.
    #[must_use]
    fn from_status(status: Status) -> Response {
        Response::from_text(status.name()).status(status)
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl ResponseExt for Response {}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_sets_content_headers() {
        let res = Response::from_body("{}", "text/json");
        assert_eq!(res.status, Status::Ok);
        assert_eq!(res.headers.get(Header::ContentType), Some("text/json"));
        assert_eq!(res.headers.get(Header::ContentLength), Some("2"));
        assert_eq!(res.body, b"{}");
    }

    #[test]
    fn test_from_status_uses_reason_phrase() {
        let res = Response::from_status(Status::MethodNotAllowed);
        assert_eq!(res.status, Status::MethodNotAllowed);
        assert_eq!(res.content_type(), Some(TEXT_PLAIN));
        assert_eq!(res.body, b"Method Not Allowed");
    }
}
