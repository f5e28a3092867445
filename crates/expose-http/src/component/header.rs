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

//! HTTP header.

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// HTTP header.
///
/// The headers that take part in binding resolution and response creation.
/// Unknown headers can't be represented, which keeps lookups type-safe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Header {
    /// Accept header
    Accept,
    /// Allow header
    Allow,
    /// Content-Length header
    ContentLength,
    /// Content-Type header
    ContentType,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Header {
    /// Returns the header name.
    ///
    /// # Examples
    ///
    /// ```
    /// use expose_http::Header;
    ///
    /// // Obtain header name
    /// assert_eq!(Header::ContentType.name(), "Content-Type");
    /// ```
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Header::Accept => "Accept",
            Header::Allow => "Allow",
            Header::ContentLength => "Content-Length",
            Header::ContentType => "Content-Type",
        }
    }
}
