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

//! Content negotiation.

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Media range of an `Accept` header.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaRange<'a> {
    /// Type, or `*`.
    kind: &'a str,
    /// Subtype, or `*`.
    subtype: &'a str,
    /// Quality weight between 0 and 1.
    quality: f32,
}

/// Parsed `Accept` header.
///
/// A missing or empty header accepts everything, which is equivalent to a
/// single `*/*` range. Malformed ranges are skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct Accept<'a> {
    /// Media ranges, in order of appearance.
    ranges: Vec<MediaRange<'a>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<'a> Accept<'a> {
    /// Parses an `Accept` header value.
    pub fn parse(header: Option<&'a str>) -> Self {
        let ranges = header
            .unwrap_or_default()
            .split(',')
            .filter_map(MediaRange::parse)
            .collect::<Vec<_>>();
        if ranges.is_empty() {
            Self {
                ranges: vec![MediaRange::ANY],
            }
        } else {
            Self { ranges }
        }
    }

    /// Returns the quality weight for the given content type.
    ///
    /// The most specific matching range determines the weight, and a weight
    /// of zero means the content type is not acceptable. Without a content
    /// type, the highest weight of all ranges is returned, since anything
    /// could be produced.
    pub fn quality(&self, content_type: Option<&str>) -> f32 {
        let Some(content_type) = content_type else {
            return self.ranges.iter().map(|r| r.quality).fold(0.0, f32::max);
        };

        // Strip parameters like charset, then split type and subtype
        let essence = content_type.split(';').next().unwrap_or_default();
        let Some((kind, subtype)) = essence.trim().split_once('/') else {
            return 0.0;
        };

        // Find the most specific range matching the content type
        self.ranges
            .iter()
            .filter_map(|range| {
                range.specificity(kind, subtype).map(|s| (s, range.quality))
            })
            .max_by_key(|&(specificity, _)| specificity)
            .map_or(0.0, |(_, quality)| quality)
    }
}

impl<'a> MediaRange<'a> {
    /// Range matching everything.
    const ANY: MediaRange<'static> = MediaRange {
        kind: "*",
        subtype: "*",
        quality: 1.0,
    };

    /// Parses a single media range, e.g. `text/html;q=0.8`.
    fn parse(value: &'a str) -> Option<Self> {
        let mut parts = value.split(';');
        let (kind, subtype) = parts.next()?.trim().split_once('/')?;
        let (kind, subtype) = (kind.trim(), subtype.trim());
        if kind.is_empty() || subtype.is_empty() {
            return None;
        }
        if kind == "*" && subtype != "*" {
            return None;
        }

        // Only the quality parameter is of interest, others are ignored
        let quality = parts
            .filter_map(|param| param.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
            .and_then(|(_, value)| value.trim().parse::<f32>().ok())
            .map_or(1.0, |quality| quality.clamp(0.0, 1.0));
        Some(Self {
            kind,
            subtype,
            quality,
        })
    }

    /// Returns how specifically the range matches, if it does at all.
    fn specificity(&self, kind: &str, subtype: &str) -> Option<u8> {
        match (self.kind, self.subtype) {
            ("*", "*") => Some(0),
            (k, "*") if k.eq_ignore_ascii_case(kind) => Some(1),
            (k, s) if k.eq_ignore_ascii_case(kind)
                && s.eq_ignore_ascii_case(subtype) =>
            {
                Some(2)
            }
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header_accepts_everything() {
        let accept = Accept::parse(None);
        assert!((accept.quality(Some("text/json")) - 1.0).abs() < f32::EPSILON);
        assert!((accept.quality(None) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_most_specific_range_wins() {
        let value = "text/*;q=0.3, text/html;q=0.7, */*;q=0.1";
        let accept = Accept::parse(Some(value));
        let test_cases = [
            (Some("text/html; charset=utf-8"), 0.7),
            (Some("TEXT/HTML"), 0.7),
            (Some("text/json"), 0.3),
            (Some("image/png"), 0.1),
            (None, 0.7),
        ];
        for (content_type, expected) in test_cases {
            let quality = accept.quality(content_type);
            assert!(
                (quality - expected).abs() < f32::EPSILON,
                "Failed for {content_type:?}: {quality}"
            );
        }
    }

    #[test]
    fn test_unmatched_and_refused() {
        let accept = Accept::parse(Some("text/json, text/html;q=0"));
        assert!(accept.quality(Some("text/html")).abs() < f32::EPSILON);
        assert!(accept.quality(Some("image/png")).abs() < f32::EPSILON);
        assert!(accept.quality(Some("garbage")).abs() < f32::EPSILON);
    }

    #[test]
    fn test_malformed_ranges_are_skipped() {
        let accept = Accept::parse(Some("nonsense, */html, text/json;q=x"));
        assert!((accept.quality(Some("text/json")) - 1.0).abs() < f32::EPSILON);
        assert!(accept.quality(Some("text/html")).abs() < f32::EPSILON);
    }
}
