// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Response Normalizer - Provider Wire Format to GatewayOutcome
//
// A non-2xx status is an UpstreamError and the body is never inspected, even
// if it happens to contain something that looks like content. A 2xx body must
// carry a string at the shape's content path, otherwise the outcome is
// MalformedResponse naming that path. Content is returned exactly as
// received: no trimming, no re-encoding.

use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use super::shapes::ShapeTable;
use crate::domain::outcome::{ErrorKind, GatewayOutcome};
use crate::domain::provider::ProviderDescriptor;

/// One step into a JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    Key(&'static str),
    Index(usize),
}

pub type FieldPath = &'static [PathSegment];

use self::PathSegment::{Index, Key};

pub const CHOICES_MESSAGE_CONTENT: FieldPath = &[Key("choices"), Index(0), Key("message"), Key("content")];
pub const COMPLETION: FieldPath = &[Key("completion")];
pub const GENERATIONS_TEXT: FieldPath = &[Key("generations"), Index(0), Key("text")];
pub const GENERATED_TEXT: FieldPath = &[Key("generated_text")];

/// `choices[0].message.content` style rendering, used in failure details
pub fn render_path(path: &[PathSegment]) -> String {
    let mut rendered = String::new();
    for segment in path {
        match segment {
            Key(key) => {
                if !rendered.is_empty() {
                    rendered.push('.');
                }
                rendered.push_str(key);
            }
            Index(i) => rendered.push_str(&format!("[{}]", i)),
        }
    }
    rendered
}

/// Follow `path` and return the string found there
pub fn extract_text<'a>(document: &'a Value, path: &[PathSegment]) -> Option<&'a str> {
    path.iter()
        .try_fold(document, |node, segment| match segment {
            Key(key) => node.get(key),
            Index(i) => node.get(i),
        })?
        .as_str()
}

/// Turn a raw upstream response into an outcome
pub fn parse(
    shapes: &ShapeTable,
    descriptor: &ProviderDescriptor,
    status: StatusCode,
    body: &[u8],
) -> GatewayOutcome {
    if !status.is_success() {
        return GatewayOutcome::failure(
            ErrorKind::UpstreamError,
            &descriptor.name,
            format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            ),
        );
    }

    let Some(codec) = shapes.response_codec(&descriptor.response_shape) else {
        return GatewayOutcome::failure(
            ErrorKind::UnsupportedProvider,
            &descriptor.name,
            format!("no response decoder registered for shape '{}'", descriptor.response_shape),
        );
    };

    let document: Value = match serde_json::from_slice(body) {
        Ok(document) => document,
        Err(e) => {
            debug!("Response from '{}' is not JSON: {}", descriptor.name, e);
            return malformed(descriptor, codec.content_path);
        }
    };

    match extract_text(&document, codec.content_path) {
        Some(content) => GatewayOutcome::success(content),
        None => malformed(descriptor, codec.content_path),
    }
}

fn malformed(descriptor: &ProviderDescriptor, path: FieldPath) -> GatewayOutcome {
    GatewayOutcome::failure(ErrorKind::MalformedResponse, &descriptor.name, render_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::provider::{ProviderFamily, ShapeTag};
    use serde_json::json;

    fn descriptor(shape: &str) -> ProviderDescriptor {
        ProviderDescriptor::new(
            "P",
            ProviderFamily::Other,
            "https://provider.test/v1",
            "P_KEY",
            "m",
            shape,
        )
    }

    fn parse_json(shape: &str, status: u16, body: Value) -> GatewayOutcome {
        parse(
            &ShapeTable::builtin(),
            &descriptor(shape),
            StatusCode::from_u16(status).unwrap(),
            body.to_string().as_bytes(),
        )
    }

    #[test]
    fn test_render_path() {
        assert_eq!(render_path(CHOICES_MESSAGE_CONTENT), "choices[0].message.content");
        assert_eq!(render_path(GENERATIONS_TEXT), "generations[0].text");
        assert_eq!(render_path(COMPLETION), "completion");
    }

    #[test]
    fn test_extracts_content_per_shape() {
        let cases = [
            (ShapeTag::CHAT_MESSAGES, json!({"choices": [{"message": {"content": "Hi there"}}]})),
            (ShapeTag::API_KEY_HEADER, json!({"choices": [{"message": {"content": "Hi there"}}]})),
            (ShapeTag::PROMPT_COMPLETION, json!({"completion": "Hi there"})),
            (ShapeTag::GENERATION, json!({"generations": [{"text": "Hi there"}]})),
            (ShapeTag::TEXT_GENERATION, json!({"generated_text": "Hi there"})),
        ];

        for (shape, body) in cases {
            assert_eq!(parse_json(shape, 200, body).content(), Some("Hi there"), "{shape}");
        }
    }

    #[test]
    fn test_content_is_not_trimmed() {
        let outcome = parse_json(ShapeTag::PROMPT_COMPLETION, 200, json!({"completion": "  spaced \n"}));
        assert_eq!(outcome.content(), Some("  spaced \n"));

        let outcome = parse_json(ShapeTag::PROMPT_COMPLETION, 200, json!({"completion": ""}));
        assert_eq!(outcome.content(), Some(""));
    }

    #[test]
    fn test_non_2xx_ignores_body() {
        let outcome = parse_json(
            ShapeTag::CHAT_MESSAGES,
            500,
            json!({"choices": [{"message": {"content": "looks fine"}}]}),
        );
        let failure = outcome.as_failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::UpstreamError);
        assert_eq!(failure.detail, "HTTP 500 Internal Server Error");

        let outcome = parse_json(ShapeTag::CHAT_MESSAGES, 401, json!({}));
        assert_eq!(outcome.as_failure().unwrap().detail, "HTTP 401 Unauthorized");
    }

    #[test]
    fn test_empty_object_is_malformed_for_every_shape() {
        let cases = [
            (ShapeTag::CHAT_MESSAGES, "choices[0].message.content"),
            (ShapeTag::API_KEY_HEADER, "choices[0].message.content"),
            (ShapeTag::PROMPT_COMPLETION, "completion"),
            (ShapeTag::GENERATION, "generations[0].text"),
            (ShapeTag::TEXT_GENERATION, "generated_text"),
        ];

        for (shape, path) in cases {
            let outcome = parse_json(shape, 200, json!({}));
            let failure = outcome.as_failure().unwrap();
            assert_eq!(failure.kind, ErrorKind::MalformedResponse, "{shape}");
            assert_eq!(failure.detail, path, "{shape}");
            assert_eq!(failure.provider_name, "P");
        }
    }

    #[test]
    fn test_missing_or_mistyped_field_is_malformed() {
        let outcome = parse_json(ShapeTag::CHAT_MESSAGES, 200, json!({"choices": []}));
        assert_eq!(outcome.kind(), Some(ErrorKind::MalformedResponse));

        let outcome = parse_json(ShapeTag::GENERATION, 200, json!({"generations": [{"text": 42}]}));
        assert_eq!(outcome.kind(), Some(ErrorKind::MalformedResponse));
    }

    #[test]
    fn test_non_json_body_is_malformed() {
        let outcome = parse(
            &ShapeTable::builtin(),
            &descriptor(ShapeTag::PROMPT_COMPLETION),
            StatusCode::OK,
            b"<html>gateway error</html>",
        );
        let failure = outcome.as_failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::MalformedResponse);
        assert_eq!(failure.detail, "completion");
    }
}
