// FunimationLater - Rust client for the Funimation streaming API
// Copyright (C) 2025 FunimationLater contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Response body parsing
//!
//! The client hands every successful body to a [`ResponseParser`]. Parsers turn the
//! raw bytes into a plain [`serde_json::Value`] tree so that nothing format-specific
//! reaches the callers.
//!
//! # XML normalization
//! The API's default format is XML. A document becomes `{ "<root>": node }` where:
//! - an element with no attributes and no child elements becomes its text, or
//!   `null` when empty
//! - any other element becomes an object holding `"@attr"` entries, one entry per
//!   child element name (repeated names collect into an array, in document order),
//!   and `"#text"` for non-empty text
//!
//! ```text
//! <authentication>
//!   <token>abc</token>
//!   <userType>FunimationSubscriptionUser</userType>
//! </authentication>
//! ```
//! parses to
//! `{"authentication": {"token": "abc", "userType": "FunimationSubscriptionUser"}}`.
//!
//! # Error payloads
//! The API sometimes answers 200 with an error document. An XML root named
//! `error`, or a JSON object with a top-level `error` member, is reported as
//! [`FunimationError::UnknownResponse`].

use crate::api::history::RequestInfo;
use crate::error::{FunimationError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};
use std::fmt;

/// Converts a raw response body into a normalized tree
pub trait ResponseParser: Send + Sync {
    fn parse(&self, body: &[u8], request: &RequestInfo) -> Result<Value>;
}

impl<F> ResponseParser for F
where
    F: Fn(&[u8], &RequestInfo) -> Result<Value> + Send + Sync,
{
    fn parse(&self, body: &[u8], request: &RequestInfo) -> Result<Value> {
        self(body, request)
    }
}

/// Default parser for the XML API
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser;

/// Parser for JSON endpoints
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl ResponseParser for XmlParser {
    fn parse(&self, body: &[u8], request: &RequestInfo) -> Result<Value> {
        let value = parse_xml(body).map_err(|e| {
            log::warn!("Unreadable XML response from {}: {}", request, e);
            e
        })?;

        if let Some(error) = value.get("error") {
            return Err(FunimationError::unknown_response_with_body(
                format!("{} returned an error document: {}", request.url, describe(error)),
                body,
            ));
        }

        Ok(value)
    }
}

impl ResponseParser for JsonParser {
    fn parse(&self, body: &[u8], request: &RequestInfo) -> Result<Value> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            log::warn!("Unreadable JSON response from {}: {}", request, e);
            FunimationError::unknown_response_with_body(
                format!("Parse error: {} at line {} col {}", e, e.line(), e.column()),
                body,
            )
        })?;

        match value.get("error") {
            Some(error) if !error.is_null() => Err(FunimationError::unknown_response_with_body(
                format!("{} returned an error document: {}", request.url, describe(error)),
                body,
            )),
            _ => Ok(value),
        }
    }
}

/// Short human-readable form of an error payload
fn describe(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        Value::Null => "empty error".to_string(),
        other => other.to_string(),
    }
}

/// Element under construction while walking the event stream
struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<(String, Value)>,
    text: String,
}

impl Node {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = utf8(start.name().as_ref())?;
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(malformed)?;
            let key = utf8(attr.key.as_ref())?;
            let value = attr.unescape_value().map_err(malformed)?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    fn into_value(self) -> Value {
        // Only the ends are trimmed; spacing around inline children stays
        let text = self.text.trim();
        if self.attributes.is_empty() && self.children.is_empty() {
            return if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_owned())
            };
        }

        let mut map = Map::new();
        for (key, value) in self.attributes {
            map.insert(format!("@{key}"), Value::String(value));
        }
        for (key, value) in self.children {
            match map.get_mut(&key) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(key, value);
                }
            }
        }
        if !text.is_empty() {
            map.insert("#text".to_string(), Value::String(text.to_owned()));
        }
        Value::Object(map)
    }
}

fn malformed(err: impl fmt::Display) -> FunimationError {
    FunimationError::unknown_response(format!("Malformed XML: {err}"))
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(malformed)
}

/// Parse an XML document into `{ root_name: node }`
pub fn parse_xml(body: &[u8]) -> Result<Value> {
    let text = std::str::from_utf8(body)
        .map_err(|e| FunimationError::unknown_response_with_body(format!("Body is not UTF-8: {e}"), body))?;

    let mut reader = Reader::from_str(text);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    // Attach a finished element to its parent, or make it the document root
    let mut close = |node: Node, stack: &mut Vec<Node>| -> Result<()> {
        let name = node.name.clone();
        let value = node.into_value();
        match stack.last_mut() {
            Some(parent) => parent.children.push((name, value)),
            None if root.is_none() => root = Some((name, value)),
            None => return Err(FunimationError::unknown_response("Multiple root elements")),
        }
        Ok(())
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(Node::open(&start)?),
            Ok(Event::Empty(start)) => {
                let node = Node::open(&start)?;
                close(node, &mut stack)?;
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| FunimationError::unknown_response("Unexpected closing tag"))?;
                close(node, &mut stack)?;
            }
            Ok(Event::Text(t)) => {
                let unescaped = t.unescape().map_err(malformed)?;
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(data)) => {
                let raw = data.into_inner();
                let text = std::str::from_utf8(&raw).map_err(malformed)?;
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(text);
                }
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, processing instructions, doctypes
            Ok(_) => {}
            Err(e) => {
                return Err(FunimationError::unknown_response_with_body(
                    format!("Malformed XML at position {}: {}", reader.buffer_position(), e),
                    body,
                ))
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(FunimationError::unknown_response_with_body(
            format!("Unclosed element <{}>", open.name),
            body,
        ));
    }

    let (name, value) = root
        .ok_or_else(|| FunimationError::unknown_response_with_body("No root element", body))?;
    let mut document = Map::new();
    document.insert(name, value);
    Ok(Value::Object(document))
}
