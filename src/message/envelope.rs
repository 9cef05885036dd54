// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Envelope: the header-carrying message exchanged at call boundaries.

use std::collections::BTreeMap;

use crate::config::consts::HEADER_CONTENT_TYPE;
use crate::message::Value;

/// Header map of an envelope. Keys are unique; insertion order is
/// irrelevant. All mutation goes through this API so header handling
/// stays observable in one place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Copy every header from `other` into this map. On key collision the
    /// incoming header wins; keys only present here are retained.
    pub fn merge_from(&mut self, other: &Headers) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A payload plus its headers, the unit exchanged at message boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    payload: Value,
    headers: Headers,
}

impl Envelope {
    /// A headerless envelope around a payload.
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            headers: Headers::new(),
        }
    }

    pub fn with_headers(payload: Value, headers: Headers) -> Self {
        Self { payload, headers }
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn insert_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key, value);
    }

    /// The `content-type` header, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(HEADER_CONTENT_TYPE)
    }
}
