//! JSON fixture loader shared by the upstream vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::fs;

use serde::de::DeserializeOwned;

/// Read `tests/vectors/<name>` as raw text.
pub fn raw(name: &str) -> String {
    fs::read_to_string(format!("tests/vectors/{name}"))
        .unwrap_or_else(|e| panic!("missing vector {name}: {e}"))
}

/// Deserialize `tests/vectors/<name>` into an upstream reply shape.
pub fn load<T: DeserializeOwned>(name: &str) -> T {
    serde_json::from_str(&raw(name)).unwrap_or_else(|e| panic!("bad vector {name}: {e}"))
}
