// Copyright 2018 Dmitry Tantsur <divius.inside@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Common serde helpers for module parameters and cloud responses.

#![allow(dead_code)] // various things are unused with --no-default-features

use serde::de::Error as DeserError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Convert a scalar parameter value to a string.
///
/// Playbooks happily write `net-id: 1234` without quotes, so numbers and
/// booleans are accepted alongside strings.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Deserialize an optional scalar as a string.
pub fn deser_optional_scalar<'de, D>(des: D) -> ::std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Deserialize::deserialize(des)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(ref v) => scalar_to_string(v)
            .map(Some)
            .ok_or_else(|| DeserError::custom(format!("expected a string, got {}", v))),
    }
}

/// Deserialize an empty string as `None`.
pub fn empty_as_none<'de, D>(des: D) -> ::std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Deserialize::deserialize(des)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Deserialize either a list of strings or a comma-separated string.
pub fn deser_string_list<'de, D>(des: D) -> ::std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringList {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match Option::<StringList>::deserialize(des)? {
        None => Vec::new(),
        Some(StringList::Joined(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect(),
        Some(StringList::List(items)) => items,
    })
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "deser_optional_scalar", default)]
        scalar: Option<String>,
        #[serde(deserialize_with = "deser_string_list", default)]
        list: Vec<String>,
        #[serde(deserialize_with = "empty_as_none", default)]
        empty: Option<String>,
    }

    #[test]
    fn test_scalar_accepts_numbers() {
        let h: Holder = serde_json::from_value(json!({"scalar": 1234})).unwrap();
        assert_eq!(h.scalar.as_deref(), Some("1234"));
        let h: Holder = serde_json::from_value(json!({"scalar": "abc"})).unwrap();
        assert_eq!(h.scalar.as_deref(), Some("abc"));
        let h: Holder = serde_json::from_value(json!({})).unwrap();
        assert!(h.scalar.is_none());
    }

    #[test]
    fn test_scalar_rejects_mappings() {
        assert!(serde_json::from_value::<Holder>(json!({"scalar": {"a": 1}})).is_err());
    }

    #[test]
    fn test_string_list_shapes() {
        let h: Holder = serde_json::from_value(json!({"list": "web, db,,"})).unwrap();
        assert_eq!(h.list, vec!["web", "db"]);
        let h: Holder = serde_json::from_value(json!({"list": ["a", "b"]})).unwrap();
        assert_eq!(h.list, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_as_none() {
        let h: Holder = serde_json::from_value(json!({"empty": ""})).unwrap();
        assert!(h.empty.is_none());
    }
}
