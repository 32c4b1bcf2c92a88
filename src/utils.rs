// Copyright 2017 Dmitry Tantsur <divius.inside@gmail.com>
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

//! Various utilities.

#![allow(dead_code)] // unused with --no-default-features

use super::{Error, ErrorKind, Result};

/// Extract one and exactly one item from a list.
///
/// Returns `Ok(None)` for an empty list and a `TooManyItems` error if there
/// is more than one item.
pub fn one<T, S: Into<String>>(collection: Vec<T>, too_many_msg: S) -> Result<Option<T>> {
    let mut iter = collection.into_iter();
    match (iter.next(), iter.next()) {
        (None, _) => Ok(None),
        (Some(item), None) => Ok(Some(item)),
        (Some(..), Some(..)) => Err(Error::new(ErrorKind::TooManyItems, too_many_msg)),
    }
}

/// Split a `key=value` token on the first `=`.
///
/// Both parts are trimmed. Returns `None` when there is no `=` at all.
pub fn split_pair(token: &str) -> Option<(&str, &str)> {
    token
        .split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
}

#[cfg(test)]
mod test {
    use super::super::ErrorKind;
    use super::{one, split_pair};

    #[test]
    fn test_one() {
        assert_eq!(one(Vec::<u8>::new(), "many").unwrap(), None);
        assert_eq!(one(vec![1], "many").unwrap(), Some(1));
        let err = one(vec![1, 2], "many").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooManyItems);
        assert_eq!(err.message(), "many");
    }

    #[test]
    fn test_split_pair() {
        assert_eq!(split_pair("net-id=1234"), Some(("net-id", "1234")));
        assert_eq!(split_pair(" a = b=c "), Some(("a", "b=c")));
        assert_eq!(split_pair("a="), Some(("a", "")));
        assert_eq!(split_pair("novalue"), None);
    }
}
