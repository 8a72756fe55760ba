//! Lenient JSON object decoding shared by the on-disk documents and the
//! add-route body.
//!
//! Keys are matched case-insensitively (`AuthTok`, `authTok` and `authtok`
//! all name the same field), `null` leaves a field at its default, unknown
//! keys are skipped and a duplicate key overwrites the earlier value.
//! A top-level `null` decodes to the default value.

use serde::Deserializer;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use std::fmt;
use std::marker::PhantomData;

/// A struct whose fields are filled one key at a time
pub(crate) trait FoldedFields: Default {
    const EXPECTING: &'static str;

    /// Decode the value for `key` (already lower-cased) into `self`.
    ///
    /// Returns `false` when the key is not a field of this struct; the
    /// caller then skips the value.
    fn read_field<'de, A: MapAccess<'de>>(
        &mut self,
        key: &str,
        map: &mut A,
    ) -> Result<bool, A::Error>;
}

pub(crate) fn deserialize_folded<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FoldedFields,
{
    deserializer.deserialize_any(FoldedVisitor(PhantomData))
}

/// Read a string field, `null` becomes `""`
pub(crate) fn string<'de, A: MapAccess<'de>>(map: &mut A) -> Result<String, A::Error> {
    Ok(map.next_value::<Option<String>>()?.unwrap_or_default())
}

/// Read a list of strings, `null` becomes an empty list and a `null`
/// element becomes `""`
pub(crate) fn string_list<'de, A: MapAccess<'de>>(map: &mut A) -> Result<Vec<String>, A::Error> {
    Ok(map
        .next_value::<Option<Vec<Option<String>>>>()?
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

struct FoldedVisitor<T>(PhantomData<T>);

impl<'de, T: FoldedFields> Visitor<'de> for FoldedVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(T::EXPECTING)
    }

    fn visit_unit<E: de::Error>(self) -> Result<T, E> {
        Ok(T::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<T, A::Error> {
        let mut value = T::default();
        while let Some(key) = map.next_key::<String>()? {
            if !value.read_field(&key.to_lowercase(), &mut map)? {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq)]
    struct Pair {
        name: String,
        tags: Vec<String>,
    }

    impl FoldedFields for Pair {
        const EXPECTING: &'static str = "a pair object";

        fn read_field<'de, A: MapAccess<'de>>(
            &mut self,
            key: &str,
            map: &mut A,
        ) -> Result<bool, A::Error> {
            match key {
                "name" => self.name = string(map)?,
                "tags" => self.tags = string_list(map)?,
                _ => return Ok(false),
            }
            Ok(true)
        }
    }

    impl<'de> Deserialize<'de> for Pair {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            deserialize_folded(d)
        }
    }

    #[test]
    fn test_keys_match_any_case() {
        let p: Pair = serde_json::from_str(r#"{"NAME": "a", "Tags": ["x"]}"#).unwrap();
        assert_eq!(p.name, "a");
        assert_eq!(p.tags, vec!["x".to_string()]);
    }

    #[test]
    fn test_nulls_and_unknown_keys() {
        let raw = r#"{"name": null, "tags": [null, "y"], "other": {"z": 1}}"#;
        let p: Pair = serde_json::from_str(raw).unwrap();
        assert_eq!(p.name, "");
        assert_eq!(p.tags, vec![String::new(), "y".to_string()]);

        let p: Pair = serde_json::from_str("null").unwrap();
        assert_eq!(p, Pair::default());
    }

    #[test]
    fn test_last_duplicate_wins() {
        let p: Pair = serde_json::from_str(r#"{"name": "a", "Name": "b"}"#).unwrap();
        assert_eq!(p.name, "b");
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        assert!(serde_json::from_str::<Pair>(r#"{"tags": "x"}"#).is_err());
        assert!(serde_json::from_str::<Pair>(r#"["name"]"#).is_err());
        assert!(serde_json::from_str::<Pair>("42").is_err());
    }
}
