//! `deserialize_with` helper for maps whose keys must be unique.
//!
//! serde's stock `BTreeMap` impl keeps the last of two equal keys;
//! [`deserialize`] rejects the document instead.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};

const DUPLICATE_KEY: &str = "duplicate key `";

pub(crate) fn deserialize<'de, D, K, V>(d: D) -> Result<BTreeMap<K, V>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de> + Ord + fmt::Display,
    V: Deserialize<'de>,
{
    d.deserialize_map(UniqueMapVisitor(PhantomData))
}

/// The key named by a [`deserialize`] failure, if `message` is one.
pub(crate) fn duplicate_key(message: &str) -> Option<String> {
    let start = message.find(DUPLICATE_KEY)? + DUPLICATE_KEY.len();
    let len = message[start..].find('`')?;
    Some(message[start..start + len].to_string())
}

struct UniqueMapVisitor<K, V>(PhantomData<(K, V)>);

impl<'de, K, V> Visitor<'de> for UniqueMapVisitor<K, V>
where
    K: Deserialize<'de> + Ord + fmt::Display,
    V: Deserialize<'de>,
{
    type Value = BTreeMap<K, V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with unique keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<K, V>()? {
            if map.contains_key(&key) {
                return Err(de::Error::custom(format!("{DUPLICATE_KEY}{key}`")));
            }
            map.insert(key, value);
        }
        Ok(map)
    }
}
