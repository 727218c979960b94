//! Wire shapes of the two remote JSON documents.
//!
//! The documents are produced by PHP tooling, which encodes an empty associative array as `[]`
//! rather than `{}`. Every map-valued field therefore accepts either form, and `null`.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Deserialize)]
pub(crate) struct SourceDocument {
    pub(crate) manifest: Vec<RawBuild>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawBuild {
    pub(crate) build: String,
    #[serde(default)]
    pub(crate) parent: Option<String>,
    #[serde(default, deserialize_with = "lenient_map")]
    pub(crate) modules: BTreeMap<String, String>,
    #[serde(default)]
    pub(crate) files: Option<RawFiles>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawFiles {
    #[serde(default, deserialize_with = "lenient_map")]
    pub(crate) added: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "lenient_map")]
    pub(crate) modified: BTreeMap<String, String>,
    #[serde(default)]
    pub(crate) removed: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForksDocument {
    #[serde(deserialize_with = "lenient_map")]
    pub(crate) forks: BTreeMap<String, String>,
}

/// Accept a JSON object, an empty JSON array, or `null` as a string map.
fn lenient_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientMap;

    impl<'de> Visitor<'de> for LenientMap {
        type Value = BTreeMap<String, String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of strings or an empty array")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(BTreeMap::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(BTreeMap::new())
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            if seq.next_element::<de::IgnoredAny>()?.is_some() {
                return Err(de::Error::custom("expected an object, found a non-empty array"));
            }
            Ok(BTreeMap::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out = BTreeMap::new();
            while let Some((key, value)) = map.next_entry::<String, String>()? {
                out.insert(key, value);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_any(LenientMap)
}
