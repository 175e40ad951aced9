use std::{
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

use crate::{parser::parse_json_pointer, JsonPointerRef, ParseJsonPointerError, ToJsonPointerRef};

/// An owned JSON pointer, stored as unescaped reference tokens.
#[derive(Clone, Default, Eq)]
pub struct JsonPointer(pub(crate) Vec<String>);

impl ToJsonPointerRef for JsonPointer {
    fn to_json_pointer_ref(&self) -> JsonPointerRef<'_> {
        self.as_ref()
    }
}

impl<'a> ToJsonPointerRef for &'a JsonPointer {
    fn to_json_pointer_ref(&self) -> JsonPointerRef<'a> {
        self.as_ref()
    }
}

impl PartialEq<JsonPointerRef<'_>> for JsonPointer {
    fn eq(&self, other: &JsonPointerRef<'_>) -> bool {
        self.0.iter().eq(other.iter())
    }
}

impl PartialEq for JsonPointer {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Hash for JsonPointer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for segment in &self.0 {
            segment.hash(state);
        }
    }
}

impl Display for JsonPointer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.as_ref(), f)
    }
}

impl Debug for JsonPointer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string())
    }
}

impl FromStr for JsonPointer {
    type Err = ParseJsonPointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_json_pointer(s).map(Self)
    }
}

impl<S: Into<String>> FromIterator<S> for JsonPointer {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl Serialize for JsonPointer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JsonPointer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        parse_json_pointer(&String::deserialize(deserializer)?)
            .map(Self)
            .map_err(|err| D::Error::custom(err.to_string()))
    }
}

impl JsonPointer {
    #[inline]
    pub fn root() -> JsonPointer {
        JsonPointer(Vec::new())
    }

    #[inline]
    pub fn as_ref(&self) -> JsonPointerRef<'_> {
        JsonPointerRef { path: &self.0 }
    }

    #[inline]
    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    #[inline]
    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
