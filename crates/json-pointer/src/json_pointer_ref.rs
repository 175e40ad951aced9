use std::fmt::{self, Debug, Display, Formatter};

use crate::{escape_segment, JsonPointer};

pub trait ToJsonPointerRef {
    fn to_json_pointer_ref(&self) -> JsonPointerRef<'_>;
}

/// A borrowed view over the segments of a [`JsonPointer`].
#[derive(Copy, Clone)]
pub struct JsonPointerRef<'a> {
    pub(crate) path: &'a [String],
}

impl<'a> ToJsonPointerRef for JsonPointerRef<'a> {
    fn to_json_pointer_ref(&self) -> JsonPointerRef<'a> {
        *self
    }
}

impl PartialEq<JsonPointer> for JsonPointerRef<'_> {
    fn eq(&self, other: &JsonPointer) -> bool {
        self.path == other.0.as_slice()
    }
}

impl PartialEq for JsonPointerRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for JsonPointerRef<'_> {}

impl Display for JsonPointerRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for segment in self.iter() {
            f.write_str("/")?;
            f.write_str(&escape_segment(segment))?;
        }

        Ok(())
    }
}

impl Debug for JsonPointerRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string())
    }
}

impl<'a> JsonPointerRef<'a> {
    pub fn to_owned(&self) -> JsonPointer {
        JsonPointer(self.path.to_vec())
    }

    pub fn split_last(&self) -> Option<(JsonPointerRef<'a>, &'a str)> {
        self.path
            .split_last()
            .map(|(key, parent)| (JsonPointerRef { path: parent }, key.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a String> {
        self.path.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::json_pointer;

    #[test]
    fn test_split_last() {
        let pointer = json_pointer!("/a/b~1c/d");
        let (parent, key) = pointer.as_ref().split_last().unwrap();
        assert_eq!(parent, json_pointer!("/a/b~1c"));
        assert_eq!(key, "d");

        let (parent, key) = parent.split_last().unwrap();
        assert_eq!(parent.to_string(), "/a");
        assert_eq!(key, "b/c");

        let (parent, key) = parent.split_last().unwrap();
        assert!(parent.is_empty());
        assert_eq!(key, "a");

        assert!(parent.split_last().is_none());
    }

    #[test]
    fn test_to_owned() {
        let pointer = json_pointer!("/x/~0/0");
        let owned = pointer.as_ref().to_owned();
        assert_eq!(owned, pointer);
        assert_eq!(owned.as_ref().len(), 3);
        assert_eq!(format!("{:?}", owned.as_ref()), "\"/x/~0/0\"");
    }
}
