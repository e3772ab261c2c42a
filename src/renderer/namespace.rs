use std::path::Path;

use indexmap::IndexMap;
use log::warn;
use minijinja::value::{Value, ValueKind};
use minijinja::{Error, ErrorKind};

use crate::constants::{CURRENT_DIR, CURRENT_FILE, CURRENT_PATH};

/// Bindings visible to one evaluation, in insertion order.
///
/// The inclusion helpers are not stored here; they are registered on the
/// renderer's environment and therefore visible to every evaluation.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    bindings: IndexMap<String, Value>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// A namespace holding only the derived metadata of `path`.
    pub fn for_file<P: AsRef<Path>>(path: P) -> Self {
        let mut namespace = Self::new();
        namespace.insert_metadata(path);
        namespace
    }

    /// Binds `name`, returning the value it replaced.
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, name: K, value: V) -> Option<Value> {
        self.bindings.insert(name.into(), value.into())
    }

    pub fn with<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Binds every entry of a caller-supplied parameter map.
    ///
    /// `none` and undefined count as an empty map.
    ///
    /// # Errors
    /// * `ErrorKind::InvalidOperation` if `params` is not a map or has non-string keys
    pub fn extend_from_value(&mut self, params: &Value) -> Result<(), Error> {
        match params.kind() {
            ValueKind::None | ValueKind::Undefined => return Ok(()),
            ValueKind::Map => {}
            other => {
                return Err(Error::new(
                    ErrorKind::InvalidOperation,
                    format!("template parameters must be a map, got {other}"),
                ))
            }
        }

        for key in params.try_iter()? {
            let name = key.as_str().ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidOperation,
                    format!(
                        "template parameter names must be strings, got {} `{key}`; \
                         write the name quoted as in {{\"x\": ...}} or use dict(x=...)",
                        key.kind()
                    ),
                )
            })?;
            let value = params.get_item(&key)?;
            self.insert(name, value);
        }
        Ok(())
    }

    /// Binds `CURRENT_FILE`, `CURRENT_PATH` and `CURRENT_DIR` for `path`.
    ///
    /// Metadata wins over an existing binding of the same name.
    pub fn insert_metadata<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();
        let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let dir = path.parent().map(|p| p.display().to_string()).unwrap_or_default();

        for (name, value) in
            [(CURRENT_FILE, path.display().to_string()), (CURRENT_PATH, file_name), (CURRENT_DIR, dir)]
        {
            if self.contains(name) {
                warn!("Parameter '{}' is reserved and overridden for '{}'", name, path.display());
            }
            self.insert(name, value);
        }
    }

    /// Converts the bindings into an evaluation context.
    pub fn to_context(&self) -> Value {
        Value::from_serialize(&self.bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_for_nested_path() {
        let namespace = Namespace::for_file("src/posts/hello.html");
        assert_eq!(namespace.get(CURRENT_FILE).unwrap().as_str(), Some("src/posts/hello.html"));
        assert_eq!(namespace.get(CURRENT_PATH).unwrap().as_str(), Some("hello.html"));
        assert_eq!(namespace.get(CURRENT_DIR).unwrap().as_str(), Some("src/posts"));
    }

    #[test]
    fn test_metadata_for_bare_file_name() {
        let namespace = Namespace::for_file("index.html");
        assert_eq!(namespace.get(CURRENT_DIR).unwrap().as_str(), Some(""));
    }

    #[test]
    fn test_metadata_overrides_params() {
        let mut namespace = Namespace::new().with(CURRENT_FILE, "mine");
        namespace.insert_metadata("a/b.html");
        assert_eq!(namespace.get(CURRENT_FILE).unwrap().as_str(), Some("a/b.html"));
    }

    #[test]
    fn test_extend_from_map() {
        let params = Value::from_serialize(serde_json::json!({"title": "Hi", "count": 2}));
        let mut namespace = Namespace::new();
        namespace.extend_from_value(&params).unwrap();
        assert_eq!(namespace.len(), 2);
        assert_eq!(namespace.get("title").unwrap().as_str(), Some("Hi"));
    }

    #[test]
    fn test_extend_from_none_is_noop() {
        let mut namespace = Namespace::new();
        namespace.extend_from_value(&Value::from(())).unwrap();
        namespace.extend_from_value(&Value::UNDEFINED).unwrap();
        assert!(namespace.is_empty());
    }

    #[test]
    fn test_non_string_parameter_name_fails() {
        let params = Value::from_serialize(std::collections::BTreeMap::from([(1, "one")]));
        let mut namespace = Namespace::new();
        let err = namespace.extend_from_value(&params).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert!(err.to_string().contains("got number `1`"));
        assert!(err.to_string().contains("dict(x=...)"));
    }

    #[test]
    fn test_extend_from_non_map_fails() {
        let mut namespace = Namespace::new();
        let err = namespace.extend_from_value(&Value::from("title")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }
}
