use serde_json::Value;

pub(crate) const PATH_SEPARATOR: char = '.';

/// Capability the engine needs from an item: an identifier and field lookup by dot-path.
///
/// Lookups never fail loudly. A missing segment, a wrong shape, or an explicit `null` all
/// come back as `None`.
pub trait Extractable {
    fn item_id(&self) -> String;
    fn field(&self, path: &str) -> Option<Value>;
}

/// Walks `path` through a JSON tree. Array segments are addressed by index.
pub fn extract<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split(PATH_SEPARATOR)
        .try_fold(root, |current, segment| match current {
            Value::Object(fields) => fields.get(segment),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        })
        .filter(|value| !value.is_null())
}

impl Extractable for Value {
    fn item_id(&self) -> String {
        match self.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => String::new(),
        }
    }

    fn field(&self, path: &str) -> Option<Value> {
        extract(self, path).cloned()
    }
}
