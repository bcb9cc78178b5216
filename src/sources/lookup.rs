use serde_json::Value;

use super::ItemError;

/// Value at a JSON pointer that the platform always sends. A present `null`
/// is returned as-is so validation can name the offending field.
pub(crate) fn required(item: &Value, pointer: &'static str) -> Result<Value, ItemError> {
    item.pointer(pointer)
        .cloned()
        .ok_or(ItemError::MissingField(pointer))
}

/// First pointer that resolves, for fields the platform has moved over time.
pub(crate) fn required_any(item: &Value, pointers: &[&'static str]) -> Result<Value, ItemError> {
    pointers
        .iter()
        .find_map(|pointer| item.pointer(pointer).filter(|value| !value.is_null()))
        .cloned()
        .ok_or(ItemError::MissingField(pointers[0]))
}

/// Value at a pointer whose parents may be absent or `null`.
pub(crate) fn optional(item: &Value, pointer: &str) -> Value {
    item.pointer(pointer).cloned().unwrap_or(Value::Null)
}
