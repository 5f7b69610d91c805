use serde::Serialize;
use wasm_bindgen::JsValue;

pub(crate) fn js_err(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Serialize to plain JS objects (not `Map`s), as the map widget expects.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| e.into())
}

/// Hand a large JSON document over as text and let the JS engine parse it,
/// which avoids building it value by value across the boundary.
pub(crate) fn json_to_js(value: &serde_json::Value) -> Result<JsValue, JsValue> {
    let json_string = serde_json::to_string(value)
        .map_err(|e| js_err(format!("Failed to serialize JSON to string: {e}")))?;
    js_sys::JSON::parse(&json_string)
        .map_err(|e| js_err(format!("Failed to parse JSON string: {e:?}")))
}
