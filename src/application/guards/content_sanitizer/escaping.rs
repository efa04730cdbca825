use crate::domain::value_objects::RequestFieldMap;

/// HTML-entity-escape `&`, `<`, `>`, `"` and `'` so logged payloads are inert
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON rendering of the whole field map with every key and string value
/// escaped, at any depth
pub fn escaped_fields_json(fields: &RequestFieldMap) -> String {
    let escaped: serde_json::Map<String, serde_json::Value> = fields
        .map_strings_and_keys(escape_html)
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    serde_json::Value::Object(escaped).to_string()
}
