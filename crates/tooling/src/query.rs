//! Maps validated tool input onto an outbound request URL.
//!
//! Input field names are used unchanged as query parameter names. A field
//! that is absent (or a nullable field set to null) produces no parameter at
//! all, which is not the same as sending an empty value.

use crate::error::ToolError;
use crate::schema::{Location, ObjectSchema};
use serde_json::{Map, Number, Value};
use url::Url;

/// One `(name, value)` pair per present query field, in declaration order.
pub fn query_params(schema: &ObjectSchema, input: &Map<String, Value>) -> Vec<(String, String)> {
    schema
        .fields()
        .iter()
        .filter(|field| field.location == Location::Query)
        .filter_map(|field| match input.get(&field.name) {
            None | Some(Value::Null) => None,
            Some(value) => Some((field.name.clone(), stringify(value))),
        })
        .collect()
}

/// Builds `{base_url}{path}[?query]`.
///
/// `{name}` segments of `path` are replaced with the matching path field of
/// `input`. Segment and query encoding is left to `url`.
pub fn build_url(
    base_url: &str,
    path: &str,
    schema: &ObjectSchema,
    input: &Map<String, Value>,
) -> Result<Url, ToolError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ToolError::InvalidContext(format!("base URL '{}': {}", base_url, e)))?;

    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            ToolError::InvalidContext(format!("base URL '{}' cannot carry a path", base_url))
        })?;
        segments.pop_if_empty();

        for raw in path.trim_matches('/').split('/').filter(|s| !s.is_empty()) {
            match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => {
                    let value = path_value(schema, input, name)?;
                    segments.push(&value);
                }
                None => {
                    segments.push(raw);
                }
            }
        }
    }

    let params = query_params(schema, input);
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &params {
            pairs.append_pair(name, value);
        }
    }

    Ok(url)
}

fn path_value(
    schema: &ObjectSchema,
    input: &Map<String, Value>,
    name: &str,
) -> Result<String, ToolError> {
    let declared = schema
        .get(name)
        .map(|field| field.location == Location::Path)
        .unwrap_or(false);
    if !declared {
        return Err(ToolError::InvalidContext(format!(
            "path placeholder '{{{}}}' has no matching path field",
            name
        )));
    }

    match input.get(name) {
        Some(Value::String(s)) if s.is_empty() => Err(ToolError::validation(
            format!("/{}", name),
            "path parameter must not be empty",
        )),
        Some(Value::Null) | None => Err(ToolError::validation(
            format!("/{}", name),
            format!("\"{}\" is a required property", name),
        )),
        Some(value) => {
            let segment = stringify(value);
            if is_dot_segment(&segment) {
                return Err(ToolError::validation(
                    format!("/{}", name),
                    format!("path parameter must not be '{}'", segment),
                ));
            }
            Ok(segment)
        }
    }
}

/// `url` collapses `.` and `..` segments (including their `%2e` spellings)
/// instead of pushing them, which would retarget the request.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        other => other.to_string(),
    }
}

/// Integral values never carry a trailing `.0`.
fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;
    use serde_json::json;

    fn list_schema() -> ObjectSchema {
        ObjectSchema::new()
            .field(Field::string("orderBy"))
            .field(Field::number("page"))
            .field(Field::number("per_page"))
            .field(Field::boolean("f_hasInputInvoice"))
            .field(Field::string("q").nullable())
    }

    fn input(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn should_only_emit_present_fields() {
        let params = query_params(&list_schema(), &input(json!({"page": 2})));
        assert_eq!(params, vec![("page".to_string(), "2".to_string())]);
    }

    #[test]
    fn should_emit_false_booleans() {
        let params = query_params(&list_schema(), &input(json!({"f_hasInputInvoice": false})));
        assert_eq!(
            params,
            vec![("f_hasInputInvoice".to_string(), "false".to_string())]
        );
    }

    #[test]
    fn should_skip_null_and_undeclared_fields() {
        let params = query_params(
            &list_schema(),
            &input(json!({"q": null, "unknown": "x", "orderBy": "creationDate,desc"})),
        );
        assert_eq!(
            params,
            vec![("orderBy".to_string(), "creationDate,desc".to_string())]
        );
    }

    #[test]
    fn should_send_empty_string_when_present() {
        let params = query_params(&list_schema(), &input(json!({"q": ""})));
        assert_eq!(params, vec![("q".to_string(), String::new())]);
    }

    #[test]
    fn should_follow_declaration_order() {
        let params = query_params(
            &list_schema(),
            &input(json!({"q": "taylor", "per_page": 50, "page": 1})),
        );
        let names: Vec<&str> = params.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["page", "per_page", "q"]);
    }

    #[test]
    fn should_format_numbers_as_decimal() {
        let params = query_params(
            &list_schema(),
            &input(json!({"page": 3.0, "per_page": 2.5})),
        );
        assert_eq!(params[0].1, "3");
        assert_eq!(params[1].1, "2.5");
    }

    #[test]
    fn should_omit_question_mark_without_params() {
        let url = build_url(
            "https://store.example.com",
            "/api/oms/pvt/orders",
            &list_schema(),
            &Map::new(),
        )
        .unwrap();

        assert_eq!(url.as_str(), "https://store.example.com/api/oms/pvt/orders");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn should_tolerate_trailing_slash_on_base() {
        let url = build_url(
            "https://store.example.com/",
            "/api/oms/pvt/orders",
            &list_schema(),
            &input(json!({"page": 2})),
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://store.example.com/api/oms/pvt/orders?page=2"
        );
    }

    #[test]
    fn should_encode_query_values() {
        let url = build_url(
            "https://store.example.com",
            "/api/oms/pvt/orders",
            &list_schema(),
            &input(json!({"q": "taylor@email.com & co"})),
        )
        .unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![("q".to_string(), "taylor@email.com & co".to_string())]
        );
        assert!(!url.query().unwrap().contains(' '));
    }

    #[test]
    fn should_substitute_path_fields_and_keep_them_out_of_query() {
        let schema = ObjectSchema::new().field(Field::string("orderId").in_path());

        let url = build_url(
            "https://store.example.com",
            "/api/oms/pvt/orders/{orderId}",
            &schema,
            &input(json!({"orderId": "v212333lux-02"})),
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://store.example.com/api/oms/pvt/orders/v212333lux-02"
        );
    }

    #[test]
    fn should_escape_slashes_in_path_values() {
        let schema = ObjectSchema::new().field(Field::string("orderId").in_path());

        let url = build_url(
            "https://store.example.com",
            "/api/oms/pvt/orders/{orderId}",
            &schema,
            &input(json!({"orderId": "a/b"})),
        )
        .unwrap();

        assert_eq!(url.path(), "/api/oms/pvt/orders/a%2Fb");
    }

    #[test]
    fn should_reject_dot_segments_in_path_values() {
        let schema = ObjectSchema::new().field(Field::string("orderId").in_path());

        for order_id in [".", "..", "%2e%2E", ".%2e"] {
            let err = build_url(
                "https://store.example.com",
                "/api/oms/pvt/orders/{orderId}",
                &schema,
                &input(json!({ "orderId": order_id })),
            )
            .unwrap_err();

            match err {
                ToolError::Validation { path, message } => {
                    assert_eq!(path, "/orderId");
                    assert!(message.contains("must not be"), "message: {}", message);
                }
                other => panic!("unexpected error for {:?}: {:?}", order_id, other),
            }
        }
    }

    #[test]
    fn should_keep_dotted_ids_as_one_segment() {
        let schema = ObjectSchema::new().field(Field::string("orderId").in_path());

        let url = build_url(
            "https://store.example.com",
            "/api/oms/pvt/orders/{orderId}",
            &schema,
            &input(json!({"orderId": "v1...01"})),
        )
        .unwrap();

        assert_eq!(url.path(), "/api/oms/pvt/orders/v1...01");
    }

    #[test]
    fn should_reject_missing_path_value() {
        let schema = ObjectSchema::new().field(Field::string("orderId").in_path());

        let err = build_url(
            "https://store.example.com",
            "/api/oms/pvt/orders/{orderId}",
            &schema,
            &Map::new(),
        )
        .unwrap_err();

        assert!(matches!(err, ToolError::Validation { ref path, .. } if path == "/orderId"));
    }

    #[test]
    fn should_reject_invalid_base_url() {
        let err = build_url("not a url", "/api", &list_schema(), &Map::new()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidContext(_)));
    }
}
