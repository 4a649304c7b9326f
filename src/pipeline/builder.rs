//! Mapping from resolved entries to Algolia `addObject` requests.

use serde_json::{Map, Number, Value};

use crate::algolia::IndexRequest;
use crate::contentful::ResolvedEntry;

/// Fields consulted, in order, for the record's `objectID`.
pub const OBJECT_ID_FIELDS: [&str; 2] = ["slug", "id"];

/// Derive the record key: truthy `fields.slug`, else truthy `fields.id`.
///
/// Strings are used as-is and numbers in decimal form; any other value is skipped. Entries
/// with neither field get no key, which leaves assignment to the index API.
pub fn object_id(entry: &ResolvedEntry) -> Option<String> {
    OBJECT_ID_FIELDS
        .iter()
        .find_map(|name| entry.truthy_field(name).and_then(key_string))
}

fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number_key(number)),
        _ => None,
    }
}

/// Whole-valued floats print without a fractional part, so `1.0` keys as `"1"`.
fn number_key(number: &Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() && value.fract() == 0.0 && value.abs() < 1e21 => {
            format!("{value:.0}")
        }
        _ => number.to_string(),
    }
}

/// Build the `addObject` request for one entry: its fields plus `objectID`.
pub fn build_index_request(entry: &ResolvedEntry) -> IndexRequest {
    let mut body: Map<String, Value> = entry.fields().cloned().unwrap_or_default();
    match object_id(entry) {
        Some(id) => {
            body.insert("objectID".into(), Value::String(id));
        }
        None => {
            tracing::warn!(entry = ?entry.id(), "Entry has no slug or id; objectID left unset");
        }
    }
    IndexRequest::add_object(body)
}

/// Build requests for a sequence of entries, preserving order.
pub fn build_index_requests<'a, I>(entries: I) -> Vec<IndexRequest>
where
    I: IntoIterator<Item = &'a ResolvedEntry>,
{
    entries.into_iter().map(build_index_request).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algolia::BatchAction;
    use crate::pipeline::filter::filter_searchable;
    use serde_json::json;

    fn entry(value: Value) -> ResolvedEntry {
        ResolvedEntry::from_value(value).expect("object entry")
    }

    #[test]
    fn slug_wins_over_id() {
        let entry = entry(json!({ "fields": { "slug": "abc", "id": "42" } }));
        assert_eq!(object_id(&entry).as_deref(), Some("abc"));
    }

    #[test]
    fn falls_back_to_id_when_slug_missing_or_empty() {
        assert_eq!(
            object_id(&entry(json!({ "fields": { "id": "42" } }))).as_deref(),
            Some("42")
        );
        assert_eq!(
            object_id(&entry(json!({ "fields": { "slug": "", "id": "42" } }))).as_deref(),
            Some("42")
        );
        assert_eq!(
            object_id(&entry(json!({ "fields": { "id": 42 } }))).as_deref(),
            Some("42")
        );
    }

    #[test]
    fn whole_float_ids_key_as_integers() {
        assert_eq!(
            object_id(&entry(json!({ "fields": { "id": 1.0 } }))).as_deref(),
            Some("1")
        );
        assert_eq!(
            object_id(&entry(json!({ "fields": { "id": 2.5 } }))).as_deref(),
            Some("2.5")
        );
        assert_eq!(
            object_id(&entry(json!({ "fields": { "id": -3.0 } }))).as_deref(),
            Some("-3")
        );
    }

    #[test]
    fn missing_keys_leave_object_id_unset() {
        let request = build_index_request(&entry(json!({ "fields": { "title": "t" } })));
        assert_eq!(request.object_id(), None);
        assert!(!request.body.contains_key("objectID"));
        assert_eq!(request.body["title"], json!("t"));
    }

    #[test]
    fn searchable_scenario_produces_single_request() {
        let input = vec![
            entry(json!({ "fields": { "isSearchable": true, "slug": "a" } })),
            entry(json!({ "fields": { "isSearchable": false, "slug": "b" } })),
        ];

        let requests = build_index_requests(filter_searchable(&input));

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].action, BatchAction::AddObject);
        assert_eq!(
            serde_json::to_value(&requests).expect("serialize"),
            json!([{
                "action": "addObject",
                "body": { "isSearchable": true, "slug": "a", "objectID": "a" }
            }])
        );
    }

    #[test]
    fn filter_and_build_are_idempotent() {
        let input = vec![
            entry(json!({ "fields": { "isSearchable": true, "slug": "a", "tags": ["x"] } })),
            entry(json!({ "fields": { "isSearchable": "yes", "id": 7 } })),
            entry(json!({ "fields": { "isSearchable": false, "slug": "c" } })),
        ];

        let first = build_index_requests(filter_searchable(&input));
        let second = build_index_requests(filter_searchable(&input));
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn entry_without_fields_builds_empty_body() {
        let request = build_index_request(&entry(json!({ "sys": { "id": "x" } })));
        assert!(request.body.is_empty());
    }
}
