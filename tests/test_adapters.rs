//! Adapter invariant fuzz
//!
//! Every adapter, fed any status/body combination, must uphold the envelope
//! invariants: success never co-occurs with an error, and the reported status
//! matches the wire status.

use bytes::Bytes;
use proptest::prelude::*;
use serde_json::{Map, Value, json};
use uplink::http::{HeaderMap, RawResponse, StatusCode};
use uplink::AdapterKind;

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Bodies skewed toward the shapes the adapters dispatch on: plain JSON,
/// envelope-shaped objects with `isSuccess`, and objects with error fields.
fn arb_body() -> impl Strategy<Value = Value> {
    (
        arb_json(),
        proptest::option::of(any::<bool>()),
        proptest::option::of("[a-z]{1,10}"),
    )
        .prop_map(|(inner, is_success, error_message)| {
            match (is_success, error_message) {
                (None, None) => inner,
                (is_success, error_message) => {
                    let mut object = Map::new();
                    object.insert("data".to_string(), inner);
                    if let Some(flag) = is_success {
                        object.insert("isSuccess".to_string(), Value::Bool(flag));
                    }
                    if let Some(message) = error_message {
                        object.insert(
                            "error".to_string(),
                            json!({"code": "E", "message": message}),
                        );
                    }
                    Value::Object(object)
                }
            }
        })
}

fn raw_response(status: u16, body: &Value) -> RawResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        "application/json".parse().unwrap(),
    );
    RawResponse::new(
        StatusCode::from_u16(status).unwrap(),
        headers,
        Bytes::from(serde_json::to_vec(body).unwrap()),
    )
}

proptest! {
    #[test]
    fn invariant_success_excludes_error(
        status in 100u16..=599,
        body in arb_body(),
    ) {
        let raw = raw_response(status, &body);
        for kind in [AdapterKind::Standard, AdapterKind::Raw, AdapterKind::Smart] {
            let envelope = kind.adapt(&raw, body.clone());
            prop_assert!(
                !(envelope.is_success && envelope.error.is_some()),
                "{kind:?} produced a successful envelope with an error for status {status}"
            );
            prop_assert_eq!(envelope.status, status);
        }
    }

    #[test]
    fn smart_agrees_with_standard_on_enveloped_bodies(
        status in 100u16..=599,
        data in arb_json(),
        flag in any::<bool>(),
    ) {
        let body = json!({"data": data, "isSuccess": flag});
        let raw = raw_response(status, &body);
        prop_assert_eq!(
            AdapterKind::Smart.adapt(&raw, body.clone()),
            AdapterKind::Standard.adapt(&raw, body)
        );
    }

    #[test]
    fn smart_agrees_with_raw_on_sequences(
        status in 100u16..=599,
        items in prop::collection::vec(arb_json(), 0..5),
    ) {
        let body = Value::Array(items);
        let raw = raw_response(status, &body);
        prop_assert_eq!(
            AdapterKind::Smart.adapt(&raw, body.clone()),
            AdapterKind::Raw.adapt(&raw, body)
        );
    }

    #[test]
    fn failure_envelopes_carry_a_status_code_string(
        status in 400u16..=599,
        body in arb_json(),
    ) {
        let raw = raw_response(status, &body);
        let envelope = AdapterKind::Raw.adapt(&raw, body);
        prop_assert!(!envelope.is_success);
        let status_str = status.to_string();
        prop_assert_eq!(envelope.error_code(), Some(status_str.as_str()));
    }
}
