// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct User {
    id: u32,
    name: String,
}

#[test]
fn json_encoder_is_compact() {
    let encoder = JsonEncoder::<User>::new();
    let fragment = encoder
        .encode(&User {
            id: 1,
            name: "ana".to_string(),
        })
        .unwrap();
    assert_eq!(fragment, r#"{"id":1,"name":"ana"}"#);
}

#[test]
fn json_encoder_keeps_html_and_unicode() {
    let encoder = JsonEncoder::<String>::new();
    assert_eq!(encoder.encode(&"<b>é</b>".to_string()).unwrap(), r#""<b>é</b>""#);
}

#[test]
fn json_encoder_rejects_non_string_keys() {
    let encoder = JsonEncoder::<BTreeMap<(u8, u8), u8>>::new();
    let mut map = BTreeMap::new();
    map.insert((1, 2), 3);
    assert!(matches!(encoder.encode(&map), Err(EncodeError::Json(_))));
}

#[test]
fn raw_encoder_trims() {
    let fragment = RawJsonEncoder.encode(&"  {\"id\":1}\n".to_string()).unwrap();
    assert_eq!(fragment, r#"{"id":1}"#);
}

#[test]
fn raw_encoder_rejects_blank() {
    assert!(matches!(
        RawJsonEncoder.encode(&"   ".to_string()),
        Err(EncodeError::EmptyFragment)
    ));
}

#[test]
fn encoder_by_reference() {
    let encoder = JsonEncoder::<u8>::new();
    let by_ref = &encoder;
    assert_eq!(by_ref.encode(&7).unwrap(), "7");
}
