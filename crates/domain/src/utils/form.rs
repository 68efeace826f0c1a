//! URL-encoded form codec with bracket notation
//!
//! Nested values are flattened the way the graph expects them:
//! `players[0][email]=a%40b.c&tags[0]=x`. Decoding accepts both indexed and
//! empty (`tags[]=x`) list brackets.

use url::form_urlencoded;

use crate::constants::MAX_FORM_NESTING;
use crate::types::{ParamValue, Params};

/// Encode parameters as an `application/x-www-form-urlencoded` string.
pub fn encode(params: &Params) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params.iter() {
        flatten(key.to_string(), value, &mut pairs);
    }
    form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish()
}

fn flatten(prefix: String, value: &ParamValue, out: &mut Vec<(String, String)>) {
    match value {
        ParamValue::Text(text) => out.push((prefix, text.clone())),
        ParamValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(format!("{prefix}[{index}]"), item, out);
            }
        }
        ParamValue::Map(params) => {
            for (key, item) in params.iter() {
                flatten(format!("{prefix}[{key}]"), item, out);
            }
        }
    }
}

/// Decode a query string into parameters. Never fails; malformed pairs are
/// kept as literal keys and pairs nested deeper than [`MAX_FORM_NESTING`]
/// are dropped.
pub fn decode(query: &str) -> Params {
    let mut params = Params::new();
    for (raw_key, value) in form_urlencoded::parse(query.as_bytes()) {
        let Some((base, path)) = split_key(&raw_key) else {
            continue;
        };
        if base.is_empty() {
            continue;
        }
        insert_path(&mut params, base, &path, value.into_owned());
    }
    params
}

/// Decode a response body that claims to be form-encoded.
///
/// Returns `None` unless every `&`-separated pair has a non-empty key and an
/// `=`, and the body contains no raw whitespace (which form encoding never
/// produces).
pub fn decode_structure(body: &str) -> Option<Params> {
    let body = body.trim();
    if body.is_empty() || body.chars().any(char::is_whitespace) {
        return None;
    }
    let well_formed = body
        .split('&')
        .filter(|pair| !pair.is_empty())
        .all(|pair| matches!(pair.split_once('='), Some((key, _)) if !key.is_empty()));
    if !well_formed {
        return None;
    }
    let params = decode(body);
    (!params.is_empty()).then_some(params)
}

/// Split `a[b][]` into `("a", ["b", ""])`. Keys with unbalanced brackets are
/// returned whole; `None` means the key nests deeper than
/// [`MAX_FORM_NESTING`].
fn split_key(raw: &str) -> Option<(&str, Vec<String>)> {
    let Some(open) = raw.find('[') else {
        return Some((raw, Vec::new()));
    };
    if open == 0 {
        return Some((raw, Vec::new()));
    }

    let mut path = Vec::new();
    let mut rest = &raw[open..];
    while let Some(stripped) = rest.strip_prefix('[') {
        let Some(close) = stripped.find(']') else {
            return Some((raw, Vec::new()));
        };
        if path.len() == MAX_FORM_NESTING {
            return None;
        }
        path.push(stripped[..close].to_string());
        rest = &stripped[close + 1..];
    }
    if !rest.is_empty() {
        return Some((raw, Vec::new()));
    }
    Some((&raw[..open], path))
}

fn insert_path(target: &mut Params, key: &str, path: &[String], value: String) {
    let Some(next) = path.first() else {
        target.insert(key, value);
        return;
    };

    if !matches!(target.get(key), Some(ParamValue::List(_) | ParamValue::Map(_))) {
        target.insert(key, empty_container(next));
    }
    if let Some(slot) = target.get_mut(key) {
        insert_value(slot, path, value);
    }
}

fn insert_value(slot: &mut ParamValue, path: &[String], value: String) {
    let Some((head, tail)) = path.split_first() else {
        *slot = ParamValue::Text(value);
        return;
    };

    match slot {
        ParamValue::List(items) if head.is_empty() => match tail.first() {
            None => items.push(ParamValue::Text(value)),
            Some(next) => {
                let mut child = empty_container(next);
                insert_value(&mut child, tail, value);
                items.push(child);
            }
        },
        ParamValue::List(items) => {
            // Named key under a list: promote the list to a map keyed by index.
            let mut map = Params::new();
            for (index, item) in items.drain(..).enumerate() {
                map.insert(index.to_string(), item);
            }
            insert_path(&mut map, head, tail, value);
            *slot = ParamValue::Map(map);
        }
        ParamValue::Map(map) if head.is_empty() => {
            let index = map.len().to_string();
            insert_path(map, &index, tail, value);
        }
        ParamValue::Map(map) => insert_path(map, head, tail, value),
        ParamValue::Text(_) => {
            *slot = empty_container(head);
            insert_value(slot, path, value);
        }
    }
}

fn empty_container(next: &str) -> ParamValue {
    if next.is_empty() {
        ParamValue::List(Vec::new())
    } else {
        ParamValue::Map(Params::new())
    }
}
