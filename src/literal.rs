//! Decoding of TOML literals into runtime values.
//!
//! TOML scalars and arrays map directly onto `Value`. Tables encode the
//! kinds TOML has no syntax for:
//!
//! | Table | Value |
//! |---|---|
//! | `{ "$nil" = true }` | `Nil` |
//! | `{ "$bytes" = [1, 2] }` | `Bytes` |
//! | `{ "$bytearray" = [1, 2] }` | `ByteArray` |
//! | `{ "$map" = [[1, "a"], [2, "b"]] }` | `Map` with arbitrary keys |
//! | any other table | `Map` with string keys |
//!
//! Byte elements are masked exactly like `bytearray([...])`.

use polyrt_core::{Key, Map, Value, bytearray_from, bytes};

use crate::error::{HarnessError, HarnessResult};

pub fn decode(literal: &toml::Value) -> HarnessResult<Value> {
    Ok(match literal {
        toml::Value::String(s) => Value::from(s.as_str()),
        toml::Value::Integer(i) => Value::Int(*i),
        toml::Value::Float(f) => Value::Float(*f),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Array(items) => Value::list(
            items
                .iter()
                .map(decode)
                .collect::<HarnessResult<Vec<_>>>()?,
        ),
        toml::Value::Table(table) => return decode_table(table),
        toml::Value::Datetime(datetime) => {
            return Err(HarnessError::invalid_literal(format_args!(
                "datetime {datetime} has no runtime value"
            )));
        }
    })
}

fn decode_table(table: &toml::Table) -> HarnessResult<Value> {
    let mut entries = table.iter();
    if let (Some((tag, payload)), None) = (entries.next(), entries.next()) {
        match tag.as_str() {
            "$nil" => return Ok(Value::Nil),
            "$bytes" => return Ok(Value::Bytes(bytes(&decode(payload)?)?)),
            "$bytearray" => return Ok(Value::ByteArray(bytearray_from(&decode(payload)?)?)),
            "$map" => return decode_pairs(payload),
            other if other.starts_with('$') => {
                return Err(HarnessError::invalid_literal(format_args!(
                    "unknown tag '{other}'"
                )));
            }
            _ => {}
        }
    }
    let map = Map::new();
    for (key, item) in table {
        map.insert(Key::from(key.as_str()), decode(item)?);
    }
    Ok(Value::Map(map))
}

fn decode_pairs(payload: &toml::Value) -> HarnessResult<Value> {
    let pairs = payload
        .as_array()
        .ok_or_else(|| HarnessError::invalid_literal("'$map' expects an array of pairs"))?;
    let map = Map::new();
    for pair in pairs {
        match pair.as_array().map(Vec::as_slice) {
            Some([key, value]) => {
                map.insert(Key::from_value(&decode(key)?)?, decode(value)?);
            }
            _ => {
                return Err(HarnessError::invalid_literal(format_args!(
                    "'$map' entry {pair} is not a [key, value] pair"
                )));
            }
        }
    }
    Ok(Value::Map(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyrt_core::repr;

    fn decode_str(text: &str) -> HarnessResult<Value> {
        let table: toml::Table = toml::from_str(&format!("v = {text}")).unwrap();
        decode(&table["v"])
    }

    #[test]
    fn scalars_and_arrays() {
        let value = decode_str(r#"[1, 2.5, "a", true, [ ]]"#).unwrap();
        assert_eq!(repr(&value), "[1, 2.5, 'a', True, []]");
    }

    #[test]
    fn tagged_tables() {
        assert_eq!(repr(&decode_str(r#"{ "$nil" = true }"#).unwrap()), "None");
        assert_eq!(
            repr(&decode_str(r#"{ "$bytes" = [300, -1, 65] }"#).unwrap()),
            r"b',\xffA'"
        );
        assert_eq!(
            repr(&decode_str(r#"{ "$bytearray" = [104, 105] }"#).unwrap()),
            "bytearray(b'hi')"
        );
        assert_eq!(
            repr(&decode_str(r#"{ "$map" = [[2, "b"], [1.0, "a"]] }"#).unwrap()),
            "{1: 'a', 2: 'b'}"
        );
        assert_eq!(repr(&decode_str(r#"{ b = 1, a = 2 }"#).unwrap()), "{'a': 2, 'b': 1}");
    }

    #[test]
    fn rejects_unknown_tags_and_unhashable_keys() {
        let err = decode_str(r#"{ "$set" = [1] }"#).unwrap_err();
        assert_eq!(err.to_string(), "Invalid literal: unknown tag '$set'");

        let err = decode_str(r#"{ "$map" = [[[1], 2]] }"#).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: hash: unhashable type: 'list'");

        assert!(decode_str(r#"{ "$map" = [[1]] }"#).is_err());
        assert!(decode_str("1979-05-27").is_err());
    }
}
