/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// Objects become sections, arrays pick their shape with
/// [`Value::from_elements`](crate::Value::from_elements), and any other
/// expression goes through [`to_value`](crate::to_value).
///
/// ```rust
/// use serde_ini_codec::{ini, Value};
///
/// let doc = ini!({
///     "name": "demo",
///     "server": { "port": 8080, "tags": ["a", "b"] }
/// });
/// let server = doc.as_section().and_then(|d| d.get("server")).unwrap();
/// assert!(server.is_section());
/// ```
#[macro_export]
macro_rules! ini {
    (null) => {
        $crate::Value::Unsupported("null")
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Strings(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::from_elements(vec![$($crate::ini!($elem)),*])
    };

    ({}) => {
        $crate::Value::Section($crate::IniMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut section = $crate::IniMap::new();
        $(
            section.insert($key.to_string(), $crate::ini!($value));
        )*
        $crate::Value::Section(section)
    }};

    ($other:expr) => {
        $crate::to_value(&$other).unwrap_or($crate::Value::Unsupported("unserializable"))
    };
}

#[cfg(test)]
mod tests {
    use crate::{IniMap, Number, Value};

    #[test]
    fn test_scalars() {
        assert_eq!(ini!(null), Value::Unsupported("null"));
        assert_eq!(ini!(true), Value::Bool(true));
        assert_eq!(ini!(42), Value::Number(Number::Integer(42)));
        assert_eq!(ini!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(ini!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_arrays_take_their_shape_from_elements() {
        assert_eq!(ini!([]), Value::Strings(vec![]));
        assert_eq!(ini!(["a", "b"]), Value::Strings(vec!["a".into(), "b".into()]));
        assert_eq!(ini!([1, 2, 3]), Value::Integers(vec![1, 2, 3]));
        assert!(ini!([1, "a"]).is_unsupported());
    }

    #[test]
    fn test_objects_become_sections() {
        assert_eq!(ini!({}), Value::Section(IniMap::new()));

        let doc = ini!({
            "name": "Alice",
            "db": { "port": 5432 }
        });
        let section = doc.as_section().unwrap();
        assert_eq!(section.len(), 2);
        assert_eq!(section.get("name"), Some(&Value::from("Alice")));
        assert_eq!(
            section.get("db").and_then(Value::as_section).and_then(|db| db.get("port")),
            Some(&Value::from(5432))
        );
    }
}
