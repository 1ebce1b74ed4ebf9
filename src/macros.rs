/// Builds a [`Variable`](crate::Variable) from a JSON-like literal.
///
/// Map entries keep the order they are written in. Any other expression is
/// converted with `Variable::from`, so integer literals become `Int32` and
/// float literals `Float64` unless suffixed.
///
/// ```rust
/// use bintoken::{variable, Kind, Variable};
///
/// let value = variable!({
///     "id": 7u64,
///     "tags": ["a", "b"],
///     "owner": null
/// });
/// assert_eq!(value["id"].kind(), Kind::UInt64);
/// assert_eq!(value["tags"][1], Variable::from("b"));
/// assert!(value["owner"].is_null());
/// ```
#[macro_export]
macro_rules! variable {
    (null) => {
        $crate::Variable::Null
    };

    (true) => {
        $crate::Variable::Boolean(true)
    };

    (false) => {
        $crate::Variable::Boolean(false)
    };

    ([]) => {
        $crate::Variable::Array(::std::vec::Vec::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Variable::Array(vec![$($crate::variable!($elem)),*])
    };

    ({}) => {
        $crate::Variable::Map($crate::VariableMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::VariableMap::new();
        $(
            map.insert($key.to_string(), $crate::variable!($value));
        )*
        $crate::Variable::Map(map)
    }};

    ($other:expr) => {
        $crate::Variable::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Kind, Variable, VariableMap};

    #[test]
    fn test_variable_macro_primitives() {
        assert_eq!(variable!(null), Variable::Null);
        assert_eq!(variable!(true), Variable::Boolean(true));
        assert_eq!(variable!(42).kind(), Kind::Int32);
        assert_eq!(variable!(42u8).kind(), Kind::UInt8);
        assert_eq!(variable!(3.5).kind(), Kind::Float64);
        assert_eq!(variable!(-1), Variable::Int32(-1));
        assert_eq!(variable!("hello"), Variable::String("hello".to_string()));
    }

    #[test]
    fn test_variable_macro_nested() {
        assert_eq!(variable!([]), Variable::Array(vec![]));
        assert_eq!(variable!({}), Variable::Map(VariableMap::new()));

        let value = variable!({
            "z": [1, [true, null]],
            "a": {"inner": "x"},
        });
        let keys: Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(value["z"][1][0], Variable::from(true));
        assert_eq!(value["a"]["inner"], Variable::from("x"));
    }

    #[test]
    fn test_variable_macro_expressions() {
        let name = String::from("dyn");
        let value = variable!([name, (1 + 2)]);
        assert_eq!(value, Variable::array([Variable::from("dyn"), Variable::from(3)]));
    }
}
