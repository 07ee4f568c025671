#[cfg(test)]
mod tests {
    use modelier_core::{AsValue, FieldMap, RowLabeled, Value, fields};
    use std::borrow::Cow;

    #[test]
    fn value_none() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Float64(Some(1.0)), Value::Null);
        assert_ne!(Value::Varchar(None), Value::Null);
        assert!(Value::Varchar(None).is_null());
        assert!(Value::Null.is_null());
        assert!(!Value::Int64(Some(0)).is_null());
    }

    #[test]
    fn value_bool() {
        let val: Value = true.into();
        assert_eq!(val, Value::Boolean(Some(true)));
        assert_ne!(val, Value::Boolean(Some(false)));
        assert_ne!(val, Value::Boolean(None));
        assert_ne!(val, Value::Varchar(Some("true".into())));
        assert!(bool::try_from_value(val).unwrap());
        assert!(bool::try_from_value(Value::Int64(Some(3))).unwrap());
        assert!(!bool::try_from_value(Value::Int64(Some(0))).unwrap());
        assert!(bool::try_from_value(Value::Float64(Some(0.5))).is_err());
    }

    #[test]
    fn value_integers() {
        let val: Value = (-12_i8).into();
        assert_eq!(val, Value::Int64(Some(-12)));
        assert_eq!(i8::try_from_value(val).unwrap(), -12);
        let val = 4_000_000_000_u32.as_value();
        assert_eq!(val, Value::Int64(Some(4_000_000_000)));
        assert!(i32::try_from_value(val.clone()).is_err());
        assert_eq!(i64::try_from_value(val).unwrap(), 4_000_000_000);
        assert_eq!(u16::try_from_value(Value::Varchar(Some(" 42 ".into()))).unwrap(), 42);
        assert!(u8::try_from_value(Value::Varchar(Some("42abc".into()))).is_err());
        assert!(i64::try_from_value(Value::Float64(Some(1.0))).is_err());
        assert!(i64::try_from_value(Value::Null).is_err());
    }

    #[test]
    fn value_floats() {
        let val = 1.5_f32.as_value();
        assert_eq!(val, Value::Float64(Some(1.5)));
        assert_eq!(f64::try_from_value(val).unwrap(), 1.5);
        assert_eq!(f64::try_from_value(Value::Int64(Some(7))).unwrap(), 7.0);
        assert_eq!(f32::try_from_value(Value::Varchar(Some("0.25".into()))).unwrap(), 0.25);
        assert!(f64::try_from_value(Value::Boolean(Some(true))).is_err());
    }

    #[test]
    fn value_text() {
        let val: Value = "hello".into();
        assert_eq!(val, Value::Varchar(Some("hello".into())));
        assert_eq!(String::try_from_value(val).unwrap(), "hello");
        assert_eq!(String::try_from_value(Value::Int64(Some(12))).unwrap(), "12");
        assert!(String::try_from_value(Value::Varchar(None)).is_err());
        let cow: Cow<'static, str> = AsValue::try_from_value("world".into()).unwrap();
        assert_eq!(cow, "world");
        assert_eq!(Cow::<'static, str>::as_empty_value(), Value::Varchar(None));
    }

    #[test]
    fn value_option() {
        assert_eq!(None::<i32>.as_value(), Value::Int64(None));
        assert_eq!(Some(5_i32).as_value(), Value::Int64(Some(5)));
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i32>::try_from_value(Value::Int64(None)).unwrap(), None);
        assert_eq!(
            Option::<String>::try_from_value("x".into()).unwrap(),
            Some("x".to_string())
        );
    }

    #[test]
    fn value_cast() {
        let text = Value::Varchar(None);
        let integer = Value::Int64(None);
        assert_eq!(
            Value::Int64(Some(1)).cast(&text).unwrap(),
            Value::Varchar(Some("1".into()))
        );
        assert_eq!(
            Value::Varchar(Some("123".into())).cast(&integer).unwrap(),
            Value::Int64(Some(123))
        );
        assert_eq!(
            Value::Float64(Some(3.0)).cast(&integer).unwrap(),
            Value::Int64(Some(3))
        );
        assert!(Value::Float64(Some(3.5)).cast(&integer).is_err());
        assert!(Value::Float64(Some(1e30)).cast(&integer).is_err());
        assert!(Value::Float64(Some(-1e30)).cast(&integer).is_err());
        assert!(Value::Float64(Some(i64::MAX as f64)).cast(&integer).is_err());
        assert!(Value::Float64(Some(f64::INFINITY)).cast(&integer).is_err());
        assert_eq!(
            Value::Float64(Some(i64::MIN as f64)).cast(&integer).unwrap(),
            Value::Int64(Some(i64::MIN))
        );
        assert!(Value::Varchar(Some("nothing".into())).cast(&integer).is_err());
        assert_eq!(Value::Null.cast(&integer).unwrap(), Value::Int64(None));
        assert_eq!(
            Value::Varchar(Some("false".into()))
                .cast(&Value::Boolean(None))
                .unwrap(),
            Value::Boolean(Some(false))
        );
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Varchar(None).to_string(), "NULL");
        assert_eq!(Value::Boolean(Some(true)).to_string(), "true");
        assert_eq!(Value::Int64(Some(-3)).to_string(), "-3");
        assert_eq!(Value::Varchar(Some("boo".into())).to_string(), "boo");
    }

    #[test]
    fn field_map_overwrites_in_place() {
        let mut map = fields! { "a" => 1_i64, "b" => "two" };
        assert_eq!(map.insert("a", 3_i64), Some(Value::Int64(Some(1))));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(map.get("a"), Some(&Value::Int64(Some(3))));
        assert_eq!(map.insert("c", true), None);
        assert_eq!(map.len(), 3);
        assert_eq!(map.remove("b"), Some(Value::Varchar(Some("two".into()))));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "c"]);
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn field_map_merge() {
        let base = fields! { "username" => "nikolay", "admin" => false };
        let merged = base.merged(fields! { "admin" => true, "email" => "n@example.com" });
        assert_eq!(base.get("admin"), Some(&Value::Boolean(Some(false))));
        assert_eq!(
            merged,
            fields! { "username" => "nikolay", "admin" => true, "email" => "n@example.com" }
        );
        assert_eq!(merged.keys().collect::<Vec<_>>(), ["username", "admin", "email"]);
    }

    #[test]
    fn field_map_equality_ignores_order() {
        assert_eq!(
            fields! { "a" => 1_i64, "b" => 2_i64 },
            fields! { "b" => 2_i64, "a" => 1_i64 }
        );
        assert_ne!(fields! { "a" => 1_i64 }, fields! { "a" => 1_i64, "b" => 2_i64 });
        assert_eq!(FieldMap::new(), fields! {});
        assert_eq!(
            fields! { "a" => 1_i64, "b" => "x" }.to_string(),
            "{a: 1, b: x}"
        );
    }

    #[test]
    fn row_labeled_conversion() {
        let row: RowLabeled = fields! { "id" => "1", "username" => "user-1" }.into();
        assert_eq!(row.names(), ["id", "username"]);
        assert_eq!(
            row.get_column("username"),
            Some(&Value::Varchar(Some("user-1".into())))
        );
        assert_eq!(row.get_column("password"), None);
        let map: FieldMap = row.into();
        assert_eq!(map, fields! { "username" => "user-1", "id" => "1" });
    }
}
