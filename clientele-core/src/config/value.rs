use std::borrow::Cow;
use std::collections::HashMap;

use serde_yaml::Value as Yaml;

use super::ConfigError;

/// A configuration leaf as read from YAML or the environment.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<ConfigValue>),
    Map(HashMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Scalar rendered as text. Environment values always arrive this way,
    /// so every typed conversion falls back to parsing it.
    fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            ConfigValue::String(s) => Some(Cow::Borrowed(s.trim())),
            ConfigValue::Integer(i) => Some(Cow::Owned(i.to_string())),
            ConfigValue::Float(f) => Some(Cow::Owned(f.to_string())),
            ConfigValue::Bool(b) => Some(Cow::Owned(b.to_string())),
            ConfigValue::Null | ConfigValue::List(_) | ConfigValue::Map(_) => None,
        }
    }
}

pub(crate) fn yaml_key(key: &Yaml) -> String {
    match key {
        Yaml::String(s) => s.clone(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        other => format!("{other:?}"),
    }
}

impl From<&Yaml> for ConfigValue {
    fn from(node: &Yaml) -> Self {
        match node {
            Yaml::Null => ConfigValue::Null,
            Yaml::Bool(b) => ConfigValue::Bool(*b),
            Yaml::Number(n) => n
                .as_i64()
                .map(ConfigValue::Integer)
                .or_else(|| n.as_f64().map(ConfigValue::Float))
                .unwrap_or_else(|| ConfigValue::String(n.to_string())),
            Yaml::String(s) => ConfigValue::String(s.clone()),
            Yaml::Sequence(items) => {
                ConfigValue::List(items.iter().map(ConfigValue::from).collect())
            }
            Yaml::Mapping(entries) => ConfigValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| (yaml_key(k), ConfigValue::from(v)))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => ConfigValue::from(&tagged.value),
        }
    }
}

fn mismatch(key: &str, expected: &'static str) -> ConfigError {
    ConfigError::TypeMismatch {
        key: key.to_string(),
        expected,
    }
}

/// Conversion from a [`ConfigValue`] found under `key`.
pub trait FromConfigValue: Sized {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError>;
}

impl FromConfigValue for String {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::String(s) => Ok(s.clone()),
            other => other
                .text()
                .map(Cow::into_owned)
                .ok_or_else(|| mismatch(key, "String")),
        }
    }
}

impl FromConfigValue for bool {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        if let ConfigValue::Bool(b) = value {
            return Ok(*b);
        }
        match value.text().map(|t| t.to_ascii_lowercase()).as_deref() {
            Some("true" | "yes" | "on" | "1") => Ok(true),
            Some("false" | "no" | "off" | "0") => Ok(false),
            _ => Err(mismatch(key, "bool")),
        }
    }
}

impl FromConfigValue for f64 {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Float(f) => Ok(*f),
            ConfigValue::Integer(i) => Ok(*i as f64),
            other => other
                .text()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| mismatch(key, "f64")),
        }
    }
}

macro_rules! integer_config_value {
    ($($ty:ty),+) => {
        $(
            impl FromConfigValue for $ty {
                fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
                    let parsed = match value {
                        ConfigValue::Integer(i) => <$ty>::try_from(*i).ok(),
                        other => other.text().and_then(|t| t.parse().ok()),
                    };
                    parsed.ok_or_else(|| mismatch(key, stringify!($ty)))
                }
            }
        )+
    };
}

integer_config_value!(i32, i64, u8, u16, u32, u64, usize);

impl<V: FromConfigValue> FromConfigValue for Option<V> {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        if matches!(value, ConfigValue::Null) {
            Ok(None)
        } else {
            V::from_config_value(value, key).map(Some)
        }
    }
}

/// A scalar reads as a one-element list.
impl<V: FromConfigValue> FromConfigValue for Vec<V> {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        let ConfigValue::List(items) = value else {
            return Ok(vec![V::from_config_value(value, key)?]);
        };
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            out.push(V::from_config_value(item, &format!("{key}[{index}]"))?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_numbers_parse() {
        let v = ConfigValue::String(" 12 ".into());
        assert_eq!(u32::from_config_value(&v, "k").unwrap(), 12);
    }

    #[test]
    fn negative_into_unsigned_is_mismatch() {
        let v = ConfigValue::Integer(-1);
        let err = u32::from_config_value(&v, "pool").unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { expected: "u32", .. }));
    }

    #[test]
    fn bool_accepts_yes_no() {
        assert!(bool::from_config_value(&ConfigValue::String("Yes".into()), "k").unwrap());
        assert!(!bool::from_config_value(&ConfigValue::String("0".into()), "k").unwrap());
    }

    #[test]
    fn list_element_errors_name_the_index() {
        let v = ConfigValue::List(vec![ConfigValue::Integer(1), ConfigValue::Bool(true)]);
        let err = Vec::<u8>::from_config_value(&v, "sizes").unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { ref key, .. } if key == "sizes[1]"));
    }

    #[test]
    fn tagged_yaml_is_unwrapped() {
        let yaml: Yaml = serde_yaml::from_str("!secret hunter2").unwrap();
        assert_eq!(ConfigValue::from(&yaml), ConfigValue::String("hunter2".into()));
    }
}
