use std::collections::HashMap;
use std::path::Path;

use serde_yaml::Value as Yaml;

use super::value::{yaml_key, ConfigValue};
use super::ConfigError;

/// Merge `path` into `values`. An absent file contributes nothing.
pub(crate) fn load_yaml_file(
    path: &Path,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(ConfigError::Load(format!("{}: {e}", path.display()))),
    };
    load_yaml_str(&content, values).map_err(|e| match e {
        ConfigError::Load(msg) => ConfigError::Load(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Merge a YAML document into `values`, later documents overriding earlier keys.
pub(crate) fn load_yaml_str(
    content: &str,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    let document: Yaml =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
    let mut path = Vec::new();
    flatten(&document, &mut path, values);
    Ok(())
}

/// Walk the tree, emitting one dotted key per leaf. A sequence is stored whole
/// under its own key and each element again under `key.N`.
fn flatten(node: &Yaml, path: &mut Vec<String>, out: &mut HashMap<String, ConfigValue>) {
    match node {
        Yaml::Mapping(entries) => {
            for (name, child) in entries {
                path.push(yaml_key(name));
                flatten(child, path, out);
                path.pop();
            }
        }
        Yaml::Tagged(tagged) => flatten(&tagged.value, path, out),
        _ if path.is_empty() => {}
        Yaml::Sequence(items) => {
            out.insert(path.join("."), ConfigValue::from(node));
            for (index, item) in items.iter().enumerate() {
                path.push(index.to_string());
                flatten(item, path, out);
                path.pop();
            }
        }
        scalar => {
            out.insert(path.join("."), ConfigValue::from(scalar));
        }
    }
}
