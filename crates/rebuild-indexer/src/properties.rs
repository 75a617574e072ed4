//! Line-oriented `key = value` property documents
//!
//! Both `key=value` and `key = value` forms occur in the attestation
//! corpus; values may be wrapped in double quotes.

use crate::error::{IndexError, IndexResult};
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed property document, keyed by property name.
pub type Properties = BTreeMap<String, String>;

/// Read and parse a property file.
pub fn load(path: &Path) -> IndexResult<Properties> {
    let content = std::fs::read_to_string(path).map_err(|source| IndexError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&content))
}

/// Parse property document content. Lines without a `=` are ignored;
/// later occurrences of a key overwrite earlier ones.
pub fn parse(content: &str) -> Properties {
    let mut properties = Properties::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let mut value = value.trim();
            if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
                value = &value[1..value.len() - 1];
            }
            properties.insert(key.to_string(), value.to_string());
        }
    }

    properties
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_pairs() {
        let props = parse("group-id=org.example\nartifact-id = demo\n");
        assert_eq!(props.get("group-id").map(String::as_str), Some("org.example"));
        assert_eq!(props.get("artifact-id").map(String::as_str), Some("demo"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let props = parse("java.version=\"17.0.2\"\nos.name = \"Linux\"");
        assert_eq!(props.get("java.version").map(String::as_str), Some("17.0.2"));
        assert_eq!(props.get("os.name").map(String::as_str), Some("Linux"));
    }

    #[test]
    fn test_parse_skips_blank_and_malformed_lines() {
        let props = parse("\n\njust some text\nkey=value\n");
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("key").map(String::as_str), Some("value"));
    }

    #[test]
    fn test_parse_value_containing_equals() {
        let props = parse("source.scm.uri=scm:git:https://github.com/example/demo.git?branch=main");
        assert_eq!(
            props.get("source.scm.uri").map(String::as_str),
            Some("scm:git:https://github.com/example/demo.git?branch=main")
        );
    }

    #[test]
    fn test_later_keys_overwrite() {
        let props = parse("key=a\nkey=b");
        assert_eq!(props.get("key").map(String::as_str), Some("b"));
    }
}
