//! Templating document loading

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use templar_domain::TemplatingDocument;

/// Reads a document, as YAML for `.yaml`/`.yml` files and JSON otherwise.
pub fn load(path: &Path) -> Result<TemplatingDocument> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let extension = path.extension().and_then(OsStr::to_str).unwrap_or_default();
    let is_yaml = matches!(extension.to_ascii_lowercase().as_str(), "yaml" | "yml");

    if is_yaml {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML in {}", path.display()))
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        let yaml = "list:\n  - name: host\n    type: query\n    current:\n      value: web\n";
        file.write_all(yaml.as_bytes()).unwrap();

        let document = load(file.path()).unwrap();
        assert_eq!(document.list.len(), 1);
        assert_eq!(document.list[0].name, "host");
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"builtins": {{"$__x": "1"}}}}"#).unwrap();

        let document = load(file.path()).unwrap();
        assert!(document.list.is_empty());
        assert_eq!(document.builtins.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/vars.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
