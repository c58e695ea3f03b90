// Translator Configuration
// Loaded from TOML; every key is optional and falls back to the defaults below.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::vm_translator::error::TranslatorError;

/// How return-address labels are derived at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReturnLabelScheme {
    /// `<callee>$ret.<n>`, unique per call site
    PerCallSite,
    /// `<callee>$ret`, the legacy text; collides when a callee has more than one call site
    PerCallee,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorConfig {
    /// Cell preceding the temp segment; temp offsets 1..=8 land on base+offset.
    pub temp_base: u16,
    pub return_labels: ReturnLabelScheme,
    /// Emit a `// <source line>` comment before each translated instruction.
    pub annotate: bool,
    /// Unit translated first in directory mode.
    pub entry_point: String,
    /// Prefix the output with `SP=256` and a call to `Sys.init`.
    pub bootstrap: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            temp_base: 5,
            return_labels: ReturnLabelScheme::PerCallSite,
            annotate: true,
            entry_point: "Sys".to_string(),
            bootstrap: false,
        }
    }
}

impl TranslatorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, TranslatorError> {
        toml::from_str(text).map_err(|err| TranslatorError::ConfigError(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, TranslatorError> {
        let text = fs::read_to_string(path).map_err(|err| {
            TranslatorError::IOError(format!("reading '{}': {}", path.display(), err))
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = TranslatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, TranslatorConfig::default());
        assert_eq!(config.temp_base, 5);
        assert_eq!(config.return_labels, ReturnLabelScheme::PerCallSite);
    }

    #[test]
    fn test_partial_document_overrides_only_given_keys() {
        let config = TranslatorConfig::from_toml_str(
            r#"
            temp_base = 20
            return_labels = "per-callee"
            "#,
        )
        .unwrap();
        assert_eq!(config.temp_base, 20);
        assert_eq!(config.return_labels, ReturnLabelScheme::PerCallee);
        assert!(config.annotate);
        assert_eq!(config.entry_point, "Sys");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = TranslatorConfig::from_toml_str("tmp_base = 3");
        assert!(matches!(result, Err(TranslatorError::ConfigError(_))));
    }

    #[test]
    fn test_bad_scheme_is_rejected() {
        let result = TranslatorConfig::from_toml_str(r#"return_labels = "per-file""#);
        assert!(matches!(result, Err(TranslatorError::ConfigError(_))));
    }
}
