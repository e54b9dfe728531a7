use crate::config::schema::{self, AnalyzerConfig};
use crate::error::{Error, Result};
use crate::selector::CssSelector;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use validator::Validate;

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<AnalyzerConfig> {
        let path = path.as_ref();
        let mut visited = HashSet::new();
        Self::load_with_inheritance(path, &mut visited, false)
    }

    /// Load `path` if given, otherwise validated defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<AnalyzerConfig> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let config = AnalyzerConfig::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    fn load_with_inheritance(
        path: &Path,
        visited: &mut HashSet<PathBuf>,
        is_parent_load: bool,
    ) -> Result<AnalyzerConfig> {
        let path = fs::canonicalize(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        if visited.contains(&path) {
            return Err(Error::Config(format!(
                "Circular inheritance detected involving {}",
                path.display()
            )));
        }
        visited.insert(path.clone());

        let config = Self::load_file(&path)?;

        let final_config = if let Some(parent_path_str) = &config.extends {
            let parent_path = path
                .parent()
                .ok_or_else(|| {
                    Error::Config(format!(
                        "Cannot determine parent directory for {}",
                        path.display()
                    ))
                })?
                .join(parent_path_str);

            let parent_config = Self::load_with_inheritance(&parent_path, visited, true)?;
            Self::merge_configs(parent_config, config)
        } else {
            config
        };

        if !is_parent_load {
            final_config.validate()?;
        }

        Ok(final_config)
    }

    fn load_file(path: &Path) -> Result<AnalyzerConfig> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Err(Error::Config(format!(
                "Unsupported file extension: {}",
                path.display()
            ))),
        }
    }

    /// Child values win wherever they differ from the defaults.
    fn merge_configs(mut parent: AnalyzerConfig, child: AnalyzerConfig) -> AnalyzerConfig {
        if child.user_agent != schema::default_user_agent() {
            parent.user_agent = child.user_agent;
        }
        if child.timeout_secs != schema::default_timeout_secs() {
            parent.timeout_secs = child.timeout_secs;
        }
        if child.search_url != schema::default_search_url() {
            parent.search_url = child.search_url;
        }
        if child.language != schema::default_language() {
            parent.language = child.language;
        }
        if child.results != schema::default_results() {
            parent.results = child.results;
        }
        if child.result_container != CssSelector::default() {
            parent.result_container = child.result_container;
        }
        if !child.competitor_urls.is_empty() {
            parent.competitor_urls = child.competitor_urls;
        }
        if child.concurrency != schema::default_concurrency() {
            parent.concurrency = child.concurrency;
        }
        if child.output.is_some() {
            parent.output = child.output;
        }

        parent.extends = None;
        parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::OutputConfig;
    use std::fs::write;
    use tempfile::tempdir;

    #[test]
    fn loads_yaml_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seo.yaml");
        write(&path, "results: 3\ntimeout_secs: 5\n").unwrap();

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.results, 3);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.language, "en");
        assert_eq!(config.result_container, CssSelector::search_result_container());
        assert!(config.output.is_none());
    }

    #[test]
    fn loads_toml_and_json() {
        let dir = tempdir().unwrap();
        let toml_path = dir.path().join("seo.toml");
        write(
            &toml_path,
            "competitor_urls = [\"https://a.test\"]\n[output]\ntype = \"json\"\npath = \"report.json\"\n",
        )
        .unwrap();
        let config = ConfigLoader::load(&toml_path).unwrap();
        assert_eq!(config.competitor_urls, vec!["https://a.test".to_string()]);
        assert_eq!(
            config.output,
            Some(OutputConfig::Json {
                path: "report.json".to_string()
            })
        );

        let json_path = dir.path().join("seo.json");
        write(&json_path, r#"{"language": "de", "output": {"type": "console"}}"#).unwrap();
        let config = ConfigLoader::load(&json_path).unwrap();
        assert_eq!(config.language, "de");
        assert_eq!(config.output, Some(OutputConfig::Console));
    }

    #[test]
    fn child_overrides_parent() {
        let dir = tempdir().unwrap();
        write(
            dir.path().join("base.yaml"),
            "results: 8\nlanguage: fr\nsearch_url: https://search.test/q\n",
        )
        .unwrap();
        let child = dir.path().join("child.yaml");
        write(&child, "extends: base.yaml\nresults: 2\n").unwrap();

        let config = ConfigLoader::load(&child).unwrap();
        assert_eq!(config.results, 2);
        assert_eq!(config.language, "fr");
        assert_eq!(config.search_url, "https://search.test/q");
        assert!(config.extends.is_none());
    }

    #[test]
    fn circular_inheritance_is_rejected() {
        let dir = tempdir().unwrap();
        write(dir.path().join("a.yaml"), "extends: b.yaml\n").unwrap();
        write(dir.path().join("b.yaml"), "extends: a.yaml\n").unwrap();

        let err = ConfigLoader::load(dir.path().join("a.yaml")).unwrap_err();
        assert!(err.to_string().contains("Circular inheritance"));
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        write(&path, "results: 0\n").unwrap();
        assert!(matches!(
            ConfigLoader::load(&path).unwrap_err(),
            Error::Validation(_)
        ));

        write(&path, "search_url: ftp://search.test\n").unwrap();
        assert!(matches!(
            ConfigLoader::load(&path).unwrap_err(),
            Error::Validation(_)
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seo.ini");
        write(&path, "results = 3").unwrap();
        assert!(matches!(ConfigLoader::load(&path).unwrap_err(), Error::Config(_)));
    }

    #[test]
    fn defaults_are_valid() {
        let config = ConfigLoader::load_or_default(None).unwrap();
        assert_eq!(config.results, 5);
        assert_eq!(config.timeout_secs, 10);
    }
}
