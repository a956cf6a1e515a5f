//! Activity catalog providers backed by JSON.
//!
//! A catalog file is a JSON array of `{"activity": "...", "hours": N}` objects.

use std::path::{Path, PathBuf};

use codetime_core::{ActivityCatalogEntry, CatalogProvider, EstimateError};

/// Modes shipped with the binary.
pub const BUILTIN_MODES: [&str; 4] = ["fun", "guilty", "inspirational", "corporate"];

/// Catalogs compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl CatalogProvider for BuiltinCatalog {
    fn load(&self, mode: &str) -> Result<Vec<ActivityCatalogEntry>, EstimateError> {
        let raw = match mode {
            "fun" => include_str!("../catalogs/activities_fun.json"),
            "guilty" => include_str!("../catalogs/activities_guilty.json"),
            "inspirational" => include_str!("../catalogs/activities_inspirational.json"),
            "corporate" => include_str!("../catalogs/activities_corporate.json"),
            _ => return Err(not_found(mode)),
        };
        parse_catalog(mode, raw)
    }
}

/// Catalogs read from `<dir>/activities_<mode>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    dir: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, mode: &str) -> Option<PathBuf> {
        let valid = !mode.is_empty()
            && mode
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.dir.join(format!("activities_{mode}.json")))
    }
}

impl CatalogProvider for DirectoryCatalog {
    fn load(&self, mode: &str) -> Result<Vec<ActivityCatalogEntry>, EstimateError> {
        let path = self.path_for(mode).ok_or_else(|| not_found(mode))?;
        tracing::debug!(path = %path.display(), "reading activity catalog");

        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found(mode)),
            Err(e) => {
                return Err(EstimateError::CatalogLoad {
                    mode: mode.to_string(),
                    reason: format!("{}: {e}", path.display()),
                });
            }
        };
        parse_catalog(mode, &raw)
    }
}

/// Picks the directory catalog when a directory is configured.
pub fn provider_for(catalog_dir: Option<&Path>) -> Box<dyn CatalogProvider> {
    match catalog_dir {
        Some(dir) => Box::new(DirectoryCatalog::new(dir)),
        None => Box::new(BuiltinCatalog),
    }
}

fn parse_catalog(mode: &str, raw: &str) -> Result<Vec<ActivityCatalogEntry>, EstimateError> {
    serde_json::from_str(raw).map_err(|err| EstimateError::CatalogLoad {
        mode: mode.to_string(),
        reason: err.to_string(),
    })
}

fn not_found(mode: &str) -> EstimateError {
    EstimateError::CatalogNotFound {
        mode: mode.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_modes_load_valid_entries() {
        for mode in BUILTIN_MODES {
            let entries = BuiltinCatalog.load(mode).unwrap();
            assert!(entries.len() >= 10, "{mode} catalog is too small");
            for entry in &entries {
                assert!(entry.hours > 0.0, "{mode}: {} has no cost", entry.activity);
                assert!(!entry.activity.trim().is_empty());
            }
        }
    }

    #[test]
    fn builtin_unknown_mode_is_not_found() {
        assert_eq!(
            BuiltinCatalog.load("sarcastic").unwrap_err(),
            EstimateError::CatalogNotFound {
                mode: "sarcastic".to_string()
            }
        );
    }

    #[test]
    fn directory_catalog_reads_mode_file() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join("activities_snarky.json"),
            r#"[{"activity": "touch grass", "hours": 0.5}]"#,
        )
        .unwrap();

        let entries = DirectoryCatalog::new(temp.path()).load("snarky").unwrap();
        assert_eq!(entries, vec![ActivityCatalogEntry::new("touch grass", 0.5)]);
    }

    #[test]
    fn directory_catalog_missing_file_is_not_found() {
        let temp = tempfile::tempdir().unwrap();
        assert!(matches!(
            DirectoryCatalog::new(temp.path()).load("fun"),
            Err(EstimateError::CatalogNotFound { .. })
        ));
    }

    #[test]
    fn directory_catalog_rejects_path_like_modes() {
        let temp = tempfile::tempdir().unwrap();
        let catalog = DirectoryCatalog::new(temp.path());
        for mode in ["../fun", "a/b", ""] {
            assert!(matches!(
                catalog.load(mode),
                Err(EstimateError::CatalogNotFound { .. })
            ));
        }
    }

    #[test]
    fn directory_catalog_malformed_file_is_load_error() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("activities_fun.json"), "{not json").unwrap();
        assert!(matches!(
            DirectoryCatalog::new(temp.path()).load("fun"),
            Err(EstimateError::CatalogLoad { .. })
        ));
    }

    #[test]
    fn empty_catalog_file_is_not_an_error() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("activities_empty.json"), "[]").unwrap();
        assert!(DirectoryCatalog::new(temp.path()).load("empty").unwrap().is_empty());
    }

    #[test]
    fn provider_for_falls_back_to_builtin() {
        assert!(provider_for(None).load("fun").is_ok());
        let temp = tempfile::tempdir().unwrap();
        assert!(provider_for(Some(temp.path())).load("fun").is_err());
    }
}
