use std::fmt::{self, Display};
use std::fs::read_to_string;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_COMMENT;
use crate::errors::Result;

///
/// Where hit counts are accumulated during a scan. Both produce identical matrices.
///
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Fully materialized `barcodes x features` grid: fastest, memory hungry.
    Dense,
    /// Only touched cells are stored.
    #[default]
    Sparse,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dense" | "fast" => Ok(Backend::Dense),
            "sparse" => Ok(Backend::Sparse),
            _ => Err(format!("Invalid backend: {}", s)),
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Dense => write!(f, "dense"),
            Backend::Sparse => write!(f, "sparse"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CountConfig {
    /// Marker of the leading comment block in fragment files.
    pub comment: String,
    pub backend: Backend,
    /// Show a spinner while reading fragments.
    pub progress: bool,
}

impl Default for CountConfig {
    fn default() -> Self {
        CountConfig {
            comment: DEFAULT_COMMENT.to_string(),
            backend: Backend::default(),
            progress: true,
        }
    }
}

impl CountConfig {
    ///
    /// Load a config from a .toml file. Missing keys take their default values.
    ///
    /// # Arguments
    /// - path: Path to the config file
    pub fn try_from(path: &Path) -> Result<CountConfig> {
        let toml_str = read_to_string(path)?;
        let config: CountConfig = toml::from_str(&toml_str)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("dense", Backend::Dense)]
    #[case("FAST", Backend::Dense)]
    #[case("Sparse", Backend::Sparse)]
    fn test_backend_from_str(#[case] s: &str, #[case] expected: Backend) {
        assert_eq!(Backend::from_str(s).unwrap(), expected);
    }

    #[rstest]
    fn test_backend_invalid() {
        assert!(Backend::from_str("lil").is_err());
    }

    #[rstest]
    fn test_partial_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fragmtx.toml");
        std::fs::write(&path, "backend = \"dense\"\ncomment = \"@\"\n").unwrap();

        let config = CountConfig::try_from(&path).unwrap();
        assert_eq!(
            config,
            CountConfig {
                comment: "@".to_string(),
                backend: Backend::Dense,
                progress: true,
            }
        );
    }

    #[rstest]
    fn test_bad_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fragmtx.toml");
        std::fs::write(&path, "backend = \"lil\"\n").unwrap();

        assert!(matches!(
            CountConfig::try_from(&path),
            Err(crate::CountError::Config(_))
        ));
    }
}
