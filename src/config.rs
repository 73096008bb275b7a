use crate::display::scroll_phat_hd;
use crate::display::Rotation;

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub animation: AnimationConfig,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    #[serde(default = "default_rotation")]
    pub rotation: Rotation,

    #[serde(default)]
    pub backend: Backend,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rotation: default_rotation(),
            backend: Backend::default(),
        }
    }
}

/// The Scroll pHAT HD is usually mounted upside down.
fn default_rotation() -> Rotation {
    Rotation::Deg180
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Backend {
    ScrollPhatHd {
        #[serde(default = "default_i2c_bus")]
        i2c_bus: camino::Utf8PathBuf,

        #[serde(default = "default_address")]
        address: u8,
    },

    Terminal,
}

impl Default for Backend {
    fn default() -> Self {
        Backend::ScrollPhatHd {
            i2c_bus: default_i2c_bus(),
            address: default_address(),
        }
    }
}

fn default_i2c_bus() -> camino::Utf8PathBuf {
    camino::Utf8PathBuf::from("/dev/i2c-1")
}

fn default_address() -> u8 {
    scroll_phat_hd::DEFAULT_ADDRESS
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationConfig {
    /// Seed for the brightness animation, taken from the OS when missing
    pub seed: Option<u64>,
}

impl Config {
    pub async fn load(path: &camino::Utf8Path) -> Result<Self, ConfigError> {
        let config_str =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::ReadingFile {
                    path: path.to_path_buf(),
                    source,
                })?;

        Self::parse(&config_str)
    }

    pub fn parse(config_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let rotation = self.display.rotation;

        if let Backend::ScrollPhatHd { .. } = self.display.backend {
            let (width, height) = if rotation.is_transposed() {
                (scroll_phat_hd::HEIGHT, scroll_phat_hd::WIDTH)
            } else {
                (scroll_phat_hd::WIDTH, scroll_phat_hd::HEIGHT)
            };

            if !crate::layout::fits(width as u8, height as u8) {
                return Err(ConfigError::RotationDoesNotFit { rotation });
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file from path '{}'", .path)]
    ReadingFile {
        path: camino::Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    ParsingConfig(#[from] toml::de::Error),

    #[error("The clock does not fit on the Scroll pHAT HD when rotated by {rotation}")]
    RotationDoesNotFit { rotation: Rotation },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.display.rotation, Rotation::Deg180);
        assert_eq!(
            config.display.backend,
            Backend::ScrollPhatHd {
                i2c_bus: camino::Utf8PathBuf::from("/dev/i2c-1"),
                address: 0x74,
            }
        );
        assert_eq!(config.animation.seed, None);
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
            [display]
            rotation = 0

            [display.backend]
            type = "scroll-phat-hd"
            i2c_bus = "/dev/i2c-3"
            address = 0x75

            [animation]
            seed = 42
            "#,
        )
        .unwrap();

        assert_eq!(config.display.rotation, Rotation::Deg0);
        assert_eq!(
            config.display.backend,
            Backend::ScrollPhatHd {
                i2c_bus: camino::Utf8PathBuf::from("/dev/i2c-3"),
                address: 0x75,
            }
        );
        assert_eq!(config.animation.seed, Some(42));
    }

    #[test]
    fn test_terminal_backend() {
        let config = Config::parse(
            r#"
            [display.backend]
            type = "terminal"
            "#,
        )
        .unwrap();

        assert_eq!(config.display.backend, Backend::Terminal);
    }

    #[test]
    fn test_terminal_accepts_any_rotation() {
        let config = Config::parse(
            r#"
            [display]
            rotation = 90
            backend = { type = "terminal" }
            "#,
        );

        assert!(config.is_ok());
    }

    #[test]
    fn test_invalid_rotation_is_rejected() {
        let error = Config::parse("display = { rotation = 45 }").unwrap_err();
        assert!(matches!(error, ConfigError::ParsingConfig(_)));
        assert!(error.to_string().contains("got 45"));
    }

    #[test]
    fn test_transposed_scroll_phat_is_rejected() {
        let error = Config::parse("display = { rotation = 270 }").unwrap_err();
        insta::assert_snapshot!(error, @"The clock does not fit on the Scroll pHAT HD when rotated by 270°");
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let error = Config::parse("[clock]\nhand_bits = 5").unwrap_err();
        assert!(matches!(error, ConfigError::ParsingConfig(_)));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let path = camino::Utf8Path::new("/nonexistent/binary-clock.toml");
        let error = Config::load(path).await.unwrap_err();

        insta::assert_snapshot!(error, @"Failed to read configuration file from path '/nonexistent/binary-clock.toml'");
    }
}
