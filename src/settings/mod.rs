use std::{env, path::Path};
use serde::Deserialize;
use tracing::debug;

mod adapter;
pub mod logging;
mod error;

pub use adapter::{parse_env_var, AdapterSettings};
pub use logging::{LogFormat, LogOutput, LogSettings};
pub use error::SettingsError;

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Settings {
    // 변환 입출력 설정
    #[serde(default)]
    pub adapter: AdapterSettings,

    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,
}

impl Settings {
    /// `L4_CONFIG_FILE`이 있으면 TOML 파일에서, 없으면 환경 변수에서 로드
    pub async fn load() -> Result<Self> {
        if let Ok(config_path) = env::var("L4_CONFIG_FILE") {
            Self::from_toml_file(&config_path).await
        } else {
            Self::from_env().await
        }
    }

    pub async fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("설정 파일 로드: {}", path.display());

        let content = tokio::fs::read_to_string(path).await.map_err(|e| SettingsError::FileError {
            path: path.to_string_lossy().to_string(),
            error: e,
        })?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| SettingsError::ParseError { source: e })?;

        settings.validate()?;
        Ok(settings)
    }

    pub async fn from_env() -> Result<Self> {
        let settings = Self {
            adapter: AdapterSettings::from_env()?,
            logging: LogSettings::from_env()?,
        };

        // 설정 생성 시점에 바로 검증
        settings.validate()?;
        Ok(settings)
    }

    /// 설정 유효성 검증
    pub fn validate(&self) -> Result<()> {
        self.adapter.validate()?;

        if let LogOutput::File(path) = &self.logging.output {
            if self.adapter.output.as_deref() == Some(Path::new(path)) {
                return Err(SettingsError::InvalidConfig(format!(
                    "로그 파일과 출력 파일이 같습니다: {}",
                    path
                )));
            }
        }

        Ok(())
    }
}
