use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use super::SettingsError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AdapterSettings {
    /// 입력 Caddyfile 경로 (기본값: Caddyfile)
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// 출력 JSON 경로. 없으면 표준 출력
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// JSON 들여쓰기 여부
    #[serde(default)]
    pub pretty: bool,
}

fn default_input() -> PathBuf {
    PathBuf::from("Caddyfile")
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: None,
            pretty: false,
        }
    }
}

pub fn parse_env_var<T: std::str::FromStr, F: FnOnce() -> T>(name: &str, default: F) -> Result<T, SettingsError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val.parse().map_err(|e: T::Err| SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: val,
            reason: e.to_string(),
        }),
        Err(env::VarError::NotPresent) => Ok(default()),
        Err(e) => Err(SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: "".to_string(),
            reason: e.to_string(),
        }),
    }
}

impl AdapterSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let output = match env::var("L4_OUTPUT") {
            Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
            Ok(_) | Err(env::VarError::NotPresent) => None,
            Err(e) => {
                return Err(SettingsError::EnvVarInvalid {
                    var_name: "L4_OUTPUT".to_string(),
                    value: "".to_string(),
                    reason: e.to_string(),
                })
            }
        };

        Ok(Self {
            input: parse_env_var("L4_INPUT", default_input)?,
            output,
            pretty: parse_env_var("L4_PRETTY", || false)?,
        })
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.input.as_os_str().is_empty() {
            return Err(SettingsError::InvalidConfig(
                "입력 파일 경로가 비어 있습니다".to_string(),
            ));
        }

        if self.output.as_ref() == Some(&self.input) {
            return Err(SettingsError::InvalidConfig(format!(
                "출력 파일이 입력 파일({})과 같습니다",
                self.input.display()
            )));
        }

        Ok(())
    }
}
