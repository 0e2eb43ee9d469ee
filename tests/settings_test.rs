use caddy_l4_adapter::settings::{LogFormat, LogOutput, Settings, SettingsError};
use std::path::PathBuf;
use std::sync::Once;

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    static INIT: Once = Once::new();

    fn setup() {
        INIT.call_once(|| {
            cleanup_env();
        });
    }

    fn teardown() {
        cleanup_env();
    }

    // 테스트 전후 환경변수 초기화를 위한 헬퍼 함수
    fn cleanup_env() {
        std::env::remove_var("L4_CONFIG_FILE");
        std::env::remove_var("L4_INPUT");
        std::env::remove_var("L4_OUTPUT");
        std::env::remove_var("L4_PRETTY");
        std::env::remove_var("L4_LOG_FORMAT");
        std::env::remove_var("L4_LOG_LEVEL");
        std::env::remove_var("L4_LOG_OUTPUT");
    }

    // 테스트용 임시 TOML 파일 생성 헬퍼
    fn create_test_toml(content: &str) -> (String, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("l4adapt.toml");
        std::fs::write(&file_path, content).unwrap();
        (file_path.to_str().unwrap().to_string(), dir)
    }

    #[tokio::test]
    #[serial]
    async fn test_settings_defaults() {
        setup();

        let settings = Settings::from_env().await.unwrap();

        assert_eq!(settings.adapter.input, PathBuf::from("Caddyfile"));
        assert_eq!(settings.adapter.output, None);
        assert!(!settings.adapter.pretty);
        assert_eq!(settings.logging.format, LogFormat::Text);
        assert_eq!(settings.logging.level, tracing::Level::INFO);
        assert_eq!(settings.logging.output, LogOutput::Stdout);

        teardown();
    }

    #[tokio::test]
    #[serial]
    async fn test_settings_from_env() {
        setup();

        std::env::set_var("L4_INPUT", "/etc/caddy/L4file");
        std::env::set_var("L4_OUTPUT", "/tmp/l4.json");
        std::env::set_var("L4_PRETTY", "true");
        std::env::set_var("L4_LOG_FORMAT", "json");
        std::env::set_var("L4_LOG_LEVEL", "debug");
        std::env::set_var("L4_LOG_OUTPUT", "stderr");

        let settings = Settings::from_env().await.unwrap();
        assert_eq!(settings.adapter.input, PathBuf::from("/etc/caddy/L4file"));
        assert_eq!(settings.adapter.output, Some(PathBuf::from("/tmp/l4.json")));
        assert!(settings.adapter.pretty);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.logging.level, tracing::Level::DEBUG);
        assert_eq!(settings.logging.output, LogOutput::Stderr);

        teardown();
    }

    #[tokio::test]
    #[serial]
    async fn test_settings_validation() {
        setup();

        // 1. 잘못된 로그 레벨
        std::env::set_var("L4_LOG_LEVEL", "invalid_level");
        let result = Settings::from_env().await;
        assert!(matches!(result, Err(SettingsError::EnvVarInvalid { .. })));
        teardown();

        // 2. 잘못된 bool 값
        std::env::set_var("L4_PRETTY", "yes please");
        let result = Settings::from_env().await;
        assert!(matches!(result, Err(SettingsError::EnvVarInvalid { .. })));
        teardown();

        // 3. 잘못된 로그 형식
        std::env::set_var("L4_LOG_FORMAT", "xml");
        let result = Settings::from_env().await;
        assert!(result.is_err());
        teardown();

        // 4. 입력과 같은 출력 파일
        std::env::set_var("L4_INPUT", "Caddyfile");
        std::env::set_var("L4_OUTPUT", "Caddyfile");
        let result = Settings::from_env().await;
        assert!(matches!(result, Err(SettingsError::InvalidConfig(_))));
        teardown();
    }

    #[tokio::test]
    #[serial]
    async fn test_load_from_toml_file() {
        setup();

        let (path, _dir) = create_test_toml(
            r#"
            [adapter]
            input = "layer4.caddyfile"
            pretty = true

            [logging]
            format = "json"
            level = "trace"
            output = "/var/log/l4adapt.log"
            "#,
        );
        std::env::set_var("L4_CONFIG_FILE", &path);

        let settings = Settings::load().await.unwrap();
        assert_eq!(settings.adapter.input, PathBuf::from("layer4.caddyfile"));
        assert!(settings.adapter.pretty);
        assert_eq!(settings.logging.level, tracing::Level::TRACE);
        assert_eq!(
            settings.logging.output,
            LogOutput::File("/var/log/l4adapt.log".to_string())
        );

        teardown();
    }

    #[tokio::test]
    #[serial]
    async fn test_invalid_toml_file() {
        setup();

        let (path, _dir) = create_test_toml("[adapter\ninput = ");
        let result = Settings::from_toml_file(&path).await;
        assert!(matches!(result, Err(SettingsError::ParseError { .. })));

        let result = Settings::from_toml_file("/nonexistent/l4adapt.toml").await;
        match result {
            Err(e @ SettingsError::FileError { .. }) => {
                assert!(e.to_string().contains("/nonexistent/l4adapt.toml"));
            }
            other => panic!("예상치 못한 결과: {:?}", other),
        }

        teardown();
    }
}
