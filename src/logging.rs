use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::settings::{LogFormat, LogOutput, LogSettings};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("로그 파일 경로가 올바르지 않습니다: {0}")]
    InvalidPath(String),

    #[error("로깅 초기화 실패: {0}")]
    Init(String),
}

/// 전역 tracing 구독자를 설정합니다.
///
/// 반환된 가드가 살아 있는 동안만 로그가 기록되므로 프로세스 종료 직전까지 보관해야 합니다.
/// `RUST_LOG`가 설정되어 있으면 설정 파일의 레벨보다 우선합니다.
pub fn init_logging(settings: &LogSettings) -> Result<WorkerGuard, LoggingError> {
    let (writer, guard) = match &settings.output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        LogOutput::File(path) => {
            let (dir, file) = split_log_path(path)?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file))
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(settings.level).into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(matches!(settings.output, LogOutput::Stdout | LogOutput::Stderr))
        .with_target(true);

    let result = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    result.map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(guard)
}

/// 로그 파일 경로를 디렉토리와 파일 이름으로 분리
fn split_log_path(path: &str) -> Result<(&Path, &str), LoggingError> {
    let path_ref = Path::new(path);
    let file = path_ref
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(path.to_string()))?;

    let dir = match path_ref.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    Ok((dir, file))
}
