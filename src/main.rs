use std::path::PathBuf;
use std::process;

use caddy_l4_adapter::adapter::{Adapter, CompileError};
use caddy_l4_adapter::logging;
use caddy_l4_adapter::settings::{AdapterSettings, Settings};
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("입력 파일 {path} 읽기 실패: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("JSON 직렬화 실패: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("출력 {path} 쓰기 실패: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

#[tokio::main]
async fn main() {
    let mut settings = match Settings::load().await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("설정 로드 실패: {}", e);
            process::exit(1);
        }
    };

    // 명령행 인자가 있으면 입력 파일 설정보다 우선
    if let Some(input) = std::env::args().nth(1) {
        settings.adapter.input = PathBuf::from(input);
        if let Err(e) = settings.validate() {
            eprintln!("설정 검증 실패: {}", e);
            process::exit(1);
        }
    }

    let guard = match logging::init_logging(&settings.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let code = match run(&settings.adapter).await {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %e, "Caddyfile 변환 실패");
            1
        }
    };

    // 종료 전에 남은 로그를 모두 기록
    drop(guard);
    process::exit(code);
}

async fn run(settings: &AdapterSettings) -> Result<(), RunError> {
    let input = settings.input.to_string_lossy().to_string();
    info!(input = %input, "Caddyfile 변환 시작");

    let source = tokio::fs::read_to_string(&settings.input)
        .await
        .map_err(|source| RunError::Read {
            path: input.clone(),
            source,
        })?;

    let adapted = Adapter::with_defaults().adapt(&input, &source)?;
    for warning in &adapted.warnings {
        warn!(
            file = %warning.file,
            line = warning.line,
            directive = ?warning.directive,
            "{}",
            warning.message
        );
    }

    let mut json = adapted.to_json(settings.pretty)?;
    json.push('\n');

    match &settings.output {
        Some(path) => {
            tokio::fs::write(path, json).await.map_err(|source| RunError::Write {
                path: path.display().to_string(),
                source,
            })?;
            info!(output = %path.display(), "설정 파일 저장 완료");
        }
        None => {
            let stdout_err = |source| RunError::Write {
                path: "stdout".to_string(),
                source,
            };
            let mut stdout = tokio::io::stdout();
            stdout.write_all(json.as_bytes()).await.map_err(stdout_err)?;
            stdout.flush().await.map_err(stdout_err)?;
        }
    }

    Ok(())
}
