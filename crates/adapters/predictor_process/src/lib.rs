//! # ecohub-adapter-predictor-process
//!
//! Implements the `Predictor` port by running an external program.
//!
//! The program is invoked as `<program> [args...] <hour> <day> <weekend>` and
//! must print a line containing `Predicted energy consumption: <number>` and
//! exit with status `0` before the timeout. A program still running at the
//! timeout is killed and reaped. On Unix the program runs in its own process
//! group and the whole group is killed, so helpers it spawned do not outlive
//! it.
//!
//! ## Dependency rule
//!
//! Depends on `ecohub-app` (port traits) and `ecohub-domain` only.

mod error;
mod parse;

use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};

use ecohub_app::ports::Predictor;
use ecohub_domain::error::EcoHubError;
use ecohub_domain::time_context::TimeContext;

pub use error::PredictorError;
pub use parse::parse_prediction;

/// How to launch the external predictor.
#[derive(Debug, Clone)]
pub struct Config {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Config {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
}

/// Runs the configured program once per prediction.
#[derive(Debug, Clone)]
pub struct ProcessPredictor {
    config: Config,
}

impl ProcessPredictor {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Spawn the program, wait for it, and parse its output.
    ///
    /// # Errors
    ///
    /// Returns a [`PredictorError`] when the program cannot be started, runs
    /// past the timeout, exits unsuccessfully, or prints no prediction.
    pub async fn run(&self, context: TimeContext) -> Result<f64, PredictorError> {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .arg(context.hour.to_string())
            .arg(context.day_of_week.to_string())
            .arg(context.weekend_flag().to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);
        let mut child = command.spawn().map_err(PredictorError::Spawn)?;

        let mut stdout = child.stdout.take().ok_or(PredictorError::NoOutput)?;
        let mut output = String::new();
        let outcome = tokio::time::timeout(self.config.timeout, async {
            stdout.read_to_string(&mut output).await?;
            child.wait().await
        })
        .await;

        let status = match outcome {
            Ok(result) => result.map_err(PredictorError::Io)?,
            Err(_) => {
                terminate(&mut child).await;
                return Err(PredictorError::Timeout(self.config.timeout));
            }
        };
        if !status.success() {
            return Err(PredictorError::Exit(status.code()));
        }
        parse_prediction(&output).ok_or(PredictorError::NoPrediction)
    }
}

/// Kill the program and everything it spawned, then reap it.
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        kill_group(pid).await;
    }
    if let Err(err) = child.kill().await {
        tracing::warn!(error = %err, "failed to kill timed out predictor");
    }
}

/// The program leads its own group, so the group id is its pid.
#[cfg(unix)]
async fn kill_group(pid: u32) {
    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("kill -KILL -{pid}"))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match status {
        Ok(status) if status.success() => {}
        Ok(status) => {
            tracing::warn!(pid, code = ?status.code(), "failed to kill predictor process group");
        }
        Err(err) => {
            tracing::warn!(pid, error = %err, "failed to kill predictor process group");
        }
    }
}

impl Predictor for ProcessPredictor {
    async fn predict(&self, context: TimeContext) -> Result<f64, EcoHubError> {
        let value = self.run(context).await?;
        tracing::debug!(value, "external prediction");
        Ok(value)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str, timeout: Duration) -> ProcessPredictor {
        ProcessPredictor::new(Config {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string(), "predictor".to_string()],
            timeout,
        })
    }

    fn context() -> TimeContext {
        TimeContext::new(8, 2, 0).unwrap()
    }

    #[tokio::test]
    async fn should_parse_prediction_from_stdout() {
        let predictor = shell(
            r#"echo "Predicted energy consumption: 61.5 kWh""#,
            Config::DEFAULT_TIMEOUT,
        );
        let value = predictor.run(context()).await.unwrap();
        assert!((value - 61.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_pass_hour_day_and_weekend_as_arguments() {
        let predictor = shell(
            r#"echo "Predicted energy consumption: $1$2.$3 kWh""#,
            Config::DEFAULT_TIMEOUT,
        );
        let value = predictor.run(context()).await.unwrap();
        assert!((value - 82.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_fail_on_non_zero_exit() {
        let predictor = shell(
            r#"echo "Predicted energy consumption: 61.5 kWh"; exit 3"#,
            Config::DEFAULT_TIMEOUT,
        );
        let err = predictor.run(context()).await.unwrap_err();
        assert!(matches!(err, PredictorError::Exit(Some(3))));
    }

    #[tokio::test]
    async fn should_fail_when_marker_missing() {
        let predictor = shell("echo hello", Config::DEFAULT_TIMEOUT);
        let err = predictor.run(context()).await.unwrap_err();
        assert!(matches!(err, PredictorError::NoPrediction));
    }

    #[tokio::test]
    async fn should_time_out_and_kill_slow_program() {
        let predictor = shell("sleep 10", Duration::from_millis(100));
        let started = std::time::Instant::now();
        let err = predictor.run(context()).await.unwrap_err();
        assert!(matches!(err, PredictorError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    /// Whether `pid` names a live process; zombies count as gone.
    #[cfg(target_os = "linux")]
    fn is_running(pid: &str) -> bool {
        std::fs::read_to_string(format!("/proc/{pid}/stat"))
            .ok()
            .and_then(|stat| {
                stat.rsplit_once(") ")
                    .map(|(_, rest)| !rest.starts_with('Z'))
            })
            .unwrap_or(false)
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn should_kill_helpers_spawned_by_timed_out_program() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("helper.pid");
        let script = format!("sleep 30 & echo $! > '{}'; wait", pid_file.display());
        let predictor = shell(&script, Duration::from_millis(300));

        let err = predictor.run(context()).await.unwrap_err();
        assert!(matches!(err, PredictorError::Timeout(_)));

        let helper = std::fs::read_to_string(&pid_file).unwrap();
        let helper = helper.trim();
        let mut alive = is_running(helper);
        for _ in 0..20 {
            if !alive {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
            alive = is_running(helper);
        }
        assert!(!alive, "helper process {helper} survived the timeout");
    }

    #[tokio::test]
    async fn should_fail_when_program_missing() {
        let predictor = ProcessPredictor::new(Config {
            program: "/nonexistent/ecohub-predictor".to_string(),
            args: Vec::new(),
            timeout: Config::DEFAULT_TIMEOUT,
        });
        let err = predictor.predict(context()).await.unwrap_err();
        assert!(matches!(err, EcoHubError::Unavailable(_)));
    }
}
