use crate::dialect::escape_applescript;
use lr_domain::port::driven::ExecOutput;
use lr_domain::DomainError;
use std::process::{Output, Stdio};
use tokio::process::Command;

/// osascript がユーザーキャンセル時に返すエラー番号
const OSASCRIPT_USER_CANCELED: &str = "-128";
/// pkexec: 認証ダイアログが閉じられた
const PKEXEC_DISMISSED: i32 = 126;
/// pkexec: 認可されなかった
const PKEXEC_NOT_AUTHORIZED: i32 = 127;

pub(crate) async fn run_osascript(script: &str, app_name: &str) -> Result<ExecOutput, DomainError> {
    let source = applescript_source(script, app_name);
    let out = spawn("osascript", Command::new("osascript").arg("-e").arg(source)).await?;
    finish("osascript", out)
}

pub(crate) async fn run_pkexec(script: &str) -> Result<ExecOutput, DomainError> {
    let out = spawn(
        "pkexec",
        Command::new("pkexec").arg("/bin/sh").arg("-c").arg(script),
    )
    .await?;
    finish("pkexec", out)
}

pub(crate) fn applescript_source(script: &str, app_name: &str) -> String {
    let prompt = format!("{app_name} needs administrator rights to update the LINE ringtone.");
    format!(
        "do shell script \"{}\" with prompt \"{}\" with administrator privileges",
        escape_applescript(script),
        escape_applescript(&prompt)
    )
}

async fn spawn(tool: &str, cmd: &mut Command) -> Result<Output, DomainError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| DomainError::execution(format!("cannot start {tool}: {e}"), None))
}

fn finish(tool: &str, out: Output) -> Result<ExecOutput, DomainError> {
    let stdout = String::from_utf8_lossy(&out.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&out.stderr).into_owned();
    if out.status.success() {
        return Ok(ExecOutput { stdout, stderr });
    }
    Err(classify_failure(tool, out.status.code(), stderr))
}

pub(crate) fn classify_failure(tool: &str, code: Option<i32>, stderr: String) -> DomainError {
    let message = match (tool, code) {
        ("osascript", _) if stderr.contains(OSASCRIPT_USER_CANCELED) => {
            "administrator authentication was cancelled".to_string()
        }
        ("pkexec", Some(PKEXEC_DISMISSED)) => "administrator authentication was dismissed".to_string(),
        ("pkexec", Some(PKEXEC_NOT_AUTHORIZED)) => {
            "not authorized to run as administrator".to_string()
        }
        (_, Some(code)) => format!("{tool} exited with status {code}"),
        (_, None) => format!("{tool} was terminated by a signal"),
    };
    DomainError::execution(message, Some(stderr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applescript_wraps_escaped_script() {
        let src = applescript_source(r#"cp -f '/a "b"' '/c'"#, "LINE Ringtone Replacer");
        assert!(src.starts_with(r#"do shell script "cp -f '/a \"b\"' '/c'""#));
        assert!(src.ends_with("with administrator privileges"));
        assert!(src.contains("LINE Ringtone Replacer needs administrator rights"));
    }

    #[test]
    fn cancellations_are_execution_errors_with_stderr() {
        let err = classify_failure(
            "osascript",
            Some(1),
            "execution error: User canceled. (-128)".into(),
        );
        match err {
            DomainError::Execution { message, stderr } => {
                assert!(message.contains("cancelled"));
                assert_eq!(stderr.as_deref(), Some("execution error: User canceled. (-128)"));
            }
            other => panic!("unexpected {other:?}"),
        }

        let err = classify_failure("pkexec", Some(126), String::new());
        assert!(matches!(
            err,
            DomainError::Execution { ref message, stderr: None } if message.contains("dismissed")
        ));
    }

    #[test]
    fn other_failures_report_status() {
        let err = classify_failure("pkexec", Some(1), "cp: permission denied".into());
        assert_eq!(err.diagnostic(), Some("cp: permission denied"));
        assert!(err.to_string().contains("status 1"));
    }
}
