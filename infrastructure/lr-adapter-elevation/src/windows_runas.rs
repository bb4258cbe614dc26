//! UAC経由でPowerShellを起動し、終了まで待つ（ブロッキング）

use crate::dialect::{encode_powershell_command, ShellDialect};
use lr_domain::port::driven::ExecOutput;
use lr_domain::DomainError;
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{CloseHandle, ERROR_CANCELLED, HANDLE, WAIT_OBJECT_0};
use windows::Win32::System::Threading::{GetExitCodeProcess, WaitForSingleObject, INFINITE};
use windows::Win32::UI::Shell::{ShellExecuteExW, SEE_MASK_NOCLOSEPROCESS, SHELLEXECUTEINFOW};
use windows::Win32::UI::WindowsAndMessaging::SW_HIDE;

fn wstr(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

/// 出力をファイルへ書き出すラッパー。例外は err ファイルに残して終了コード1。
fn capture_script(script: &str, out: &Path, err: &Path) -> String {
    let ps = ShellDialect::PowerShell;
    let (out, err) = (ps.quote(out), ps.quote(err));
    format!(
        "try {{ & {{ {script} }} 2>&1 | Out-File -LiteralPath {out} -Encoding utf8 }} \
         catch {{ $_ | Out-String | Out-File -LiteralPath {err} -Encoding utf8; exit 1 }}"
    )
}

fn read_capture(path: &Path) -> String {
    std::fs::read_to_string(path)
        .map(|s| s.trim_start_matches('\u{feff}').to_string())
        .unwrap_or_default()
}

pub(crate) fn run_elevated(script: &str) -> Result<ExecOutput, DomainError> {
    let capture = tempfile::Builder::new()
        .prefix("lr-elevated-")
        .tempdir()
        .map_err(|e| DomainError::execution(format!("cannot create capture dir: {e}"), None))?;
    let out_path = capture.path().join("stdout.txt");
    let err_path = capture.path().join("stderr.txt");

    let encoded = encode_powershell_command(&capture_script(script, &out_path, &err_path));
    let parameters = format!("-NoProfile -NonInteractive -ExecutionPolicy Bypass -EncodedCommand {encoded}");

    let code = shell_execute_and_wait(&parameters)?;
    let stdout = read_capture(&out_path);
    let stderr = read_capture(&err_path);
    if code != 0 {
        return Err(DomainError::execution(
            format!("powershell exited with code {code}"),
            Some(stderr),
        ));
    }
    Ok(ExecOutput { stdout, stderr })
}

fn shell_execute_and_wait(parameters: &str) -> Result<u32, DomainError> {
    let verb_w = wstr(OsStr::new("runas"));
    let file_w = wstr(OsStr::new("powershell.exe"));
    let params_w = wstr(OsStr::new(parameters));

    unsafe {
        let mut sei = SHELLEXECUTEINFOW::default();
        sei.cbSize = std::mem::size_of::<SHELLEXECUTEINFOW>() as u32;
        sei.fMask = SEE_MASK_NOCLOSEPROCESS;
        sei.lpVerb = PCWSTR(verb_w.as_ptr());
        sei.lpFile = PCWSTR(file_w.as_ptr());
        sei.lpParameters = PCWSTR(params_w.as_ptr());
        sei.nShow = SW_HIDE.0;

        if let Err(err) = ShellExecuteExW(&mut sei) {
            if err.code() == ERROR_CANCELLED.to_hresult() {
                return Err(DomainError::execution(
                    "administrator authentication was cancelled",
                    None,
                ));
            }
            return Err(DomainError::execution(
                format!("ShellExecuteExW failed: {}", err.message()),
                None,
            ));
        }

        let h: HANDLE = sei.hProcess;
        if h.is_invalid() {
            return Err(DomainError::execution(
                "ShellExecuteExW returned no process handle",
                None,
            ));
        }

        let wait = WaitForSingleObject(h, INFINITE);
        if wait != WAIT_OBJECT_0 {
            let _ = CloseHandle(h);
            return Err(DomainError::execution(
                format!("WaitForSingleObject failed: {}", wait.0),
                None,
            ));
        }

        let mut code: u32 = 1;
        let exit = GetExitCodeProcess(h, &mut code);
        let _ = CloseHandle(h);
        exit.map_err(|err| {
            DomainError::execution(format!("GetExitCodeProcess failed: {}", err.message()), None)
        })?;
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_wrapper_redirects_both_streams() {
        let s = capture_script("Copy-Item -LiteralPath 'a' -Destination 'b'", Path::new("C:\\t\\o.txt"), Path::new("C:\\t\\e.txt"));
        assert!(s.starts_with("try { & { Copy-Item"));
        assert!(s.contains("2>&1 | Out-File -LiteralPath 'C:\\t\\o.txt'"));
        assert!(s.ends_with("exit 1 }"));
    }
}
