//! コマンド計画をシェル構文へ変換する
//!
//! パスは必ずクォートしてから埋め込む。PowerShellは単一引用符（`'` は `''` に）と
//! `-LiteralPath`、POSIX shは単一引用符（`'` は `'\''` に）。

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use lr_domain::model::{CommandPlan, CommandStep};
use std::path::Path;

const PS_PREAMBLE: &str = "$ErrorActionPreference = 'Stop'; ";
const POSIX_EXISTS: &str = "exists";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellDialect {
    PowerShell,
    Posix,
}

impl ShellDialect {
    pub fn separator(&self) -> &'static str {
        match self {
            Self::PowerShell => "; ",
            Self::Posix => " && ",
        }
    }

    pub fn quote(&self, path: &Path) -> String {
        let raw = path.to_string_lossy();
        match self {
            Self::PowerShell => format!("'{}'", raw.replace('\'', "''")),
            Self::Posix => format!("'{}'", raw.replace('\'', r"'\''")),
        }
    }

    pub fn render_step(&self, step: &CommandStep) -> String {
        match (self, step) {
            (Self::PowerShell, CommandStep::EnsureDir(dir)) => format!(
                "[System.IO.Directory]::CreateDirectory({}) | Out-Null",
                self.quote(dir)
            ),
            (Self::PowerShell, CommandStep::CopyIfAbsent { from, to }) => {
                let (from, to) = (self.quote(from), self.quote(to));
                format!(
                    "if ((Test-Path -LiteralPath {from}) -and -not (Test-Path -LiteralPath {to})) \
                     {{ Copy-Item -LiteralPath {from} -Destination {to} }}"
                )
            }
            (Self::PowerShell, CommandStep::Copy { from, to }) => format!(
                "Copy-Item -LiteralPath {} -Destination {} -Force",
                self.quote(from),
                self.quote(to)
            ),
            (Self::PowerShell, CommandStep::Delete(path)) => {
                let path = self.quote(path);
                format!(
                    "if (Test-Path -LiteralPath {path}) {{ Remove-Item -LiteralPath {path} -Force }}"
                )
            }
            (Self::Posix, CommandStep::EnsureDir(dir)) => format!("mkdir -p {}", self.quote(dir)),
            (Self::Posix, CommandStep::CopyIfAbsent { from, to }) => {
                let (from, to) = (self.quote(from), self.quote(to));
                format!("{{ [ ! -f {from} ] || [ -e {to} ] || cp {from} {to}; }}")
            }
            (Self::Posix, CommandStep::Copy { from, to }) => {
                format!("cp -f {} {}", self.quote(from), self.quote(to))
            }
            (Self::Posix, CommandStep::Delete(path)) => format!("rm -f {}", self.quote(path)),
        }
    }

    pub fn render(&self, plan: &CommandPlan) -> String {
        plan.steps()
            .iter()
            .map(|s| self.render_step(s))
            .collect::<Vec<_>>()
            .join(self.separator())
    }

    /// 昇格状態での存在確認スクリプト
    pub fn presence_script(&self, path: &Path) -> String {
        let path = self.quote(path);
        match self {
            Self::PowerShell => format!("Test-Path -LiteralPath {path} | Out-String"),
            Self::Posix => format!("test -f {path} && echo {POSIX_EXISTS} || echo notexists"),
        }
    }

    pub fn parse_presence(&self, output: &str) -> bool {
        match self {
            Self::PowerShell => output.to_ascii_lowercase().contains("true"),
            Self::Posix => output.trim() == POSIX_EXISTS,
        }
    }
}

/// `-EncodedCommand` 用（UTF-16LE を base64）
pub fn encode_utf16le_base64(script: &str) -> String {
    let bytes: Vec<u8> = script.encode_utf16().flat_map(u16::to_le_bytes).collect();
    STANDARD.encode(bytes)
}

/// エラーで停止する前置きを付けてエンコードする
pub fn encode_powershell_command(script: &str) -> String {
    encode_utf16le_base64(&format!("{PS_PREAMBLE}{script}"))
}

/// AppleScript の文字列リテラル内に埋め込めるようエスケープする
pub fn escape_applescript(s: &str) -> String {
    s.replace('\\', r"\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn backup_plan(dir: &str) -> CommandPlan {
        let dir = PathBuf::from(dir);
        let target = dir.join("VoipRing.wav");
        let backup = dir.join("VoipRing.wav.backup");
        CommandPlan::new()
            .ensure_dir(&dir)
            .copy_if_absent(&target, &backup)
            .copy(Path::new("/tmp/new.wav"), &target)
    }

    #[test]
    fn quotes_embedded_single_quotes() {
        let p = Path::new("/Users/o'brien/a b");
        assert_eq!(ShellDialect::Posix.quote(p), r"'/Users/o'\''brien/a b'");
        assert_eq!(ShellDialect::PowerShell.quote(p), "'/Users/o''brien/a b'");
    }

    #[test]
    fn posix_plan_keeps_backup_before_overwrite() {
        let script = ShellDialect::Posix.render(&backup_plan("/data/sound"));
        assert_eq!(
            script,
            "mkdir -p '/data/sound' && \
             { [ ! -f '/data/sound/VoipRing.wav' ] || [ -e '/data/sound/VoipRing.wav.backup' ] || \
             cp '/data/sound/VoipRing.wav' '/data/sound/VoipRing.wav.backup'; } && \
             cp -f '/tmp/new.wav' '/data/sound/VoipRing.wav'"
        );
    }

    #[test]
    fn powershell_plan_uses_literal_paths() {
        let script = ShellDialect::PowerShell.render(&backup_plan("/data/sound"));
        let parts: Vec<&str> = script.split("; ").collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].starts_with("[System.IO.Directory]::CreateDirectory('/data/sound')"));
        assert!(parts[1].contains("-not (Test-Path -LiteralPath '/data/sound/VoipRing.wav.backup')"));
        assert!(parts[2].starts_with("Copy-Item -LiteralPath '/tmp/new.wav'"));
        assert!(!script.contains(" -Path "));
    }

    #[test]
    fn restore_plan_deletes_after_copy() {
        let plan = CommandPlan::new()
            .copy(Path::new("/d/a.backup"), Path::new("/d/a"))
            .delete(Path::new("/d/a.backup"));
        assert_eq!(
            ShellDialect::Posix.render(&plan),
            "cp -f '/d/a.backup' '/d/a' && rm -f '/d/a.backup'"
        );
        assert!(ShellDialect::PowerShell
            .render(&plan)
            .ends_with("{ Remove-Item -LiteralPath '/d/a.backup' -Force }"));
    }

    #[test]
    fn presence_round_trip() {
        let ps = ShellDialect::PowerShell;
        assert!(ps.presence_script(Path::new("C:/x")).ends_with("| Out-String"));
        assert!(ps.parse_presence("True\r\n"));
        assert!(!ps.parse_presence("False\r\n"));

        let sh = ShellDialect::Posix;
        assert!(sh.parse_presence("exists\n"));
        assert!(!sh.parse_presence("notexists\n"));
        assert!(!sh.parse_presence(""));
    }

    #[test]
    fn encodes_utf16le_base64() {
        assert_eq!(encode_utf16le_base64("dir"), "ZABpAHIA");
        let encoded = encode_powershell_command("dir");
        let bytes = STANDARD.decode(encoded).unwrap();
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(
            String::from_utf16(&units).unwrap(),
            "$ErrorActionPreference = 'Stop'; dir"
        );
    }

    #[test]
    fn applescript_escaping() {
        assert_eq!(escape_applescript(r#"cp 'a\b' "c""#), r#"cp 'a\\b' \"c\""#);
    }
}
