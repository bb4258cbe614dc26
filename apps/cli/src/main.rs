//! lr-cli: LINEの着信音（VoipRing.wav）を置換／復元する CLI。

use clap::{Parser, Subcommand};
use lr_composition::domain::model::{AudioFormat, Language, SwapOutcome};
use lr_composition::log_utils::{init_logging, LogConfig};
use lr_composition::error::Result;
use lr_composition::{
    load_config, paths, render_config, save_config, AppInfo, ConfigOverrides,
    JsonConfigRepository, SwapRuntime,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "lr-cli", version, about = "LINE ringtone replacer")]
struct Cli {
    /// 実データではなく一時ディレクトリを対象にする
    #[arg(long, global = true, default_value_t = false)]
    test_mode: bool,
    /// 設定ファイルのパス
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// JSON形式で出力
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    /// 表示言語（ja|en）
    #[arg(long, global = true, value_parser = ["ja", "en"])]
    lang: Option<String>,
    /// ライフサイクルログの出力先
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// デバッグログを出す
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 着信音を指定の音声ファイルに置き換える（初回は元の音をバックアップ）
    Replace {
        /// 音声ファイル（mp3, wav, ogg, m4a, flac, aac）
        file: PathBuf,
    },
    /// バックアップから元の着信音に戻す
    Restore,
    /// バックアップの有無と対象パスを表示
    Status,
    /// 対応している音声形式を表示
    Formats,
    /// アプリ情報を表示
    Info,
    /// 現在有効な設定を表示（--save で設定ファイルに保存）
    Config {
        /// 環境変数・コマンドラインの上書きを含めて保存する
        #[arg(long, default_value_t = false)]
        save: bool,
    },
}

#[derive(Serialize)]
struct JsonStatus {
    backup_exists: bool,
    test_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    directory: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backup: Option<PathBuf>,
}

#[derive(Serialize)]
struct JsonFormat {
    extension: &'static str,
    name: &'static str,
}

fn init_cli_logging(cli: &Cli) {
    let log_config = LogConfig::default().verbose(cli.verbose);
    let log_config = match &cli.log_file {
        Some(path) => LogConfig {
            log_file: Some(path.clone()),
            ..log_config
        },
        None => log_config.with_log_dir(&paths::default_log_dir()),
    };
    if let Err(err) = init_logging(&log_config) {
        eprintln!("lr-cli: log file unavailable ({err}); logging to stderr only");
        let _ = init_logging(&LogConfig {
            log_file: None,
            ..log_config
        });
    }
}

fn print_outcome(outcome: &SwapOutcome, json: bool) -> Result<i32> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else if outcome.success {
        println!("{}", outcome.message);
    } else {
        eprintln!("{}", outcome.message);
    }
    Ok(if outcome.success { 0 } else { 1 })
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_cli_logging(&cli);

    let config_path = cli.config.clone().unwrap_or_else(paths::default_config_path);
    debug!(config = %config_path.display(), "loading configuration");
    let repo = JsonConfigRepository::new(&config_path);
    let overrides = ConfigOverrides {
        test_mode: cli.test_mode.then_some(true),
        language: cli.lang.as_deref().map(Language::from_code),
    };
    let config = load_config(&repo, &overrides)?;
    let language = config.language;

    match cli.command {
        Command::Replace { file } => {
            let runtime = SwapRuntime::builder(config).build();
            let outcome = runtime.engine().replace(&file).await;
            print_outcome(&outcome, cli.json)
        }
        Command::Restore => {
            let runtime = SwapRuntime::builder(config).build();
            let outcome = runtime.engine().restore().await;
            print_outcome(&outcome, cli.json)
        }
        Command::Status => {
            let runtime = SwapRuntime::builder(config).build();
            let status = runtime.engine().check_backup_exists().await;
            let resource = runtime.resource();
            let body = JsonStatus {
                backup_exists: status.exists,
                test_mode: runtime.config().test_mode,
                directory: resource.as_ref().map(|r| r.directory().to_path_buf()),
                target: resource.as_ref().map(|r| r.target_path()),
                backup: resource.as_ref().map(|r| r.backup_path()),
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                match &body.directory {
                    Some(dir) => println!("directory: {}", dir.display()),
                    None => println!("directory: (not found)"),
                }
                println!("backup:    {}", if body.backup_exists { "present" } else { "none" });
                if body.test_mode {
                    println!("mode:      test");
                }
            }
            Ok(0)
        }
        Command::Formats => {
            if cli.json {
                let formats: Vec<JsonFormat> = AudioFormat::ALL
                    .iter()
                    .map(|f| JsonFormat {
                        extension: f.extension(),
                        name: f.display_name(),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&formats)?);
            } else {
                for f in AudioFormat::ALL {
                    println!(".{:<5} {}", f.extension(), f.display_name());
                }
            }
            Ok(0)
        }
        Command::Info => {
            let info = AppInfo::current(language);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{} {} ({})", info.name, info.version, info.platform);
            }
            Ok(0)
        }
        Command::Config { save } => {
            if save {
                save_config(&repo, &config)?;
                info!(path = %config_path.display(), "configuration saved");
            }
            if cli.json {
                println!("{}", render_config(&config)?);
            } else {
                println!("file: {}", config_path.display());
                println!("{}", render_config(&config)?);
                if save {
                    println!("saved");
                }
            }
            Ok(0)
        }
    }
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("lr-cli failed: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["lr-cli", "replace", "ring.mp3", "--test-mode", "--lang", "en", "--json"]);
        assert!(cli.test_mode && cli.json);
        assert_eq!(cli.lang.as_deref(), Some("en"));
        assert!(matches!(cli.command, Command::Replace { ref file } if file == &PathBuf::from("ring.mp3")));
    }

    #[test]
    fn config_subcommand_takes_save_flag() {
        let cli = Cli::parse_from(["lr-cli", "config", "--save", "--lang", "en"]);
        assert!(matches!(cli.command, Command::Config { save: true }));
        let cli = Cli::parse_from(["lr-cli", "config"]);
        assert!(matches!(cli.command, Command::Config { save: false }));
    }

    #[test]
    fn outcome_exit_codes() {
        let ok = SwapOutcome::succeeded("done");
        assert_eq!(print_outcome(&ok, true).unwrap(), 0);
        let failed = SwapOutcome::failed(
            lr_composition::domain::model::FailureKind::NoBackup,
            "no backup",
        );
        assert_eq!(print_outcome(&failed, false).unwrap(), 1);
    }
}
