//! ファイルシステムアダプター（存在確認・テストモード実行・設定永続化）

mod config;
mod local_exec;
mod probe;

pub use config::{render_config, JsonConfigRepository};
pub use local_exec::LocalExecutor;
pub use probe::FsProbe;
