//! lr-composition: 実行ファイル向けのランタイムを組み立てるコンポジションルート。
//! ドメイン／エンジン／各種アダプタをここで配線し、apps/* はこのクレートだけに依存する。

pub mod config;
pub mod error;
pub mod runtime;

// apps/* が内側レイヤーの型に触れる必要がある場合は、ここから辿れるようにする。
pub use lr_domain as domain;
pub use lr_engine as engine;
pub use lr_log_utils as log_utils;

pub use lr_adapter_fs::{render_config, JsonConfigRepository};
pub use lr_adapter_paths as paths;

pub use config::{apply_env_overrides, load_config, save_config, ConfigOverrides};
pub use runtime::{AppInfo, RuntimeBuilder, SwapRuntime};
