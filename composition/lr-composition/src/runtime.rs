//! エンジンと各アダプタの配線

use lr_adapter_audio::FfmpegConverter;
use lr_adapter_clock::ClockAdapter;
use lr_adapter_elevation::ElevatedExecutor;
use lr_adapter_fs::{FsProbe, LocalExecutor};
use lr_adapter_paths::DataDirResolver;
use lr_domain::model::{
    Language, Platform, SwapConfig, TargetResource, APP_DISPLAY_NAME_EN, APP_DISPLAY_NAME_JA,
};
use lr_domain::port::driven::{
    AudioConverter, AutoContinue, ConfirmationPrompt, PathResolver, PrivilegedExecutor,
};
use lr_domain::port::driving::SwapUseCase;
use lr_engine::{EngineSettings, SwapDeps, SwapEngine};
use lr_ui_common::MessageBoxPrompt;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// `info` コマンドで表示するアプリ情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub platform: String,
}

impl AppInfo {
    pub fn current(lang: Language) -> Self {
        let name = match lang {
            Language::Japanese => APP_DISPLAY_NAME_JA,
            Language::English => APP_DISPLAY_NAME_EN,
        };
        Self {
            name: name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            platform: Platform::current().as_str().to_string(),
        }
    }
}

/// 差し替え可能な部品を指定してランタイムを組み立てる
pub struct RuntimeBuilder {
    config: SwapConfig,
    platform: Platform,
    test_root: Option<PathBuf>,
    converter: Option<Arc<dyn AudioConverter>>,
    prompt: Option<Arc<dyn ConfirmationPrompt>>,
}

impl RuntimeBuilder {
    pub fn new(config: SwapConfig) -> Self {
        Self {
            config,
            platform: Platform::current(),
            test_root: None,
            converter: None,
            prompt: None,
        }
    }

    /// テストモードの出力先を変える
    pub fn test_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.test_root = Some(root.into());
        self
    }

    pub fn converter(mut self, converter: Arc<dyn AudioConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn prompt(mut self, prompt: Arc<dyn ConfirmationPrompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn build(self) -> SwapRuntime {
        let cfg = self.config;
        let resolver = if cfg.test_mode {
            match self.test_root {
                Some(root) => DataDirResolver::test_mode_at(root),
                None => DataDirResolver::test_mode(),
            }
        } else {
            DataDirResolver::live()
        };
        let executor: Arc<dyn PrivilegedExecutor> = if cfg.test_mode {
            Arc::new(LocalExecutor::new())
        } else {
            Arc::new(ElevatedExecutor::new(self.platform, cfg.app_name.clone()))
        };
        let platform = self.platform;
        let prompt = self.prompt.unwrap_or_else(|| -> Arc<dyn ConfirmationPrompt> {
            if !cfg.test_mode && cfg.confirm_on_windows && platform == Platform::Windows {
                Arc::new(MessageBoxPrompt::new())
            } else {
                Arc::new(AutoContinue)
            }
        });
        let converter = self.converter.unwrap_or_else(|| -> Arc<dyn AudioConverter> {
            let ffmpeg = cfg
                .ffmpeg_path
                .clone()
                .unwrap_or_else(|| PathBuf::from("ffmpeg"));
            Arc::new(FfmpegConverter::with_binary(ffmpeg))
        });

        info!(
            test_mode = cfg.test_mode,
            platform = self.platform.as_str(),
            "runtime assembled"
        );

        let resolver = Arc::new(resolver);
        let deps = SwapDeps {
            resolver: resolver.clone(),
            probe: Arc::new(FsProbe::new()),
            executor,
            converter,
            prompt,
            clock: Arc::new(ClockAdapter::new()),
        };
        let engine = Arc::new(SwapEngine::new(deps, EngineSettings::from_config(&cfg)));
        SwapRuntime {
            engine,
            resolver,
            config: cfg,
        }
    }
}

/// 組み立て済みのランタイム
pub struct SwapRuntime {
    engine: Arc<SwapEngine>,
    resolver: Arc<DataDirResolver>,
    config: SwapConfig,
}

impl SwapRuntime {
    pub fn builder(config: SwapConfig) -> RuntimeBuilder {
        RuntimeBuilder::new(config)
    }

    pub fn engine(&self) -> &SwapEngine {
        &self.engine
    }

    pub fn use_case(&self) -> Arc<dyn SwapUseCase> {
        self.engine.clone()
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    /// 現在の対象ファイル（ディレクトリが見つからなければ None）
    pub fn resource(&self) -> Option<TargetResource> {
        let data_dir = self.resolver.resolve()?;
        TargetResource::in_data_dir(&data_dir, &self.config.resource_file_name).ok()
    }
}
