//! lr-engine: 着信音の置換／復元／バックアップ確認のワークフローを実装する層。
//! ドメイン（lr-domain）のポートにのみ依存し、OSの違いは一切扱わない。

pub mod cache;

pub use cache::ExistenceCache;

use async_trait::async_trait;
use lr_domain::model::{
    BackupStatus, CommandPlan, ConfirmRequest, ElevatedProbePolicy, Language, OperationKind,
    SwapConfig, SwapOutcome, SwapPhase, TargetResource, UserMessage,
};
use lr_domain::port::driven::{
    AudioConverter, Clock, ConfirmDecision, ConfirmationPrompt, ExecOutput, FileProbe,
    PathResolver, PrivilegedExecutor,
};
use lr_domain::port::driving::SwapUseCase;
use lr_domain::DomainError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// エンジンが使う外部協調者
#[derive(Clone)]
pub struct SwapDeps {
    pub resolver: Arc<dyn PathResolver>,
    pub probe: Arc<dyn FileProbe>,
    pub executor: Arc<dyn PrivilegedExecutor>,
    pub converter: Arc<dyn AudioConverter>,
    pub prompt: Arc<dyn ConfirmationPrompt>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub resource_file_name: String,
    pub language: Language,
    pub elevated_probe: ElevatedProbePolicy,
    pub cache_ttl: Duration,
}

impl EngineSettings {
    pub fn from_config(cfg: &SwapConfig) -> Self {
        Self {
            resource_file_name: cfg.resource_file_name.clone(),
            language: cfg.language,
            elevated_probe: cfg.elevated_probe,
            cache_ttl: cfg.cache_ttl(),
        }
    }
}

/// 置換／復元の状態機械を駆動する。
///
/// キャッシュと操作ロックはこのインスタンスが唯一の所有者。
/// 置換と復元はロックで直列化され、ロック取得直後（最初の中断点より前）にキャッシュを無効化する。
pub struct SwapEngine {
    deps: SwapDeps,
    settings: EngineSettings,
    cache: ExistenceCache,
    op_lock: tokio::sync::Mutex<()>,
}

impl SwapEngine {
    pub fn new(deps: SwapDeps, settings: EngineSettings) -> Self {
        let cache = ExistenceCache::new(settings.cache_ttl, Arc::clone(&deps.clock));
        Self {
            deps,
            settings,
            cache,
            op_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// 着信音を置換する
    pub async fn replace(&self, source: &Path) -> SwapOutcome {
        let _op = self.op_lock.lock().await;
        self.cache.invalidate();

        let mut trace = PhaseTrace::start(OperationKind::Replace);
        let result = self.run_replace(source, &mut trace).await;
        self.finish(OperationKind::Replace, trace, result)
    }

    /// バックアップから元の着信音に戻す
    pub async fn restore(&self) -> SwapOutcome {
        let _op = self.op_lock.lock().await;
        self.cache.invalidate();

        let mut trace = PhaseTrace::start(OperationKind::Restore);
        let result = self.run_restore(&mut trace).await;
        self.finish(OperationKind::Restore, trace, result)
    }

    /// バックアップが存在するか（TTL内はキャッシュを返す）
    pub async fn check_backup_exists(&self) -> BackupStatus {
        if let Some(exists) = self.cache.get() {
            debug!(exists, "backup existence served from cache");
            return BackupStatus { exists };
        }

        let generation = self.cache.generation();
        let exists = match self.resolve_resource() {
            Ok(resource) => self.locate_backup(&resource).await,
            Err(err) => {
                // データディレクトリがなければバックアップもない
                debug!(error = %err, "no resource directory; reporting no backup");
                false
            }
        };
        self.cache.set_if_current(generation, exists);
        BackupStatus { exists }
    }

    async fn run_replace(&self, source: &Path, trace: &mut PhaseTrace) -> Result<(), DomainError> {
        trace.advance(SwapPhase::Validating);
        if !matches!(self.deps.probe.exists(source), Ok(true)) {
            return Err(DomainError::FileNotFound(source.display().to_string()));
        }
        if !self.deps.converter.is_audio_file(source).await {
            return Err(DomainError::NotAudio(source.display().to_string()));
        }
        let converted = self.deps.converter.convert_to_wav(source).await?;
        let mut wav = ConvertedAudio::new(source, converted, Arc::clone(&self.deps.converter));

        let resource = self.resolve_resource()?;
        let target = resource.target_path();
        let backup = resource.backup_path();

        let target_state = self.deps.probe.exists(&target);
        let backup_state = self.deps.probe.exists(&backup);
        // 判定できない場合もバックアップ手順は入れる（CopyIfAbsent が既存バックアップを守る）
        let needs_backup = match (&target_state, &backup_state) {
            (Ok(false), _) | (_, Ok(true)) => false,
            _ => true,
        };
        debug!(
            ?target_state,
            ?backup_state,
            needs_backup,
            "evaluated backup requirement"
        );
        trace.advance(if needs_backup {
            SwapPhase::NeedsBackup
        } else {
            SwapPhase::NoBackupNeeded
        });

        // バックアップは必ず上書きより前
        let mut plan = CommandPlan::new().ensure_dir(resource.directory());
        if needs_backup {
            plan = plan.copy_if_absent(&target, &backup);
        }
        let plan = plan.copy(wav.path(), &target);

        self.confirm(OperationKind::Replace).await?;

        trace.advance(SwapPhase::Mutating);
        info!(
            plan = %plan.summary(),
            target = %target.display(),
            source = %wav.path().display(),
            "replacing ringtone"
        );
        let executed = self.deps.executor.run(&plan).await;
        wav.cleanup();
        log_exec_output(&executed?);

        trace.advance(SwapPhase::Verifying);
        match self.deps.probe.exists(&target) {
            Ok(true) => {
                if let Some(size) = self.deps.probe.size(&target) {
                    info!(size, target = %target.display(), "ringtone replaced");
                }
            }
            Ok(false) => {
                return Err(DomainError::VerificationFailed(format!(
                    "{} is missing after replace",
                    target.display()
                )));
            }
            Err(err) => {
                warn!(error = %err, target = %target.display(), "could not verify replaced ringtone");
            }
        }

        let backup_now = match self.deps.probe.exists(&backup) {
            Ok(exists) => exists,
            Err(_) => needs_backup || matches!(backup_state, Ok(true)),
        };
        self.cache.set(backup_now);
        Ok(())
    }

    async fn run_restore(&self, trace: &mut PhaseTrace) -> Result<(), DomainError> {
        trace.advance(SwapPhase::Validating);
        let resource = self.resolve_resource()?;
        let target = resource.target_path();
        let backup = resource.backup_path();

        if !self.locate_backup(&resource).await {
            return Err(DomainError::NoBackup(backup.display().to_string()));
        }
        trace.advance(SwapPhase::NoBackupNeeded);

        self.confirm(OperationKind::Restore).await?;

        let plan = CommandPlan::new().copy(&backup, &target).delete(&backup);
        trace.advance(SwapPhase::Mutating);
        info!(
            plan = %plan.summary(),
            target = %target.display(),
            backup = %backup.display(),
            "restoring ringtone"
        );
        log_exec_output(&self.deps.executor.run(&plan).await?);

        trace.advance(SwapPhase::Verifying);
        if let Some(size) = self.deps.probe.size(&target) {
            info!(size, target = %target.display(), "ringtone restored");
        }
        if matches!(self.deps.probe.exists(&backup), Ok(true)) {
            // 復元自体は成功。次回の確認で実際の状態を導出させる
            warn!(backup = %backup.display(), "backup file is still present after restore");
            self.cache.invalidate();
        } else {
            self.cache.set(false);
        }
        Ok(())
    }

    fn resolve_resource(&self) -> Result<TargetResource, DomainError> {
        let data_dir = self
            .deps
            .resolver
            .resolve()
            .ok_or(DomainError::DirectoryUnresolved)?;
        TargetResource::in_data_dir(&data_dir, &self.settings.resource_file_name)
    }

    /// 通常権限で確認し、権限エラーのときだけ（ポリシーが許せば）昇格して確認する
    async fn locate_backup(&self, resource: &TargetResource) -> bool {
        let backup = resource.backup_path();
        let unprivileged = match self.deps.probe.exists(&backup) {
            Ok(true) => return true,
            Ok(false) => self.deps.probe.exists(resource.directory()).map(|_| false),
            Err(err) => Err(err),
        };
        let err = match unprivileged {
            Ok(exists) => return exists,
            Err(err) => err,
        };

        match self.settings.elevated_probe {
            ElevatedProbePolicy::Never => {
                debug!(error = %err, "unprivileged backup check failed; elevation disabled");
                false
            }
            ElevatedProbePolicy::Always => {
                info!(error = %err, backup = %backup.display(), "checking backup with elevation");
                match self.deps.executor.probe_exists(&backup).await {
                    Ok(exists) => exists,
                    Err(err) => {
                        warn!(error = %err, "elevated backup check failed");
                        false
                    }
                }
            }
        }
    }

    async fn confirm(&self, operation: OperationKind) -> Result<(), DomainError> {
        let prompt = Arc::clone(&self.deps.prompt);
        let request = ConfirmRequest::new(operation, self.settings.language);
        let decision = tokio::task::spawn_blocking(move || prompt.ask(&request))
            .await
            .unwrap_or(ConfirmDecision::Cancel);
        match decision {
            ConfirmDecision::Continue => {
                debug!(operation = operation.as_str(), "user chose to continue");
                Ok(())
            }
            ConfirmDecision::Cancel => Err(DomainError::UserCancelled),
        }
    }

    fn finish(
        &self,
        operation: OperationKind,
        mut trace: PhaseTrace,
        result: Result<(), DomainError>,
    ) -> SwapOutcome {
        let lang = self.settings.language;
        match result {
            Ok(()) => {
                trace.advance(SwapPhase::Succeeded);
                let message = match operation {
                    OperationKind::Replace => UserMessage::ReplaceSucceeded,
                    OperationKind::Restore => UserMessage::RestoreSucceeded,
                };
                SwapOutcome::succeeded(message.text(lang))
            }
            Err(err) => {
                trace.advance(SwapPhase::Failed);
                // 途中まで実行された可能性があるので、実行中に導出された値も捨てる
                self.cache.invalidate();
                let kind = err.failure_kind();
                warn!(
                    operation = operation.as_str(),
                    failure = kind.as_str(),
                    error = %err,
                    "operation failed"
                );
                SwapOutcome::failed(kind, UserMessage::for_error(operation, &err).text(lang))
            }
        }
    }
}

#[async_trait]
impl SwapUseCase for SwapEngine {
    async fn replace(&self, source: &Path) -> SwapOutcome {
        SwapEngine::replace(self, source).await
    }

    async fn restore(&self) -> SwapOutcome {
        SwapEngine::restore(self).await
    }

    async fn check_backup_exists(&self) -> BackupStatus {
        SwapEngine::check_backup_exists(self).await
    }
}

struct PhaseTrace {
    operation: OperationKind,
    phase: SwapPhase,
}

impl PhaseTrace {
    fn start(operation: OperationKind) -> Self {
        Self {
            operation,
            phase: SwapPhase::Idle,
        }
    }

    fn advance(&mut self, next: SwapPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "invalid transition {:?} -> {:?}",
            self.phase,
            next
        );
        debug!(
            operation = self.operation.as_str(),
            from = self.phase.as_str(),
            to = next.as_str(),
            "phase transition"
        );
        self.phase = next;
    }
}

/// 変換済み音声。元ファイルと別の一時ファイルなら、どの経路で抜けても削除する。
struct ConvertedAudio {
    path: PathBuf,
    temporary: bool,
    converter: Arc<dyn AudioConverter>,
}

impl ConvertedAudio {
    fn new(source: &Path, converted: PathBuf, converter: Arc<dyn AudioConverter>) -> Self {
        let temporary = converted != source;
        Self {
            path: converted,
            temporary,
            converter,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn cleanup(&mut self) {
        if !std::mem::take(&mut self.temporary) {
            return;
        }
        match self.converter.discard(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "temporary audio removed"),
            Err(err) => warn!(path = %self.path.display(), error = %err, "failed to remove temporary audio"),
        }
    }
}

impl Drop for ConvertedAudio {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn log_exec_output(output: &ExecOutput) {
    if !output.stdout.trim().is_empty() {
        debug!(stdout = %output.stdout.trim(), "privileged command output");
    }
    if !output.stderr.trim().is_empty() {
        warn!(stderr = %output.stderr.trim(), "privileged command wrote to stderr");
    }
}
