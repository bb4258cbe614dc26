//! ネイティブMessageBoxによる実行確認（Windowsのみ表示）

use lr_domain::model::ConfirmRequest;
use lr_domain::port::driven::{ConfirmDecision, ConfirmationPrompt};
use tracing::info;

#[cfg(windows)]
mod win_flags {
    use windows::Win32::UI::WindowsAndMessaging::{
        MB_ICONWARNING, MB_SETFOREGROUND, MB_YESNO, MESSAGEBOX_STYLE,
    };

    pub const YES_NO_WARN: MESSAGEBOX_STYLE =
        MESSAGEBOX_STYLE(MB_YESNO.0 | MB_ICONWARNING.0 | MB_SETFOREGROUND.0);
}

#[cfg(windows)]
fn show_message_box(
    title: &str,
    msg: &str,
    flags: windows::Win32::UI::WindowsAndMessaging::MESSAGEBOX_STYLE,
) -> windows::Win32::UI::WindowsAndMessaging::MESSAGEBOX_RESULT {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use windows::core::PCWSTR;
    use windows::Win32::UI::WindowsAndMessaging::MessageBoxW;

    let title_w: Vec<u16> = OsStr::new(title)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();
    let text_w: Vec<u16> = OsStr::new(msg)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    unsafe { MessageBoxW(None, PCWSTR(text_w.as_ptr()), PCWSTR(title_w.as_ptr()), flags) }
}

/// 本文（メッセージ＋詳細）
pub fn dialog_body(request: &ConfirmRequest) -> String {
    if request.detail.is_empty() {
        request.message.clone()
    } else {
        format!("{}\n\n{}", request.message, request.detail)
    }
}

/// Yes/No の警告ダイアログで確認する。Windows以外では表示せずに続行する。
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageBoxPrompt;

impl MessageBoxPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl ConfirmationPrompt for MessageBoxPrompt {
    fn ask(&self, request: &ConfirmRequest) -> ConfirmDecision {
        let body = dialog_body(request);

        #[cfg(windows)]
        let decision = {
            use windows::Win32::UI::WindowsAndMessaging::IDYES;

            if show_message_box(&request.title, &body, win_flags::YES_NO_WARN) == IDYES {
                ConfirmDecision::Continue
            } else {
                ConfirmDecision::Cancel
            }
        };
        #[cfg(not(windows))]
        let decision = ConfirmDecision::Continue;

        info!(
            operation = request.operation.as_str(),
            title = %request.title,
            body = %body.replace('\n', "\\n"),
            ?decision,
            "confirmation prompt"
        );
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lr_domain::model::{Language, OperationKind};

    #[test]
    fn body_joins_message_and_detail() {
        let req = ConfirmRequest::new(OperationKind::Replace, Language::English);
        let body = dialog_body(&req);
        assert!(body.starts_with(&req.message));
        assert!(body.ends_with(&req.detail));

        let bare = ConfirmRequest {
            detail: String::new(),
            ..req.clone()
        };
        assert_eq!(dialog_body(&bare), req.message);
    }

    #[cfg(not(windows))]
    #[test]
    fn continues_without_a_dialog_off_windows() {
        let req = ConfirmRequest::new(OperationKind::Restore, Language::Japanese);
        assert_eq!(MessageBoxPrompt::new().ask(&req), ConfirmDecision::Continue);
    }
}
