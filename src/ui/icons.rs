//! Shared terminal icons.

use console::Emoji;

use crate::notify::NotificationKind;

pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[i]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");

pub static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
pub static USER: Emoji<'_, '_> = Emoji("👤 ", "");

pub fn for_kind(kind: NotificationKind) -> &'static Emoji<'static, 'static> {
    match kind {
        NotificationKind::Success => &CHECK,
        NotificationKind::Error => &CROSS,
        NotificationKind::Info => &INFO,
        NotificationKind::Warning => &WARN,
    }
}
