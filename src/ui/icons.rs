//! Shared UI icons and emojis.

use console::Emoji;

// Decision outcomes
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[PASS]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[FAIL]");
pub static PARTIAL: Emoji<'_, '_> = Emoji("🟡 ", "[PART]");
pub static DEFERRED: Emoji<'_, '_> = Emoji("⏸️  ", "[DEFER]");
pub static PENDING: Emoji<'_, '_> = Emoji("⏳ ", "[ ]");

// Notices
pub static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[WARN]");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "*");
pub static PROGRESS: Emoji<'_, '_> = Emoji("📊 ", "[PROG]");
pub static OFFLINE: Emoji<'_, '_> = Emoji("📴 ", "[LOCAL]");
