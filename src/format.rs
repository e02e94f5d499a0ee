use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::system::snapshot::CpuUsage;

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

pub fn format_kb_as_gb(kb: u64) -> String {
    format!("{:.2} GB", kb as f64 / 1024.0 / 1024.0)
}

pub fn format_usage(usage: CpuUsage, precision: usize) -> String {
    match usage {
        CpuUsage::Measured(pct) => format!("{pct:.precision$}%"),
        CpuUsage::Stale => "stale".to_string(),
    }
}
