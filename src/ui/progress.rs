use crate::io::PassProgress;

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable size: whole bytes, KB/MB with one decimal, GB/TB with two
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0usize;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    match unit {
        1 | 2 => format!("{:.1} {}", value, UNITS[unit]),
        _ => format!("{:.2} {}", value, UNITS[unit]),
    }
}

/// Short status line for a running pass, e.g. `pass 2/3 (ones) 1.5 MB / 4.0 MB`
pub fn pass_label(progress: &PassProgress) -> String {
    format!(
        "pass {}/{} ({}) {} / {}",
        progress.pass_index,
        progress.pass_count,
        progress.pass_kind,
        format_bytes(progress.bytes_done),
        format_bytes(progress.file_size)
    )
}
