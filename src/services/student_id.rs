// ==================== STUDENT ID FORMAT ====================
// External contract: "ST" + decimal, left-padded with '0' to width 6.
// Padding never truncates: sequence numbers past 999999 keep their full
// digit count ("ST1000000").

pub const PREFIX: &str = "ST";
pub const PAD_WIDTH: usize = 6;

/// Renders a sequence number as a student ID.
pub fn format_student_id(n: u64) -> String {
    format!("{}{:0width$}", PREFIX, n, width = PAD_WIDTH)
}

/// Extracts the numeric suffix from a student ID. Returns `None` when the
/// prefix is missing or the suffix is not a decimal number.
pub fn parse_student_id(id: &str) -> Option<u64> {
    id.strip_prefix(PREFIX)?.parse::<u64>().ok()
}
