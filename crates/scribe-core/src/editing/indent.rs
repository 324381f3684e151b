//! Auto-indentation

/// Extra indentation after a line opening a block
pub const INDENT_UNIT: &str = "    ";

/// Indentation for a new line following `line`
///
/// Keeps the leading spaces and tabs of `line`, plus one unit if it ends
/// with `:`.
pub fn newline_indent(line: &str) -> String {
    let leading: String = line.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
    if line.trim_end().ends_with(':') {
        format!("{}{}", leading, INDENT_UNIT)
    } else {
        leading
    }
}
