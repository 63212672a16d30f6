//! Cleanup of engine diagnostics before they are stored on a job.

use regex::Regex;
use std::sync::OnceLock;

fn escape_sequences() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // CSI (ESC [ ... final), OSC (ESC ] ... BEL or ST), then lone two-byte escapes.
        Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[0-~]")
            .expect("escape sequence pattern is valid")
    })
}

/// Strips terminal escape sequences and any remaining control bytes,
/// keeping newlines and tabs.
pub fn strip_terminal_sequences(input: &str) -> String {
    escape_sequences()
        .replace_all(input, "")
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_colour_codes() {
        let raw = "\x1b[0;31mERROR:\x1b[0m [youtube] abc: Video unavailable";
        assert_eq!(
            strip_terminal_sequences(raw),
            "ERROR: [youtube] abc: Video unavailable"
        );
    }

    #[test]
    fn test_strips_osc_and_stray_control_bytes() {
        let raw = "\x1b]0;title\x07fail\x1b7ed\x08 here\r";
        let cleaned = strip_terminal_sequences(raw);
        assert_eq!(cleaned, "failed here");
        assert!(!cleaned.contains('\x1b'));
    }

    #[test]
    fn test_keeps_plain_multiline_text() {
        let raw = "line one\n\tline two";
        assert_eq!(strip_terminal_sequences(raw), raw);
    }
}
