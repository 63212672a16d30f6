use super::args::PROGRESS_MARKER;
use crate::domain::progress::{ProgressEvent, ProgressPhase};

/// Parses one stdout line printed with our progress template.
/// Any other output (info lines, post-processor chatter) yields `None`.
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let rest = line.trim().strip_prefix(PROGRESS_MARKER)?.strip_prefix('|')?;
    let mut fields = rest.splitn(4, '|');
    let phase = ProgressPhase::parse(fields.next()?);
    let clean = |v: Option<&str>| {
        let v = v.unwrap_or("").trim();
        if v.is_empty() || v == "NA" {
            "N/A".to_string()
        } else {
            v.to_string()
        }
    };
    Some(ProgressEvent {
        phase,
        percent: clean(fields.next()),
        rate: clean(fields.next()),
        eta: clean(fields.next()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_downloading_line() {
        let event = parse_progress_line("mediafetch|downloading| 42.3%|  1.21MiB/s|00:07").unwrap();
        assert_eq!(event.phase, ProgressPhase::Downloading);
        assert_eq!(event.percent, "42.3%");
        assert_eq!(event.rate, "1.21MiB/s");
        assert_eq!(event.eta, "00:07");
    }

    #[test]
    fn test_parse_finished_line_with_missing_fields() {
        let event = parse_progress_line("mediafetch|finished|100.0%|NA|").unwrap();
        assert_eq!(event.phase, ProgressPhase::Finished);
        assert_eq!(event.rate, "N/A");
        assert_eq!(event.eta, "N/A");
    }

    #[test]
    fn test_ignores_other_output() {
        assert!(parse_progress_line("[youtube] abc: Downloading webpage").is_none());
        assert!(parse_progress_line("[ExtractAudio] Destination: x.mp3").is_none());
        assert!(parse_progress_line("mediafetchX|downloading").is_none());
        assert!(parse_progress_line("").is_none());
    }
}
