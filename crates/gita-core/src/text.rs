//! Verse text shaping: speaker lines, line breaking and hint extraction.

use regex::Regex;
use std::sync::OnceLock;

const DANDA: char = '।';
const DOUBLE_DANDA: char = '॥';

fn speaker_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(उवाच|ुवाच|uvāca)").expect("valid speaker regex"))
}

fn verse_marks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[॥।.0-9०-९]").expect("valid verse mark regex"))
}

/// A speaker attribution such as "अर्जुन उवाच" or "arjuna uvāca"
pub fn is_speaker_line(line: &str) -> bool {
    line.contains("उवाच") || line.contains("भगवानुवाच") || line.to_lowercase().contains("uvāca")
}

/// One source line split into display rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLine {
    pub rows: Vec<String>,
    pub speaker: bool,
}

pub fn format_lines(lines: &[String], allow_speaker: bool) -> Vec<FormattedLine> {
    lines
        .iter()
        .map(|line| {
            let speaker = allow_speaker && is_speaker_line(line);
            FormattedLine {
                rows: format_line(line, speaker),
                speaker,
            }
        })
        .collect()
}

/// Normalize "।।" to "॥" and break the line into rows: after the speaker word
/// for attribution lines, otherwise after each single danda that does not
/// close the verse.
pub fn format_line(line: &str, speaker: bool) -> Vec<String> {
    let normalized = line.replace("।।", "॥");
    let mut rows = Vec::new();

    if speaker {
        let mut last = 0;
        for m in speaker_word().find_iter(&normalized) {
            rows.push(normalized[last..m.end()].to_string());
            last = m.end();
        }
        rows.push(normalized[last..].to_string());
    } else {
        let mut current = String::new();
        let mut chars = normalized.chars().peekable();
        while let Some(c) = chars.next() {
            current.push(c);
            if c == DANDA {
                let closes = matches!(chars.peek(), Some(&n) if n == DANDA || n == DOUBLE_DANDA || n.is_ascii_digit());
                if !closes {
                    rows.push(std::mem::take(&mut current));
                }
            }
        }
        rows.push(current);
    }

    rows.into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect()
}

/// Lines that belong to the verse proper, speaker attributions removed
pub fn candidate_lines(lines: &[String]) -> Vec<&str> {
    lines
        .iter()
        .map(String::as_str)
        .filter(|l| !is_speaker_line(l))
        .collect()
}

/// Remove dandas, periods and digits used for verse numbering
pub fn strip_verse_marks(text: &str) -> String {
    verse_marks().replace_all(text, "").trim().to_string()
}

/// The prompt and hint for identifying a verse from its first charan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningPhrase {
    pub prompt: String,
    pub hint: String,
}

pub fn opening_phrase(lines: &[String]) -> OpeningPhrase {
    let candidates = candidate_lines(lines);
    let first = candidates.first().copied().unwrap_or("");
    let second = candidates.get(1).map(|l| l.trim()).unwrap_or("");

    let (prompt, hint) = match first.split_once(',') {
        Some((head, rest)) if !rest.trim().is_empty() => (head.trim(), rest.trim()),
        Some((head, _)) => (head.trim(), second),
        None => (first.trim(), second),
    };

    OpeningPhrase {
        prompt: strip_verse_marks(prompt),
        hint: strip_verse_marks(hint),
    }
}

/// First word of the first verse line, used when the prompt is the verse number
pub fn first_word_hint(lines: &[String]) -> Option<String> {
    candidate_lines(lines)
        .first()
        .and_then(|l| l.split_whitespace().next())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_speaker_detection() {
        assert!(is_speaker_line("अर्जुन उवाच"));
        assert!(is_speaker_line("श्रीभगवानुवाच"));
        assert!(is_speaker_line("Arjuna Uvāca"));
        assert!(!is_speaker_line("धर्मक्षेत्रे कुरुक्षेत्रे समवेता युयुत्सवः ।"));
    }

    #[test]
    fn test_format_breaks_after_inner_danda() {
        let rows = format_line("धर्मक्षेत्रे कुरुक्षेत्रे समवेता युयुत्सवः । मामकाः पाण्डवाश्चैव किमकुर्वत सञ्जय ।।1।।", false);
        assert_eq!(
            rows,
            vec![
                "धर्मक्षेत्रे कुरुक्षेत्रे समवेता युयुत्सवः ।".to_string(),
                "मामकाः पाण्डवाश्चैव किमकुर्वत सञ्जय ॥1॥".to_string(),
            ]
        );
    }

    #[test]
    fn test_format_keeps_numbered_danda() {
        let rows = format_line("योगस्थः कुरु कर्माणि ।48।", false);
        assert_eq!(rows, vec!["योगस्थः कुरु कर्माणि ।48।".to_string()]);
    }

    #[test]
    fn test_format_speaker_line() {
        let rows = format_line("सञ्जय उवाच तं तथा", true);
        assert_eq!(rows, vec!["सञ्जय उवाच".to_string(), "तं तथा".to_string()]);

        let rows = format_line("arjuna uvāca", true);
        assert_eq!(rows, vec!["arjuna uvāca".to_string()]);
    }

    #[test]
    fn test_conclusion_lines_are_never_speakers() {
        let formatted = format_lines(&owned(&["इति श्रीमद्भगवद्गीतासु अर्जुन उवाच"]), false);
        assert!(!formatted[0].speaker);
    }

    #[test]
    fn test_opening_phrase_splits_on_first_comma() {
        let lines = owned(&[
            "अर्जुन उवाच",
            "a b, c d ।1।",
            "second line ॥",
        ]);
        let phrase = opening_phrase(&lines);

        assert_eq!(phrase.prompt, "a b");
        assert_eq!(phrase.hint, "c d");
    }

    #[test]
    fn test_opening_phrase_takes_remainder_after_comma() {
        let lines = owned(&["gurūn ahatvā hi, mahānubhāvān, śreyo bhoktuṁ ।2.5।", "next"]);
        let phrase = opening_phrase(&lines);

        assert_eq!(phrase.prompt, "gurūn ahatvā hi");
        assert_eq!(phrase.hint, "mahānubhāvān, śreyo bhoktuṁ");
    }

    #[test]
    fn test_opening_phrase_uses_second_line_without_comma() {
        let lines = owned(&["श्रीभगवानुवाच", "कुतस्त्वा कश्मलमिदं ।", "अनार्यजुष्टमस्वर्ग्यम् ॥२॥"]);
        let phrase = opening_phrase(&lines);

        assert_eq!(phrase.prompt, "कुतस्त्वा कश्मलमिदं");
        assert_eq!(phrase.hint, "अनार्यजुष्टमस्वर्ग्यम्");
    }

    #[test]
    fn test_opening_phrase_trailing_comma_falls_back_to_next_line() {
        let lines = owned(&["first part,", "second part ।"]);
        let phrase = opening_phrase(&lines);

        assert_eq!(phrase.prompt, "first part");
        assert_eq!(phrase.hint, "second part");
    }

    #[test]
    fn test_opening_phrase_of_empty_verse() {
        let phrase = opening_phrase(&[]);
        assert_eq!(phrase.prompt, "");
        assert_eq!(phrase.hint, "");
    }

    #[test]
    fn test_first_word_hint_skips_speaker() {
        let lines = owned(&["धृतराष्ट्र उवाच", "धर्मक्षेत्रे कुरुक्षेत्रे"]);
        assert_eq!(first_word_hint(&lines).as_deref(), Some("धर्मक्षेत्रे"));
        assert_eq!(first_word_hint(&owned(&["सञ्जय उवाच"])), None);
    }
}
