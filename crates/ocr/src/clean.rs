//! Post-processing of raw recognizer output.

/// Keep printable ASCII (`0x20..=0x7E`) and newlines, then trim.
pub fn clean_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| matches!(c, ' '..='~' | '\n'))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_non_printable_and_non_ascii() {
        assert_eq!(clean_text("Err\u{00f6}r\t500\u{000c}"), "Errr500");
    }

    #[test]
    fn keeps_newlines_inside_and_trims_edges() {
        assert_eq!(clean_text("\n  line one\nline two \n\n"), "line one\nline two");
    }

    #[test]
    fn carriage_returns_are_dropped() {
        assert_eq!(clean_text("a\r\nb"), "a\nb");
    }

    #[test]
    fn empty_recognition_stays_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("\u{2028}\u{00a0}"), "");
    }
}
