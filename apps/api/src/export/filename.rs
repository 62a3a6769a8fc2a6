use crate::export::ExportFormat;

/// `<name with each whitespace run replaced by "_">_resume.<ext>`.
///
/// Whitespace is the only thing rewritten: path separators and other characters that
/// are unsafe on some filesystems pass through unchanged. "Whitespace" is the set a
/// browser's `/\s+/g` matches, which differs from `char::is_whitespace` in two places:
/// U+FEFF counts, U+0085 does not.
pub fn export_filename(name: &str, format: ExportFormat) -> String {
    format!("{}_resume.{}", collapse_whitespace(name), format.extension())
}

fn collapse_whitespace(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if is_name_space(c) {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

fn is_name_space(c: char) -> bool {
    match c {
        '\u{FEFF}' => true,
        '\u{0085}' => false,
        c => c.is_whitespace(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_base_for_every_format() {
        for (format, expected) in [
            (ExportFormat::Html, "Jane_Q_Public_resume.html"),
            (ExportFormat::Png, "Jane_Q_Public_resume.png"),
            (ExportFormat::Docx, "Jane_Q_Public_resume.docx"),
        ] {
            assert_eq!(export_filename("Jane Q Public", format), expected);
        }
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(
            export_filename("  Ada \t\n Lovelace ", ExportFormat::Html),
            "_Ada_Lovelace__resume.html"
        );
    }

    #[test]
    fn test_whitespace_set_matches_browser_regex() {
        assert_eq!(
            export_filename("Ada\u{FEFF}Lovelace", ExportFormat::Png),
            "Ada_Lovelace_resume.png"
        );
        assert_eq!(
            export_filename("Ada\u{00A0}\u{3000}Lovelace", ExportFormat::Png),
            "Ada_Lovelace_resume.png"
        );
        assert_eq!(
            export_filename("Ada\u{0085}Lovelace", ExportFormat::Png),
            "Ada\u{0085}Lovelace_resume.png"
        );
    }

    #[test]
    fn test_other_characters_pass_through() {
        assert_eq!(
            export_filename("R&D/Ops", ExportFormat::Png),
            "R&D/Ops_resume.png"
        );
        assert_eq!(export_filename("", ExportFormat::Docx), "_resume.docx");
    }
}
