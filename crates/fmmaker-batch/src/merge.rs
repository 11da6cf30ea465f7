//! Prompt template merge and output document layout.

/// Marker in a prompt template replaced by the input file's text.
pub const PLACEHOLDER: &str = "{{TEXT}}";

/// Extension of generated output files.
pub const OUTPUT_EXTENSION: &str = "md";

/// Replace every occurrence of [`PLACEHOLDER`] in `template` with `text`.
pub fn merge_template(template: &str, text: &str) -> String {
    template.replace(PLACEHOLDER, text)
}

/// Lay out an output document: front matter, optional reference line, original text.
///
/// `front_matter` is written as given (callers pass the trimmed model output).
/// A blank or missing reference adds no line.
pub fn render_output(front_matter: &str, reference: Option<&str>, original: &str) -> String {
    let mut out = String::with_capacity(front_matter.len() + original.len() + 64);
    out.push_str(front_matter);
    out.push_str("\n\n");
    if let Some(reference) = reference.map(str::trim).filter(|r| !r.is_empty()) {
        out.push_str("Reference: ");
        out.push_str(reference);
        out.push_str("\n\n");
    }
    out.push_str(original);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_single_placeholder() {
        assert_eq!(
            merge_template("Summarize: {{TEXT}}", "Hello world"),
            "Summarize: Hello world"
        );
    }

    #[test]
    fn test_merge_every_occurrence() {
        assert_eq!(
            merge_template("A {{TEXT}} B {{TEXT}}", "x"),
            "A x B x"
        );
    }

    #[test]
    fn test_merge_without_placeholder() {
        assert_eq!(merge_template("No marker", "ignored"), "No marker");
    }

    #[test]
    fn test_merge_text_containing_marker_is_not_rescanned() {
        assert_eq!(merge_template("[{{TEXT}}]", "{{TEXT}}"), "[{{TEXT}}]");
    }

    #[test]
    fn test_render_without_reference() {
        assert_eq!(
            render_output("A greeting.", None, "Hello world"),
            "A greeting.\n\nHello world"
        );
    }

    #[test]
    fn test_render_with_reference() {
        assert_eq!(
            render_output("Summary", Some("  Smith 2021 "), "Body\n"),
            "Summary\n\nReference: Smith 2021\n\nBody\n"
        );
    }

    #[test]
    fn test_render_blank_reference_is_omitted() {
        assert_eq!(render_output("S", Some("   "), "B"), "S\n\nB");
    }
}
