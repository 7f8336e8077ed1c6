//! Splitting a documentation comment into brief, description and port lists

use serde::Serialize;

/// Structured content of a node's documentation comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocSections {
    pub brief: String,
    pub description: Vec<String>,
    pub input_ports: Vec<String>,
    pub output_ports: Vec<String>,
}

impl DocSections {
    pub fn is_empty(&self) -> bool {
        self.brief.is_empty()
            && self.description.is_empty()
            && self.input_ports.is_empty()
            && self.output_ports.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Description,
    InputPorts,
    OutputPorts,
}

const BRIEF_MARKERS: &[&str] = &["@brief", "\\brief"];

/// Parse raw comment lines as returned by [`super::extract`]
pub fn parse<S: AsRef<str>>(raw_lines: &[S]) -> DocSections {
    let mut sections = DocSections::default();
    let mut current = Section::Description;

    for raw in raw_lines {
        let line = strip_comment_syntax(raw.as_ref());
        if line.is_empty() {
            continue;
        }

        if let Some(brief) = brief_text(line) {
            sections.brief = brief.to_string();
            current = Section::Description;
            continue;
        }
        if is_header(line, "input ports") {
            current = Section::InputPorts;
            continue;
        }
        if is_header(line, "output ports") {
            current = Section::OutputPorts;
            continue;
        }

        match current {
            Section::Description => sections.description.push(line.to_string()),
            Section::InputPorts => sections.input_ports.push(port_entry(line)),
            Section::OutputPorts => sections.output_ports.push(port_entry(line)),
        }
    }

    sections
}

/// Remove `/**`, `/*`, `*/`, `//`, `///` and a leading `*`
fn strip_comment_syntax(raw: &str) -> &str {
    let mut line = raw.trim();
    if let Some(rest) = line.strip_prefix("/*") {
        line = rest.strip_prefix('*').unwrap_or(rest);
    } else if let Some(rest) = line.strip_prefix("//") {
        line = rest.trim_start_matches('/');
    }
    if let Some(rest) = line.trim_end().strip_suffix("*/") {
        line = rest;
    }
    let line = line.trim_start();
    let line = line.strip_prefix('*').unwrap_or(line);
    line.trim()
}

fn brief_text(line: &str) -> Option<&str> {
    BRIEF_MARKERS
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        .map(str::trim)
}

/// `Input Ports:` style header, case-insensitive, whitespace allowed before `:`
fn is_header(line: &str, title: &str) -> bool {
    line.get(..title.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(title))
        && line[title.len()..].trim_start().starts_with(':')
}

fn port_entry(line: &str) -> String {
    line.trim_start_matches('-').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_example() {
        let lines = [
            "@brief Moves the arm.",
            "",
            "Input Ports:",
            "- target",
            "Output Ports:",
            "- reached",
        ];

        assert_eq!(
            parse(&lines),
            DocSections {
                brief: "Moves the arm.".to_string(),
                description: vec![],
                input_ports: vec!["target".to_string()],
                output_ports: vec!["reached".to_string()],
            }
        );
    }

    #[test]
    fn test_block_comment_syntax_is_stripped() {
        let lines = [
            "/**",
            "* @brief Opens the gripper.",
            "*",
            "* Uses the default force.",
            "* input ports :",
            "* -- force: newtons",
            "*   - speed",
            "*/",
        ];

        let sections = parse(&lines);
        assert_eq!(sections.brief, "Opens the gripper.");
        assert_eq!(sections.description, vec!["Uses the default force."]);
        assert_eq!(sections.input_ports, vec!["force: newtons", "speed"]);
        assert!(sections.output_ports.is_empty());
    }

    #[test]
    fn test_line_comments_and_backslash_brief() {
        let lines = ["/// \\brief Waits.", "/// Output Ports:", "/// - done", "//   - elapsed"];
        let sections = parse(&lines);
        assert_eq!(sections.brief, "Waits.");
        assert_eq!(sections.output_ports, vec!["done", "elapsed"]);
    }

    #[test]
    fn test_brief_returns_to_description() {
        let lines = ["Input Ports:", "- a", "@brief Late brief.", "More text."];
        let sections = parse(&lines);
        assert_eq!(sections.input_ports, vec!["a"]);
        assert_eq!(sections.brief, "Late brief.");
        assert_eq!(sections.description, vec!["More text."]);
    }

    #[test]
    fn test_markers_only_at_line_start() {
        let lines = ["See @brief below.", "Not an Input Ports: header", "@briefly ignored"];
        let sections = parse(&lines);
        assert!(sections.brief.is_empty());
        assert_eq!(sections.description.len(), 3);
        assert!(sections.input_ports.is_empty());
    }

    #[test]
    fn test_single_line_block() {
        let sections = parse(&["/** @brief Tiny. */"]);
        assert_eq!(sections.brief, "Tiny.");
        assert!(parse::<&str>(&[]).is_empty());
    }
}
