//! Locating the comment attached above a declaration

/// Raw comment lines directly above `declaration_line`, top to bottom.
///
/// Lines are returned trimmed. A block comment is collected from its closing
/// `*/` up to the line opening it; otherwise a run of `//` or `*` lines is
/// collected. A block comment trailing code on its closing line is not
/// attached. Blank lines between the declaration and the comment are skipped.
pub fn extract<S: AsRef<str>>(lines: &[S], declaration_line: usize) -> Vec<String> {
    let mut above = lines[..declaration_line.min(lines.len())]
        .iter()
        .map(|line| line.as_ref().trim())
        .rev()
        .skip_while(|line| line.is_empty())
        .peekable();

    let Some(nearest) = above.peek().copied() else {
        return Vec::new();
    };

    let mut collected = Vec::new();
    if nearest.ends_with("*/") {
        // A block closing on a line of code trails that code
        if nearest.find("/*").is_some_and(|open| open > 0) {
            return Vec::new();
        }
        for line in above {
            collected.push(line.to_string());
            if line.contains("/*") {
                break;
            }
        }
    } else {
        collected.extend(
            above
                .take_while(|line| is_line_comment(line))
                .map(str::to_string),
        );
    }

    collected.reverse();
    collected
}

fn is_line_comment(line: &str) -> bool {
    line.starts_with("//") || line.starts_with('*')
}
