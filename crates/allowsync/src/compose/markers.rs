//! Removal of reference solutions marked with `// compose::` comments.
//!
//! `// compose::private` hides its own line, `// compose::begin_private` and
//! `// compose::end_private` hide everything between them (inclusive). Hidden code is
//! replaced by a hint line unless the marker carries the `no_hint` property.

use thiserror::Error;

const PREFIX: &str = "compose::";
const HINT: &str = "// TODO: your code here.";
const UNIMPLEMENTED: &str = "unimplemented!()";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkerError {
    #[error("line {line}: unknown compose command '{command}'")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: unknown compose property '{property}'")]
    UnknownProperty { line: usize, property: String },
    #[error("line {line}: unclosed '('")]
    UnclosedParen { line: usize },
    #[error("line {line}: 'end_private' without a matching 'begin_private'")]
    UnpairedEnd { line: usize },
    #[error("line {line}: nested 'begin_private'")]
    NestedBegin { line: usize },
    #[error("line {line}: 'begin_private' is never closed")]
    UnclosedBegin { line: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Directive {
    Private,
    BeginPrivate,
    EndPrivate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Marker {
    directive: Directive,
    no_hint: bool,
    unimplemented: bool,
}

fn parse_marker(line: &str, line_no: usize) -> Result<Option<Marker>, MarkerError> {
    let Some(comment_start) = line.find("//") else {
        return Ok(None);
    };
    let comment = &line[comment_start..];
    let Some(prefix_start) = comment.find(PREFIX) else {
        return Ok(None);
    };
    let command = comment[prefix_start + PREFIX.len()..].trim_end();

    let (head, properties) = match command.find('(') {
        Some(open) => match command[open + 1..].strip_suffix(')') {
            Some(inner) => (&command[..open], inner),
            None => return Err(MarkerError::UnclosedParen { line: line_no }),
        },
        None => (command, ""),
    };

    let directive = match head.trim() {
        "private" => Directive::Private,
        "begin_private" => Directive::BeginPrivate,
        "end_private" => Directive::EndPrivate,
        other => {
            return Err(MarkerError::UnknownCommand {
                line: line_no,
                command: other.to_string(),
            });
        }
    };

    let mut marker = Marker {
        directive,
        no_hint: false,
        unimplemented: false,
    };
    for property in properties.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match property {
            "no_hint" => marker.no_hint = true,
            "unimplemented" => marker.unimplemented = true,
            other => {
                return Err(MarkerError::UnknownProperty {
                    line: line_no,
                    property: other.to_string(),
                });
            }
        }
    }

    Ok(Some(marker))
}

fn find_marker(lines: &[&str], start: usize) -> Result<Option<(usize, Marker)>, MarkerError> {
    for (index, line) in lines.iter().enumerate().skip(start) {
        if let Some(marker) = parse_marker(line, index + 1)? {
            return Ok(Some((index, marker)));
        }
    }
    Ok(None)
}

/// Returns the index one past the last hidden line.
fn hidden_end(lines: &[&str], begin: usize, marker: Marker) -> Result<usize, MarkerError> {
    match marker.directive {
        Directive::EndPrivate => Err(MarkerError::UnpairedEnd { line: begin + 1 }),
        Directive::Private => Ok(begin + 1),
        Directive::BeginPrivate => {
            let mut cursor = begin + 1;
            while let Some((index, inner)) = find_marker(lines, cursor)? {
                match inner.directive {
                    Directive::BeginPrivate => {
                        return Err(MarkerError::NestedBegin { line: index + 1 });
                    }
                    Directive::Private => cursor = index + 1,
                    Directive::EndPrivate => return Ok(index + 1),
                }
            }
            Err(MarkerError::UnclosedBegin { line: begin + 1 })
        }
    }
}

fn is_blank(line: Option<&&str>) -> bool {
    line.is_some_and(|line| line.trim().is_empty())
}

/// Strips every private region from `source`, returning the public text.
pub fn strip_private(source: &str) -> Result<String, MarkerError> {
    let lines: Vec<&str> = source.lines().collect();
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;

    while let Some((begin, marker)) = find_marker(&lines, cursor)? {
        let end = hidden_end(&lines, begin, marker)?;
        for line in &lines[cursor..begin] {
            output.push_str(line);
            output.push('\n');
        }

        if marker.no_hint {
            let blank_before = begin > 0 && is_blank(lines.get(begin - 1));
            cursor = if blank_before && is_blank(lines.get(end)) {
                end + 1
            } else {
                end
            };
        } else {
            let marker_line = lines[begin];
            let indent = &marker_line[..marker_line.len() - marker_line.trim_start().len()];
            output.push_str(indent);
            output.push_str(HINT);
            output.push('\n');
            if marker.unimplemented {
                output.push_str(indent);
                output.push_str(UNIMPLEMENTED);
                output.push('\n');
            }
            cursor = end;
        }
    }

    for line in &lines[cursor..] {
        output.push_str(line);
        output.push('\n');
    }
    Ok(output)
}
