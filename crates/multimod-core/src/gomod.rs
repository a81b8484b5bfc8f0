//! Minimal, formatting-preserving editing of `go.mod` files.
//!
//! Only the two things the release operations need are supported: reading the
//! `module` directive and rewriting the version of selected `require` entries.
//! Every other line is copied through untouched.

use crate::errors::{Result, io_error_with_path};
use crate::manifest::ModulePath;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of a module definition.
pub const MODULE_FILE_NAME: &str = "go.mod";

/// Return the module path declared by a `go.mod` file, if any.
pub fn parse_module_path(contents: &str) -> Option<ModulePath> {
    for line in contents.lines() {
        let (code, _) = split_comment(line);
        let trimmed = code.trim();
        let Some(rest) = strip_keyword(trimmed, "module") else {
            continue;
        };
        let rest = rest.trim();
        if rest.is_empty() {
            return None;
        }
        return Some(unquote(rest).to_string());
    }
    None
}

/// Rewrite every requirement on one of `modules` to `version`.
///
/// Returns `None` when the contents already match, so callers can skip
/// writing unchanged files.
pub fn update_requirements(
    contents: &str,
    modules: &[ModulePath],
    version: &str,
) -> Option<String> {
    let targets: BTreeSet<&str> = modules.iter().map(String::as_str).collect();
    let mut out = String::with_capacity(contents.len());
    let mut changed = false;
    let mut in_require_block = false;

    for raw_line in contents.split_inclusive('\n') {
        let (line, ending) = split_line_ending(raw_line);
        let (code, _) = split_comment(line);
        let trimmed = code.trim();

        let entry_start = if in_require_block {
            if trimmed == ")" {
                in_require_block = false;
                None
            } else {
                Some(0)
            }
        } else if let Some(rest) = strip_keyword(trimmed, "require") {
            if rest.trim_start().starts_with('(') {
                in_require_block = true;
                None
            } else {
                // offset of the text following the keyword within `line`
                let keyword_at = code.len() - code.trim_start().len();
                Some(keyword_at + "require".len())
            }
        } else {
            None
        };

        match entry_start.and_then(|start| rewrite_requirement(line, start, &targets, version)) {
            Some(rewritten) => {
                changed = true;
                out.push_str(&rewritten);
            }
            None => out.push_str(line),
        }
        out.push_str(ending);
    }

    changed.then_some(out)
}

/// Apply [`update_requirements`] to each file, writing only the files that change.
pub fn update_module_files<'a, I>(
    files: I,
    modules: &[ModulePath],
    version: &str,
) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut updated = Vec::new();
    for path in files {
        let text = fs::read_to_string(path).map_err(|e| io_error_with_path(e, path))?;
        if let Some(new_text) = update_requirements(&text, modules, version) {
            fs::write(path, new_text).map_err(|e| io_error_with_path(e, path))?;
            tracing::debug!("updated requirements in {}", path.display());
            updated.push(path.to_path_buf());
        }
    }
    Ok(updated)
}

/// Rewrite a single `<path> <version>` requirement found at `start` within `line`.
fn rewrite_requirement(
    line: &str,
    start: usize,
    targets: &BTreeSet<&str>,
    version: &str,
) -> Option<String> {
    let (code, _) = split_comment(line);
    let bytes = code.as_bytes();
    let mut pos = skip_whitespace(bytes, start);

    let path_start = pos;
    if bytes.get(pos) == Some(&b'"') {
        pos += 1;
        while pos < bytes.len() && bytes[pos] != b'"' {
            pos += 1;
        }
        pos = (pos + 1).min(bytes.len());
    } else {
        pos = skip_token(bytes, pos);
    }
    let module = unquote(&code[path_start..pos]);
    if !targets.contains(module) {
        return None;
    }

    let version_start = skip_whitespace(bytes, pos);
    let version_end = skip_token(bytes, version_start);
    if version_start == version_end || &code[version_start..version_end] == version {
        return None;
    }

    let mut rewritten = String::with_capacity(line.len() + version.len());
    rewritten.push_str(&line[..version_start]);
    rewritten.push_str(version);
    rewritten.push_str(&line[version_end..]);
    Some(rewritten)
}

fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || c == '(' || c == '"' => Some(rest),
        Some(_) => None,
    }
}

fn split_comment(line: &str) -> (&str, &str) {
    match line.find("//") {
        Some(idx) => line.split_at(idx),
        None => (line, ""),
    }
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(stripped) = line.strip_suffix("\r\n") {
        (stripped, "\r\n")
    } else if let Some(stripped) = line.strip_suffix('\n') {
        (stripped, "\n")
    } else {
        (line, "")
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('`').and_then(|v| v.strip_suffix('`')))
        .unwrap_or(value)
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

fn skip_token(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}
