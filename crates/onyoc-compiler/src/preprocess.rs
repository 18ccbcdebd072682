//! `#use "path"` textual expansion.
//!
//! A single, non-recursive pass: a source line consisting of (after
//! leading whitespace) `#use "<path>"` is replaced by the verbatim
//! contents of the file at `<path>`, resolved relative to the current
//! working directory. Included files are not themselves scanned for
//! further `#use` directives, and cycles are not detected -- this mirrors
//! the original single-pass `re.sub` contract exactly.

use std::path::Path;

use regex::Regex;

use crate::error::Result;

fn pattern() -> Regex {
    Regex::new(r#"(?m)(^|\n)#use\s+"([^"]+)"(\n|$)"#).expect("static pattern is valid")
}

/// Expand all `#use` directives in `source`, reading included files
/// relative to `base_dir` (typically the current working directory).
pub fn preprocess(source: &str) -> Result<String> {
    let re = pattern();
    let mut out = String::with_capacity(source.len());
    let mut last_end = 0;
    for caps in re.captures_iter(source) {
        let whole = caps.get(0).unwrap();
        let leading = caps.get(1).unwrap().as_str();
        let path = caps.get(2).unwrap().as_str();
        let trailing = caps.get(3).unwrap().as_str();

        out.push_str(&source[last_end..whole.start()]);
        out.push_str(leading);
        out.push_str(&read_included(path)?);
        out.push_str(trailing);
        last_end = whole.end();
    }
    out.push_str(&source[last_end..]);
    Ok(out)
}

fn read_included(path: &str) -> Result<String> {
    let contents = std::fs::read_to_string(Path::new(path))?;
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn expands_use_directive() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "helper() {{}}").unwrap();
        let path = tmp.path().to_str().unwrap().to_string();
        let source = format!("#use \"{path}\"\nmain() {{}}\n");
        let expanded = preprocess(&source).unwrap();
        assert!(expanded.contains("helper() {}"));
        assert!(expanded.contains("main() {}"));
    }

    #[test]
    fn leaves_source_without_use_untouched() {
        let source = "main() {}\n";
        assert_eq!(preprocess(source).unwrap(), source);
    }
}
