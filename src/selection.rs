use anyhow::{anyhow, Result};

/// One term of a chapter selection expression: a single chapter number
/// or an inclusive range of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTerm {
    Single(u32),
    Range(u32, u32),
}

impl SelectionTerm {
    /// Parse a selection term like "5" or "5-7".
    ///
    /// Chapter numbers are 1-indexed, so zero is invalid, and a reversed
    /// range ("7-5") is an error rather than being silently flipped.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow!("Empty selection term"));
        }

        if let Some(dash_pos) = s.find('-') {
            if dash_pos == 0 {
                return Err(anyhow!("Invalid selection term: {}", s));
            }

            let start = parse_chapter_number(&s[..dash_pos])?;
            let end = parse_chapter_number(&s[dash_pos + 1..])?;

            if end < start {
                return Err(anyhow!(
                    "Reversed range {}-{} (start must not exceed end)",
                    start,
                    end
                ));
            }

            Ok(SelectionTerm::Range(start, end))
        } else {
            Ok(SelectionTerm::Single(parse_chapter_number(s)?))
        }
    }
}

fn parse_chapter_number(s: &str) -> Result<u32> {
    let s = s.trim();
    let n = s
        .parse::<u32>()
        .map_err(|_| anyhow!("Invalid chapter number: {:?}", s))?;
    if n == 0 {
        return Err(anyhow!("Chapter numbers must be >= 1"));
    }
    Ok(n)
}

/// Parse a comma-separated selection like "1,3,5-7".
///
/// Malformed terms are dropped and reported in the returned warning
/// list; the remaining terms still parse.
pub fn parse_selection(s: &str) -> (Vec<SelectionTerm>, Vec<String>) {
    let mut terms = Vec::new();
    let mut warnings = Vec::new();

    for part in s.split(',') {
        match SelectionTerm::parse(part) {
            Ok(term) => terms.push(term),
            Err(e) => warnings.push(format!("Skipping selection term {:?}: {}", part.trim(), e)),
        }
    }

    (terms, warnings)
}

/// Resolve parsed terms against the number of available chapters.
///
/// Out-of-range chapter numbers are dropped with a warning naming them;
/// the in-range part of a straddling range survives. The result is
/// ascending and duplicate-free.
pub fn resolve_selection(terms: &[SelectionTerm], chapter_count: u32) -> (Vec<u32>, Vec<String>) {
    let mut selected = Vec::new();
    let mut warnings = Vec::new();

    for term in terms {
        match *term {
            SelectionTerm::Single(n) => {
                if n > chapter_count {
                    warnings.push(format!(
                        "Chapter {} is out of range (1-{})",
                        n, chapter_count
                    ));
                } else {
                    selected.push(n);
                }
            }
            SelectionTerm::Range(start, end) => {
                if start > chapter_count {
                    warnings.push(format!(
                        "Chapters {}-{} are out of range (1-{})",
                        start, end, chapter_count
                    ));
                    continue;
                }
                if end > chapter_count {
                    warnings.push(format!(
                        "Chapters {}-{} are out of range (1-{})",
                        chapter_count + 1,
                        end,
                        chapter_count
                    ));
                }
                selected.extend(start..=end.min(chapter_count));
            }
        }
    }

    selected.sort_unstable();
    selected.dedup();

    (selected, warnings)
}

/// Expand a selection expression into concrete chapter numbers.
///
/// A missing, empty, or whitespace-only expression selects every
/// chapter.
pub fn expand_selection(expr: Option<&str>, chapter_count: u32) -> (Vec<u32>, Vec<String>) {
    match expr {
        Some(s) if !s.trim().is_empty() => {
            let (terms, mut warnings) = parse_selection(s);
            let (selected, resolve_warnings) = resolve_selection(&terms, chapter_count);
            warnings.extend(resolve_warnings);
            (selected, warnings)
        }
        _ => ((1..=chapter_count).collect(), Vec::new()),
    }
}

/// Render chapter numbers back into selection syntax, collapsing
/// consecutive runs ("1-3,5"). Expects ascending, duplicate-free input.
pub fn canonical_selection(numbers: &[u32]) -> String {
    let mut parts = Vec::new();
    let mut i = 0;

    while i < numbers.len() {
        let start = numbers[i];
        let mut end = start;
        while i + 1 < numbers.len() && numbers[i + 1] == end + 1 {
            i += 1;
            end = numbers[i];
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{}-{}", start, end));
        }
        i += 1;
    }

    parts.join(",")
}
