use crate::pdf::outline::Bookmark;
use regex::Regex;
use std::sync::OnceLock;

/// Longest sanitized title kept in an output filename. Leaves headroom
/// for the numeric prefix and extension under 255-byte filename limits.
const MAX_TITLE_LEN: usize = 200;

/// A contiguous page span derived from one top-level bookmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// 1-indexed position in bookmark order; stable across selection
    /// filtering.
    pub number: u32,
    pub title: String,
    /// First page of the chapter, 1-indexed, inclusive.
    pub start_page: u32,
    /// Last page of the chapter, 1-indexed, inclusive.
    pub end_page: u32,
}

impl Chapter {
    pub fn page_count(&self) -> u32 {
        self.end_page - self.start_page + 1
    }

    /// Output filename: zero-padded chapter number, underscore,
    /// sanitized title. The padding is two digits minimum and grows
    /// naturally for chapter numbers >= 100.
    pub fn filename(&self) -> String {
        format!("{:02}_{}.pdf", self.number, sanitize_title(&self.title))
    }
}

/// Derive the chapter partition from bookmarks sorted ascending by page.
///
/// Each chapter runs from its bookmark's page up to the page before the
/// next bookmark; the last chapter runs to the end of the document.
/// Together the chapters cover every page from the first bookmark to the
/// last page exactly once. A bookmark sharing its page with the next one
/// is clamped to a single page and reported in the warning list.
pub fn build_chapters(bookmarks: &[Bookmark], total_pages: u32) -> (Vec<Chapter>, Vec<String>) {
    let mut chapters = Vec::with_capacity(bookmarks.len());
    let mut warnings = Vec::new();

    for (i, bookmark) in bookmarks.iter().enumerate() {
        let start_page = bookmark.page;
        let mut end_page = match bookmarks.get(i + 1) {
            Some(next) => next.page - 1,
            None => total_pages,
        };

        if end_page < start_page {
            warnings.push(format!(
                "Chapter {} ({:?}) shares page {} with the next bookmark; clamping to one page",
                i + 1,
                bookmark.title,
                start_page
            ));
            end_page = start_page;
        }

        chapters.push(Chapter {
            number: (i + 1) as u32,
            title: bookmark.title.clone(),
            start_page,
            end_page,
        });
    }

    (chapters, warnings)
}

fn invalid_filename_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("character class is valid"))
}

/// Make a bookmark title safe for use in filenames on any supported
/// filesystem: strip the Windows-reserved characters, trim stray dots
/// and spaces, and cap the length.
pub fn sanitize_title(title: &str) -> String {
    let stripped = invalid_filename_chars().replace_all(title, "");
    let trimmed = stripped.trim_matches(|c| c == '.' || c == ' ');

    let mut sanitized: String = trimmed.chars().take(MAX_TITLE_LEN).collect();
    // Truncation can expose trailing whitespace again.
    while sanitized.ends_with(' ') {
        sanitized.pop();
    }

    if sanitized.is_empty() {
        "chapter".to_string()
    } else {
        sanitized
    }
}
