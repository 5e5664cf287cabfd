use crate::chapters::{build_chapters, Chapter};
use crate::pdf::outline::chapter_bookmarks;
use crate::pdf::PdfDocument;
use crate::selection::expand_selection;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct SplitOptions {
    pub output_dir: PathBuf,
    /// Selection expression like "1,3,5-7"; all chapters when unset.
    pub chapters: Option<String>,
    pub list_only: bool,
}

/// The outcome of extracting one chapter, for structured reporting.
#[derive(Debug, Clone)]
pub struct ChapterOutcome {
    pub number: u32,
    pub title: String,
    pub start_page: u32,
    pub end_page: u32,
    pub page_count: u32,
    pub filename: String,
    pub error: Option<String>,
}

pub fn run<P: AsRef<Path>>(input: P, options: &SplitOptions) -> Result<()> {
    let doc = PdfDocument::open(&input)?;
    let total_pages = doc.page_count();

    let bookmarks = chapter_bookmarks(&doc.doc)?;
    if bookmarks.is_empty() {
        anyhow::bail!(
            "No bookmarks found in {}; cannot split into chapters",
            doc.path
        );
    }

    let (chapters, warnings) = build_chapters(&bookmarks, total_pages);
    for warning in &warnings {
        eprintln!("Warning: {}", warning);
    }

    println!(
        "Found {} chapters in {} ({} pages)",
        chapters.len(),
        doc.path,
        total_pages
    );

    if options.list_only {
        println!();
        for chapter in &chapters {
            println!("  {}", chapter_line(chapter));
        }
        return Ok(());
    }

    let (selected, selection_warnings) =
        expand_selection(options.chapters.as_deref(), chapters.len() as u32);
    for warning in &selection_warnings {
        eprintln!("Warning: {}", warning);
    }
    if selected.is_empty() {
        anyhow::bail!(
            "Selection {:?} matches no chapters",
            options.chapters.as_deref().unwrap_or_default()
        );
    }
    if selected.len() < chapters.len() {
        println!("Extracting {} selected chapters", selected.len());
    }

    std::fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "Failed to create directory: {}",
            options.output_dir.display()
        )
    })?;

    let outcomes = extract_chapters(&doc, &chapters, &selected, &options.output_dir);

    let mut extracted = 0;
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.error {
            None => {
                extracted += 1;
                println!(
                    "  {} -> {}",
                    chapter_line(&chapters[(outcome.number - 1) as usize]),
                    outcome.filename
                );
            }
            Some(error) => {
                failed += 1;
                eprintln!("  Chapter {} ({:?}) failed: {}", outcome.number, outcome.title, error);
            }
        }
    }

    println!();
    if failed == 0 {
        println!(
            "Extracted {} chapters to {}",
            extracted,
            options.output_dir.display()
        );
    } else {
        println!(
            "Extracted {} of {} selected chapters to {} ({} failed)",
            extracted,
            outcomes.len(),
            options.output_dir.display(),
            failed
        );
    }

    if extracted == 0 {
        anyhow::bail!("All {} chapter extractions failed", failed);
    }

    Ok(())
}

/// Extract the selected chapters into `output_dir`, one file each.
///
/// A failing chapter is recorded in its outcome and does not stop the
/// remaining extractions.
pub fn extract_chapters(
    doc: &PdfDocument,
    chapters: &[Chapter],
    selected: &[u32],
    output_dir: &Path,
) -> Vec<ChapterOutcome> {
    let mut outcomes = Vec::with_capacity(selected.len());

    for &number in selected {
        let chapter = &chapters[(number - 1) as usize];
        let filename = chapter.filename();
        let output_path = output_dir.join(&filename);

        let error = write_chapter(doc, chapter, &output_path)
            .err()
            .map(|e| format!("{:#}", e));

        outcomes.push(ChapterOutcome {
            number: chapter.number,
            title: chapter.title.clone(),
            start_page: chapter.start_page,
            end_page: chapter.end_page,
            page_count: chapter.page_count(),
            filename,
            error,
        });
    }

    outcomes
}

fn write_chapter(doc: &PdfDocument, chapter: &Chapter, output_path: &Path) -> Result<()> {
    let mut chapter_doc = doc.extract_page_span(chapter.start_page, chapter.end_page)?;
    PdfDocument::save(&mut chapter_doc, output_path)
}

fn chapter_line(chapter: &Chapter) -> String {
    format!(
        "{:3}. {:<50} (pages {:4}-{:4}, {:4} pages)",
        chapter.number,
        chapter.title,
        chapter.start_page,
        chapter.end_page,
        chapter.page_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::{leaf, sample_document};
    use lopdf::Document;

    fn write_sample(dir: &Path, pages: u32, bookmarks: Vec<(&'static str, u32)>) -> PathBuf {
        let path = dir.join("book.pdf");
        let outline = bookmarks
            .into_iter()
            .map(|(title, page)| leaf(title, page))
            .collect();
        sample_document(pages, outline).save(&path).unwrap();
        path
    }

    fn options(output_dir: PathBuf) -> SplitOptions {
        SplitOptions {
            output_dir,
            chapters: None,
            list_only: false,
        }
    }

    #[test]
    fn test_split_writes_one_file_per_chapter() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(
            dir.path(),
            10,
            vec![("Intro", 1), ("Middle", 4), ("End", 9)],
        );
        let out = dir.path().join("chapters");

        run(&input, &options(out.clone())).unwrap();

        let expected = [
            ("01_Intro.pdf", 3),
            ("02_Middle.pdf", 5),
            ("03_End.pdf", 2),
        ];
        for (name, pages) in expected {
            let chapter = Document::load(out.join(name)).unwrap();
            assert_eq!(chapter.get_pages().len(), pages, "{}", name);
        }
    }

    #[test]
    fn test_split_respects_selection() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path(), 10, vec![("A", 1), ("B", 4), ("C", 8)]);
        let out = dir.path().join("chapters");

        let mut opts = options(out.clone());
        opts.chapters = Some("2".to_string());
        run(&input, &opts).unwrap();

        assert!(out.join("02_B.pdf").exists());
        assert!(!out.join("01_A.pdf").exists());
        assert!(!out.join("03_C.pdf").exists());
    }

    #[test]
    fn test_split_filenames_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path(), 4, vec![("What/Why?", 1)]);
        let out = dir.path().join("chapters");

        run(&input, &options(out.clone())).unwrap();

        assert!(out.join("01_WhatWhy.pdf").exists());
    }

    #[test]
    fn test_out_of_range_selection_is_partial_success() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path(), 10, vec![("A", 1), ("B", 6)]);
        let out = dir.path().join("chapters");

        let mut opts = options(out.clone());
        opts.chapters = Some("1,20".to_string());
        run(&input, &opts).unwrap();

        assert!(out.join("01_A.pdf").exists());
        assert!(!out.join("02_B.pdf").exists());
    }

    #[test]
    fn test_fully_invalid_selection_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path(), 10, vec![("A", 1), ("B", 6)]);

        let mut opts = options(dir.path().join("chapters"));
        opts.chapters = Some("20-30".to_string());
        assert!(run(&input, &opts).is_err());
    }

    #[test]
    fn test_no_bookmarks_is_fatal_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path(), 6, Vec::new());
        let out = dir.path().join("chapters");

        let err = run(&input, &options(out.clone())).unwrap_err();
        assert!(err.to_string().contains("No bookmarks"));
        assert!(!out.exists());
    }

    #[test]
    fn test_list_only_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path(), 10, vec![("A", 1), ("B", 4)]);
        let out = dir.path().join("chapters");

        let mut opts = options(out.clone());
        opts.list_only = true;
        run(&input, &opts).unwrap();

        assert!(!out.exists());
    }

    #[test]
    fn test_extract_chapters_records_per_chapter_failures() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path(), 10, vec![("A", 1), ("B", 4)]);

        let doc = PdfDocument::open(&input).unwrap();
        let bookmarks = chapter_bookmarks(&doc.doc).unwrap();
        let (chapters, _) = build_chapters(&bookmarks, doc.page_count());

        // A file standing where the output directory should be makes
        // every write fail without touching the extraction logic.
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, b"in the way").unwrap();

        let outcomes = extract_chapters(&doc, &chapters, &[1, 2], &blocked);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.error.is_some()));
        assert_eq!(outcomes[0].number, 1);
        assert_eq!(outcomes[1].number, 2);
    }
}
