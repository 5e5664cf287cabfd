use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let doc = PdfDocument::open(&path)?;
    let info = doc.get_info();

    println!("File: {}", doc.path);
    println!("Pages: {}", info.page_count);

    print_field("Title", &info.title);
    print_field("Author", &info.author);
    print_field("Subject", &info.subject);
    print_field("Keywords", &info.keywords);
    print_field("Creator", &info.creator);
    print_field("Producer", &info.producer);
    print_field("Created", &info.creation_date.as_deref().map(format_pdf_date));
    print_field("Modified", &info.mod_date.as_deref().map(format_pdf_date));

    Ok(())
}

fn print_field(label: &str, value: &Option<String>) {
    if let Some(value) = value {
        println!("{}: {}", label, value);
    }
}

/// Reformat a raw PDF date (D:YYYYMMDDHHmmSSOHH'mm) for display.
fn format_pdf_date(date: &str) -> String {
    if let Some(d) = date.strip_prefix("D:") {
        let bytes = d.as_bytes();
        if bytes.len() >= 8 && bytes[..8].iter().all(|b| b.is_ascii_digit()) {
            let time = if bytes.len() >= 14 && bytes[8..14].iter().all(|b| b.is_ascii_digit()) {
                format!(" {}:{}:{}", &d[8..10], &d[10..12], &d[12..14])
            } else {
                String::new()
            };
            return format!("{}-{}-{}{}", &d[0..4], &d[4..6], &d[6..8], time);
        }
    }
    date.to_string()
}
