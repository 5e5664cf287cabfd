pub mod document;
pub mod outline;

pub use document::PdfDocument;

#[cfg(test)]
pub(crate) mod test_support;
