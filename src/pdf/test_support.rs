//! In-memory PDF construction for tests.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

pub(crate) struct BookmarkSpec {
    pub title: &'static str,
    /// 1-indexed destination page; an out-of-range page produces a
    /// dangling reference, `None` omits the destination entirely.
    pub page: Option<u32>,
    pub children: Vec<BookmarkSpec>,
}

pub(crate) fn leaf(title: &'static str, page: u32) -> BookmarkSpec {
    BookmarkSpec {
        title,
        page: Some(page),
        children: Vec::new(),
    }
}

pub(crate) fn group(title: &'static str, page: u32, children: Vec<BookmarkSpec>) -> BookmarkSpec {
    BookmarkSpec {
        title,
        page: Some(page),
        children,
    }
}

pub(crate) fn unresolvable(title: &'static str) -> BookmarkSpec {
    BookmarkSpec {
        title,
        page: None,
        children: Vec::new(),
    }
}

/// Build a document with `page_count` one-line pages and the given
/// outline tree.
pub(crate) fn sample_document(page_count: u32, outline: Vec<BookmarkSpec>) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();
    for i in 0..page_count {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                ),
                Operation::new("Td", vec![Object::Integer(72), Object::Integer(720)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("Page {}", i + 1).into_bytes(),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(page_count as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);

    if !outline.is_empty() {
        let outlines_id = doc.new_object_id();
        let (first, last) = add_outline_level(&mut doc, &outline, outlines_id, &page_ids);
        let outlines = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Outlines".to_vec())),
            ("First", Object::Reference(first)),
            ("Last", Object::Reference(last)),
            ("Count", Object::Integer(outline.len() as i64)),
        ]);
        doc.objects.insert(outlines_id, Object::Dictionary(outlines));
        catalog.set("Outlines", Object::Reference(outlines_id));
    }

    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc
}

fn add_outline_level(
    doc: &mut Document,
    specs: &[BookmarkSpec],
    parent: ObjectId,
    page_ids: &[ObjectId],
) -> (ObjectId, ObjectId) {
    let ids: Vec<ObjectId> = specs.iter().map(|_| doc.new_object_id()).collect();

    for (i, spec) in specs.iter().enumerate() {
        let mut dict = Dictionary::from_iter(vec![
            ("Title", Object::string_literal(spec.title)),
            ("Parent", Object::Reference(parent)),
        ]);

        if let Some(page) = spec.page {
            let page_ref = match page_ids.get(page.saturating_sub(1) as usize) {
                Some(id) => *id,
                // Out-of-range page: point the destination at an object
                // that does not exist.
                None => (9_999_999, 0),
            };
            dict.set(
                "Dest",
                Object::Array(vec![
                    Object::Reference(page_ref),
                    Object::Name(b"XYZ".to_vec()),
                    Object::Null,
                    Object::Null,
                    Object::Null,
                ]),
            );
        }

        if i > 0 {
            dict.set("Prev", Object::Reference(ids[i - 1]));
        }
        if i + 1 < ids.len() {
            dict.set("Next", Object::Reference(ids[i + 1]));
        }

        if !spec.children.is_empty() {
            let (first, last) = add_outline_level(doc, &spec.children, ids[i], page_ids);
            dict.set("First", Object::Reference(first));
            dict.set("Last", Object::Reference(last));
            dict.set("Count", Object::Integer(spec.children.len() as i64));
        }

        doc.objects.insert(ids[i], Object::Dictionary(dict));
    }

    (ids[0], *ids.last().expect("specs is non-empty"))
}
