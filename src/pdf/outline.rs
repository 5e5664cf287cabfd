use crate::pdf::document::decode_pdf_string;
use anyhow::{Context, Result};
use lopdf::{Document, Object, ObjectId};
use std::collections::HashMap;

/// One entry of the document outline tree.
#[derive(Debug, Clone)]
pub struct OutlineEntry {
    pub title: String,
    /// 1-indexed destination page, if the destination resolved.
    pub page: Option<u32>,
    pub level: u32,
    pub children: Vec<OutlineEntry>,
}

/// A top-level outline entry with a resolved destination; the unit
/// chapters are derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub title: String,
    /// 1-indexed page the bookmark points at.
    pub page: u32,
}

/// Extract the outline (bookmark) tree of a document.
///
/// A document without an outline yields an empty Vec; callers that
/// require bookmarks decide whether that is fatal. Entries whose
/// destination cannot be resolved keep `page = None`.
pub fn extract_outline(doc: &Document) -> Result<Vec<OutlineEntry>> {
    let catalog = doc.catalog().context("Failed to read document catalog")?;

    let outlines = match catalog.get(b"Outlines") {
        Ok(Object::Reference(r)) => match doc.get_dictionary(*r) {
            Ok(d) => d,
            Err(_) => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    let first = match outlines.get(b"First") {
        Ok(Object::Reference(r)) => *r,
        _ => return Ok(Vec::new()),
    };

    let resolver = DestinationResolver::new(doc);
    Ok(walk_siblings(doc, first, &resolver, 0))
}

/// The top-level outline entries whose destination resolved to a page
/// inside the document, sorted ascending by page.
///
/// Nested entries never become bookmarks here; they stay visible in the
/// tree from [`extract_outline`]. Entries with a missing or out-of-range
/// destination are dropped. The sort is stable, so entries targeting
/// the same page keep their outline order.
pub fn chapter_bookmarks(doc: &Document) -> Result<Vec<Bookmark>> {
    let total_pages = doc.get_pages().len() as u32;

    let mut bookmarks: Vec<Bookmark> = extract_outline(doc)?
        .into_iter()
        .filter_map(|entry| {
            let page = entry.page?;
            if page == 0 || page > total_pages {
                return None;
            }
            Some(Bookmark {
                title: entry.title,
                page,
            })
        })
        .collect();

    bookmarks.sort_by_key(|b| b.page);

    Ok(bookmarks)
}

fn walk_siblings(
    doc: &Document,
    first: ObjectId,
    resolver: &DestinationResolver,
    level: u32,
) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    let mut current = Some(first);

    while let Some(id) = current {
        let dict = match doc.get_dictionary(id) {
            Ok(d) => d,
            Err(_) => break,
        };

        let title = match dict.get(b"Title") {
            Ok(Object::String(bytes, _)) => decode_pdf_string(bytes),
            _ => "Untitled".to_string(),
        };

        let page = resolver.entry_page(dict);

        let children = match dict.get(b"First") {
            Ok(Object::Reference(child)) => walk_siblings(doc, *child, resolver, level + 1),
            _ => Vec::new(),
        };

        entries.push(OutlineEntry {
            title,
            page,
            level,
            children,
        });

        current = match dict.get(b"Next") {
            Ok(Object::Reference(r)) => Some(*r),
            _ => None,
        };
    }

    entries
}

/// Flatten the outline tree depth-first for display.
pub fn flatten_outline(entries: &[OutlineEntry]) -> Vec<FlatOutlineEntry> {
    let mut result = Vec::new();
    flatten_recursive(entries, &mut result);
    result
}

fn flatten_recursive(entries: &[OutlineEntry], result: &mut Vec<FlatOutlineEntry>) {
    for entry in entries {
        result.push(FlatOutlineEntry {
            title: entry.title.clone(),
            page: entry.page,
            level: entry.level,
        });
        flatten_recursive(&entry.children, result);
    }
}

#[derive(Debug, Clone)]
pub struct FlatOutlineEntry {
    pub title: String,
    pub page: Option<u32>,
    pub level: u32,
}

/// Maps outline destinations to 1-indexed page numbers.
struct DestinationResolver<'a> {
    doc: &'a Document,
    pages: HashMap<ObjectId, u32>,
}

impl<'a> DestinationResolver<'a> {
    fn new(doc: &'a Document) -> Self {
        let pages = doc
            .get_pages()
            .into_iter()
            .map(|(num, id)| (id, num))
            .collect();
        DestinationResolver { doc, pages }
    }

    /// Resolve an outline entry's destination, either a direct `Dest`
    /// or a `GoTo` action (referenced or inline).
    fn entry_page(&self, entry: &lopdf::Dictionary) -> Option<u32> {
        if let Ok(dest) = entry.get(b"Dest") {
            return self.resolve(dest);
        }

        let action = match entry.get(b"A") {
            Ok(Object::Reference(r)) => self.doc.get_dictionary(*r).ok(),
            Ok(Object::Dictionary(d)) => Some(d),
            _ => None,
        }?;

        match action.get(b"S") {
            Ok(Object::Name(kind)) if kind == b"GoTo" => {}
            _ => return None,
        }

        self.resolve(action.get(b"D").ok()?)
    }

    fn resolve(&self, dest: &Object) -> Option<u32> {
        match dest {
            Object::Array(arr) => self.dest_array_page(arr),
            Object::String(name, _) | Object::Name(name) => self.resolve_named(name),
            Object::Reference(r) => self.resolve(self.doc.get_object(*r).ok()?),
            _ => None,
        }
    }

    /// Destination arrays look like [page_ref, /XYZ, left, top, zoom].
    fn dest_array_page(&self, dest: &[Object]) -> Option<u32> {
        match dest.first() {
            Some(Object::Reference(page_ref)) => self.pages.get(page_ref).copied(),
            _ => None,
        }
    }

    fn resolve_named(&self, name: &[u8]) -> Option<u32> {
        let catalog = self.doc.catalog().ok()?;

        // Modern documents keep named destinations in a name tree.
        if let Ok(Object::Reference(names_ref)) = catalog.get(b"Names") {
            if let Ok(names) = self.doc.get_dictionary(*names_ref) {
                if let Ok(Object::Reference(dests_ref)) = names.get(b"Dests") {
                    if let Some(page) = self.search_name_tree(*dests_ref, name) {
                        return Some(page);
                    }
                }
            }
        }

        // Older documents use a plain Dests dictionary on the catalog.
        if let Ok(Object::Reference(dests_ref)) = catalog.get(b"Dests") {
            if let Ok(dests) = self.doc.get_dictionary(*dests_ref) {
                if let Ok(dest) = dests.get(name) {
                    return self.resolve(dest);
                }
            }
        }

        None
    }

    fn search_name_tree(&self, node: ObjectId, name: &[u8]) -> Option<u32> {
        let dict = self.doc.get_dictionary(node).ok()?;

        // Leaf nodes carry a Names array of key/destination pairs.
        if let Ok(Object::Array(names)) = dict.get(b"Names") {
            for pair in names.chunks(2) {
                if let [Object::String(key, _), dest] = pair {
                    if key == name {
                        return self.resolve(dest);
                    }
                }
            }
        }

        // Intermediate nodes fan out through Kids.
        if let Ok(Object::Array(kids)) = dict.get(b"Kids") {
            for kid in kids {
                if let Object::Reference(r) = kid {
                    if let Some(page) = self.search_name_tree(*r, name) {
                        return Some(page);
                    }
                }
            }
        }

        None
    }
}
