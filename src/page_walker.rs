use crate::pdf_utils;
use lopdf::{Dictionary, Document, ObjectId};
use std::collections::HashSet;
use tracing::{debug, trace};

/// How many `/Parent` levels are searched for inherited `/Resources`.
const MAX_INHERITANCE_DEPTH: usize = 64;

/// One named entry of a page's `/XObject` resource dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XObjectEntry {
    /// 1-based page number, in document order.
    pub page_number: u32,
    /// Resource name, e.g. `Im0`.
    pub key: String,
    /// Indirect reference of the XObject stream.
    pub id: ObjectId,
}

/// Walks pages in document order and lists the XObjects each page references.
///
/// Entries come out in page order, then in the declaration order of each
/// `/XObject` dictionary. Pages without resources simply contribute nothing.
pub struct XObjectWalker<'a> {
    document: &'a Document,
    descend_into_forms: bool,
}

impl<'a> XObjectWalker<'a> {
    pub fn new(document: &'a Document, descend_into_forms: bool) -> Self {
        Self {
            document,
            descend_into_forms,
        }
    }

    /// Collect the XObject entries of every page.
    pub fn entries(&self) -> Vec<XObjectEntry> {
        self.document
            .get_pages()
            .into_iter()
            .flat_map(|(page_number, page_id)| self.page_entries(page_number, page_id))
            .collect()
    }

    /// Collect the XObject entries of a single page.
    pub fn page_entries(&self, page_number: u32, page_id: ObjectId) -> Vec<XObjectEntry> {
        let page = match self.document.get_dictionary(page_id) {
            Ok(dict) => dict,
            Err(e) => {
                debug!(page = page_number, error = %e, "page object is not a dictionary");
                return Vec::new();
            }
        };

        let Some(resources) = self.page_resources(page) else {
            debug!(page = page_number, "no resources found");
            return Vec::new();
        };

        let Some(xobjects) = self.xobject_dict(resources) else {
            debug!(page = page_number, "no XObjects found");
            return Vec::new();
        };

        let mut entries = Vec::new();
        let mut visited_forms = HashSet::new();
        self.collect_xobjects(page_number, xobjects, &mut visited_forms, &mut entries);

        debug!(page = page_number, xobjects = entries.len(), "resolved page XObjects");
        entries
    }

    /// Return the page's `/Resources`, walking up `/Parent` when the page
    /// inherits them.
    fn page_resources(&self, page: &'a Dictionary) -> Option<&'a Dictionary> {
        let mut node = page;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Some(resources) = node
                .get(b"Resources")
                .ok()
                .and_then(|v| pdf_utils::resolve_dict(self.document, v))
            {
                return Some(resources);
            }
            node = node
                .get(b"Parent")
                .ok()
                .and_then(|v| pdf_utils::resolve_dict(self.document, v))?;
        }
        None
    }

    /// The `/XObject` sub-dictionary, inline or referenced.
    fn xobject_dict(&self, resources: &'a Dictionary) -> Option<&'a Dictionary> {
        resources
            .get(b"XObject")
            .ok()
            .and_then(|v| pdf_utils::resolve_dict(self.document, v))
    }

    fn collect_xobjects(
        &self,
        page_number: u32,
        xobjects: &'a Dictionary,
        visited_forms: &mut HashSet<ObjectId>,
        entries: &mut Vec<XObjectEntry>,
    ) {
        for (key, value) in xobjects.iter() {
            let key = String::from_utf8_lossy(key).into_owned();
            let Ok(id) = value.as_reference() else {
                trace!(page = page_number, key = %key, "XObject entry is not a reference");
                continue;
            };

            entries.push(XObjectEntry {
                page_number,
                key,
                id,
            });

            if self.descend_into_forms && visited_forms.insert(id) {
                if let Some(nested) = self.form_xobjects(id) {
                    self.collect_xobjects(page_number, nested, visited_forms, entries);
                }
            }
        }
    }

    /// The `/XObject` dictionary of a Form XObject's own resources.
    fn form_xobjects(&self, id: ObjectId) -> Option<&'a Dictionary> {
        let stream = self.document.get_object(id).ok()?.as_stream().ok()?;
        let subtype = pdf_utils::name_from_dict(self.document, &stream.dict, b"Subtype")?;
        if subtype != "Form" {
            return None;
        }
        let resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|v| pdf_utils::resolve_dict(self.document, v))?;
        self.xobject_dict(resources)
    }
}
