//! Bibliographic record classification and link-field mutation

use biblink_domain::LinkUpdate;

use crate::xml::{parse_document, to_single_line_xml, Element, Node};
use crate::MarcError;

/// Marker substring in an 035 datafield identifying an electronic-holdings
/// source.
pub const ELECTRONIC_MARKER: &str = "(EXLCZ)";

const DATAFIELD: &str = "datafield";
const CLASSIFIER_TAG: u16 = 35;
const MATERIAL_CODE: &str = "3";
const LINK_CODE: &str = "u";
const MIME_CODE: &str = "q";
const LOCAL_CODE: &str = "9";
const JPEG_MIME: &str = "image/jpeg";
const LOCAL_MARKER: &str = "local";

/// Whether a record describes a print or an electronic holding; decides the
/// tag of the link field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Print,
    Electronic,
}

impl RecordFormat {
    pub fn link_tag(self) -> u16 {
        match self {
            RecordFormat::Print => 856,
            RecordFormat::Electronic => 956,
        }
    }
}

/// Result of applying a single link update to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Inserted,
    AlreadyPresent,
}

/// A parsed bibliographic record document.
///
/// The outer element carries metadata elements followed by the record
/// element; all mutation happens inside the record element's field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarcDocument {
    root: Element,
}

struct FieldSlot {
    /// Numeric tag, None when the attribute is missing or non-numeric.
    tag: Option<u16>,
    /// Child index inside the record element, None for out-of-place fields.
    record_index: Option<usize>,
}

fn parse_tag(element: &Element) -> Option<u16> {
    element.attr("tag").and_then(|t| t.trim().parse().ok())
}

impl MarcDocument {
    pub fn parse(xml: &str) -> Result<Self, MarcError> {
        Ok(Self {
            root: parse_document(xml)?,
        })
    }

    /// Serialize back to the canonical single-line form.
    pub fn to_xml(&self) -> Result<String, MarcError> {
        to_single_line_xml(&self.root)
    }

    /// The record element: the last element child of the document root.
    fn record_position(&self) -> Option<usize> {
        self.root
            .children
            .iter()
            .rposition(|n| matches!(n, Node::Element(_)))
    }

    fn record_element(&self) -> Option<&Element> {
        match self.root.children.get(self.record_position()?) {
            Some(Node::Element(e)) => Some(e),
            _ => None,
        }
    }

    /// All datafields in document order, regardless of where they sit.
    fn datafields(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        collect_datafields(&self.root, &mut out);
        out
    }

    /// Datafields in document order, annotated with their slot inside the
    /// record element when they are direct children of it.
    fn field_slots(&self) -> Vec<FieldSlot> {
        let record = self.record_element();
        let mut slots = Vec::new();
        collect_slots(&self.root, record, &mut slots);
        slots
    }

    /// Classify the record as print or electronic.
    ///
    /// Electronic when any 035 datafield has a child whose text contains the
    /// electronic-holdings marker; a record without 035 fields is print.
    pub fn classify(&self) -> RecordFormat {
        for field in self.datafields() {
            if parse_tag(field) != Some(CLASSIFIER_TAG) {
                continue;
            }
            for child in &field.children {
                let text = match child {
                    Node::Element(e) => e.text_content(),
                    Node::Text(t) => t.clone(),
                };
                if text.contains(ELECTRONIC_MARKER) {
                    return RecordFormat::Electronic;
                }
            }
        }
        RecordFormat::Print
    }

    /// True when one datafield of `tag` carries both the material label in
    /// subfield 3 and the link in subfield u. Matches are per field; a label
    /// on one field and the link on another do not count.
    pub fn contains_link(&self, material: &str, link: &str, tag: u16) -> bool {
        for field in self.datafields() {
            if parse_tag(field) != Some(tag) {
                continue;
            }
            let mut material_matches = false;
            let mut link_matches = false;
            for subfield in field.child_elements() {
                match subfield.attr("code") {
                    Some(MATERIAL_CODE) => {
                        if subfield.text_content().trim() == material.trim() {
                            material_matches = true;
                        }
                    }
                    Some(LINK_CODE) => {
                        if subfield.text_content().trim() == link.trim() {
                            link_matches = true;
                        }
                    }
                    _ => {}
                }
            }
            if material_matches && link_matches {
                return true;
            }
        }
        false
    }

    /// Insert a link field before the first record-resident datafield whose
    /// tag is numerically >= `tag`.
    ///
    /// Datafields that match but sit outside the record element (malformed
    /// input) are skipped rather than aborting; when no insertion point
    /// exists the field is appended at the end of the record element.
    pub fn insert_link_field(&mut self, field: Element, tag: u16) -> Result<(), MarcError> {
        let slot = self
            .field_slots()
            .into_iter()
            .find(|s| s.tag.is_some_and(|t| t >= tag) && s.record_index.is_some())
            .and_then(|s| s.record_index);

        let record_position = self.record_position().ok_or(MarcError::MissingRecord)?;
        let record = match self.root.children.get_mut(record_position) {
            Some(Node::Element(e)) => e,
            _ => return Err(MarcError::MissingRecord),
        };

        match slot {
            Some(index) => record.children.insert(index, Node::Element(field)),
            None => record.children.push(Node::Element(field)),
        }
        Ok(())
    }

    /// Apply one link update: classify, skip when already represented,
    /// otherwise synthesize and insert the field.
    pub fn apply_update(&mut self, update: &LinkUpdate) -> Result<ApplyOutcome, MarcError> {
        let format = self.classify();
        if self.contains_link(&update.material, &update.link, format.link_tag()) {
            return Ok(ApplyOutcome::AlreadyPresent);
        }
        let field = build_link_field(&update.material, &update.link, format);
        self.insert_link_field(field, format.link_tag())?;
        Ok(ApplyOutcome::Inserted)
    }

    /// Left-fold a batch of updates over the record; returns how many fields
    /// were newly inserted. Classification is re-evaluated per update.
    pub fn apply_updates(&mut self, updates: &[LinkUpdate]) -> Result<usize, MarcError> {
        let mut inserted = 0;
        for update in updates {
            if self.apply_update(update)? == ApplyOutcome::Inserted {
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

fn collect_datafields<'a>(element: &'a Element, out: &mut Vec<&'a Element>) {
    for child in element.child_elements() {
        if child.name == DATAFIELD {
            out.push(child);
        }
        collect_datafields(child, out);
    }
}

fn collect_slots(element: &Element, record: Option<&Element>, out: &mut Vec<FieldSlot>) {
    let in_record = record.is_some_and(|r| std::ptr::eq(element, r));
    for (index, child) in element.children.iter().enumerate() {
        if let Node::Element(e) = child {
            if e.name == DATAFIELD {
                out.push(FieldSlot {
                    tag: parse_tag(e),
                    record_index: in_record.then_some(index),
                });
            }
            collect_slots(e, record, out);
        }
    }
}

fn subfield(code: &str, text: &str) -> Element {
    Element::new("subfield").with_attr("code", code).with_text(text)
}

/// Build the datafield representing one content link.
///
/// Indicators are 4/2; subfield 3 carries the material label and u the link.
/// Subfield q is present only for jpg links, and electronic records get the
/// local-holding marker in subfield 9.
pub fn build_link_field(material: &str, link: &str, format: RecordFormat) -> Element {
    let mut field = Element::new(DATAFIELD)
        .with_attr("ind1", "4")
        .with_attr("ind2", "2")
        .with_attr("tag", format.link_tag().to_string());
    field.push_element(subfield(MATERIAL_CODE, material));
    field.push_element(subfield(LINK_CODE, link));
    if link.ends_with(".jpg") {
        field.push_element(subfield(MIME_CODE, JPEG_MIME));
    }
    if format == RecordFormat::Electronic {
        field.push_element(subfield(LOCAL_CODE, LOCAL_MARKER));
    }
    field
}
