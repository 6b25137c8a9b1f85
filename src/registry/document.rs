//! Minimal XML element tree for reading registry responses.
//!
//! Element names are kept exactly as written (`prefix:local`), so lookups can
//! distinguish the prefixed and unprefixed shapes the registry emits.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::error::RegistryError;

/// Deepest element nesting accepted by [`XmlDocument::parse`].
///
/// Registry responses nest about eight levels; the tree is walked
/// recursively, so deeper input is rejected instead of built.
pub const MAX_DEPTH: usize = 64;

/// One XML element with its attributes, direct text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Qualified name as it appears in the document.
    pub name: String,
    /// Attributes as `(qualified name, value)` pairs.
    pub attributes: Vec<(String, String)>,
    /// Concatenated text content (trimmed per text event).
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn from_start(e: &BytesStart<'_>) -> Self {
        let name = std::str::from_utf8(e.name().as_ref())
            .unwrap_or("")
            .to_string();
        let attributes = e
            .attributes()
            .flatten()
            .map(|attr| {
                let key = std::str::from_utf8(attr.key.as_ref())
                    .unwrap_or("")
                    .to_string();
                let val = attr
                    .unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_default();
                (key, val)
            })
            .collect();
        Self {
            name,
            attributes,
            ..Self::default()
        }
    }

    /// Local part of the element name (after any `prefix:`).
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// First direct child with exactly this qualified name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with exactly this qualified name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Value of the attribute whose local name is `local`, any prefix.
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| local_part(k) == local)
            .map(|(_, v)| v.as_str())
    }

    /// `true` if the element carries `xsi:nil="true"`.
    pub fn is_nil(&self) -> bool {
        matches!(self.attribute("nil"), Some("true") | Some("1"))
    }

    /// Text of the element, or `None` when nil-flagged or empty.
    pub fn text(&self) -> Option<&str> {
        if self.is_nil() {
            return None;
        }
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }

    /// Depth-first search for the first descendant with this local name.
    pub fn find_local(&self, local: &str) -> Option<&XmlNode> {
        for child in &self.children {
            if child.local_name() == local {
                return Some(child);
            }
            if let Some(found) = child.find_local(local) {
                return Some(found);
            }
        }
        None
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    /// The document element.
    pub root: XmlNode,
}

impl XmlDocument {
    /// Parse `xml` into an element tree.
    ///
    /// Fails if the input is not well-formed XML, has no root element, or
    /// nests elements deeper than [`MAX_DEPTH`].
    pub fn parse(xml: &str) -> Result<Self, RegistryError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    check_depth(stack.len() + 1)?;
                    stack.push(XmlNode::from_start(e));
                }
                Ok(Event::Empty(ref e)) => {
                    check_depth(stack.len() + 1)?;
                    attach(&mut stack, &mut root, XmlNode::from_start(e))?;
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| RegistryError::Parse(format!("bad text content: {e}")))?;
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(node) = stack.last_mut() {
                        node.text
                            .push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::End(_)) => {
                    let node = stack.pop().ok_or_else(|| {
                        RegistryError::Parse("closing tag without opening tag".into())
                    })?;
                    attach(&mut stack, &mut root, node)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(RegistryError::Parse(format!(
                        "XML parse error at position {}: {e}",
                        reader.error_position()
                    )));
                }
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(RegistryError::Parse("unexpected end of document".into()));
        }
        root.map(|root| Self { root })
            .ok_or_else(|| RegistryError::Parse("document has no root element".into()))
    }
}

fn check_depth(depth: usize) -> Result<(), RegistryError> {
    if depth > MAX_DEPTH {
        return Err(RegistryError::Parse(format!(
            "document nested too deeply (more than {MAX_DEPTH} levels)"
        )));
    }
    Ok(())
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), RegistryError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(RegistryError::Parse("multiple root elements".into())),
    }
    Ok(())
}

/// An ordered list of candidate element paths.
///
/// Resolution tries each candidate in turn and returns the first node that
/// exists; if none resolves the lookup yields `None`. Paths are relative to
/// the node passed to [`FieldPath::resolve`] and compare qualified names
/// exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    candidates: Vec<Vec<String>>,
}

impl FieldPath {
    /// An empty path set (resolves to nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a candidate path, tried after all earlier ones.
    pub fn or(mut self, segments: &[&str]) -> Self {
        self.candidates
            .push(segments.iter().map(|s| (*s).to_string()).collect());
        self
    }

    /// Path tried first with every segment as `prefix:segment`, then bare.
    pub fn prefixed_or_bare(prefix: &str, segments: &[&str]) -> Self {
        let prefixed: Vec<String> = segments.iter().map(|s| format!("{prefix}:{s}")).collect();
        let prefixed: Vec<&str> = prefixed.iter().map(String::as_str).collect();
        Self::new().or(&prefixed).or(segments)
    }

    /// First node reachable through any candidate.
    pub fn resolve<'n>(&self, node: &'n XmlNode) -> Option<&'n XmlNode> {
        self.candidates.iter().find_map(|path| {
            path.iter()
                .try_fold(node, |current, segment| current.child(segment))
        })
    }

    /// Text of the first node that resolves and carries a value.
    ///
    /// A candidate that resolves to a nil or empty element does not stop the
    /// search: a later candidate may still hold the value.
    pub fn text(&self, node: &XmlNode) -> Option<String> {
        self.candidates.iter().find_map(|path| {
            path.iter()
                .try_fold(node, |current, segment| current.child(segment))
                .and_then(XmlNode::text)
                .map(str::to_string)
        })
    }
}
