//! SOAP 1.2 request envelope for the `rgWsPublic2AfmMethod` call.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use super::config::RegistryConfig;
use super::error::RegistryError;
use super::rg_ns;

/// Request shape: an element holding children, a text leaf, or an empty leaf.
enum Node<'a> {
    Element(&'a str, Vec<(&'a str, &'a str)>, Vec<Node<'a>>),
    Text(&'a str, &'a str),
    Empty(&'a str),
}

fn text_or_empty<'a>(name: &'a str, text: Option<&'a str>) -> Node<'a> {
    match text {
        Some(text) => Node::Text(name, text),
        None => Node::Empty(name),
    }
}

fn envelope<'a>(config: &'a RegistryConfig, afm: &'a str) -> Node<'a> {
    use Node::{Element, Text};

    let header = Element(
        "env:Header",
        vec![],
        vec![Element(
            "ns1:Security",
            vec![],
            vec![Element(
                "ns1:UsernameToken",
                vec![],
                vec![
                    Text("ns1:Username", &config.username),
                    Text("ns1:Password", &config.password),
                ],
            )],
        )],
    );
    let body = Element(
        "env:Body",
        vec![],
        vec![Element(
            "ns2:rgWsPublic2AfmMethod",
            vec![],
            vec![Element(
                "ns2:INPUT_REC",
                vec![],
                vec![
                    text_or_empty("ns3:afm_called_by", config.caller_afm.as_deref()),
                    Text("ns3:afm_called_for", afm),
                ],
            )],
        )],
    );
    Element(
        "env:Envelope",
        vec![
            ("xmlns:env", rg_ns::ENV),
            ("xmlns:ns1", rg_ns::WSSE),
            ("xmlns:ns2", rg_ns::SERVICE),
            ("xmlns:ns3", rg_ns::TYPES),
        ],
        vec![header, body],
    )
}

fn write_node<W: std::io::Write>(w: &mut Writer<W>, node: &Node<'_>) -> std::io::Result<()> {
    match node {
        Node::Element(name, attrs, children) => {
            let mut start = BytesStart::new(*name);
            start.extend_attributes(attrs.iter().copied());
            w.write_event(Event::Start(start))?;
            for child in children {
                write_node(w, child)?;
            }
            w.write_event(Event::End(BytesEnd::new(*name)))
        }
        Node::Text(name, text) => {
            w.write_event(Event::Start(BytesStart::new(*name)))?;
            w.write_event(Event::Text(BytesText::new(text)))?;
            w.write_event(Event::End(BytesEnd::new(*name)))
        }
        Node::Empty(name) => w.write_event(Event::Empty(BytesStart::new(*name))),
    }
}

/// Build the request envelope asking the registry about `afm`.
///
/// Credentials go into a WS-Security `UsernameToken` header. Text values are
/// XML-escaped, so credentials may contain any characters.
pub fn build_request(config: &RegistryConfig, afm: &str) -> Result<String, RegistryError> {
    let mut w = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .and_then(|()| write_node(&mut w, &envelope(config, afm)))
        .map_err(|e| RegistryError::Envelope(format!("XML write error: {e}")))?;

    String::from_utf8(w.into_inner().into_inner())
        .map_err(|e| RegistryError::Envelope(format!("XML UTF-8 error: {e}")))
}
