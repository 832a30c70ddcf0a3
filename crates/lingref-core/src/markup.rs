//! XHTML ingestion
//!
//! Turns the fragments returned by the rendering service into a
//! [`Document`]. Elements are classified by tag and class:
//!
//! | Markup                                   | Node                     |
//! |------------------------------------------|--------------------------|
//! | `<h1 number="4">`                        | chapter anchor           |
//! | `<h2>` .. `<h6>`                         | heading                  |
//! | `<caption class="table">`, `<div class="caption table">` | table caption |
//! | `<caption class="figure">`, `<figcaption>` | figure caption         |
//! | `<li class="example">`                   | example                  |
//! | `<li>` in `<ol class="subexample">`      | sub-example              |
//! | `<a class="crossref" name end>`          | cross-reference          |
//! | `<a class="exref" example_id end suffix>`| example reference        |
//!
//! Everything else is transparent, including a `<caption>` without a
//! `table` or `figure` class. The reader is lenient about HTML habits:
//! void elements need no end tag, an end tag closes every element opened
//! after its matching start tag, and HTML named entities such as `&nbsp;`
//! are decoded alongside the XML ones. Unknown entities are kept as written.
//!
//! Heading and caption text is whitespace-collapsed. A reference inside a
//! heading or caption contributes no text to it; the reference node follows
//! the heading or float node in the tree.

use lingref_ast::{Document, Example, FloatKind, FloatObject, Group, Heading, Node, Reference, SubExample};
use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::{Error, Result};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Parse collaborator markup into a document tree
pub fn parse(input: &str) -> Result<Document> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = false;

    let mut builder = TreeBuilder::default();
    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                builder.open(e)?;
            }
            Event::Empty(ref e) => {
                if builder.open(e)? {
                    builder.close_top();
                }
            }
            Event::End(ref e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
                builder.close(&name);
            }
            Event::Text(ref e) => builder.text(&decode_entities(&String::from_utf8_lossy(e))),
            Event::CData(ref e) => builder.text(&String::from_utf8_lossy(e)),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(builder.finish())
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .map(|a| decode_entities(&String::from_utf8_lossy(&a.value)))
}

fn has_class(e: &BytesStart, class: &str) -> bool {
    get_attr(e, b"class")
        .map(|value| value.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

struct Frame {
    name: String,
    kind: FrameKind,
}

enum FrameKind {
    Transparent {
        section_id: Option<String>,
        subexample_list: bool,
    },
    Heading {
        depth: u8,
        id: Option<String>,
        number: Option<String>,
        text: String,
        deferred: Vec<Node>,
    },
    Caption {
        kind: FloatKind,
        id: Option<String>,
        text: String,
        deferred: Vec<Node>,
    },
    Example(Example),
    SubExample(SubExample),
    Reference(Reference),
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    nodes: Vec<Node>,
}

impl TreeBuilder {
    /// Open an element. Returns `false` for void elements, which get no frame.
    fn open(&mut self, e: &BytesStart) -> Result<bool> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
        if VOID_ELEMENTS.contains(&name.as_str()) {
            return Ok(false);
        }
        let kind = self.classify(&name, e)?;
        self.stack.push(Frame { name, kind });
        Ok(true)
    }

    fn classify(&self, name: &str, e: &BytesStart) -> Result<FrameKind> {
        let id = get_attr(e, b"id");
        let kind = match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => FrameKind::Heading {
                depth: name[1..].parse().unwrap_or(2),
                id,
                number: get_attr(e, b"number"),
                text: String::new(),
                deferred: Vec::new(),
            },
            "caption" if has_class(e, "table") => caption_frame(FloatKind::Table, id),
            "caption" if has_class(e, "figure") => caption_frame(FloatKind::Figure, id),
            "div" if has_class(e, "caption") && has_class(e, "table") => {
                caption_frame(FloatKind::Table, id)
            }
            "figcaption" => caption_frame(FloatKind::Figure, id),
            "li" if has_class(e, "subexample") || self.in_subexample_list() => {
                FrameKind::SubExample(SubExample {
                    id,
                    ..SubExample::default()
                })
            }
            "li" if has_class(e, "example") => FrameKind::Example(Example {
                id,
                ..Example::default()
            }),
            "a" if has_class(e, "crossref") => {
                let target = get_attr(e, b"name")
                    .or_else(|| {
                        get_attr(e, b"href")
                            .and_then(|href| href.split_once('#').map(|(_, f)| f.to_string()))
                    })
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| {
                        Error::InvalidMarkup("crossref link without a name or href target".into())
                    })?;
                FrameKind::Reference(build_reference(Reference::crossref(target), e))
            }
            "a" if has_class(e, "exref") => {
                let target = get_attr(e, b"example_id")
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| {
                        Error::InvalidMarkup("exref link without an example_id".into())
                    })?;
                FrameKind::Reference(build_reference(Reference::example(target), e))
            }
            _ => FrameKind::Transparent {
                section_id: if name == "section" { id } else { None },
                subexample_list: name == "ol" && has_class(e, "subexample"),
            },
        };
        Ok(kind)
    }

    fn in_subexample_list(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame {
                kind: FrameKind::Transparent {
                    subexample_list: true,
                    ..
                },
                ..
            })
        )
    }

    fn text(&mut self, text: &str) {
        for frame in self.stack.iter_mut().rev() {
            match frame.kind {
                FrameKind::Heading { text: ref mut buf, .. }
                | FrameKind::Caption { text: ref mut buf, .. } => {
                    buf.push_str(text);
                    return;
                }
                // Link text is replaced on resolution
                FrameKind::Reference(_) => return,
                FrameKind::Example(ref mut example) => {
                    push_text(&mut example.content, text);
                    return;
                }
                FrameKind::SubExample(ref mut sub) => {
                    push_text(&mut sub.content, text);
                    return;
                }
                FrameKind::Transparent { .. } => {}
            }
        }
        push_text(&mut self.nodes, text);
    }

    /// Close the innermost element named `name` and everything opened after it
    fn close(&mut self, name: &str) {
        let Some(position) = self.stack.iter().rposition(|f| f.name == name) else {
            debug!(element = name, "ignoring unmatched end tag");
            return;
        };
        while self.stack.len() > position {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let node: Node = match frame.kind {
            FrameKind::Transparent { .. } => return,
            FrameKind::Heading {
                depth,
                id,
                number,
                text,
                deferred,
            } => {
                let heading = Heading {
                    depth,
                    id: id.or_else(|| self.enclosing_section_id()),
                    text: collapse_whitespace(&text),
                    number: if depth == 1 { number } else { None },
                };
                self.emit(heading.into());
                deferred.into_iter().for_each(|node| self.emit(node));
                return;
            }
            FrameKind::Caption {
                kind,
                id,
                text,
                deferred,
            } => {
                let float = FloatObject {
                    kind,
                    id,
                    caption: collapse_whitespace(&text),
                };
                self.emit(float.into());
                deferred.into_iter().for_each(|node| self.emit(node));
                return;
            }
            FrameKind::Example(example) => example.into(),
            FrameKind::SubExample(sub) => {
                let parent = self.stack.iter_mut().rev().find_map(|f| match f.kind {
                    FrameKind::Example(ref mut example) => Some(example),
                    _ => None,
                });
                match parent {
                    Some(example) => {
                        example.subexamples.push(sub);
                        return;
                    }
                    None => {
                        debug!(id = ?sub.id, "sub-example outside an example");
                        Group {
                            id: sub.id,
                            children: sub.content,
                        }
                        .into()
                    }
                }
            }
            FrameKind::Reference(reference) => reference.into(),
        };
        self.emit(node);
    }

    fn enclosing_section_id(&self) -> Option<String> {
        self.stack.iter().rev().find_map(|f| match f.kind {
            FrameKind::Transparent {
                section_id: Some(ref id),
                ..
            } => Some(id.clone()),
            _ => None,
        })
    }

    fn emit(&mut self, node: Node) {
        for frame in self.stack.iter_mut().rev() {
            match frame.kind {
                // Held until the heading or caption itself is emitted
                FrameKind::Heading {
                    ref mut deferred, ..
                }
                | FrameKind::Caption {
                    ref mut deferred, ..
                } => {
                    deferred.push(node);
                    return;
                }
                FrameKind::Example(ref mut example) => {
                    example.content.push(node);
                    return;
                }
                FrameKind::SubExample(ref mut sub) => {
                    sub.content.push(node);
                    return;
                }
                _ => {}
            }
        }
        self.nodes.push(node);
    }

    fn finish(mut self) -> Document {
        while !self.stack.is_empty() {
            self.close_top();
        }
        Document::from_nodes(self.nodes)
    }
}

fn caption_frame(kind: FloatKind, id: Option<String>) -> FrameKind {
    FrameKind::Caption {
        kind,
        id,
        text: String::new(),
        deferred: Vec::new(),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve entity and character references. Entities neither XML nor the
/// HTML table below know are left as written.
fn decode_entities(raw: &str) -> String {
    if let Ok(text) = unescape_with(raw, resolve_entity) {
        return text.into_owned();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let name_len = tail[1..]
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '#'))
            .unwrap_or(tail.len() - 1);
        if name_len > 0 && tail[1 + name_len..].starts_with(';') {
            let reference = &tail[..name_len + 2];
            match unescape_with(reference, resolve_entity) {
                Ok(text) => out.push_str(&text),
                Err(_) => out.push_str(reference),
            }
            rest = &tail[name_len + 2..];
        } else {
            out.push('&');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

fn resolve_entity(name: &str) -> Option<&'static str> {
    resolve_predefined_entity(name).or_else(|| html_entity(name))
}

/// Named HTML entities the rendering service emits
fn html_entity(name: &str) -> Option<&'static str> {
    let value = match name {
        "nbsp" => "\u{a0}",
        "ensp" => "\u{2002}",
        "emsp" => "\u{2003}",
        "thinsp" => "\u{2009}",
        "zwnj" => "\u{200c}",
        "zwj" => "\u{200d}",
        "shy" => "\u{ad}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "sbquo" => "\u{201a}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "bdquo" => "\u{201e}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "prime" => "\u{2032}",
        "Prime" => "\u{2033}",
        "dagger" => "\u{2020}",
        "Dagger" => "\u{2021}",
        "bull" => "\u{2022}",
        "middot" => "\u{b7}",
        "sect" => "\u{a7}",
        "para" => "\u{b6}",
        "deg" => "\u{b0}",
        "times" => "\u{d7}",
        "divide" => "\u{f7}",
        "plusmn" => "\u{b1}",
        "larr" => "\u{2190}",
        "rarr" => "\u{2192}",
        "harr" => "\u{2194}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        _ => return None,
    };
    Some(value)
}

fn build_reference(mut reference: Reference, e: &BytesStart) -> Reference {
    reference.end = get_attr(e, b"end").filter(|v| !v.is_empty());
    reference.suffix = get_attr(e, b"suffix").filter(|v| !v.is_empty());
    reference
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    match nodes.last_mut() {
        Some(Node::Text(existing)) => existing.push_str(text),
        _ => nodes.push(Node::Text(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingref_ast::ReferenceKind;

    #[test]
    fn test_headings_and_chapter() {
        let doc = parse(
            r#"<h1 number="4">Syntax</h1>
               <section id="sec:clauses"><h2>Clauses</h2></section>
               <h3 id="sec:main">Main <em>clauses</em></h3>"#,
        )
        .unwrap();
        let headings = doc.headings();
        assert_eq!(headings.len(), 3);
        assert!(headings[0].is_chapter());
        assert_eq!(headings[0].number.as_deref(), Some("4"));
        assert_eq!(headings[1].id.as_deref(), Some("sec:clauses"));
        assert_eq!(headings[2].text, "Main clauses");
        assert_eq!(headings[2].depth, 3);
    }

    #[test]
    fn test_captions() {
        let doc = parse(
            r#"<table><caption class="table" id="tab:v">Vowels</caption></table>
               <div class="caption table" id="tab:c">Consonants</div>
               <figure><figcaption id="fig:map">Map</figcaption></figure>"#,
        )
        .unwrap();
        let floats: Vec<(FloatKind, String)> = doc
            .nodes
            .iter()
            .filter_map(|n| match n {
                Node::Float(f) => Some((f.kind, f.caption.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(
            floats,
            vec![
                (FloatKind::Table, "Vowels".to_string()),
                (FloatKind::Table, "Consonants".to_string()),
                (FloatKind::Figure, "Map".to_string()),
            ]
        );
    }

    #[test]
    fn test_examples_with_subexamples() {
        let doc = parse(
            r#"<ol>
                 <li class="example" id="ex:1">
                   <ol class="subexample">
                     <li id="ex:1a">first</li>
                     <li id="ex:1b">second</li>
                   </ol>
                 </li>
                 <li class="example" id="ex:2">plain</li>
               </ol>"#,
        )
        .unwrap();
        assert_eq!(doc.nodes.len(), 2);
        match &doc.nodes[0] {
            Node::Example(ex) => {
                assert_eq!(ex.id.as_deref(), Some("ex:1"));
                let ids: Vec<_> = ex.subexamples.iter().map(|s| s.id.as_deref()).collect();
                assert_eq!(ids, vec![Some("ex:1a"), Some("ex:1b")]);
            }
            other => panic!("Expected example, got {:?}", other),
        }
    }

    #[test]
    fn test_references() {
        let doc = parse(
            r##"<p>See <a class="crossref" name="sec:a" end="sec:b">x</a> and
               <a class="crossref" href="#tab:v"></a> and
               <a class="exref" example_id="ex:1" suffix="c"/>.</p>"##,
        )
        .unwrap();
        let refs: Vec<&Reference> = doc
            .flatten()
            .into_iter()
            .filter_map(|n| match n {
                Node::Reference(r) => Some(r),
                _ => None,
            })
            .collect();
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].end.as_deref(), Some("sec:b"));
        assert_eq!(refs[1].target, "tab:v");
        assert_eq!(refs[2].kind, ReferenceKind::Example);
        assert_eq!(refs[2].suffix.as_deref(), Some("c"));
    }

    #[test]
    fn test_crossref_without_target_is_invalid() {
        let err = parse(r#"<a class="crossref">dangling</a>"#).unwrap_err();
        assert!(matches!(err, Error::InvalidMarkup(_)));
    }

    #[test]
    fn test_void_and_mismatched_tags_tolerated() {
        let doc = parse(r#"<div><h2 id="a">One<br>line</h2><p>unclosed</div><h2 id="b">Two</h2>"#)
            .unwrap();
        let texts: Vec<&str> = doc.headings().iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Oneline", "Two"]);
    }

    #[test]
    fn test_captions_classified_by_class() {
        let doc = parse(
            r#"<caption class="figure" id="f1">Plot</caption>
               <caption id="c0">Unclassed layout</caption>
               <caption class="table" id="t1">Vowels</caption>"#,
        )
        .unwrap();
        let floats: Vec<(FloatKind, Option<&str>)> = doc
            .nodes
            .iter()
            .filter_map(|n| match n {
                Node::Float(f) => Some((f.kind, f.id.as_deref())),
                _ => None,
            })
            .collect();
        assert_eq!(
            floats,
            vec![(FloatKind::Figure, Some("f1")), (FloatKind::Table, Some("t1"))]
        );
        assert!(matches!(&doc.nodes[1], Node::Text(t) if t == "Unclassed layout"));
    }

    #[test]
    fn test_xml_and_html_entities_decoded_together() {
        let doc = parse(r#"<h2 id="a">Nouns &amp; verbs&nbsp;x &#x263;&ndash;&#955;</h2>"#).unwrap();
        assert_eq!(doc.headings()[0].text, "Nouns & verbs\u{a0}x \u{263}\u{2013}\u{3bb}");
    }

    #[test]
    fn test_unknown_entities_kept_as_written() {
        let doc = parse(r#"<h2 id="a">A &amp; B &madeup; C &lt; D & E</h2>"#).unwrap();
        assert_eq!(doc.headings()[0].text, "A & B &madeup; C < D & E");
    }

    #[test]
    fn test_reference_inside_heading_follows_heading() {
        let doc = parse(
            r#"<h2 id="a">See <a class="crossref" name="b">x</a> here</h2><h2 id="b">B</h2>"#,
        )
        .unwrap();
        let order: Vec<String> = doc
            .nodes
            .iter()
            .map(|n| match n {
                Node::Heading(h) => format!("H:{}", h.text),
                Node::Reference(r) => format!("R:{}", r.target),
                other => format!("{:?}", other),
            })
            .collect();
        assert_eq!(order, vec!["H:See here", "R:b", "H:B"]);
    }

    #[test]
    fn test_reference_inside_caption_follows_float() {
        let doc = parse(
            r#"<figcaption id="fig:a">As in <a class="exref" example_id="ex:1"></a></figcaption>"#,
        )
        .unwrap();
        assert!(matches!(&doc.nodes[0], Node::Float(f) if f.caption == "As in"));
        assert!(matches!(&doc.nodes[1], Node::Reference(r) if r.target == "ex:1"));
    }
}
