use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::reader::Reader as XmlReader;

use super::IconError;
use crate::xml::{local_name, prefix};

type Attrs = Vec<(String, String)>;

/// One `.a, .b { ... }` rule from an embedded style sheet.
#[derive(Debug, Default, PartialEq)]
struct ClassRule {
    classes: Vec<String>,
    declarations: Attrs,
}

/// Elements removed together with everything inside them. `style` sheets are
/// folded into attributes first.
const DROPPED_ELEMENTS: &[&str] = &["metadata", "title", "desc", "script", "style"];

const EDITOR_PREFIXES: &[&str] = &["sodipodi", "inkscape", "sketch", "serif"];

/// `style` properties that have a presentation attribute equivalent.
const PRESENTATION_PROPERTIES: &[&str] = &[
    "clip-rule",
    "color",
    "display",
    "fill",
    "fill-opacity",
    "fill-rule",
    "opacity",
    "stop-color",
    "stop-opacity",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "visibility",
];

const INHERITED_STROKE: &[&str] = &[
    "stroke",
    "stroke-width",
    "stroke-linecap",
    "stroke-linejoin",
];

const STROKE_DETAILS: &[&str] = &[
    "stroke-width",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-opacity",
];

const COLOR_ATTRIBUTES: &[&str] = &[
    "color",
    "fill",
    "flood-color",
    "lighting-color",
    "stop-color",
    "stroke",
];

/// Rewrites icon markup into a canonical form. `viewBox` is never touched.
pub fn normalize(markup: &str) -> Result<String, IconError> {
    let rules = parse_class_rules(&style_sheets(markup)?);

    let mut reader = XmlReader::from_str(markup);
    let mut buf = Vec::new();
    let mut out = String::with_capacity(markup.len());

    // Final attributes of every open element, for inheritance
    let mut open: Vec<Attrs> = Vec::new();
    // Depth inside a dropped subtree
    let mut skipping = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(XmlEvent::Start(ref e)) => {
                if skipping > 0 || is_dropped(e) {
                    skipping += 1;
                } else {
                    let attrs = element_attrs(e, open.last(), &rules);
                    write_open_tag(&mut out, e, &attrs, false);
                    open.push(attrs);
                }
            }
            Ok(XmlEvent::Empty(ref e)) => {
                if skipping == 0 && !is_dropped(e) {
                    let attrs = element_attrs(e, open.last(), &rules);
                    write_open_tag(&mut out, e, &attrs, true);
                }
            }
            Ok(XmlEvent::End(ref e)) => {
                if skipping > 0 {
                    skipping -= 1;
                } else {
                    open.pop();
                    out.push_str("</");
                    out.push_str(&String::from_utf8_lossy(e.name().as_ref()));
                    out.push('>');
                }
            }
            Ok(XmlEvent::Text(ref e)) => {
                if skipping == 0 {
                    let text = e.decode().unwrap_or_default();
                    if !text.trim().is_empty() {
                        out.push_str(&text);
                    }
                }
            }
            Ok(XmlEvent::CData(ref e)) => {
                if skipping == 0 {
                    out.push_str("<![CDATA[");
                    out.push_str(&String::from_utf8_lossy(&e[..]));
                    out.push_str("]]>");
                }
            }
            Ok(XmlEvent::GeneralRef(ref e)) => {
                if skipping == 0 {
                    out.push('&');
                    out.push_str(&e.decode().unwrap_or_default());
                    out.push(';');
                }
            }
            Ok(XmlEvent::Eof) => break,
            Err(e) => return Err(IconError::Markup(e.to_string())),
            // Declarations, comments, processing instructions and doctypes
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

/// Concatenated text of every `<style>` element.
fn style_sheets(markup: &str) -> Result<String, IconError> {
    let mut reader = XmlReader::from_str(markup);
    let mut buf = Vec::new();
    let mut sheets = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(XmlEvent::Start(ref e)) => {
                let qname = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if depth > 0 || local_name(&qname) == "style" {
                    depth += 1;
                }
            }
            Ok(XmlEvent::End(_)) => depth = depth.saturating_sub(1),
            Ok(XmlEvent::Text(ref e)) if depth > 0 => {
                sheets.push_str(&e.decode().unwrap_or_default());
                sheets.push('\n');
            }
            Ok(XmlEvent::CData(ref e)) if depth > 0 => {
                sheets.push_str(&String::from_utf8_lossy(&e[..]));
                sheets.push('\n');
            }
            Ok(XmlEvent::Eof) => break,
            Err(e) => return Err(IconError::Markup(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// Rules whose selectors are all plain class names. Anything else in the
/// sheet is ignored.
fn parse_class_rules(sheet: &str) -> Vec<ClassRule> {
    let mut uncommented = String::with_capacity(sheet.len());
    let mut rest = sheet;
    while let Some(start) = rest.find("/*") {
        uncommented.push_str(&rest[..start]);
        rest = match rest[start + 2..].find("*/") {
            Some(end) => &rest[start + 2 + end + 2..],
            None => "",
        };
    }
    uncommented.push_str(rest);

    let mut rules = Vec::new();
    for block in uncommented.split('}') {
        let Some((selectors, body)) = block.split_once('{') else {
            continue;
        };
        let classes: Option<Vec<String>> = selectors
            .split(',')
            .map(|selector| {
                let name = selector.trim().strip_prefix('.')?;
                let simple = !name.is_empty()
                    && name
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
                simple.then(|| name.to_string())
            })
            .collect();
        let Some(classes) = classes else {
            continue;
        };

        let declarations: Attrs = body
            .split(';')
            .filter_map(|declaration| {
                let (property, value) = declaration.split_once(':')?;
                let property = property.trim().to_ascii_lowercase();
                let value = value.trim();
                let usable = PRESENTATION_PROPERTIES.contains(&property.as_str())
                    && !value.is_empty()
                    && !value.contains("!important");
                usable.then(|| (property, value.to_string()))
            })
            .collect();
        if !declarations.is_empty() {
            rules.push(ClassRule {
                classes,
                declarations,
            });
        }
    }
    rules
}

/// Class rule declarations override presentation attributes, in sheet order.
fn apply_class_rules(attrs: &mut Attrs, rules: &[ClassRule]) {
    let Some(class) = get_attr(attrs, "class").map(str::to_string) else {
        return;
    };
    let names: Vec<&str> = class.split_whitespace().collect();

    for rule in rules {
        if rule.classes.iter().any(|c| names.contains(&c.as_str())) {
            for (property, value) in &rule.declarations {
                set_attr(attrs, property, value);
            }
        }
    }
}

fn is_dropped(e: &BytesStart) -> bool {
    let qname = String::from_utf8_lossy(e.name().as_ref()).to_string();
    DROPPED_ELEMENTS.contains(&local_name(&qname)) || is_editor_name(&qname)
}

fn is_editor_name(qname: &str) -> bool {
    match prefix(qname) {
        Some("xmlns") => EDITOR_PREFIXES.contains(&local_name(qname)),
        Some(p) => EDITOR_PREFIXES.contains(&p),
        None => false,
    }
}

/// Source attributes of `e` after every rewrite, in document order.
fn element_attrs(e: &BytesStart, parent: Option<&Attrs>, rules: &[ClassRule]) -> Attrs {
    let mut attrs: Attrs = e
        .attributes()
        .filter_map(|a| a.ok())
        .map(|a| {
            (
                String::from_utf8_lossy(a.key.as_ref()).to_string(),
                String::from_utf8_lossy(&a.value).to_string(),
            )
        })
        .filter(|(key, _)| !is_editor_name(key))
        .collect();

    apply_class_rules(&mut attrs, rules);
    inline_style(&mut attrs);
    if let Some(parent) = parent {
        inherit(&mut attrs, parent);
    }
    strip_useless_stroke(&mut attrs);

    for (key, value) in attrs.iter_mut() {
        if COLOR_ATTRIBUTES.contains(&key.as_str()) {
            *value = canonical_color(value);
        }
    }
    attrs
}

fn get_attr<'a>(attrs: &'a Attrs, name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn set_attr(attrs: &mut Attrs, name: &str, value: &str) {
    match attrs.iter_mut().find(|(k, _)| k == name) {
        Some((_, v)) => *v = value.to_string(),
        None => attrs.push((name.to_string(), value.to_string())),
    }
}

/// Moves presentation properties out of `style`. Properties without an
/// attribute form, and `!important` ones, stay in the style.
fn inline_style(attrs: &mut Attrs) {
    let Some(style) = get_attr(attrs, "style").map(str::to_string) else {
        return;
    };

    let mut kept = Vec::new();
    for declaration in style.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            continue;
        }

        if PRESENTATION_PROPERTIES.contains(&property.as_str()) && !value.contains("!important") {
            set_attr(attrs, &property, value);
        } else {
            kept.push(format!("{}:{}", property, value));
        }
    }

    if kept.is_empty() {
        attrs.retain(|(k, _)| k != "style");
    } else {
        set_attr(attrs, "style", &kept.join(";"));
    }
}

fn inherit(attrs: &mut Attrs, parent: &Attrs) {
    if get_attr(parent, "stroke").is_some() {
        for name in INHERITED_STROKE {
            if get_attr(attrs, name).is_none() {
                if let Some(value) = get_attr(parent, name).map(str::to_string) {
                    attrs.push((name.to_string(), value));
                }
            }
        }
    }

    if get_attr(parent, "fill") == Some("none") && get_attr(attrs, "fill").is_none() {
        attrs.push(("fill".to_string(), "none".to_string()));
    }
}

fn strip_useless_stroke(attrs: &mut Attrs) {
    let no_stroke = get_attr(attrs, "stroke").is_some_and(|s| s.trim() == "none");
    let zero_width = get_attr(attrs, "stroke-width")
        .and_then(|w| leading_number(w))
        .is_some_and(|w| w == 0.0);

    if no_stroke || zero_width {
        attrs.retain(|(k, _)| !STROKE_DETAILS.contains(&k.as_str()));
        set_attr(attrs, "stroke", "none");
    }
}

fn leading_number(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

/// `rgb(r, g, b)` becomes `#rrggbb`; hex colors are lowercased. Anything
/// else (names, `none`, `url(...)`, `currentColor`) is returned as is.
pub(crate) fn canonical_color(value: &str) -> String {
    let trimmed = value.trim();

    if trimmed.starts_with('#') {
        return trimmed.to_ascii_lowercase();
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let channels: Vec<Option<u8>> = args
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(rgb_channel)
            .collect();
        if let [Some(r), Some(g), Some(b)] = channels[..] {
            return format!("#{:02x}{:02x}{:02x}", r, g, b);
        }
    }

    value.to_string()
}

fn rgb_channel(part: &str) -> Option<u8> {
    let value = match part.strip_suffix('%') {
        Some(percent) => percent.parse::<f64>().ok()? * 255.0 / 100.0,
        None => part.parse::<f64>().ok()?,
    };
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(0.0, 255.0) as u8)
}

fn write_open_tag(out: &mut String, e: &BytesStart, attrs: &Attrs, self_closing: bool) {
    out.push('<');
    out.push_str(&String::from_utf8_lossy(e.name().as_ref()));
    for (key, value) in attrs {
        out.push_str(&format!(r#" {}="{}""#, key, value.replace('"', "&quot;")));
    }
    out.push_str(if self_closing { "/>" } else { ">" });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_prolog_metadata_and_editor_markup() {
        let markup = r##"<?xml version="1.0" encoding="UTF-8"?>
<!-- Created with Inkscape -->
<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd" viewBox="0 0 24 24" inkscape:version="1.2">
  <title>Oven</title>
  <metadata><rdf:RDF><cc:Work/></rdf:RDF></metadata>
  <sodipodi:namedview id="base" pagecolor="#ffffff"/>
  <path d="M0 0h24v24H0z" inkscape:label="body"/>
</svg>"##;

        assert_eq!(
            normalize(markup).expect("normalized"),
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M0 0h24v24H0z"/></svg>"#
        );
    }

    #[test]
    fn style_becomes_presentation_attributes() {
        let markup = r##"<svg viewBox="0 0 10 10"><rect style="fill:#FF0000; stroke-width:2;stroke:rgb(0, 128, 255);mix-blend-mode:multiply" width="10" height="10"/></svg>"##;
        let normalized = normalize(markup).expect("normalized");

        assert!(normalized.contains(r##"fill="#ff0000""##));
        assert!(normalized.contains(r#"stroke-width="2""#));
        assert!(normalized.contains(r##"stroke="#0080ff""##));
        assert!(normalized.contains(r#"style="mix-blend-mode:multiply""#));
    }

    #[test]
    fn stroke_attributes_flow_to_children() {
        let markup = r##"<svg viewBox="0 0 24 24"><g stroke="#000" stroke-width="2" stroke-linecap="round" fill="none"><path d="M1 1L5 5"/><circle r="3" stroke-width="1"/></g></svg>"##;
        let normalized = normalize(markup).expect("normalized");

        assert!(normalized.contains(
            r##"<path d="M1 1L5 5" stroke="#000" stroke-width="2" stroke-linecap="round" fill="none"/>"##
        ));
        assert!(normalized.contains(
            r##"<circle r="3" stroke-width="1" stroke="#000" stroke-linecap="round" fill="none"/>"##
        ));
    }

    #[test]
    fn class_rules_from_style_sheets_become_attributes() {
        let markup = r##"<svg viewBox="0 0 4 4"><defs><style>.a{fill:#F00}.b,.c{stroke:#00f;stroke-width:2}</style></defs><path class="a b" d="M0 0"/></svg>"##;
        let normalized = normalize(markup).expect("normalized");

        assert!(!normalized.contains("<style"));
        assert!(normalized.contains(r##"fill="#f00""##));
        assert!(normalized.contains(r##"stroke="#00f""##));
        assert!(normalized.contains(r#"stroke-width="2""#));
    }

    #[test]
    fn inline_style_beats_class_rules() {
        let markup = r##"<svg viewBox="0 0 4 4"><style><![CDATA[ /* icon */ .a { fill: red } rect.b { fill: blue } ]]></style><path class="a b" fill="green" style="fill:#0000FF" d="M0 0"/><path class="a" fill="green" d="M1 1"/></svg>"##;
        let normalized = normalize(markup).expect("normalized");

        assert_eq!(
            normalized,
            r##"<svg viewBox="0 0 4 4"><path class="a b" fill="#0000ff" d="M0 0"/><path class="a" fill="red" d="M1 1"/></svg>"##
        );
    }

    #[test]
    fn only_plain_class_selectors_are_kept() {
        let rules = parse_class_rules(".x, .y-1 { stroke-linecap: round; cursor: pointer } g .z { fill: red } .w { }");
        assert_eq!(
            rules,
            vec![ClassRule {
                classes: vec!["x".to_string(), "y-1".to_string()],
                declarations: vec![("stroke-linecap".to_string(), "round".to_string())],
            }]
        );
    }

    #[test]
    fn redundant_stroke_details_are_removed() {
        let markup = r#"<svg viewBox="0 0 4 4"><path d="M0 0" stroke="none" stroke-width="3" stroke-linejoin="round"/><path d="M1 1" stroke="red" stroke-width="0"/></svg>"#;

        assert_eq!(
            normalize(markup).expect("normalized"),
            r#"<svg viewBox="0 0 4 4"><path d="M0 0" stroke="none"/><path d="M1 1" stroke="none"/></svg>"#
        );
    }

    #[test]
    fn view_box_and_entities_survive() {
        let markup = r#"<svg viewBox="-2, -2, 28, 28"><text>A &amp; B</text></svg>"#;
        assert_eq!(normalize(markup).expect("normalized"), markup);
    }

    #[test]
    fn color_canonicalization() {
        assert_eq!(canonical_color("#ABCDEF"), "#abcdef");
        assert_eq!(canonical_color("rgb(255, 0, 16)"), "#ff0010");
        assert_eq!(canonical_color("rgb(100%,50%,0%)"), "#ff8000");
        assert_eq!(canonical_color("currentColor"), "currentColor");
        assert_eq!(canonical_color("url(#grad)"), "url(#grad)");
    }

    #[test]
    fn malformed_markup_is_an_error() {
        assert!(matches!(
            normalize("<svg><g></svg>"),
            Err(IconError::Markup(_))
        ));
    }
}
