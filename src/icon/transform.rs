use quick_xml::events::Event as XmlEvent;
use quick_xml::reader::Reader as XmlReader;
use tracing::warn;

use super::{IconError, normalize};
use crate::geometry::{Rect, fmt_num, fmt_precise, mm_to_px};
use crate::svg::Node;
use crate::xml::local_name;

/// Extent assumed for an axis with no usable size information.
pub const DEFAULT_EXTENT: f64 = 50.0;

/// Intrinsic coordinate box of an icon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Extent {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width: DEFAULT_EXTENT,
            height: DEFAULT_EXTENT,
        }
    }
}

/// Root attributes and inner markup of an `<svg>` document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIcon {
    pub attrs: Vec<(String, String)>,
    pub inner: String,
}

impl ParsedIcon {
    pub fn parse(markup: &str) -> Result<Self, IconError> {
        let mut reader = XmlReader::from_str(markup);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let (root, is_empty) = match reader.read_event_into(&mut buf) {
                Ok(XmlEvent::Start(e)) => (e.into_owned(), false),
                Ok(XmlEvent::Empty(e)) => (e.into_owned(), true),
                Ok(XmlEvent::Eof) => return Err(IconError::MissingRoot),
                Err(e) => return Err(IconError::Markup(e.to_string())),
                _ => continue,
            };

            let qname = String::from_utf8_lossy(root.name().as_ref()).to_string();
            if local_name(&qname) != "svg" {
                return Err(IconError::MissingRoot);
            }

            let attrs = root
                .attributes()
                .filter_map(|a| a.ok())
                .map(|a| {
                    (
                        String::from_utf8_lossy(a.key.as_ref()).to_string(),
                        String::from_utf8_lossy(&a.value).to_string(),
                    )
                })
                .collect();

            if is_empty {
                return Ok(Self {
                    attrs,
                    inner: String::new(),
                });
            }

            let start = reader.buffer_position() as usize;
            let closing = format!("</{}>", qname);
            let inner = markup
                .rfind(&closing)
                .filter(|end| *end >= start)
                .and_then(|end| markup.get(start..end))
                .ok_or_else(|| IconError::Markup(format!("missing {}", closing)))?;

            return Ok(Self {
                attrs,
                inner: inner.to_string(),
            });
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// `viewBox` when present, otherwise `width`/`height`, otherwise the
    /// default extent per axis.
    pub fn extent(&self) -> Result<Extent, IconError> {
        if let Some(view_box) = self.attr("viewBox") {
            return parse_view_box(view_box);
        }

        let axis = |name: &str| {
            self.attr(name)
                .and_then(parse_length)
                .filter(|v| *v > 0.0)
                .unwrap_or(DEFAULT_EXTENT)
        };

        Ok(Extent {
            min_x: 0.0,
            min_y: 0.0,
            width: axis("width"),
            height: axis("height"),
        })
    }
}

fn parse_view_box(value: &str) -> Result<Extent, IconError> {
    let invalid = || IconError::InvalidViewBox(value.to_string());

    let numbers = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<f64>().ok().filter(|n| n.is_finite()))
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(invalid)?;

    match numbers[..] {
        [min_x, min_y, width, height] if width > 0.0 && height > 0.0 => Ok(Extent {
            min_x,
            min_y,
            width,
            height,
        }),
        _ => Err(invalid()),
    }
}

/// Leading number of a length attribute (`24`, `24px`, `1.5em`).
/// Percentages carry no intrinsic size.
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.ends_with('%') {
        return None;
    }

    let end = value
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && matches!(c, '-' | '+'))))
        .map_or(value.len(), |(i, _)| i);
    value[..end].parse().ok().filter(|v: &f64| v.is_finite())
}

/// Uniform scale and centering offsets, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconFit {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl IconFit {
    pub fn new(extent: Extent, slot: Rect) -> Self {
        let slot_x = mm_to_px(slot.x);
        let slot_y = mm_to_px(slot.y);
        let slot_w = mm_to_px(slot.width);
        let slot_h = mm_to_px(slot.height);

        let scale = (slot_w / extent.width).min(slot_h / extent.height);

        Self {
            scale,
            translate_x: slot_x + (slot_w - extent.width * scale) / 2.0,
            translate_y: slot_y + (slot_h - extent.height * scale) / 2.0,
            origin_x: extent.min_x,
            origin_y: extent.min_y,
        }
    }

    /// One transform list; the origin shift is listed last so it applies
    /// to the content first.
    pub fn transform(&self) -> String {
        let mut transform = format!(
            "translate({},{}) scale({})",
            fmt_num(self.translate_x),
            fmt_num(self.translate_y),
            fmt_precise(self.scale),
        );
        if self.origin_x != 0.0 || self.origin_y != 0.0 {
            transform.push_str(&format!(
                " translate({},{})",
                fmt_num(-self.origin_x),
                fmt_num(-self.origin_y),
            ));
        }
        transform
    }
}

/// Builds the group that draws `markup` inside `slot` (millimeters).
///
/// A normalization failure falls back to the markup as given; parse and
/// view-box errors are returned.
pub fn place_icon(markup: &str, slot: Rect, normalize_markup: bool) -> Result<Node, IconError> {
    let normalized;
    let markup = if normalize_markup {
        match normalize(markup) {
            Ok(clean) => {
                normalized = clean;
                normalized.as_str()
            }
            Err(e) => {
                warn!(error = %e, "icon normalization failed, using markup as is");
                markup
            }
        }
    } else {
        markup
    };

    let icon = ParsedIcon::parse(markup)?;
    let fit = IconFit::new(icon.extent()?, slot);

    Ok(Node::Group {
        transform: fit.transform(),
        content: icon.inner,
    })
}
