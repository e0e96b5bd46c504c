use crate::geometry::{fmt_mm, fmt_num};
use crate::xml::escape_xml;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

const FONT_FAMILY: &str = "Arial,sans-serif";

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Filled rectangle, millimeter coordinates.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
    },
    /// Stroked segment, millimeter coordinates and stroke width.
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: String,
        stroke_width: f64,
    },
    /// Centered bold text, one `<tspan>` per line.
    Text {
        x: f64,
        font_size: f64,
        fill: String,
        lines: Vec<TextLine>,
    },
    /// Foreign markup placed with a transform in pixel space.
    Group { transform: String, content: String },
    /// One page of a multi-page document.
    Page {
        y: f64,
        width: f64,
        height: f64,
        children: Vec<Node>,
    },
}

impl Node {
    pub fn write_to(&self, out: &mut String) {
        match self {
            Node::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                out.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" />"#,
                    fmt_mm(*x),
                    fmt_mm(*y),
                    fmt_mm(*width),
                    fmt_mm(*height),
                    escape_xml(fill),
                ));
            }
            Node::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
                stroke_width,
            } => {
                out.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" />"#,
                    fmt_mm(*x1),
                    fmt_mm(*y1),
                    fmt_mm(*x2),
                    fmt_mm(*y2),
                    escape_xml(stroke),
                    fmt_mm(*stroke_width),
                ));
            }
            Node::Text {
                x,
                font_size,
                fill,
                lines,
            } => {
                out.push_str(&format!(
                    r#"<text x="{}" font-family="{}" font-size="{}" font-weight="bold" text-anchor="middle" fill="{}">"#,
                    fmt_mm(*x),
                    FONT_FAMILY,
                    fmt_mm(*font_size),
                    escape_xml(fill),
                ));
                for line in lines {
                    out.push_str(&format!(
                        r#"<tspan x="{}" y="{}">{}</tspan>"#,
                        fmt_mm(*x),
                        fmt_mm(line.y),
                        escape_xml(&line.text),
                    ));
                }
                out.push_str("</text>");
            }
            Node::Group { transform, content } => {
                out.push_str(&format!(r#"<g transform="{}">"#, transform));
                out.push_str(content);
                out.push_str("</g>");
            }
            Node::Page {
                y,
                width,
                height,
                children,
            } => {
                out.push_str(&format!(
                    r#"<svg y="{}" width="{}" height="{}">"#,
                    fmt_mm(*y),
                    fmt_mm(*width),
                    fmt_mm(*height),
                ));
                for child in children {
                    child.write_to(out);
                }
                out.push_str("</svg>");
            }
        }
    }
}

/// Root element attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum Canvas {
    /// Physical size in millimeters with a matching 96 dpi view box.
    Physical {
        width_mm: f64,
        height_mm: f64,
        view_width: f64,
        view_height: f64,
    },
    /// Fills its container, for on-screen previews.
    Fluid { view_width: f64, view_height: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub canvas: Canvas,
    pub children: Vec<Node>,
}

impl Document {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Depth-first walk over every node, pages included.
    pub fn nodes(&self) -> Vec<&Node> {
        fn walk<'n>(nodes: &'n [Node], out: &mut Vec<&'n Node>) {
            for node in nodes {
                out.push(node);
                if let Node::Page { children, .. } = node {
                    walk(children, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.children, &mut out);
        out
    }

    pub fn to_svg(&self) -> String {
        let mut out = match &self.canvas {
            Canvas::Physical {
                width_mm,
                height_mm,
                view_width,
                view_height,
            } => format!(
                r#"<svg xmlns="{}" version="1.1" width="{}" height="{}" viewBox="0 0 {} {}">"#,
                SVG_NAMESPACE,
                fmt_mm(*width_mm),
                fmt_mm(*height_mm),
                fmt_num(*view_width),
                fmt_num(*view_height),
            ),
            Canvas::Fluid {
                view_width,
                view_height,
            } => format!(
                r#"<svg xmlns="{}" version="1.1" viewBox="0 0 {} {}" width="100%" height="100%" preserveAspectRatio="xMidYMid meet">"#,
                SVG_NAMESPACE,
                fmt_num(*view_width),
                fmt_num(*view_height),
            ),
        };

        for node in &self.children {
            node.write_to(&mut out);
        }
        out.push_str("</svg>");
        out
    }
}
