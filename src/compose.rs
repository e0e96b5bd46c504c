use crate::geometry::Rect;
use crate::settings::GlobalSettings;
use crate::svg::Node;
use crate::text::{TextLayout, layout_lines};
use crate::unit::Unit;

/// Share of the top band's short side used by the icon.
const ICON_FILL: f64 = 0.95;

/// Regions of a unit drawn at a given origin, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitFrame {
    pub bounds: Rect,
    pub top_band: Rect,
    pub bottom_band: Rect,
    pub sidebar: Rect,
    /// Square slot the icon is fitted into, centered in the top band.
    pub icon_slot: Rect,
    /// Horizontal axis the description is centered on.
    pub text_center_x: f64,
    /// Bottom band width left of the sidebar.
    pub text_width: f64,
}

impl UnitFrame {
    pub fn new(unit: &Unit, x: f64, y: f64, settings: &GlobalSettings) -> Self {
        let width = unit.width(settings);
        let height = settings.unit_height;
        let half = height / 2.0;

        let top_band = Rect::new(x, y, width, half);
        let bottom_band = Rect::new(x, y + half, width, half);

        let side = width.min(half) * ICON_FILL;
        let icon_slot = Rect::new(
            top_band.center_x() - side / 2.0,
            top_band.center_y() - side / 2.0,
            side,
            side,
        );

        let text_width = width - unit.sidebar_width;

        Self {
            bounds: Rect::new(x, y, width, height),
            top_band,
            bottom_band,
            sidebar: Rect::new(x, y + half, unit.sidebar_width, half),
            icon_slot,
            text_center_x: x + unit.sidebar_width + text_width / 2.0,
            text_width,
        }
    }

    /// Vertical layout of the description inside the bottom band.
    pub fn description_layout(&self, unit: &Unit) -> Option<TextLayout> {
        if !unit.has_description() {
            return None;
        }
        Some(layout_lines(
            &unit.description,
            unit.description_font_size,
            self.bottom_band.y,
            self.bottom_band.height,
        ))
    }
}

fn filled(rect: Rect, fill: &str) -> Node {
    Node::Rect {
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
        fill: fill.to_string(),
    }
}

/// Nodes for `unit` in paint order. `icon` is the already placed icon
/// group, if any.
pub fn compose_unit(
    unit: &Unit,
    frame: &UnitFrame,
    settings: &GlobalSettings,
    icon: Option<Node>,
) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(5);

    nodes.push(filled(frame.top_band, &settings.top_color));
    nodes.extend(icon);
    nodes.push(filled(frame.bottom_band, &unit.bottom_color));
    nodes.push(filled(frame.sidebar, &unit.sidebar_color));

    if let Some(layout) = frame.description_layout(unit) {
        nodes.push(Node::Text {
            x: frame.text_center_x,
            font_size: layout.font_size,
            fill: unit.description_color.clone(),
            lines: layout.lines,
        });
    }

    nodes
}
