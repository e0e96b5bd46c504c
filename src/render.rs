use tracing::{debug, warn};

use crate::compose::{UnitFrame, compose_unit};
use crate::error::SettingsError;
use crate::fonts::TextMeasure;
use crate::geometry::{Rect, mm_to_px, px_to_mm};
use crate::icon::{IconRef, IconResolver, place_icon};
use crate::layout::plan_layout;
use crate::marks;
use crate::settings::GlobalSettings;
use crate::svg::{Canvas, Document, Node};
use crate::unit::Unit;

/// Space around a unit in the single-unit preview, in millimeters.
const PREVIEW_PADDING: f64 = 5.0;

/// Turns rows of units into print sheets and single units into previews.
///
/// Every call starts from fresh layout state, so one renderer can serve
/// any number of documents and previews.
pub struct Renderer<R> {
    settings: GlobalSettings,
    resolver: R,
    normalize: bool,
    measure: Option<Box<dyn TextMeasure>>,
}

impl<R: IconResolver> Renderer<R> {
    pub fn new(settings: GlobalSettings, resolver: R) -> Result<Self, SettingsError> {
        settings.validate()?;

        Ok(Self {
            settings,
            resolver,
            normalize: true,
            measure: None,
        })
    }

    /// Turns icon markup cleanup on or off (on by default).
    pub fn normalize_icons(mut self, enabled: bool) -> Self {
        self.normalize = enabled;
        self
    }

    /// Reports description lines wider than their unit.
    pub fn with_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Some(Box::new(measure));
        self
    }

    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn render_document(&mut self, rows: &[Vec<Unit>]) -> String {
        self.document(rows).to_svg()
    }

    pub fn render_unit(&mut self, unit: &Unit) -> String {
        self.unit_preview(unit).to_svg()
    }

    /// Node tree behind [`Renderer::render_document`].
    pub fn document(&mut self, rows: &[Vec<Unit>]) -> Document {
        let pages = plan_layout(rows, &self.settings);
        let page_width = self.settings.page_width;
        let page_height = self.settings.page_height;
        let total_height = page_height * pages.len() as f64;

        debug!(
            pages = pages.len(),
            rows = rows.len(),
            "rendering document"
        );

        let mut document = Document::new(Canvas::Physical {
            width_mm: page_width,
            height_mm: total_height,
            view_width: mm_to_px(page_width),
            view_height: mm_to_px(total_height),
        });

        for (index, page) in pages.iter().enumerate() {
            let mut children = Vec::new();
            for line in &page.lines {
                for placement in &line.placements {
                    let unit = &rows[placement.row][placement.index];
                    children.extend(self.unit_nodes(unit, placement.x, placement.y));
                }
                children.extend(marks::corners(line.bounds, self.settings.cross_size));
            }

            document.push(Node::Page {
                y: index as f64 * page_height,
                width: page_width,
                height: page_height,
                children,
            });
        }

        document
    }

    /// Node tree behind [`Renderer::render_unit`].
    pub fn unit_preview(&mut self, unit: &Unit) -> Document {
        let width = unit.width(&self.settings);
        let height = self.settings.unit_height;

        let mut document = Document::new(Canvas::Fluid {
            view_width: mm_to_px(width + PREVIEW_PADDING * 2.0),
            view_height: mm_to_px(height + PREVIEW_PADDING * 2.0),
        });

        for node in self.unit_nodes(unit, PREVIEW_PADDING, PREVIEW_PADDING) {
            document.push(node);
        }
        let bounds = Rect::new(PREVIEW_PADDING, PREVIEW_PADDING, width, height);
        for node in marks::corners(bounds, self.settings.cross_size) {
            document.push(node);
        }

        document
    }

    fn unit_nodes(&mut self, unit: &Unit, x: f64, y: f64) -> Vec<Node> {
        let frame = UnitFrame::new(unit, x, y, &self.settings);
        let icon = self.icon_for(unit, &frame);
        self.check_overflow(unit, &frame);
        compose_unit(unit, &frame, &self.settings, icon)
    }

    /// A unit whose icon cannot be used is still drawn, without it.
    fn icon_for(&self, unit: &Unit, frame: &UnitFrame) -> Option<Node> {
        let icon = IconRef::from_unit(unit)?;

        let placed = self
            .resolver
            .resolve(&icon)
            .and_then(|markup| place_icon(&markup, frame.icon_slot, self.normalize));

        match placed {
            Ok(node) => Some(node),
            Err(e) => {
                warn!(unit = %unit.id, icon = icon.name(), error = %e, "icon skipped");
                None
            }
        }
    }

    fn check_overflow(&mut self, unit: &Unit, frame: &UnitFrame) {
        let Some(measure) = self.measure.as_mut() else {
            return;
        };
        let Some(layout) = frame.description_layout(unit) else {
            return;
        };

        for line in &layout.lines {
            let (width_px, _) =
                measure.measure_text(&line.text, unit.description_font_size as f32, true);
            let width = px_to_mm(f64::from(width_px));
            if width > frame.text_width {
                warn!(
                    unit = %unit.id,
                    line = %line.text,
                    width_mm = width,
                    available_mm = frame.text_width,
                    "description line overflows its unit"
                );
            }
        }
    }
}
