use tracing::debug;

use crate::geometry::Rect;
use crate::settings::GlobalSettings;
use crate::unit::Unit;

/// Where one unit lands on its page, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Input row of the unit.
    pub row: usize,
    /// Position of the unit inside its input row.
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// One physical line of units.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub placements: Vec<Placement>,
    /// Rectangle whose corners receive cut marks.
    pub bounds: Rect,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub lines: Vec<Line>,
}

impl Page {
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.lines.iter().flat_map(|line| line.placements.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Cursor state for one layout pass.
struct Paginator<'a> {
    settings: &'a GlobalSettings,
    cursor_x: f64,
    cursor_y: f64,
    line_start_x: f64,
    line_start_y: f64,
    line_max_x: f64,
    line: Vec<Placement>,
    lines: Vec<Line>,
    pages: Vec<Page>,
}

impl<'a> Paginator<'a> {
    fn new(settings: &'a GlobalSettings) -> Self {
        let margin = settings.border_margin;
        Self {
            settings,
            cursor_x: margin,
            cursor_y: margin,
            line_start_x: margin,
            line_start_y: margin,
            line_max_x: margin,
            line: Vec::new(),
            lines: Vec::new(),
            pages: Vec::new(),
        }
    }

    fn needs_new_line(&self, width: f64) -> bool {
        self.cursor_x + width + self.settings.border_margin > self.settings.page_width
    }

    fn needs_new_page(&self) -> bool {
        self.cursor_y + self.settings.unit_height + self.settings.border_margin
            > self.settings.page_height
    }

    fn place(&mut self, row: usize, index: usize, width: f64) {
        if !self.line.is_empty() && self.needs_new_line(width) {
            self.close_line();
        }

        if self.line.is_empty() {
            // Checked after any wrap, so a line and page break can coincide
            if self.needs_new_page() {
                if self.lines.is_empty() {
                    // Blank bands never spill onto a page of their own
                    self.reset_cursor();
                } else {
                    self.seal_page();
                }
            }
            self.line_start_x = self.cursor_x;
            self.line_start_y = self.cursor_y;
            self.line_max_x = self.cursor_x;
        }

        self.line.push(Placement {
            row,
            index,
            x: self.cursor_x,
            y: self.cursor_y,
            width,
            height: self.settings.unit_height,
        });
        self.cursor_x += width;
        self.line_max_x = self.line_max_x.max(self.cursor_x);
    }

    fn close_line(&mut self) {
        if self.line.is_empty() {
            return;
        }

        let bounds = Rect::new(
            self.line_start_x,
            self.line_start_y,
            self.line_max_x - self.line_start_x,
            self.settings.unit_height,
        );
        debug!(
            page = self.pages.len(),
            y = self.line_start_y,
            units = self.line.len(),
            "line closed"
        );
        self.lines.push(Line {
            placements: std::mem::take(&mut self.line),
            bounds,
        });

        self.advance_line();
    }

    /// Ends a row. A row without units still takes a line of vertical
    /// space, without marks.
    fn end_row(&mut self) {
        if self.line.is_empty() {
            self.advance_line();
        } else {
            self.close_line();
        }
    }

    fn advance_line(&mut self) {
        self.cursor_y += self.settings.unit_height + self.settings.border_margin;
        self.cursor_x = self.settings.border_margin;
    }

    fn seal_page(&mut self) {
        debug!(page = self.pages.len(), lines = self.lines.len(), "page sealed");
        self.pages.push(Page {
            lines: std::mem::take(&mut self.lines),
        });

        self.reset_cursor();
    }

    fn reset_cursor(&mut self) {
        let margin = self.settings.border_margin;
        self.cursor_x = margin;
        self.cursor_y = margin;
        self.line_start_x = margin;
        self.line_start_y = margin;
        self.line_max_x = margin;
    }

    fn finish(mut self) -> Vec<Page> {
        self.close_line();
        if !self.lines.is_empty() || self.pages.is_empty() {
            self.seal_page();
        }
        self.pages
    }
}

/// Lays out `rows` without resolving any icon. Always returns at least
/// one page.
pub fn plan_layout(rows: &[Vec<Unit>], settings: &GlobalSettings) -> Vec<Page> {
    let mut paginator = Paginator::new(settings);

    for (row, units) in rows.iter().enumerate() {
        for (index, unit) in units.iter().enumerate() {
            paginator.place(row, index, unit.width(settings));
        }
        paginator.end_row();
    }

    paginator.finish()
}
