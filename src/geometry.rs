pub const DPI: f64 = 96.0;
pub const MM_PER_INCH: f64 = 25.4;

const DECIMALS: usize = 4;
const PRECISE_DECIMALS: usize = 6;

pub fn mm_to_px(mm: f64) -> f64 {
    mm / MM_PER_INCH * DPI
}

pub fn px_to_mm(px: f64) -> f64 {
    px / DPI * MM_PER_INCH
}

/// Formats a coordinate with at most four decimals and no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    fmt_with(value, DECIMALS)
}

/// Same as [`fmt_num`] with six decimals, for scale factors.
pub fn fmt_precise(value: f64) -> String {
    fmt_with(value, PRECISE_DECIMALS)
}

fn fmt_with(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let rounded = format!("{:.*}", decimals, value);
    let trimmed = if rounded.contains('.') {
        rounded.trim_end_matches('0').trim_end_matches('.')
    } else {
        rounded.as_str()
    };

    // "-0" after rounding tiny negatives
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn fmt_mm(value: f64) -> String {
    format!("{}mm", fmt_num(value))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_at_96_dpi() {
        assert!((mm_to_px(25.4) - 96.0).abs() < 1e-9);
        assert!((px_to_mm(96.0) - 25.4).abs() < 1e-9);
        assert!((px_to_mm(mm_to_px(17.9)) - 17.9).abs() < 1e-9);
    }

    #[test]
    fn trims_trailing_zeros() {
        assert_eq!(fmt_num(10.0), "10");
        assert_eq!(fmt_num(27.9), "27.9");
        assert_eq!(fmt_num(10.0 + 17.9 + 17.9), "45.8");
        assert_eq!(fmt_num(1.234_56), "1.2346");
        assert_eq!(fmt_num(-0.000_01), "0");
        assert_eq!(fmt_precise(0.123_456_789), "0.123457");
    }

    #[test]
    fn non_finite_values_collapse_to_zero() {
        assert_eq!(fmt_num(f64::NAN), "0");
        assert_eq!(fmt_num(f64::INFINITY), "0");
    }
}
