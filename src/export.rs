use std::path::Path;

use resvg::usvg;
use tiny_skia::{Pixmap, Transform};
use tracing::debug;

use crate::error::ExportError;

/// Extra font directory picked up next to the working directory.
const LOCAL_FONTS: &str = "fonts";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    /// Format named by the extension of `path`, case-insensitive.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or(ExportError::MissingExtension)?
            .to_ascii_lowercase();

        match ext.as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "pdf" => Ok(Self::Pdf),
            _ => Err(ExportError::UnsupportedFormat(ext)),
        }
    }
}

/// Converts `svg` to the format implied by `path` and writes it.
pub fn write_output(svg: &str, path: &Path, png_scale: f32) -> Result<OutputFormat, ExportError> {
    let format = OutputFormat::from_path(path)?;
    let data = match format {
        OutputFormat::Svg => svg.as_bytes().to_vec(),
        OutputFormat::Png => svg_to_png(svg, png_scale)?,
        OutputFormat::Pdf => svg_to_pdf(svg)?,
    };

    std::fs::write(path, data).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(format)
}

pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>, ExportError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ExportError::InvalidScale(scale));
    }

    let mut opts = usvg::Options::default();
    {
        let fontdb = opts.fontdb_mut();
        fontdb.load_system_fonts();
        let local_fonts = Path::new(LOCAL_FONTS);
        if local_fonts.is_dir() {
            fontdb.load_fonts_dir(local_fonts);
        }

        let fallbacks = FontFallbacks::pick(
            fontdb
                .faces()
                .flat_map(|face| face.families.iter().map(|(family, _)| family.as_str())),
        );
        if let Some(family) = &fallbacks.sans {
            fontdb.set_sans_serif_family(family);
        }
        if let Some(family) = &fallbacks.serif {
            fontdb.set_serif_family(family);
        }
    }

    let tree = usvg::Tree::from_str(svg, &opts).map_err(|e| ExportError::Parse(e.to_string()))?;

    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;
    debug!(width, height, "rasterizing");

    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Pixmap { width, height })?;
    resvg::render(
        &tree,
        Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    pixmap
        .encode_png()
        .map_err(|e| ExportError::Encode(e.to_string()))
}

/// The whole sheet becomes one PDF page as tall as all label pages.
/// Text is converted to paths so the PDF needs no embedded fonts.
pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>, ExportError> {
    use svg2pdf::usvg::fontdb;

    let mut fontdb = fontdb::Database::new();
    fontdb.load_system_fonts();
    let local_fonts = Path::new(LOCAL_FONTS);
    if local_fonts.is_dir() {
        fontdb.load_fonts_dir(local_fonts);
    }

    let fallbacks = FontFallbacks::pick(
        fontdb
            .faces()
            .flat_map(|face| face.families.iter().map(|(family, _)| family.as_str())),
    );
    if let Some(family) = &fallbacks.sans {
        fontdb.set_sans_serif_family(family);
    }
    if let Some(family) = &fallbacks.serif {
        fontdb.set_serif_family(family);
    }

    let mut opts = svg2pdf::usvg::Options::default();
    opts.fontdb = std::sync::Arc::new(fontdb);

    let tree = svg2pdf::usvg::Tree::from_str(svg, &opts)
        .map_err(|e| ExportError::Parse(e.to_string()))?;

    let mut options = svg2pdf::ConversionOptions::default();
    options.embed_text = false;

    svg2pdf::to_pdf(&tree, options, svg2pdf::PageOptions::default())
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

/// Installed families to stand in for the generic `sans-serif` and
/// `serif` names. Labels ask for Arial, which many systems lack.
#[derive(Debug, Default, PartialEq)]
struct FontFallbacks {
    sans: Option<String>,
    serif: Option<String>,
}

impl FontFallbacks {
    fn pick<'a>(families: impl IntoIterator<Item = &'a str>) -> Self {
        let mut first: Option<&str> = None;
        let mut sans: Option<&str> = None;
        let mut serif: Option<&str> = None;

        for family in families {
            first.get_or_insert(family);
            let lower = family.to_ascii_lowercase();
            if sans.is_none() && lower.contains("sans") {
                sans = Some(family);
            } else if serif.is_none() && lower.contains("serif") {
                serif = Some(family);
            }
        }

        Self {
            sans: sans.or(first).map(str::to_string),
            serif: serif.or(first).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10mm" height="10mm" viewBox="0 0 37.7953 37.7953"><rect x="0" y="0" width="37.7953" height="37.7953" fill="#009e4d" /></svg>"##;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("sheet.SVG")).expect("svg"),
            OutputFormat::Svg
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("out/sheet.pdf")).expect("pdf"),
            OutputFormat::Pdf
        );
        assert!(matches!(
            OutputFormat::from_path(Path::new("sheet")),
            Err(ExportError::MissingExtension)
        ));
        assert!(matches!(
            OutputFormat::from_path(Path::new("sheet.jpg")),
            Err(ExportError::UnsupportedFormat(ext)) if ext == "jpg"
        ));
    }

    #[test]
    fn writes_svg_verbatim() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sheet.svg");

        assert_eq!(
            write_output(SQUARE, &path, 1.0).expect("written"),
            OutputFormat::Svg
        );
        assert_eq!(std::fs::read_to_string(&path).expect("read back"), SQUARE);
    }

    #[test]
    fn rasterizes_to_png() {
        let png = svg_to_png(SQUARE, 2.0).expect("png");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn rejects_bad_png_scale() {
        assert!(matches!(
            svg_to_png(SQUARE, 0.0),
            Err(ExportError::InvalidScale(_))
        ));
        assert!(matches!(
            svg_to_png(SQUARE, f32::NAN),
            Err(ExportError::InvalidScale(_))
        ));
    }

    #[test]
    fn font_fallbacks_prefer_matching_families() {
        let picked = FontFallbacks::pick(["Noto Color Emoji", "DejaVu Sans", "DejaVu Serif"]);
        assert_eq!(picked.sans.as_deref(), Some("DejaVu Sans"));
        assert_eq!(picked.serif.as_deref(), Some("DejaVu Serif"));

        let only_one = FontFallbacks::pick(["Liberation Mono"]);
        assert_eq!(only_one.sans.as_deref(), Some("Liberation Mono"));
        assert_eq!(only_one.serif.as_deref(), Some("Liberation Mono"));

        assert_eq!(FontFallbacks::pick([]), FontFallbacks::default());
    }
}
