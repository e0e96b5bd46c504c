use panelabel::text::layout_lines;
use panelabel::{GlobalSettings, MemoryResolver, Renderer, Unit, plan_layout};
use proptest::prelude::*;

const EPSILON: f64 = 1e-6;

fn unit_sizes() -> impl Strategy<Value = Vec<Vec<f64>>> {
    // half steps from 0.5 to 18 modules
    prop::collection::vec(
        prop::collection::vec((1u32..=36).prop_map(|half| f64::from(half) / 2.0), 0..20),
        0..8,
    )
}

fn rows_from(sizes: &[Vec<f64>]) -> Vec<Vec<Unit>> {
    sizes
        .iter()
        .map(|row| row.iter().map(|size| Unit::with_size(*size)).collect())
        .collect()
}

proptest! {
    #[test]
    fn every_unit_is_placed_once_in_input_order(sizes in unit_sizes()) {
        let settings = GlobalSettings::default();
        let pages = plan_layout(&rows_from(&sizes), &settings);

        let order: Vec<(usize, usize)> = pages
            .iter()
            .flat_map(|page| page.placements())
            .map(|p| (p.row, p.index))
            .collect();
        let expected: Vec<(usize, usize)> = sizes
            .iter()
            .enumerate()
            .flat_map(|(row, units)| (0..units.len()).map(move |index| (row, index)))
            .collect();

        prop_assert_eq!(order, expected);
    }

    #[test]
    fn placements_respect_margins_and_never_overlap(sizes in unit_sizes()) {
        let settings = GlobalSettings::default();
        let pages = plan_layout(&rows_from(&sizes), &settings);

        prop_assert!(!pages.is_empty());
        if pages.len() > 1 {
            prop_assert!(pages.iter().all(|page| !page.is_empty()));
        }

        for page in &pages {
            let mut previous_bottom = f64::NEG_INFINITY;
            for line in &page.lines {
                prop_assert!(!line.placements.is_empty());
                prop_assert!(line.bounds.y >= previous_bottom + settings.border_margin - EPSILON);
                prop_assert!(line.bounds.bottom() + settings.border_margin <= settings.page_height + EPSILON);
                previous_bottom = line.bounds.bottom();

                let mut cursor = settings.border_margin;
                for (position, placement) in line.placements.iter().enumerate() {
                    prop_assert!((placement.x - cursor).abs() < EPSILON);
                    prop_assert_eq!(placement.y, line.bounds.y);
                    // only a unit alone on its line may run past the margin
                    if position > 0 {
                        prop_assert!(
                            placement.x + placement.width + settings.border_margin
                                <= settings.page_width + EPSILON
                        );
                    }
                    cursor += placement.width;
                }
                prop_assert!((line.bounds.right() - cursor).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn document_height_covers_every_page(sizes in unit_sizes()) {
        let settings = GlobalSettings::default();
        let rows = rows_from(&sizes);
        let pages = plan_layout(&rows, &settings).len();

        let mut renderer = Renderer::new(settings, MemoryResolver::new()).expect("renderer");
        let svg = renderer.render_document(&rows);

        let expected_height = format!(r#"height="{}mm""#, 209 * pages);
        prop_assert!(svg.starts_with("<svg "));
        prop_assert!(svg.contains(&expected_height));
        prop_assert_eq!(svg.matches("<svg y=").count(), pages);
    }

    #[test]
    fn middle_line_sits_just_above_band_center(
        line_count in 0usize..5,
        font_size in 6.0f64..40.0,
        top in 0.0f64..200.0,
        height in 5.0f64..40.0,
    ) {
        let count = line_count * 2 + 1;
        let text = vec!["line"; count].join("\n");
        let layout = layout_lines(&text, font_size, top, height);
        let fs = layout.font_size;
        let middle = top + height / 2.0;

        let center = layout.lines[count / 2].y - fs / 2.0;
        prop_assert!((center - (middle - fs / 6.0)).abs() < EPSILON);
    }
}
