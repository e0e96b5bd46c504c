use crate::geometry::Rect;
use crate::svg::Node;

const STROKE: &str = "black";
const STROKE_WIDTH: f64 = 0.1;

/// Two perpendicular segments of length `size` centered on `(x, y)`.
pub fn cross(x: f64, y: f64, size: f64) -> [Node; 2] {
    let half = size / 2.0;
    [
        Node::Line {
            x1: x - half,
            y1: y,
            x2: x + half,
            y2: y,
            stroke: STROKE.to_string(),
            stroke_width: STROKE_WIDTH,
        },
        Node::Line {
            x1: x,
            y1: y - half,
            x2: x,
            y2: y + half,
            stroke: STROKE.to_string(),
            stroke_width: STROKE_WIDTH,
        },
    ]
}

/// Crosses on the four corners of `rect`: top-left, bottom-left,
/// top-right, bottom-right.
pub fn corners(rect: Rect, size: f64) -> Vec<Node> {
    [
        (rect.x, rect.y),
        (rect.x, rect.bottom()),
        (rect.right(), rect.y),
        (rect.right(), rect.bottom()),
    ]
    .into_iter()
    .flat_map(|(x, y)| cross(x, y, size))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_is_centered_on_the_point() {
        let [horizontal, vertical] = cross(10.0, 20.0, 5.0);

        assert_eq!(
            horizontal,
            Node::Line {
                x1: 7.5,
                y1: 20.0,
                x2: 12.5,
                y2: 20.0,
                stroke: "black".to_string(),
                stroke_width: 0.1,
            }
        );
        assert_eq!(
            vertical,
            Node::Line {
                x1: 10.0,
                y1: 17.5,
                x2: 10.0,
                y2: 22.5,
                stroke: "black".to_string(),
                stroke_width: 0.1,
            }
        );
    }

    #[test]
    fn corners_emit_eight_segments_at_the_rectangle_corners() {
        let nodes = corners(Rect::new(10.0, 10.0, 54.0, 27.0), 4.0);
        assert_eq!(nodes.len(), 8);

        let centers: Vec<(f64, f64)> = nodes
            .chunks(2)
            .map(|pair| match &pair[1] {
                Node::Line { x1, y1, y2, .. } => (*x1, (y1 + y2) / 2.0),
                other => panic!("unexpected node {other:?}"),
            })
            .collect();

        assert_eq!(
            centers,
            vec![(10.0, 10.0), (10.0, 37.0), (64.0, 10.0), (64.0, 37.0)]
        );
    }
}
