//! Optional reconstruction of human reading order.
//!
//! Detection engines report boxes in whatever order their post-processing
//! produces. For multi-line images callers may prefer rows top to bottom,
//! each row left to right.

use textlens_core::{ReadingOrder, TextFragment};

/// Reorder `fragments` according to `order`.
///
/// With [`ReadingOrder::Lines`], a fragment joins the first row whose
/// leading fragment is within `line_threshold` pixels vertically.
pub fn arrange(
    fragments: Vec<TextFragment>,
    order: ReadingOrder,
    line_threshold: i32,
) -> Vec<TextFragment> {
    match order {
        ReadingOrder::Detection => fragments,
        ReadingOrder::Lines => group_lines(fragments, line_threshold)
            .into_iter()
            .flatten()
            .collect(),
    }
}

fn group_lines(mut fragments: Vec<TextFragment>, line_threshold: i32) -> Vec<Vec<TextFragment>> {
    fragments.sort_by_key(|f| f.bounding_box.y);

    let mut lines: Vec<Vec<TextFragment>> = Vec::new();
    for fragment in fragments {
        let row = lines.iter_mut().find(|line| {
            line.first().is_some_and(|lead| {
                (fragment.bounding_box.y - lead.bounding_box.y).abs() <= line_threshold
            })
        });
        match row {
            Some(line) => line.push(fragment),
            None => lines.push(vec![fragment]),
        }
    }

    for line in &mut lines {
        line.sort_by_key(|f| f.bounding_box.x);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use textlens_core::BoundingBox;

    fn frag(text: &str, x: i32, y: i32) -> TextFragment {
        TextFragment::new(
            text,
            0.9,
            BoundingBox {
                x,
                y,
                width: 40,
                height: 12,
            },
        )
    }

    fn texts(fragments: &[TextFragment]) -> Vec<&str> {
        fragments.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn detection_order_is_untouched() {
        let input = vec![frag("b", 50, 40), frag("a", 0, 0)];
        let out = arrange(input.clone(), ReadingOrder::Detection, 20);
        assert_eq!(out, input);
    }

    #[test]
    fn lines_read_top_down_left_right() {
        let input = vec![
            frag("world", 80, 3),
            frag("second", 0, 40),
            frag("hello", 0, 0),
            frag("line", 90, 45),
        ];
        let out = arrange(input, ReadingOrder::Lines, 20);
        assert_eq!(texts(&out), vec!["hello", "world", "second", "line"]);
    }

    #[test]
    fn threshold_splits_rows() {
        let input = vec![frag("low", 0, 15), frag("high", 100, 0)];
        let out = arrange(input, ReadingOrder::Lines, 10);
        assert_eq!(texts(&out), vec!["high", "low"]);
    }
}
