//! Template slide selection.
use crate::transplant::analyzer::SlideInfo;

/// Index of the template slide whose design an input slide imitates, or
/// `None` when the template has no slides.
///
/// The last input slide maps to the template's last slide, the first to its
/// first. Interior input slides cycle through the template's interior slides.
/// Templates with fewer than three slides have no interior, and interior
/// input slides fall back to the first template slide.
///
/// The transplant routes the last input slide through the closing-slide path
/// before asking, so the first rule only matters to other callers.
pub fn select_template_slide(info: &SlideInfo, template_count: usize) -> Option<usize> {
    if template_count == 0 {
        return None;
    }
    if info.is_last {
        return Some(template_count - 1);
    }
    if info.is_first {
        return Some(0);
    }

    let interior = template_count.saturating_sub(2);
    if interior == 0 {
        return Some(0);
    }
    Some(1 + (info.index.saturating_sub(1)) % interior)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(index: usize, total: usize) -> SlideInfo {
        SlideInfo {
            index,
            is_first: index == 0,
            is_last: index + 1 == total,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_and_last() {
        assert_eq!(select_template_slide(&info(0, 4), 5), Some(0));
        assert_eq!(select_template_slide(&info(3, 4), 5), Some(4));
        assert_eq!(select_template_slide(&info(0, 1), 5), Some(4));
        assert_eq!(select_template_slide(&info(0, 3), 0), None);
    }

    #[test]
    fn test_interior_slides_cycle() {
        // 5 template slides: 3 interior designs; 8 interior input slides
        let selections: Vec<_> = (1..=8)
            .map(|index| select_template_slide(&info(index, 10), 5).unwrap())
            .collect();
        assert_eq!(selections, vec![1, 2, 3, 1, 2, 3, 1, 2]);
        for (k, selected) in selections.iter().enumerate() {
            assert_eq!(*selected, 1 + k % 3);
        }
    }

    #[test]
    fn test_short_template_falls_back_to_first() {
        assert_eq!(select_template_slide(&info(1, 3), 2), Some(0));
        assert_eq!(select_template_slide(&info(1, 3), 1), Some(0));
        assert_eq!(select_template_slide(&info(2, 3), 1), Some(0));
    }
}
