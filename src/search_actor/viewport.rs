/// Slice of a fixed-row-height list that needs rendering for a scroll
/// position. `end` is inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
    pub offset_y: f64,
    pub total_height: f64,
}

impl VisibleRange {
    pub fn is_empty(&self) -> bool {
        self.total_height == 0.0
    }

    pub fn indices(&self) -> std::ops::Range<usize> {
        if self.is_empty() {
            0..0
        } else {
            self.start..self.end + 1
        }
    }
}

/// Rows to render for `scroll_top`, padded by `overscan` rows either side.
pub fn visible_range(
    len: usize,
    scroll_top: f64,
    item_height: f64,
    viewport_height: f64,
    overscan: usize,
) -> VisibleRange {
    let total_height = len as f64 * item_height;
    if len == 0 || item_height <= 0.0 {
        return VisibleRange {
            start: 0,
            end: 0,
            offset_y: 0.0,
            total_height: 0.0,
        };
    }

    let first = (scroll_top.max(0.0) / item_height).floor() as usize;
    let start = first.saturating_sub(overscan).min(len - 1);
    let count = (viewport_height.max(0.0) / item_height).ceil() as usize + 2 * overscan;
    let end = (start + count).min(len - 1);

    VisibleRange {
        start,
        end,
        offset_y: start as f64 * item_height,
        total_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_of_list() {
        let range = visible_range(100, 0.0, 60.0, 400.0, 5);
        assert_eq!(range.start, 0);
        // ceil(400 / 60) = 7, plus 10 overscan
        assert_eq!(range.end, 17);
        assert_eq!(range.offset_y, 0.0);
        assert_eq!(range.total_height, 6000.0);
    }

    #[test]
    fn test_scrolled_into_middle() {
        let range = visible_range(100, 1230.0, 60.0, 400.0, 5);
        // floor(1230 / 60) = 20
        assert_eq!(range.start, 15);
        assert_eq!(range.end, 32);
        assert_eq!(range.offset_y, 900.0);
    }

    #[test]
    fn test_clamped_at_bottom() {
        let range = visible_range(10, 540.0, 60.0, 400.0, 5);
        assert_eq!(range.start, 4);
        assert_eq!(range.end, 9);
        assert_eq!(range.indices(), 4..10);
    }

    #[test]
    fn test_empty_list() {
        let range = visible_range(0, 0.0, 60.0, 400.0, 5);
        assert!(range.is_empty());
        assert_eq!(range.indices().len(), 0);
    }
}
