/// Index of a segment in the graph's arena.
pub(crate) type SegId = usize;

/// Traversal direction of a segment relative to increasing positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Walked from `start` towards `end`.
    Forward,
    /// Walked from `end` towards `start`.
    Backward,
}

impl Orientation {
    /// `+1` or `-1`.
    #[inline]
    pub fn sign(self) -> isize {
        match self {
            Orientation::Forward => 1,
            Orientation::Backward => -1,
        }
    }

    /// The opposite orientation.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Orientation::Forward => Orientation::Backward,
            Orientation::Backward => Orientation::Forward,
        }
    }
}

/// A new edge leaving a segment end, created at search depth `depth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Splice {
    /// Position the new edge leads to.
    pub target: usize,
    /// Depth at which the edge was added.
    pub depth: usize,
}

/// One end of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentEnd {
    /// The boundary position.
    pub tail: usize,
    /// The new edge leaving this end, if any.
    pub splice: Option<Splice>,
}

impl SegmentEnd {
    pub(crate) fn new(tail: usize) -> Self {
        Self { tail, splice: None }
    }

    /// Target of the new edge leaving this end.
    #[inline]
    pub fn target(&self) -> Option<usize> {
        self.splice.map(|s| s.target)
    }
}

/// Selects one end of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Start,
    End,
}

/// A maximal run of original positions `start..=end` whose tour edges are
/// all still present.
///
/// The runs touching position `0` and position `n - 1` are linked through
/// `pred`/`succ` while the tour edge between them is intact; together they
/// behave as one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Lower boundary.
    pub start: SegmentEnd,
    /// Upper boundary.
    pub end: SegmentEnd,
    /// Direction of traversal in the current tentative tour.
    pub orientation: Orientation,
    pub(crate) pred: Option<SegId>,
    pub(crate) succ: Option<SegId>,
}

impl Segment {
    pub(crate) fn new(start: usize, end: usize, orientation: Orientation) -> Self {
        debug_assert!(start <= end, "segment {}..={} is inverted", start, end);
        Self {
            start: SegmentEnd::new(start),
            end: SegmentEnd::new(end),
            orientation,
            pred: None,
            succ: None,
        }
    }

    /// Returns `true` if `position` lies within the segment.
    #[inline]
    pub fn contains(&self, position: usize) -> bool {
        self.start.tail <= position && position <= self.end.tail
    }

    /// Number of positions covered.
    pub fn len(&self) -> usize {
        self.end.tail - self.start.tail + 1
    }

    /// Always `false`: a segment covers at least one position.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub(crate) fn side(&self, side: Side) -> &SegmentEnd {
        match side {
            Side::Start => &self.start,
            Side::End => &self.end,
        }
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut SegmentEnd {
        match side {
            Side::Start => &mut self.start,
            Side::End => &mut self.end,
        }
    }
}
