//! The segmented tour graph.
//!
//! During a Lin-Kernighan search the tour is never rewritten. Instead the
//! original positions `0..n` are cut into segments at every broken edge,
//! and each added edge is recorded as a [`Splice`] on the two segment ends
//! it connects, tagged with the depth that added it. The tentative tour is
//! the Hamiltonian path from the head `t1` to the free tail `tn`; walking
//! it while ignoring splices deeper than some `d` yields the tour as it was
//! after step `d`.
//!
//! Backtracking uses a trail: every mutation of a segment, of the segment
//! order, or of the header records the previous value, and
//! [`SegmentedTourGraph::rollback`] pops records back to a
//! [`Checkpoint`]. Segments created after the checkpoint are dropped by
//! truncating the arena.
//!
//! A step may also break the edge "in reverse", which splits the cycle
//! into two halves. Until a later step reconnects them the graph tracks
//! the half that must be crossed into, and only that half's orientation
//! is kept current.

use super::segment::{Orientation, SegId, Segment, SegmentEnd, Side, Splice};

/// An edge given as `(kept endpoint, new free end)`.
pub type Edge = (usize, usize);

type EndRef = (SegId, Side);

#[derive(Debug, Clone, Copy)]
enum Undo {
    Segment(SegId, Segment),
    Replaced {
        at: usize,
        old: SegId,
    },
    Header {
        tail: usize,
        depth: usize,
        other_half: Option<(usize, usize)>,
    },
}

/// A point the graph can be rolled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    trail: usize,
    arena: usize,
}

/// Segments of the original tour plus the edges added so far.
///
/// Nodes of the graph are tour positions, not node ids.
///
/// # Examples
///
/// ```
/// use u_tour::lin_kernighan::SegmentedTourGraph;
///
/// // Break edge 3-4 of an 8-position tour, then break 0-1 and join 4-1.
/// let mut g = SegmentedTourGraph::new(8, 3, 4);
/// assert_eq!(g.walk(0), vec![3, 2, 1, 0, 7, 6, 5, 4]);
/// let edge = g.split_edge(1, false).unwrap();
/// assert_eq!(edge, (1, 0));
/// g.split(1, 4, false);
/// assert_eq!(g.tail(), 0);
/// assert_eq!(g.walk(1), vec![3, 2, 1, 4, 5, 6, 7, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct SegmentedTourGraph {
    dim: usize,
    head: usize,
    tail: usize,
    depth: usize,
    other_half: Option<(usize, usize)>,
    arena: Vec<Segment>,
    order: Vec<SegId>,
    trail: Vec<Undo>,
}

impl SegmentedTourGraph {
    /// Builds the graph for a tour of `dim` positions after breaking the
    /// edge between the adjacent positions `t1` and `t2`.
    ///
    /// # Panics
    ///
    /// Panics if `dim < 3` or the positions are not adjacent.
    pub fn new(dim: usize, t1: usize, t2: usize) -> Self {
        assert!(dim >= 3, "graph needs at least 3 positions");
        assert!(t1 < dim && t2 < dim, "position out of range");
        assert!(
            (t1 + 1) % dim == t2 || (t2 + 1) % dim == t1,
            "positions {} and {} are not adjacent",
            t1,
            t2
        );
        let last = dim - 1;
        let (arena, order) = if (t1 == 0 && t2 == last) || (t1 == last && t2 == 0) {
            let orientation = if t2 == 0 {
                Orientation::Forward
            } else {
                Orientation::Backward
            };
            (vec![Segment::new(0, last, orientation)], vec![0])
        } else if t1 < t2 {
            let mut low = Segment::new(0, t1, Orientation::Forward);
            let mut high = Segment::new(t2, last, Orientation::Forward);
            high.succ = Some(0);
            low.pred = Some(1);
            (vec![low, high], vec![0, 1])
        } else {
            let mut high = Segment::new(t1, last, Orientation::Backward);
            let mut low = Segment::new(0, t2, Orientation::Backward);
            high.succ = Some(1);
            low.pred = Some(0);
            (vec![high, low], vec![1, 0])
        };
        Self {
            dim,
            head: t1,
            tail: t2,
            depth: 0,
            other_half: None,
            arena,
            order,
            trail: Vec::new(),
        }
    }

    /// Number of positions.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The fixed end `t1` of the tentative path.
    pub fn head(&self) -> usize {
        self.head
    }

    /// The free end `tn` of the tentative path.
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Number of splits performed.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns `true` while a reverse split has cut the cycle in two.
    pub fn is_split_in_two(&self) -> bool {
        self.other_half.is_some()
    }

    /// Segments in order of their start position.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.order.iter().map(move |&id| &self.arena[id])
    }

    /// Records the current state for [`rollback`](Self::rollback).
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            trail: self.trail.len(),
            arena: self.arena.len(),
        }
    }

    /// Undoes every change made since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        while self.trail.len() > checkpoint.trail {
            match self.trail.pop() {
                Some(Undo::Segment(id, old)) => self.arena[id] = old,
                Some(Undo::Replaced { at, old }) => {
                    self.order.remove(at + 1);
                    self.order[at] = old;
                }
                Some(Undo::Header {
                    tail,
                    depth,
                    other_half,
                }) => {
                    self.tail = tail;
                    self.depth = depth;
                    self.other_half = other_half;
                }
                None => break,
            }
        }
        self.arena.truncate(checkpoint.arena);
    }

    #[inline]
    fn wrap(&self, position: isize) -> usize {
        position.rem_euclid(self.dim as isize) as usize
    }

    fn slot_of(&self, position: usize) -> usize {
        let slot = self
            .order
            .partition_point(|&id| self.arena[id].start.tail < position);
        if slot == self.order.len() || self.arena[self.order[slot]].start.tail > position {
            slot - 1
        } else {
            slot
        }
    }

    fn segment_of(&self, position: usize) -> SegId {
        self.order[self.slot_of(position)]
    }

    /// Start of the segment, continued through the wrap link.
    fn t_start(&self, id: SegId) -> EndRef {
        match self.arena[id].pred {
            Some(pred) => (pred, Side::Start),
            None => (id, Side::Start),
        }
    }

    /// End of the segment, continued through the wrap link.
    fn t_end(&self, id: SegId) -> EndRef {
        match self.arena[id].succ {
            Some(succ) => (succ, Side::End),
            None => (id, Side::End),
        }
    }

    fn end(&self, (id, side): EndRef) -> SegmentEnd {
        *self.arena[id].side(side)
    }

    fn seg_mut(&mut self, id: SegId) -> &mut Segment {
        self.trail.push(Undo::Segment(id, self.arena[id]));
        &mut self.arena[id]
    }

    fn set_splice(&mut self, (id, side): EndRef, target: usize, depth: usize) {
        let end = self.seg_mut(id).side_mut(side);
        assert!(end.splice.is_none(), "segment end {} is already spliced", end.tail);
        end.splice = Some(Splice { target, depth });
    }

    /// Orients a segment together with its wrap partner.
    fn orient(&mut self, id: SegId, orientation: Orientation) {
        let seg = self.arena[id];
        for s in [Some(id), seg.succ, seg.pred].into_iter().flatten() {
            if self.arena[s].orientation != orientation {
                self.seg_mut(s).orientation = orientation;
            }
        }
    }

    fn in_other_half(&self, position: usize) -> bool {
        assert!((1..=3).contains(&self.depth), "half tracking at depth {}", self.depth);
        match self.other_half {
            Some((a, b)) => {
                let up = (b + self.dim - a) % self.dim;
                (position + self.dim - a) % self.dim <= up
            }
            None => false,
        }
    }

    /// The edge a segment offers at `position`: against its orientation,
    /// or along it when `rev`.
    fn segment_edge(&self, id: SegId, position: usize, rev: bool) -> Option<Edge> {
        let seg = &self.arena[id];
        debug_assert!(seg.contains(position));
        let forward = seg.orientation == Orientation::Forward;
        if position == seg.start.tail && forward != rev {
            return seg.pred.map(|p| (position, self.arena[p].end.tail));
        }
        if position == seg.end.tail && forward == rev {
            return seg.succ.map(|s| (position, self.arena[s].start.tail));
        }
        let sign = seg.orientation.sign();
        let other = if rev {
            position as isize + sign
        } else {
            position as isize - sign
        };
        assert!(
            other >= 0 && (other as usize) < self.dim,
            "edge from {} leaves the tour",
            position
        );
        Some((position, other as usize))
    }

    /// The tour edge that [`split`](Self::split) would break at `position`.
    ///
    /// Without `rev` this is the edge that keeps the cycle whole; `rev`
    /// asks for the other one. Returns `None` when no legal edge exists:
    /// reverse breaks are allowed only at the first step (and never right
    /// next to the free end) or while the cycle is split, and while it is
    /// split the break must land in the half that reconnects it.
    pub fn split_edge(&self, position: usize, rev: bool) -> Option<Edge> {
        let id = self.segment_of(position);
        let sign = self.arena[id].orientation.sign();
        if rev
            && self.depth == 0
            && self.wrap(position as isize - sign) == self.wrap(self.tail as isize + sign)
        {
            return None;
        }
        if rev && self.depth > 2 {
            return None;
        }
        if rev && self.depth > 0 && self.other_half.is_none() {
            return None;
        }
        if !rev && self.other_half.is_some() && !self.in_other_half(position) {
            return None;
        }
        if self.depth == 2 && self.other_half.is_some() && !self.in_other_half(position) {
            return None;
        }
        self.segment_edge(id, position, rev)
    }

    /// Joins the free end `joined_to` to `position` and breaks the edge
    /// [`split_edge`](Self::split_edge) returns there; its far end becomes
    /// the new free end.
    ///
    /// # Panics
    ///
    /// Panics if `joined_to` is not the current free end or no legal edge
    /// exists at `position`.
    pub fn split(&mut self, position: usize, joined_to: usize, rev: bool) {
        assert_eq!(joined_to, self.tail, "new edges start at the free end");
        let slot1 = self.slot_of(position);
        let edge = match self.split_edge(position, rev) {
            Some(edge) => edge,
            None => panic!("no edge to break at position {}", position),
        };
        let slot2 = self.slot_of(edge.1);

        self.trail.push(Undo::Header {
            tail: self.tail,
            depth: self.depth,
            other_half: self.other_half,
        });
        self.tail = edge.1;
        self.depth += 1;
        let depth = self.depth;

        if self.other_half.is_some() {
            if self.in_other_half(position) {
                self.other_half = None;
            } else {
                assert!(depth <= 2, "cycle still split at depth {}", depth);
            }
        }
        if rev && depth == 1 {
            let id = self.order[slot1];
            self.other_half = Some(match self.arena[id].orientation {
                Orientation::Forward => (self.end(self.t_start(id)).tail, position),
                Orientation::Backward => (position, self.end(self.t_end(id)).tail),
            });
        }

        if slot1 == slot2 {
            self.split_segment(slot1, edge, joined_to, depth);
        } else {
            self.cut_wrap_link(slot1, slot2, edge, joined_to, depth);
        }

        let eid = self.segment_of(joined_to);
        let (ts, te) = (self.t_start(eid), self.t_end(eid));
        let (s, e) = (self.end(ts), self.end(te));
        assert!(
            joined_to == s.tail || joined_to == e.tail,
            "free end {} is inside a segment",
            joined_to
        );
        let side = if s.tail == e.tail {
            if s.splice.is_none() {
                ts
            } else {
                te
            }
        } else if joined_to == s.tail {
            ts
        } else {
            te
        };
        self.set_splice(side, edge.0, depth);

        if self.other_half.is_some() {
            let id = self.segment_of(self.head);
            let orientation = if self.head == self.end(self.t_start(id)).tail {
                Orientation::Forward
            } else if self.head == self.end(self.t_end(id)).tail {
                Orientation::Backward
            } else {
                panic!("head {} is inside a segment", self.head)
            };
            self.orient(id, orientation);
        } else {
            self.fix_directions(edge.1);
        }
    }

    /// Replaces the segment at `slot` by the two pieces on either side of `edge`.
    fn split_segment(&mut self, slot: usize, edge: Edge, joined_to: usize, depth: usize) {
        let old = self.order[slot];
        let seg = self.arena[old];
        let splice = Some(Splice {
            target: joined_to,
            depth,
        });
        let (mut low, mut high);
        if edge.0 < edge.1 {
            low = Segment::new(seg.start.tail, edge.0, seg.orientation);
            high = Segment::new(edge.1, seg.end.tail, seg.orientation.flip());
            low.end.splice = splice;
        } else {
            low = Segment::new(seg.start.tail, edge.1, seg.orientation.flip());
            high = Segment::new(edge.0, seg.end.tail, seg.orientation);
            high.start.splice = splice;
        }
        low.start.splice = seg.start.splice;
        high.end.splice = seg.end.splice;
        low.pred = seg.pred;
        high.succ = seg.succ;

        let low_id = self.arena.len();
        let high_id = low_id + 1;
        self.arena.push(low);
        self.arena.push(high);
        self.trail.push(Undo::Replaced { at: slot, old });
        self.order[slot] = low_id;
        self.order.insert(slot + 1, high_id);

        if let Some(succ) = seg.succ {
            let s = self.seg_mut(succ);
            s.pred = Some(high_id);
            s.orientation = high.orientation;
        }
        if let Some(pred) = seg.pred {
            let p = self.seg_mut(pred);
            p.succ = Some(low_id);
            p.orientation = low.orientation;
        }
    }

    /// Breaks the tour edge between position `n - 1` and position `0`.
    fn cut_wrap_link(
        &mut self,
        slot1: usize,
        slot2: usize,
        edge: Edge,
        joined_to: usize,
        depth: usize,
    ) {
        let (id1, id2) = (self.order[slot1], self.order[slot2]);
        let (one, two) = if edge.0 < edge.1 {
            assert_eq!(self.arena[id1].start.tail, edge.0);
            assert_eq!(self.arena[id2].end.tail, edge.1);
            self.set_splice((id1, Side::Start), joined_to, depth);
            (id1, id2)
        } else {
            assert_eq!(self.arena[id1].end.tail, edge.0);
            assert_eq!(self.arena[id2].start.tail, edge.1);
            self.set_splice((id1, Side::End), joined_to, depth);
            (id2, id1)
        };
        assert_eq!(self.arena[two].succ, Some(one), "wrap link is not intact");
        assert_eq!(self.arena[one].pred, Some(two), "wrap link is not intact");
        self.seg_mut(two).succ = None;
        self.seg_mut(one).pred = None;
    }

    /// Re-orients every segment from the free end `position` back to the head.
    fn fix_directions(&mut self, mut position: usize) {
        let mut came_from: Option<usize> = None;
        let mut id = self.segment_of(position);
        for _ in 0..=self.order.len() {
            let s = self.end(self.t_start(id));
            let e = self.end(self.t_end(id));
            let (s_target, e_target) = (s.target(), e.target());
            assert!(
                came_from == s_target || came_from == e_target,
                "segment at {} is not reached by a splice",
                position
            );
            let (orientation, next) = if (came_from == s_target && s_target != e_target)
                || (position == s.tail && s.tail != e.tail)
            {
                assert_eq!(position, s.tail);
                came_from = Some(e.tail);
                (Orientation::Forward, e_target)
            } else {
                assert_eq!(position, e.tail);
                came_from = Some(s.tail);
                (Orientation::Backward, s_target)
            };
            self.orient(id, orientation);
            match next {
                Some(n) => {
                    position = n;
                    id = self.segment_of(n);
                }
                None => {
                    assert_eq!(came_from, Some(self.head), "path does not end at the head");
                    return;
                }
            }
        }
        panic!("orientation pass did not reach the head");
    }

    /// The tentative tour as it stood after step `last_depth`, as positions.
    ///
    /// Starts at the head and follows every splice added at or before
    /// `last_depth`; deeper splices are ignored, so the original tour edge
    /// they replaced is followed instead.
    pub fn walk(&self, last_depth: usize) -> Vec<usize> {
        let dim = self.dim;
        let mut out = Vec::with_capacity(dim);
        let mut position = self.head;
        let mut prev: Option<usize> = None;
        let mut step: Option<isize> = None;

        while out.len() < dim {
            let seg = self.arena[self.segment_of(position)];
            let d = match step {
                Some(d) => d,
                None => {
                    let d = match prev {
                        None => -seg.orientation.sign(),
                        Some(_) if out.len() == dim - 1 => 1,
                        Some(p) if seg.start.tail == seg.end.tail => {
                            debug_assert!(
                                seg.start.target() == Some(p) || seg.end.target() == Some(p)
                            );
                            if seg.start.target() == Some(p) {
                                1
                            } else {
                                -1
                            }
                        }
                        Some(_) if seg.start.tail == position => 1,
                        Some(_) => -1,
                    };
                    step = Some(d);
                    d
                }
            };
            let exit = if d > 0 { seg.end } else { seg.start };
            let mut cur = position as isize;
            loop {
                out.push(cur as usize);
                if out.len() == dim || cur == exit.tail as isize {
                    break;
                }
                cur += d;
            }
            match exit.splice {
                Some(s) if s.depth <= last_depth => {
                    position = s.target;
                    prev = Some(exit.tail);
                    step = None;
                }
                _ => position = self.wrap(cur + d),
            }
        }
        out
    }
}
