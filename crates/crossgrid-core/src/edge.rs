//! Cell edges and bar-edge sets for bar grids.
//!
//! A bar-grid cell carries bars on up to four of its edges. Edges transform
//! under the grid symmetries: reflection in the vertical axis swaps the left
//! and right edges, reflection in the horizontal axis swaps top and bottom,
//! and a quarter turn advances each edge one place clockwise.

use bitflags::bitflags;

/// An edge of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// The top edge.
    Top,
    /// The right edge.
    Right,
    /// The bottom edge.
    Bottom,
    /// The left edge.
    Left,
}

impl Edge {
    /// All edges, in clockwise order starting from the top.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    fn index(self) -> u8 {
        match self {
            Self::Top => 0,
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Left => 3,
        }
    }

    fn from_index(index: u8) -> Self {
        Self::ALL[usize::from(index % 4)]
    }

    /// Returns the single-edge set containing this edge.
    #[must_use]
    pub fn bit(self) -> EdgeSet {
        EdgeSet::from_bits_truncate(1 << self.index())
    }

    /// Returns whether this is a left or right edge.
    #[must_use]
    pub fn is_vertical(self) -> bool {
        self.index() % 2 != 0
    }

    /// Returns whether this is a top or bottom edge.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        self.index() % 2 == 0
    }

    /// Returns the facing edge of the adjacent cell (top ↔ bottom,
    /// left ↔ right).
    #[must_use]
    pub fn opposite(self) -> Self {
        self.rotate_quarter(2)
    }

    /// Maps this edge through a reflection in the vertical axis.
    #[must_use]
    pub fn reflect_v_axis(self) -> Self {
        if self.is_vertical() { self.opposite() } else { self }
    }

    /// Maps this edge through a reflection in the horizontal axis.
    #[must_use]
    pub fn reflect_h_axis(self) -> Self {
        if self.is_horizontal() { self.opposite() } else { self }
    }

    /// Maps this edge through `quarters` clockwise quarter turns.
    #[must_use]
    pub fn rotate_quarter(self, quarters: u8) -> Self {
        Self::from_index(self.index() + quarters)
    }
}

bitflags! {
    /// The set of edges of a cell that carry a bar.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EdgeSet: u8 {
        /// Bar on the top edge.
        const TOP = 1 << 0;
        /// Bar on the right edge.
        const RIGHT = 1 << 1;
        /// Bar on the bottom edge.
        const BOTTOM = 1 << 2;
        /// Bar on the left edge.
        const LEFT = 1 << 3;
    }
}

impl EdgeSet {
    /// The secondary edges, whose bars a grid definition records per cell.
    /// The other two edges are implied by the neighbouring cells.
    pub const SECONDARY: Self = Self::BOTTOM.union(Self::RIGHT);

    /// The four subsets of [`EdgeSet::SECONDARY`], indexed by their 2-bit
    /// grid-definition code.
    pub(crate) const SECONDARY_SETS: [Self; 4] = [
        Self::empty(),
        Self::BOTTOM,
        Self::RIGHT,
        Self::BOTTOM.union(Self::RIGHT),
    ];

    /// Returns the edges of this set, in clockwise order from the top.
    pub fn edges(self) -> impl Iterator<Item = Edge> {
        Edge::ALL.into_iter().filter(move |edge| self.contains(edge.bit()))
    }

    fn map(self, f: impl Fn(Edge) -> Edge) -> Self {
        self.edges().fold(Self::empty(), |acc, edge| acc | f(edge).bit())
    }

    /// Maps every edge through a reflection in the vertical axis.
    #[must_use]
    pub fn reflect_v_axis(self) -> Self {
        self.map(Edge::reflect_v_axis)
    }

    /// Maps every edge through a reflection in the horizontal axis.
    #[must_use]
    pub fn reflect_h_axis(self) -> Self {
        self.map(Edge::reflect_h_axis)
    }

    /// Maps every edge through `quarters` clockwise quarter turns.
    #[must_use]
    pub fn rotate_quarter(self, quarters: u8) -> Self {
        self.map(|edge| edge.rotate_quarter(quarters))
    }

    /// Returns the 2-bit grid-definition code of this set's secondary edges.
    pub(crate) fn secondary_code(self) -> usize {
        let secondary = self & Self::SECONDARY;
        Self::SECONDARY_SETS
            .iter()
            .position(|set| *set == secondary)
            .unwrap_or(0)
    }
}
