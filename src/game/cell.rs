use super::Side;

/// Contents of one square: an owner and a spot count.
///
/// A cell with zero spots never has an owner; [`Cell::new`] enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    owner: Option<Side>,
    spots: usize,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        owner: None,
        spots: 0,
    };

    /// A cell holding `spots` spots of `side`, or an empty cell if `spots` is 0.
    pub fn new(side: Side, spots: usize) -> Self {
        if spots == 0 {
            Cell::EMPTY
        } else {
            Cell {
                owner: Some(side),
                spots,
            }
        }
    }

    pub fn owner(&self) -> Option<Side> {
        self.owner
    }

    pub fn spots(&self) -> usize {
        self.spots
    }

    pub fn is_empty(&self) -> bool {
        self.spots == 0
    }

    /// True if `side` may add a spot here: the cell is empty or already `side`'s.
    pub fn accepts(&self, side: Side) -> bool {
        match self.owner {
            None => true,
            Some(owner) => owner == side,
        }
    }
}
