//! Row-major grid layout.
//!
//! [`GridLayout`] is the cursor that walks a gallery left to right, top to
//! bottom. Each call to [`GridLayout::place`] hands out the current slot and
//! advances the cursor, wrapping to a new row once `columns_per_row` slots
//! have been used. Every avatar is surrounded by a [`GAP`] pixel border.
//!
//! # Example
//!
//! ```
//! # use galleria_core::layout::GridLayout;
//! let mut layout = GridLayout::new(48, 3);
//! let first = layout.place();
//! let second = layout.place();
//!
//! assert_eq!((first.x(), first.y()), (2, 2));
//! assert_eq!((second.x(), second.y()), (52, 2));
//! assert_eq!(layout.canvas_bounds().width(), 152);
//! ```

use log::trace;

use crate::geometry::{CanvasBounds, Placement};

/// Border between avatars and around the canvas edge, in pixels.
pub const GAP: u32 = 2;

/// Stateful grid cursor for one gallery.
///
/// The layout never fails: any number of placements can be requested. The
/// canvas height reported by [`canvas_bounds`](Self::canvas_bounds) is only
/// final once the last entity has been placed.
#[derive(Debug, Clone)]
pub struct GridLayout {
    avatar_size: u32,
    columns_per_row: u32,
    column: u32,
    row: u32,
    x: u32,
    y: u32,
    placed: usize,
}

impl GridLayout {
    /// Creates a layout cursor positioned on the first slot.
    ///
    /// # Arguments
    ///
    /// * `avatar_size` - Side length of each displayed avatar.
    /// * `columns_per_row` - Slots per row before wrapping. A value of zero is
    ///   treated as one.
    pub fn new(avatar_size: u32, columns_per_row: u32) -> Self {
        Self {
            avatar_size,
            columns_per_row: columns_per_row.max(1),
            column: 1,
            row: 1,
            x: GAP,
            y: GAP,
            placed: 0,
        }
    }

    /// Canvas width for `columns_per_row` slots of `avatar_size`, or `None`
    /// when it does not fit in a `u32`.
    pub fn checked_canvas_width(avatar_size: u32, columns_per_row: u32) -> Option<u32> {
        avatar_size
            .checked_add(GAP)?
            .checked_mul(columns_per_row.max(1))?
            .checked_add(GAP)
    }

    /// Distance between the origins of two neighbouring slots.
    fn stride(&self) -> u32 {
        self.avatar_size.saturating_add(GAP)
    }

    /// Returns the current slot and advances the cursor.
    pub fn place(&mut self) -> Placement {
        let placement = Placement::new(self.x, self.y, self.row, self.column);

        if self.column >= self.columns_per_row {
            self.row = self.row.saturating_add(1);
            self.column = 1;
            self.x = GAP;
            self.y = self.y.saturating_add(self.stride());
        } else {
            self.column += 1;
            self.x = self.x.saturating_add(self.stride());
        }
        self.placed += 1;

        trace!(placement:% = placement; "Placed avatar");
        placement
    }

    /// Canvas width, fixed for the lifetime of the layout.
    ///
    /// Saturates at `u32::MAX`; see
    /// [`checked_canvas_width`](Self::checked_canvas_width).
    pub fn canvas_width(&self) -> u32 {
        Self::checked_canvas_width(self.avatar_size, self.columns_per_row).unwrap_or(u32::MAX)
    }

    /// Canvas height for the rows reached so far.
    ///
    /// The row the cursor currently sits on always counts, so an empty
    /// gallery still reserves one row and a completely filled last row leaves
    /// one trailing row of height.
    pub fn canvas_height(&self) -> u32 {
        self.stride().saturating_mul(self.row).saturating_add(GAP)
    }

    /// Canvas bounds for the placements handed out so far.
    pub fn canvas_bounds(&self) -> CanvasBounds {
        CanvasBounds::new(self.canvas_width(), self.canvas_height())
    }

    /// Number of placements handed out.
    pub fn placed(&self) -> usize {
        self.placed
    }

    /// Configured avatar side length.
    pub fn avatar_size(&self) -> u32 {
        self.avatar_size
    }

    /// Configured number of slots per row.
    pub fn columns_per_row(&self) -> u32 {
        self.columns_per_row
    }
}
