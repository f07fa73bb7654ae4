//! Shape library: the fixed catalog of piece footprints and the rotation transform.

use crate::patterns::VOID_KIND;
use rand::Rng;

/// Owned footprint. cells[row * width + col]; 0 = absent, otherwise the cell kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Shape {
    /// Builds a shape from rows of equal length. Width comes from the first row.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Self {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut cells = Vec::with_capacity(width * rows.len());
        for row in rows {
            let row = row.as_ref();
            debug_assert_eq!(row.len(), width, "shape rows must be rectangular");
            cells.extend((0..width).map(|c| row.get(c).copied().unwrap_or(0)));
        }
        Self {
            width,
            height: rows.len(),
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        if row < self.height && col < self.width {
            self.cells[row * self.width + col]
        } else {
            0
        }
    }

    /// (row, col, kind) for every filled cell, row-major.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &k)| k != 0)
            .map(|(i, &k)| (i / self.width, i % self.width, k))
    }

    /// Quarter turn clockwise into a new buffer: new[i][j] = old[height - 1 - j][i].
    pub fn rotated(&self) -> Self {
        let (w, h) = (self.height, self.width);
        let mut cells = vec![0; w * h];
        for i in 0..h {
            for j in 0..w {
                cells[i * w + j] = self.get(self.height - 1 - j, i);
            }
        }
        Self {
            width: w,
            height: h,
            cells,
        }
    }
}

/// Catalog entries. The block codes double as colour kinds in the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Single,
    HorizontalPair,
    VerticalPair,
    Square,
    HorizontalLine,
    Void,
    VoidPair,
}

impl ShapeKind {
    pub const ALL: [Self; 7] = [
        Self::Single,
        Self::HorizontalPair,
        Self::VerticalPair,
        Self::Square,
        Self::HorizontalLine,
        Self::Void,
        Self::VoidPair,
    ];

    /// Fresh copy of the template; the catalog itself is never handed out for mutation.
    pub fn shape(self) -> Shape {
        match self {
            Self::Single => Shape::from_rows(&[[1u8]]),
            Self::HorizontalPair => Shape::from_rows(&[[2u8, 2]]),
            Self::VerticalPair => Shape::from_rows(&[[3u8], [3]]),
            Self::Square => Shape::from_rows(&[[4u8, 4], [4, 4]]),
            Self::HorizontalLine => Shape::from_rows(&[[5u8, 5, 5]]),
            Self::Void => Shape::from_rows(&[[VOID_KIND]]),
            Self::VoidPair => Shape::from_rows(&[[VOID_KIND, VOID_KIND]]),
        }
    }

    /// Uniform pick over the catalog.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}
