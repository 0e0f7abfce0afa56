/// Row-major flat grid. No per-cell objects, f64 friendly.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub data: Vec<T>,
    pub w: usize,
    pub h: usize,
}

impl<T: Copy + Default> Grid<T> {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            data: vec![T::default(); w * h],
            w,
            h,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }
}

/// Endpoint-inclusive linear spacing over [lo, hi]. `n == 1` yields `[lo]`;
/// `lo > hi` is legal and spaces downward.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![lo];
    }
    let step = (hi - lo) / (n - 1) as f64;
    (0..n).map(|i| lo + step * i as f64).collect()
}

/// Full cross product of two sample axes: every column value paired with
/// every row value. Row r of the output repeats `rows[r]` across all
/// columns; column c repeats `cols[c]` down all rows.
pub fn meshgrid(cols: &[f64], rows: &[f64]) -> (Grid<f64>, Grid<f64>) {
    let w = cols.len();
    let h = rows.len();
    let mut cg = Grid::new(w, h);
    let mut rg = Grid::new(w, h);
    for (y, &rv) in rows.iter().enumerate() {
        for (x, &cv) in cols.iter().enumerate() {
            cg.set(x, y, cv);
            rg.set(x, y, rv);
        }
    }
    (cg, rg)
}
