/// Cosmetic progress counter over (row × pair) comparison units.
pub struct Progress {
    done: usize,
    total: usize,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self { done: 0, total }
    }

    /// Record one completed comparison, printing a status line every six
    /// units (one stimulus row) and at the end.
    pub fn tick(&mut self) {
        self.done += 1;
        if self.done % 6 == 0 || self.done == self.total {
            eprintln!("  {}/{} comparisons", self.done, self.total);
        }
    }

    pub fn completed(&self) -> usize {
        self.done
    }
}
