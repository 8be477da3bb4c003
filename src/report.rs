use std::io::{self, Write};

use crate::matcher::Hit;

/// Writes hits as tab-separated lines:
///
/// `label  start..end  id  alias  (orientation)`
///
/// Coordinates are 1-based and inclusive. Every line has five columns; the
/// alias column is empty for markers without one.
#[derive(Debug)]
pub struct HitWriter<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> HitWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn write_hit(&mut self, label: &str, hit: &Hit<'_>) -> io::Result<()> {
        let marker = hit.marker();
        writeln!(
            self.out,
            "{label}\t{}..{}\t{}\t{}\t({})",
            hit.start + 1,
            hit.end + 1,
            marker.id,
            marker.alias,
            hit.direction()
        )?;
        self.written += 1;
        Ok(())
    }

    /// Lines written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
