/// Append-only, ordered collection of encoded lines for one second-pass traversal.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchAccumulator {
    lines: Vec<String>,
    expected: usize,
}

impl BatchAccumulator {
    /// Create an accumulator pre-sized for the number of records seen in the first pass.
    pub fn with_expected(expected: usize) -> Self {
        Self {
            lines: Vec::with_capacity(expected),
            expected,
        }
    }

    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Close the accumulator. The returned batch is never mutated again.
    pub fn finish(self) -> BatchSequence {
        BatchSequence { lines: self.lines }
    }
}

/// A completed batch, handed to the streaming channel exactly once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSequence {
    lines: Vec<String>,
}

impl BatchSequence {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
