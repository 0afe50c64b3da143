//! Grouping identifiers into request-sized batches
//!
//! The cap is a look-ahead bound: before an identifier is appended, the
//! accumulated length is checked, and the pending batch is flushed first if
//! the addition would overflow. The cap counts raw identifier bytes only;
//! the commas the fetch layer joins with are not part of the accounting.

/// One request's worth of identifiers, in input order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Batch {
    identifiers: Vec<String>,
    char_len: usize,
}

impl Batch {
    /// The identifiers in this batch, in the order they arrived
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Number of identifiers in this batch
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// True when the batch holds no identifiers
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Summed byte length of the identifiers (separators excluded)
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// The batch as one URL path segment: identifiers joined by commas, with
    /// a trailing comma
    pub fn joined(&self) -> String {
        let mut joined = String::with_capacity(self.char_len + self.identifiers.len());
        for identifier in &self.identifiers {
            joined.push_str(identifier);
            joined.push(',');
        }
        joined
    }
}

/// Accumulates identifiers into [`Batch`]es under a length cap
///
/// `push` returns the completed batch whenever the look-ahead check flushes
/// one; `finish` returns whatever is still pending at end-of-stream. A single
/// identifier longer than the cap is never split: it ends up alone in its own
/// batch. No batch is ever empty.
#[derive(Debug)]
pub struct Batcher {
    cap: usize,
    pending: Batch,
}

impl Batcher {
    /// Create a batcher with the given length cap
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            pending: Batch::default(),
        }
    }

    /// Add one identifier, returning the previously pending batch if adding
    /// would push it over the cap
    pub fn push(&mut self, identifier: String) -> Option<Batch> {
        let flushed = if !self.pending.is_empty()
            && self.pending.char_len + identifier.len() > self.cap
        {
            Some(std::mem::take(&mut self.pending))
        } else {
            None
        };

        self.pending.char_len += identifier.len();
        self.pending.identifiers.push(identifier);

        flushed
    }

    /// Flush the final pending batch, if any
    pub fn finish(self) -> Option<Batch> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending)
        }
    }
}

/// Batch a whole identifier sequence at once
///
/// Batch boundaries are a pure function of input order and `cap`; feeding the
/// same sequence through a [`Batcher`] one identifier at a time yields the
/// same batches.
pub fn batch_all<I>(identifiers: I, cap: usize) -> Vec<Batch>
where
    I: IntoIterator<Item = String>,
{
    let mut batcher = Batcher::new(cap);
    let mut batches = Vec::new();

    for identifier in identifiers {
        if let Some(batch) = batcher.push(identifier) {
            batches.push(batch);
        }
    }
    batches.extend(batcher.finish());

    batches
}
