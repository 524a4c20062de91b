//! Optimistic concurrency expectations for ledger keys.

/// What a transaction observed about a key when it read it.
///
/// Ledgers that track per-key revisions validate these at commit time; a
/// mismatch means another transaction wrote the key in between.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedRevision {
    /// Skip revision checking.
    Any,
    /// The key did not exist.
    Absent,
    /// The key existed at exactly this revision.
    Exact(u64),
}

impl ExpectedRevision {
    /// `actual` is `None` when the key is absent.
    pub fn matches(self, actual: Option<u64>) -> bool {
        match (self, actual) {
            (ExpectedRevision::Any, _) => true,
            (ExpectedRevision::Absent, None) => true,
            (ExpectedRevision::Exact(v), Some(a)) => v == a,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_covers_presence_and_exact_revision() {
        assert!(ExpectedRevision::Any.matches(None));
        assert!(ExpectedRevision::Any.matches(Some(4)));
        assert!(ExpectedRevision::Absent.matches(None));
        assert!(!ExpectedRevision::Absent.matches(Some(1)));
        assert!(ExpectedRevision::Exact(2).matches(Some(2)));
        assert!(!ExpectedRevision::Exact(2).matches(Some(3)));
        assert!(!ExpectedRevision::Exact(2).matches(None));
    }
}
