/// Monotonic change counter for the editor state.
///
/// Every view re-sync advances the revision once; events record the revision
/// they were emitted at.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision {
    /// 0-based revision index; 0 is the freshly constructed state.
    pub index: u64,
}

impl Revision {
    pub fn new(index: u64) -> Self {
        Self { index }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::Revision;

    #[test]
    fn default_is_zero() {
        assert_eq!(Revision::default(), Revision::new(0));
    }

    #[test]
    fn next_advances_index() {
        let r0 = Revision::new(3);
        let r1 = r0.next();
        assert_eq!(r1.index, 4);
        assert!(r1 > r0);
    }
}
