//! Argument position sets

/// Discrete argument positions plus an optional variadic tail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSet {
    discrete: &'static [usize],
    variadic_from: Option<usize>,
}

impl ArgSet {
    pub const EMPTY: ArgSet = ArgSet {
        discrete: &[],
        variadic_from: None,
    };

    pub const fn of(discrete: &'static [usize]) -> Self {
        Self {
            discrete,
            variadic_from: None,
        }
    }

    /// `discrete` plus every position from `from` on
    pub const fn variadic(discrete: &'static [usize], from: usize) -> Self {
        Self {
            discrete,
            variadic_from: Some(from),
        }
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.discrete.contains(&idx) || self.variadic_from.map_or(false, |from| idx >= from)
    }

    pub fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.variadic_from.is_none()
    }

    pub fn variadic_from(&self) -> Option<usize> {
        self.variadic_from
    }

    /// Members among the first `arg_count` positions
    pub fn positions(&self, arg_count: usize) -> impl Iterator<Item = usize> + '_ {
        (0..arg_count).filter(move |idx| self.contains(*idx))
    }
}
