/// Result of every resolution query.
///
/// A miss is data, not an error: callers decide how to degrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolReference<T> {
    Solved(T),
    Unsolved,
}

impl<T> SymbolReference<T> {
    pub fn solved(value: T) -> Self {
        SymbolReference::Solved(value)
    }

    pub fn unsolved() -> Self {
        SymbolReference::Unsolved
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SymbolReference::Solved(_))
    }

    pub fn declaration(&self) -> Option<&T> {
        match self {
            SymbolReference::Solved(value) => Some(value),
            SymbolReference::Unsolved => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            SymbolReference::Solved(value) => Some(value),
            SymbolReference::Unsolved => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> SymbolReference<U> {
        match self {
            SymbolReference::Solved(value) => SymbolReference::Solved(f(value)),
            SymbolReference::Unsolved => SymbolReference::Unsolved,
        }
    }

    /// Keep a solved result, otherwise run the next resolution step.
    pub fn or_else<F: FnOnce() -> SymbolReference<T>>(self, f: F) -> SymbolReference<T> {
        match self {
            SymbolReference::Solved(_) => self,
            SymbolReference::Unsolved => f(),
        }
    }
}

impl<T> From<Option<T>> for SymbolReference<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => SymbolReference::Solved(v),
            None => SymbolReference::Unsolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_else_only_runs_on_miss() {
        let hit = SymbolReference::solved(1).or_else(|| panic!("must not run"));
        assert_eq!(hit, SymbolReference::Solved(1));

        let miss: SymbolReference<i32> = SymbolReference::unsolved();
        assert_eq!(miss.or_else(|| SymbolReference::solved(2)).into_option(), Some(2));
    }
}
