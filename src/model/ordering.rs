//! Sort-key rendering for list endpoints
//!
//! Each paginated endpoint declares its sortable fields as a small
//! `Copy` enum implementing [`SortField`]. Ascending order is the bare
//! field name; descending order prepends a single `-`.

/// A sortable field name for one list endpoint.
pub trait SortField: Copy {
    /// Wire name of the field, e.g. `"displayName"`.
    fn field_name(&self) -> &'static str;
}

/// A sort directive combining a field with a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering<F: SortField> {
    pub field: F,
    pub descending: bool,
}

impl<F: SortField> Ordering<F> {
    pub fn asc(field: F) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn desc(field: F) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    /// Render the query-parameter value: `field` or `-field`.
    pub fn as_param(&self) -> String {
        if self.descending {
            format!("-{}", self.field.field_name())
        } else {
            self.field.field_name().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum StubSort {
        Name,
    }

    impl SortField for StubSort {
        fn field_name(&self) -> &'static str {
            "displayName"
        }
    }

    #[test]
    fn ascending_is_the_unprefixed_form() {
        assert_eq!(Ordering::asc(StubSort::Name).as_param(), "displayName");
    }

    #[test]
    fn descending_prepends_a_single_marker() {
        assert_eq!(Ordering::desc(StubSort::Name).as_param(), "-displayName");
    }
}
