//! [`Lead`] read model definition.
//!
//! [`Lead`]: crate::domain::Lead

pub mod list {
    //! [`Lead`]s list definitions.

    use crate::domain::Lead;

    /// Filter of a [`Lead`]s list.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// Term to search [`Lead`]s by, if any.
        ///
        /// Matched case-insensitively against the first and last names, the
        /// email and the corporation name.
        pub search: Option<String>,

        /// Whether to list corporate [`Lead`]s only (or non-corporate ones
        /// only), if set.
        pub corporate: Option<bool>,
    }

    impl Filter {
        /// Indicates whether the provided [`Lead`] passes this [`Filter`].
        #[must_use]
        pub fn matches(&self, lead: &Lead) -> bool {
            if self.corporate.is_some_and(|c| c != lead.is_corporate()) {
                return false;
            }
            let Some(term) = self
                .search
                .as_deref()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
            else {
                return true;
            };
            let contains = |s: &str| s.to_lowercase().contains(&term);

            contains(lead.first_name.as_ref())
                || contains(lead.last_name.as_ref())
                || contains(lead.email.as_ref())
                || lead
                    .corporation
                    .as_ref()
                    .is_some_and(|c| contains(c.name.as_ref()))
        }
    }

}
