//! [`EmailTemplate`] read model definition.
//!
//! [`EmailTemplate`]: crate::domain::EmailTemplate

pub mod list {
    //! [`EmailTemplate`]s list definitions.

    use crate::domain::EmailTemplate;

    /// Order of an [`EmailTemplate`]s list.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub enum Order {
        /// Most recently created first.
        #[default]
        NewestFirst,

        /// As stored, without any particular order.
        Unordered,
    }

    /// Selector of an [`EmailTemplate`]s list.
    #[derive(Clone, Debug, Default)]
    pub struct Selector {
        /// [`Order`] of the list.
        pub order: Order,

        /// Term to search [`EmailTemplate`]s by name, if any.
        pub search: Option<String>,
    }

    impl Selector {
        /// Creates a new [`Selector`] listing all the [`EmailTemplate`]s in the
        /// provided [`Order`].
        #[must_use]
        pub fn all(order: Order) -> Self {
            Self {
                order,
                search: None,
            }
        }

        /// Indicates whether the provided [`EmailTemplate`] passes this
        /// [`Selector`].
        #[must_use]
        pub fn matches(&self, template: &EmailTemplate) -> bool {
            self.search
                .as_deref()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .map_or(true, |term| {
                    template.name.to_string().to_lowercase().contains(&term)
                })
        }
    }
}
