//! [`Deal`] read model definition.
//!
//! [`Deal`]: crate::domain::Deal

pub mod list {
    //! [`Deal`]s list definitions.

    use crate::domain::{deal, Deal};

    /// Number of the most recent [`Deal`]s a blank [`Search::Quick`] lists.
    pub const RECENT_LIMIT: usize = 5;

    /// Filter of a [`Deal`]s list.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`Search`] to match [`Deal`]s against, if any.
        pub search: Option<Search>,

        /// [`deal::Kind`] to list [`Deal`]s of, if any.
        pub kind: Option<deal::Kind>,

        /// [`deal::Status`] to list [`Deal`]s in, if any.
        pub status: Option<deal::Status>,
    }

    impl Filter {
        /// Indicates whether the provided [`Deal`] passes this [`Filter`].
        #[must_use]
        pub fn matches(&self, deal: &Deal) -> bool {
            self.kind.map_or(true, |k| k == deal.kind)
                && self.status.map_or(true, |s| s == deal.status)
                && self.search.as_ref().map_or(true, |s| s.matches(deal))
        }

        /// Returns the maximum number of [`Deal`]s to list, if limited.
        #[must_use]
        pub fn limit(&self) -> Option<usize> {
            self.search
                .as_ref()
                .filter(|s| {
                    matches!(s, Search::Quick(t) if t.trim().is_empty())
                })
                .map(|_| RECENT_LIMIT)
        }
    }

    /// Case-insensitive substring search over [`Deal`]s.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum Search {
        /// Search of the [`Deal`]s list, matching the term against the file
        /// number, the property address and the client's last name.
        List(String),

        /// Quick search, matching a `#`-prefixed term against the file number
        /// only, and any other term against the file number, the property
        /// address and the client's first and last names.
        ///
        /// The term is trimmed, and the file number is matched in its
        /// `#`-prefixed form. Blank term lists the [`RECENT_LIMIT`] most
        /// recent [`Deal`]s.
        Quick(String),
    }

    impl Search {
        /// Returns the lowercased term of this [`Search`].
        #[must_use]
        pub fn term(&self) -> String {
            match self {
                Self::List(t) => t.to_lowercase(),
                Self::Quick(t) => t.trim().to_lowercase(),
            }
        }

        /// Indicates whether the provided [`Deal`] matches this [`Search`].
        #[must_use]
        pub fn matches(&self, deal: &Deal) -> bool {
            let term = self.term();
            if term.is_empty() {
                return true;
            }
            let contains = |s: &str| s.to_lowercase().contains(&term);

            let file_number = format!("#{}", deal.file_number);
            match self {
                Self::Quick(_) if term.starts_with('#') => contains(&file_number),
                Self::List(_) => {
                    contains(&deal.file_number.to_string())
                        || contains(&deal.property_address.to_string())
                        || contains(deal.client.last_name.as_ref())
                }
                Self::Quick(_) => {
                    contains(&file_number)
                        || contains(&deal.property_address.to_string())
                        || contains(deal.client.last_name.as_ref())
                        || contains(deal.client.first_name.as_ref())
                }
            }
        }
    }

    /// Numbers of [`Deal`]s in total and per [`deal::Kind`].
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct Counts {
        /// Total number of [`Deal`]s.
        pub total: usize,

        /// Number of [`deal::Kind::Purchase`]s.
        pub purchases: usize,

        /// Number of [`deal::Kind::Sale`]s.
        pub sales: usize,

        /// Number of [`deal::Kind::Refinance`]s.
        pub refinances: usize,
    }

    impl Counts {
        /// Adds the `count` of [`Deal`]s of the provided [`deal::Kind`].
        pub fn record(&mut self, kind: deal::Kind, count: usize) {
            self.total += count;
            match kind {
                deal::Kind::Purchase => self.purchases += count,
                deal::Kind::Sale => self.sales += count,
                deal::Kind::Refinance => self.refinances += count,
            }
        }
    }

    impl<'a> FromIterator<&'a Deal> for Counts {
        fn from_iter<T: IntoIterator<Item = &'a Deal>>(iter: T) -> Self {
            let mut counts = Self::default();
            for deal in iter {
                counts.record(deal.kind, 1);
            }
            counts
        }
    }

    #[cfg(test)]
    mod spec {
        use crate::{domain::deal, fixture};

        use super::{Counts, Filter, Search, RECENT_LIMIT};

        fn search(search: Search) -> Vec<String> {
            let filter = Filter {
                search: Some(search),
                ..Filter::default()
            };
            fixture::deals()
                .into_iter()
                .filter(|d| filter.matches(d))
                .map(|d| d.file_number.to_string())
                .collect()
        }

        #[test]
        fn matches_address_or_file_number_case_insensitively() {
            let found = search(Search::List("toronto".into()));

            let expected = fixture::deals()
                .into_iter()
                .filter(|d| {
                    let address = d.property_address.to_string();
                    let number = d.file_number.to_string();
                    address.to_lowercase().contains("toronto")
                        || number.to_lowercase().contains("toronto")
                })
                .map(|d| d.file_number.to_string())
                .collect::<Vec<_>>();
            assert!(!expected.is_empty());
            assert_eq!(found, expected);
            assert_eq!(search(Search::List("TORONTO".into())), expected);
        }

        #[test]
        fn list_search_ignores_first_name() {
            let deals = fixture::deals();
            let first_name = deals[0].client.first_name.to_string();

            assert!(!search(Search::Quick(first_name.clone())).is_empty());
            assert!(search(Search::List(first_name)).is_empty());
        }

        #[test]
        fn hash_prefix_matches_file_number_only() {
            let deals = fixture::deals();
            let number = deals[0].file_number.to_string();

            assert_eq!(
                search(Search::Quick(format!("#{number}"))),
                [number.clone()],
            );
            assert!(search(Search::Quick("#toronto".into())).is_empty());
            assert_eq!(search(Search::List(number.clone())), [number]);
        }

        #[test]
        fn list_search_takes_term_verbatim() {
            let total = fixture::deals().len();

            assert!(search(Search::List("#".into())).is_empty());
            assert!(search(Search::List("toronto ".into())).is_empty());
            assert_eq!(search(Search::Quick("#".into())).len(), total);
        }

        #[test]
        fn blank_term_matches_everything() {
            let total = fixture::deals().len();

            assert_eq!(search(Search::List(String::new())).len(), total);
            assert_eq!(search(Search::Quick("  ".into())).len(), total);
        }

        #[test]
        fn blank_quick_search_is_limited() {
            let quick = Filter {
                search: Some(Search::Quick(String::new())),
                ..Filter::default()
            };
            assert_eq!(quick.limit(), Some(RECENT_LIMIT));

            let list = Filter {
                search: Some(Search::List(String::new())),
                ..Filter::default()
            };
            assert_eq!(list.limit(), None);
        }

        #[test]
        fn filters_by_kind() {
            let filter = Filter {
                kind: Some(deal::Kind::Refinance),
                ..Filter::default()
            };

            let deals = fixture::deals();
            let mut refinances = deals.iter().filter(|d| filter.matches(d));

            assert!(refinances.clone().count() > 0);
            assert!(refinances.all(|d| d.kind == deal::Kind::Refinance));
        }

        #[test]
        fn counts_per_kind() {
            let deals = fixture::deals();

            let counts = deals.iter().collect::<Counts>();

            assert_eq!(counts.total, deals.len());
            assert_eq!(
                counts.purchases + counts.sales + counts.refinances,
                counts.total,
            );
            assert_eq!(
                counts.sales,
                deals.iter().filter(|d| d.kind == deal::Kind::Sale).count(),
            );
        }
    }
}
