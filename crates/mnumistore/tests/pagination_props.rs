use mnumistore::model::ResourceKind;
use mnumistore::pagination::PageInfo;
use mnumistore::query::{self, FilterField, Filters, ListQuery};
use mnumistore::store::memory::InMemoryStore;
use proptest::prelude::*;

fn store_with(types: &[bool]) -> InMemoryStore {
    let store = InMemoryStore::new(ResourceKind::Calendar);
    for (i, national) in types.iter().enumerate() {
        let kind = if *national { "national-day" } else { "name-day" };
        store.insert_raw(&format!("c{}.{}.en.json", i, kind), b"{}");
    }
    store
}

proptest! {
    #[test]
    fn total_does_not_depend_on_page(
        types in prop::collection::vec(any::<bool>(), 0..40),
        page in 1i64..10,
        per_page in 1i64..15,
    ) {
        let store = store_with(&types);
        let filters = Filters::new().with(FilterField::TypeOrDomain, "national-day");
        let expected = types.iter().filter(|t| **t).count();

        let query = ListQuery::new(page, per_page).unwrap().with_filters(filters);
        let listing = query::list(&store, &query).unwrap();
        prop_assert_eq!(listing.total, expected);
    }

    #[test]
    fn pages_partition_the_filtered_set(
        types in prop::collection::vec(any::<bool>(), 0..40),
        per_page in 1i64..15,
    ) {
        let store = store_with(&types);
        let filters = Filters::new().with(FilterField::TypeOrDomain, "national-day");
        let everything = query::list(
            &store,
            &ListQuery::new(1, 100).unwrap().with_filters(filters.clone()),
        )
        .unwrap();

        let info = PageInfo::new(1, per_page as u32, everything.total);
        let mut seen = Vec::new();
        for page in 1..=i64::from(info.total_pages) + 1 {
            let listing = query::list(
                &store,
                &ListQuery::new(page, per_page).unwrap().with_filters(filters.clone()),
            )
            .unwrap();
            let offset = ((page - 1) * per_page) as usize;
            let expected_len = everything.total.saturating_sub(offset).min(per_page as usize);
            prop_assert_eq!(listing.items.len(), expected_len);
            seen.extend(listing.items);
        }
        prop_assert_eq!(seen, everything.items);
    }

    #[test]
    fn next_link_only_before_last_page(total in 0usize..500, per_page in 1u32..=100, page in 1u32..20) {
        let info = PageInfo::new(page, per_page, total);
        prop_assert!(info.total_pages as usize * per_page as usize >= total);
        prop_assert_eq!(info.next_page().is_some(), page < info.total_pages);
        prop_assert_eq!(info.prev_page().is_some(), page > 1);
    }
}
