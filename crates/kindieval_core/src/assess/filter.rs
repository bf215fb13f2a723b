//! Stable catalog and roster filters.
//!
//! # Invariants
//! - Output preserves input order; nothing is re-sorted.
//! - An empty result is a valid answer, never an error.

use crate::model::child::Child;
use crate::model::target::{AgeBand, Domain, Target};

/// Selects the targets applicable to `age_band`, optionally narrowed to one
/// `domain` (`None` means all domains).
pub fn filter_targets<'a>(
    targets: &'a [Target],
    age_band: AgeBand,
    domain: Option<Domain>,
) -> Vec<&'a Target> {
    targets
        .iter()
        .filter(|target| target.age_band == age_band)
        .filter(|target| domain.map_or(true, |wanted| target.domain == wanted))
        .collect()
}

/// Counts targets per domain for one age band, in domain order, omitting
/// domains without targets.
pub fn domain_counts(targets: &[Target], age_band: AgeBand) -> Vec<(Domain, usize)> {
    Domain::ALL
        .into_iter()
        .map(|domain| {
            let count = targets
                .iter()
                .filter(|target| target.age_band == age_band && target.domain == domain)
                .count();
            (domain, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Roster view filter.
///
/// A child is kept when its age band matches `age_band` (any when `None`) and
/// its class equals `assigned_class` (any when the viewer has no class).
pub fn filter_children<'a>(
    children: &'a [Child],
    age_band: Option<AgeBand>,
    assigned_class: Option<&str>,
) -> Vec<&'a Child> {
    children
        .iter()
        .filter(|child| age_band.map_or(true, |band| child.age_band == band))
        .filter(|child| assigned_class.map_or(true, |class| child.class_label == class))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{domain_counts, filter_children, filter_targets};
    use crate::model::child::Child;
    use crate::model::target::{AgeBand, Domain, Target};

    fn target(code: &str, age_band: AgeBand, domain: Domain) -> Target {
        Target::new(code, age_band, domain, format!("content {code}")).unwrap()
    }

    fn catalog() -> Vec<Target> {
        vec![
            target("A", AgeBand::Age3To4, Domain::Physical),
            target("B", AgeBand::Age4To5, Domain::Language),
            target("C", AgeBand::Age3To4, Domain::Language),
            target("D", AgeBand::Age3To4, Domain::Physical),
        ]
    }

    fn codes(targets: &[&Target]) -> Vec<String> {
        targets.iter().map(|target| target.code.clone()).collect()
    }

    #[test]
    fn filters_by_age_band_in_catalog_order() {
        let catalog = catalog();
        let result = filter_targets(&catalog, AgeBand::Age3To4, None);
        assert_eq!(codes(&result), vec!["A", "C", "D"]);
        assert!(result.iter().all(|t| t.age_band == AgeBand::Age3To4));
    }

    #[test]
    fn domain_filter_is_a_subset_of_age_filter() {
        let catalog = catalog();
        let all = filter_targets(&catalog, AgeBand::Age3To4, None);
        let physical = filter_targets(&catalog, AgeBand::Age3To4, Some(Domain::Physical));
        assert_eq!(codes(&physical), vec!["A", "D"]);
        assert!(physical.iter().all(|t| t.domain == Domain::Physical));
        assert!(physical.iter().all(|t| all.contains(t)));
    }

    #[test]
    fn empty_catalog_and_no_match_yield_empty() {
        assert!(filter_targets(&[], AgeBand::Age5To6, None).is_empty());
        let catalog = catalog();
        assert!(filter_targets(&catalog, AgeBand::Age5To6, None).is_empty());
        assert!(filter_targets(&catalog, AgeBand::Age4To5, Some(Domain::Aesthetic)).is_empty());
    }

    #[test]
    fn filtering_twice_is_idempotent() {
        let catalog = catalog();
        let once: Vec<Target> = filter_targets(&catalog, AgeBand::Age3To4, None)
            .into_iter()
            .cloned()
            .collect();
        let twice = filter_targets(&once, AgeBand::Age3To4, None);
        assert_eq!(twice.len(), once.len());
        assert!(twice.iter().zip(once.iter()).all(|(a, b)| *a == b));
    }

    #[test]
    fn domain_counts_skip_empty_domains() {
        let catalog = catalog();
        assert_eq!(
            domain_counts(&catalog, AgeBand::Age3To4),
            vec![(Domain::Physical, 2), (Domain::Language, 1)]
        );
        assert!(domain_counts(&catalog, AgeBand::Age5To6).is_empty());
    }

    #[test]
    fn roster_filter_combines_age_band_and_class() {
        let children = vec![
            Child::new("An", "2020-05-12", "Mầm 1", AgeBand::Age3To4, "Cô Lan").unwrap(),
            Child::new("Bảo", "2019-08-20", "Chồi 2", AgeBand::Age4To5, "Cô Thảo").unwrap(),
            Child::new("Chi", "2020-01-02", "Mầm 2", AgeBand::Age3To4, "Cô Huệ").unwrap(),
        ];

        assert_eq!(filter_children(&children, None, None).len(), 3);
        assert_eq!(filter_children(&children, Some(AgeBand::Age3To4), None).len(), 2);

        let own_class = filter_children(&children, Some(AgeBand::Age3To4), Some("Mầm 1"));
        assert_eq!(own_class.len(), 1);
        assert_eq!(own_class[0].name, "An");
    }
}
