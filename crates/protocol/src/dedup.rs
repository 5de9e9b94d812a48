use crate::types::JobRecord;
use std::collections::HashSet;

/// Collapse duplicate listings, order-preserving, first-seen wins.
///
/// Primary identity is a non-empty `apply_link`; secondary identity is the
/// `(title, company)` pair, case- and whitespace-insensitive. Applied twice
/// in the pipeline: over every freshly scraped batch before it is persisted,
/// and again over the final assembled response.
pub fn dedup_records(records: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut seen_links: HashSet<String> = HashSet::new();
    let mut seen_pairs: HashSet<(String, String)> = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());

    for record in records {
        let link = record.apply_link.trim().to_lowercase();
        let pair = (
            record.title.trim().to_lowercase(),
            record.company.trim().to_lowercase(),
        );

        if !link.is_empty() {
            if seen_links.contains(&link) || seen_pairs.contains(&pair) {
                continue;
            }
            seen_links.insert(link);
        } else if seen_pairs.contains(&pair) {
            continue;
        }

        seen_pairs.insert(pair);
        unique.push(record);
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn job(title: &str, company: &str, link: &str) -> JobRecord {
        JobRecord {
            id: crate::job_identity(link, title),
            title: title.to_string(),
            company: company.to_string(),
            location: "Bangalore".to_string(),
            country: "India".to_string(),
            experience_min: 0,
            experience_max: 0,
            ctc_min: None,
            ctc_max: None,
            skills: vec![],
            posted_at: None,
            apply_link: link.to_string(),
            source: "Naukri".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn collapses_by_apply_link() {
        let records = vec![
            job("Python Developer", "Acme", "https://a.example/1"),
            job("Python Dev (repost)", "Acme Corp", "https://a.example/1"),
        ];
        let unique = dedup_records(records);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].title, "Python Developer");
    }

    #[test]
    fn collapses_by_title_company_when_links_differ() {
        let records = vec![
            job("Python Developer", "Acme", "https://a.example/1"),
            job("  python developer ", "ACME", "https://mirror.example/77"),
        ];
        let unique = dedup_records(records);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].apply_link, "https://a.example/1");
    }

    #[test]
    fn empty_links_fall_back_to_pair_identity() {
        let records = vec![
            job("Data Engineer", "Beta", ""),
            job("Data Engineer", "Beta", ""),
            job("Data Engineer", "Gamma", ""),
        ];
        let unique = dedup_records(records);
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn dedup_is_idempotent() {
        let records = vec![
            job("A", "X", "https://a.example/1"),
            job("A", "X", "https://a.example/1"),
            job("B", "Y", ""),
            job("B", "Y", ""),
        ];
        let once = dedup_records(records);
        let twice = dedup_records(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn preserves_first_seen_order() {
        let records = vec![
            job("C", "Z", "https://a.example/3"),
            job("A", "X", "https://a.example/1"),
            job("B", "Y", "https://a.example/2"),
            job("A", "X", "https://a.example/1"),
        ];
        let unique = dedup_records(records);
        let titles: Vec<&str> = unique.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }
}
