use jobscout_protocol::{parse_ctc_range, parse_exp_range, CtcRange, ExpRange, JobRecord, SearchParams};

/// Metro aliases that expand to their component-city substrings. A filter
/// location matching an alias admits a job located in any component city.
const METRO_ALIASES: &[(&str, &[&str])] = &[
    ("delhi ncr", &["delhi", "gurgaon", "gurugram", "noida", "ghaziabad", "faridabad"]),
    ("ncr", &["delhi", "gurgaon", "gurugram", "noida", "ghaziabad", "faridabad"]),
    ("bangalore", &["bangalore", "bengaluru"]),
    ("bengaluru", &["bangalore", "bengaluru"]),
    ("mumbai", &["mumbai", "navi mumbai", "thane"]),
];

fn expand_location(raw: &str) -> Vec<String> {
    let normalized = raw.trim().to_lowercase();
    for (alias, cities) in METRO_ALIASES {
        if normalized == *alias {
            return cities.iter().map(|c| c.to_string()).collect();
        }
    }
    vec![normalized]
}

/// Hard structural filters applied to every candidate; all groups must pass,
/// entries within a group OR together. Unparseable range strings are
/// skipped, never fatal.
#[derive(Debug, Clone)]
pub struct StructuralFilters {
    country: String,
    location_terms: Vec<String>,
    experience: Vec<ExpRange>,
    ctc: Vec<CtcRange>,
    skills: Vec<String>,
    portals: Vec<String>,
}

impl StructuralFilters {
    pub fn from_params(params: &SearchParams) -> Self {
        let location_terms = params
            .locations
            .iter()
            .flat_map(|loc| expand_location(loc))
            .collect();

        Self {
            country: params.country.trim().to_lowercase(),
            location_terms,
            experience: params
                .experience
                .iter()
                .filter_map(|raw| parse_exp_range(raw))
                .collect(),
            ctc: params.ctc.iter().filter_map(|raw| parse_ctc_range(raw)).collect(),
            skills: params.skills.iter().map(|s| s.to_lowercase()).collect(),
            portals: params.portals.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    /// Country constraint, exposed so the dense index can pre-filter
    /// before similarity ranking.
    pub fn country(&self) -> Option<&str> {
        if self.country.is_empty() {
            None
        } else {
            Some(&self.country)
        }
    }

    /// All-groups admission check for one candidate.
    pub fn admits(&self, job: &JobRecord) -> bool {
        self.admits_country(job)
            && self.admits_location(job)
            && self.admits_experience(job)
            && self.admits_ctc(job)
            && self.admits_skills(job)
            && self.admits_portal(job)
    }

    fn admits_country(&self, job: &JobRecord) -> bool {
        self.country.is_empty() || job.country.trim().to_lowercase() == self.country
    }

    fn admits_location(&self, job: &JobRecord) -> bool {
        if self.location_terms.is_empty() {
            return true;
        }
        let location = job.location.to_lowercase();
        self.location_terms.iter().any(|term| location.contains(term.as_str()))
    }

    fn admits_experience(&self, job: &JobRecord) -> bool {
        if self.experience.is_empty() {
            return true;
        }
        self.experience
            .iter()
            .any(|range| range.admits(job.experience_min, job.experience_max))
    }

    fn admits_ctc(&self, job: &JobRecord) -> bool {
        if self.ctc.is_empty() {
            return true;
        }
        self.ctc.iter().any(|range| range.admits(job.ctc_min, job.ctc_max))
    }

    fn admits_skills(&self, job: &JobRecord) -> bool {
        if self.skills.is_empty() {
            return true;
        }
        let haystack = format!("{} {}", job.title, job.description).to_lowercase();
        self.skills.iter().any(|skill| haystack.contains(skill.as_str()))
    }

    fn admits_portal(&self, job: &JobRecord) -> bool {
        if self.portals.is_empty() {
            return true;
        }
        let source = job.source.to_lowercase();
        self.portals.iter().any(|portal| source.contains(portal.as_str()))
    }
}
