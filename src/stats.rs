/// Contribution counters for one GitHub user, as reported by a single
/// GraphQL query. Built once per run and never mutated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsRecord {
    pub total_stars: u64,
    pub total_commits: u64,
    pub total_prs: u64,
    pub total_issues: u64,
    pub contributed_to: u64,
    pub year_contributions: u64,
    pub pr_contributions: u64,
    pub issue_contributions: u64,
}

impl StatsRecord {
    /// Label/value pairs shown in the left column of the card, top to bottom.
    pub fn card_rows(&self) -> [(&'static str, u64); 5] {
        [
            ("Total Stars:", self.total_stars),
            ("Total Commits:", self.total_commits),
            ("Total PRs:", self.total_prs),
            ("Total Issues:", self.total_issues),
            ("Contributed to:", self.contributed_to),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_rows_follow_display_order() {
        let stats = StatsRecord {
            total_stars: 1,
            total_commits: 2,
            total_prs: 3,
            total_issues: 4,
            contributed_to: 5,
            year_contributions: 6,
            pr_contributions: 7,
            issue_contributions: 8,
        };

        let rows = stats.card_rows();
        let values: Vec<u64> = rows.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
        assert_eq!(rows[0].0, "Total Stars:");
        assert_eq!(rows[4].0, "Contributed to:");
    }
}
