//! Human-readable rendering of suites, checklists, results and details.
//!
//! Every renderer returns a `String` so the commands decide where it goes.

use comfy_table::{presets, Cell, ContentArrangement, Table};
use std::collections::BTreeSet;

use crate::core::{Bucket, CandidateList, Namespace, TestSuite};
use crate::detail::{input_test_case_labels, CandidateDetail, CoexistRow, ExclusiveRow};
use crate::filter::{FilterView, NamespaceView};
use crate::formatting::{ColoredFormatter, FormattingConfig, OutputFormatter};
use crate::search::SearchChecklist;

pub struct TerminalWriter {
    formatter: ColoredFormatter,
    preset: &'static str,
}

impl TerminalWriter {
    pub fn new(config: FormattingConfig) -> Self {
        Self {
            formatter: ColoredFormatter::new(config),
            preset: if config.ascii {
                presets::ASCII_FULL
            } else {
                presets::UTF8_FULL
            },
        }
    }

    pub fn formatter(&self) -> &ColoredFormatter {
        &self.formatter
    }

    fn table(&self, header: &[&str]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(self.preset)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header.iter().map(|h| Cell::new(h)));
        table
    }

    fn section(&self, out: &mut String, title: &str) {
        out.push('\n');
        out.push_str(&self.formatter.header(title));
        out.push('\n');
    }

    /// Name, description and test cases of the uploaded report.
    pub fn input_info(&self, suite: &TestSuite) -> String {
        let labels = input_test_case_labels(suite);
        let mut table = self.table(&["Field", "Value"]);
        table.add_row(vec!["Name".to_string(), suite.name.clone()]);
        if let Some(description) = &suite.description {
            table.add_row(vec!["Description".to_string(), description.clone()]);
        }
        if !suite.keywords.is_empty() {
            table.add_row(vec!["Keywords".to_string(), suite.keywords.join(", ")]);
        }
        table.add_row(vec![
            "Number of test cases".to_string(),
            labels.len().to_string(),
        ]);
        table.add_row(vec!["Test cases".to_string(), labels.join("\n")]);

        let mut out = String::new();
        self.section(&mut out, "Input test suite");
        out.push_str(&table.to_string());
        out.push('\n');
        out
    }

    /// Attributes offered on the search form.
    pub fn checklist(&self, checklist: &SearchChecklist) -> String {
        let mut table = self.table(&["Test case", "Type", "Name", "Value"]);
        for (test_case, names) in &checklist.boolean {
            for name in names {
                table.add_row(vec![
                    test_case.as_str(),
                    Namespace::Boolean.as_str(),
                    name.as_str(),
                    "true",
                ]);
            }
        }
        for (test_case, names) in &checklist.string {
            for (name, value) in names {
                table.add_row(vec![
                    test_case.as_str(),
                    Namespace::String.as_str(),
                    name.as_str(),
                    value.as_str(),
                ]);
            }
        }

        let mut out = String::new();
        self.section(&mut out, "Search checklist");
        out.push_str(&table.to_string());
        out.push('\n');
        out
    }

    /// Ranked candidates that pass the selection, then the filter choices.
    pub fn results(&self, list: &CandidateList, view: &FilterView, top: Option<usize>) -> String {
        let mut table = self.table(&["#", "Name", "Score", "Download"]);
        let shown = top.unwrap_or(view.visible.len());
        for &index in view.visible.iter().take(shown) {
            let Some(candidate) = list.get(index) else {
                continue;
            };
            table.add_row(vec![
                Cell::new(index),
                Cell::new(&candidate.name),
                Cell::new(format_score(candidate.score)),
                Cell::new(self.formatter.mark(candidate.is_downloadable())),
            ]);
        }

        let mut out = String::new();
        self.section(&mut out, "Matching B2B suites");
        out.push_str(&format!(
            "{} of {} candidates{}\n",
            view.visible.len().min(shown),
            list.len(),
            list.top_score
                .map(|s| format!(" (top score {})", format_score(s)))
                .unwrap_or_default()
        ));
        if view.visible.is_empty() {
            out.push_str(&self.formatter.warning("No candidate matches the selected filters."));
            out.push('\n');
        } else {
            out.push_str(&table.to_string());
            out.push('\n');
        }

        for namespace in Namespace::ALL {
            out.push_str(&self.filter_choices(view.namespace(namespace)));
        }
        out
    }

    fn filter_choices(&self, view: &NamespaceView) -> String {
        let mut table = self.table(&["Test case", "Applied", "Selectable", "In every candidate"]);
        let test_cases: BTreeSet<&String> = view
            .choices
            .selectable
            .keys()
            .chain(view.choices.non_discriminating.keys())
            .collect();
        for test_case in test_cases {
            let applied: Vec<&str> = view
                .applied
                .get(test_case)
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect();
            let selectable: Vec<&str> = view
                .choices
                .selectable_for(test_case)
                .map(String::as_str)
                .collect();
            let fixed: Vec<&str> = view
                .choices
                .non_discriminating_for(test_case)
                .map(String::as_str)
                .collect();
            table.add_row(vec![
                test_case.clone(),
                self.formatter.bold(&applied.join(", ")),
                selectable.join(", "),
                self.formatter.dim(&fixed.join(", ")),
            ]);
        }

        let mut out = String::new();
        self.section(&mut out, &format!("{} filters", capitalize(view.namespace.as_str())));
        out.push_str(&table.to_string());
        out.push('\n');
        out
    }

    /// Candidate info followed by the four difference tables.
    pub fn detail(&self, detail: &CandidateDetail) -> String {
        let mut info = self.table(&["Field", "Value"]);
        info.add_row(vec!["Index".to_string(), detail.index.to_string()]);
        info.add_row(vec!["Name".to_string(), detail.name.clone()]);
        info.add_row(vec!["Score".to_string(), format_score(detail.score)]);
        info.add_row(vec![
            "Downloadable".to_string(),
            self.formatter.mark(detail.downloadable),
        ]);
        if let Some(link) = &detail.issue_link {
            info.add_row(vec!["Issue".to_string(), link.clone()]);
        }
        info.add_row(vec![
            "Number of test cases".to_string(),
            detail.test_case_labels.len().to_string(),
        ]);
        info.add_row(vec![
            "Test cases".to_string(),
            detail.test_case_labels.join("\n"),
        ]);

        let mut out = String::new();
        self.section(&mut out, "CI B2B test suite");
        out.push_str(&info.to_string());
        out.push('\n');

        let tables = &detail.tables;
        out.push_str(&self.coexist_table("Matched", Bucket::Match, &tables.matched));
        out.push_str(&self.coexist_table("Not matched", Bucket::Mismatch, &tables.mismatched));
        out.push_str(&self.exclusive_table("Only in STE", Bucket::OnlyInput, &tables.only_input));
        out.push_str(&self.exclusive_table(
            "Only in CI B2B",
            Bucket::OnlyCandidate,
            &tables.only_candidate,
        ));
        out
    }

    fn coexist_table(&self, title: &str, bucket: Bucket, rows: &[CoexistRow]) -> String {
        let mut table = self.table(&["Test case", "Name", "Data type", "STE", "B2B"]);
        for row in rows {
            table.add_row(vec![
                row.test_case.clone(),
                self.formatter.bucket(bucket, &row.name),
                row.namespace.to_string(),
                row.input.clone(),
                row.candidate.clone(),
            ]);
        }
        self.titled(title, rows.len(), table)
    }

    fn exclusive_table(&self, title: &str, bucket: Bucket, rows: &[ExclusiveRow]) -> String {
        let mut table = self.table(&["Test case", "Name", "Data type", "Value"]);
        for row in rows {
            table.add_row(vec![
                row.test_case.clone(),
                self.formatter.bucket(bucket, &row.name),
                row.namespace.to_string(),
                row.value.clone(),
            ]);
        }
        self.titled(title, rows.len(), table)
    }

    fn titled(&self, title: &str, count: usize, table: Table) -> String {
        let mut out = String::new();
        self.section(&mut out, &format!("{title} ({count})"));
        if count > 0 {
            out.push_str(&table.to_string());
            out.push('\n');
        }
        out
    }
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.2}")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
