// Itinerary text parsing and budget reconciliation
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::money::parse_amount;

/// Computed and declared totals may drift by rounding in the generated text;
/// anything beyond one whole unit is surfaced as a discrepancy.
pub const BUDGET_TOLERANCE: f64 = 1.0;

/// One parsed day block. Immutable once produced; owned by the result's
/// `days` sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day_number: u32,
    pub title: String,
    pub summary: String,
    pub estimated_budget: f64,
    pub cultural_detail: String,
}

/// Advisory raised when the total stated in the text disagrees with the sum
/// of the per-day budgets. The computed value stays authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetDiscrepancy {
    pub computed: f64,
    pub declared: f64,
}

/// Recoverable problem encountered while processing one day block, keyed by
/// the block's position in the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub day_index: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryResult {
    /// Day records in source order; day numbers are not guaranteed strictly
    /// increasing or contiguous.
    pub days: Vec<DayRecord>,
    /// Sum of `estimated_budget` over `days`, always recomputed from scratch
    /// and never read from the text.
    pub computed_total: f64,
    /// Total explicitly stated in the source text, if any. Advisory only.
    pub declared_total: Option<f64>,
    pub discrepancy: Option<BudgetDiscrepancy>,
    pub warnings: Vec<ParseWarning>,
    /// The input text, preserved verbatim. Render this directly when no day
    /// markers were found.
    pub raw_text: String,
}

impl ItineraryResult {
    /// False means the input carried no day markers and `raw_text` should be
    /// rendered as-is.
    pub fn is_structured(&self) -> bool {
        !self.days.is_empty()
    }
}

// Budget label extraction outcome. Missing and unparsable both default to
// zero; only unparsable tokens are surfaced as warnings.
enum BudgetField {
    Value(f64),
    Missing,
    Unparsable(String),
}

struct DayMarker {
    number: String,
    title: String,
    start: usize,
    body_start: usize,
}

/// Converts loosely structured generated itinerary text into day records
/// plus a reconciled budget total. `parse` never fails: malformed input
/// degrades to defaults and warnings, never to an error.
pub struct ItineraryParser {
    day_marker: Regex,
    summary_label: Regex,
    budget_label: Regex,
    cultural_label: Regex,
    declared_total_label: Regex,
    amount_token: Regex,
}

impl ItineraryParser {
    pub fn new() -> Self {
        Self {
            // [^\r\n]* instead of a $ anchor so CRLF input behaves like LF.
            day_marker: Regex::new(r"(?im)^[ \t]*day[ \t]+(\d+)[ \t]*:[ \t]*(\S[^\r\n]*)")
                .expect("day marker pattern is valid"),
            summary_label: Regex::new(r"(?im)^[ \t]*summary:[ \t]*([^\r\n]*)")
                .expect("summary pattern is valid"),
            budget_label: Regex::new(r"(?im)^[ \t]*estimated budget:[ \t]*([^\r\n]*)")
                .expect("budget pattern is valid"),
            cultural_label: Regex::new(r"(?ims)^[ \t]*historical/cultural detail:[ \t]*(.*)")
                .expect("cultural detail pattern is valid"),
            declared_total_label: Regex::new(r"(?im)^[ \t]*total estimated budget:[ \t]*([^\r\n]*)")
                .expect("declared total pattern is valid"),
            amount_token: Regex::new(r"[0-9][0-9.,]*").expect("amount token pattern is valid"),
        }
    }

    /// Parses raw generated text into structured day records and reconciles
    /// the budget total. Fewer than one day marker yields an unstructured
    /// result: empty `days`, input preserved in `raw_text`.
    pub fn parse(&self, raw_text: &str) -> ItineraryResult {
        let mut result = ItineraryResult {
            days: Vec::new(),
            computed_total: 0.0,
            declared_total: None,
            discrepancy: None,
            warnings: Vec::new(),
            raw_text: raw_text.to_string(),
        };

        let markers = self.find_markers(raw_text);
        if markers.is_empty() {
            tracing::warn!("no day markers found; treating input as unstructured text");
            return result;
        }

        for (index, marker) in markers.iter().enumerate() {
            let body_end = markers
                .get(index + 1)
                .map_or(raw_text.len(), |next| next.start);
            let body = &raw_text[marker.body_start..body_end];

            let day_number = match marker.number.parse::<u32>() {
                Ok(number) if number > 0 => number,
                _ => {
                    let message = format!(
                        "day block {} carries an invalid day number '{}'; block skipped",
                        index, marker.number
                    );
                    tracing::warn!(day_index = index, "{}", message);
                    result.warnings.push(ParseWarning {
                        day_index: index,
                        message,
                    });
                    continue;
                }
            };

            let summary = self.extract_summary(body);
            let estimated_budget = match self.extract_budget(body) {
                BudgetField::Value(value) => value,
                BudgetField::Missing => 0.0,
                BudgetField::Unparsable(token) => {
                    let message = format!(
                        "day {} has an unparsable budget token '{}'; defaulting to 0.0",
                        day_number, token
                    );
                    tracing::warn!(day_index = index, "{}", message);
                    result.warnings.push(ParseWarning {
                        day_index: index,
                        message,
                    });
                    0.0
                }
            };
            let cultural_detail = self.extract_cultural_detail(body);

            result.computed_total += estimated_budget;
            result.days.push(DayRecord {
                day_number,
                title: marker.title.clone(),
                summary,
                estimated_budget,
                cultural_detail,
            });
        }

        result.declared_total = self.extract_declared_total(raw_text);
        if let Some(declared) = result.declared_total {
            if (declared - result.computed_total).abs() > BUDGET_TOLERANCE {
                tracing::warn!(
                    computed = result.computed_total,
                    declared,
                    "declared total disagrees with computed total"
                );
                result.discrepancy = Some(BudgetDiscrepancy {
                    computed: result.computed_total,
                    declared,
                });
            }
        }

        result
    }

    fn find_markers(&self, raw_text: &str) -> Vec<DayMarker> {
        self.day_marker
            .captures_iter(raw_text)
            .map(|cap| {
                let whole = cap.get(0).expect("group 0 always participates");
                DayMarker {
                    number: cap[1].to_string(),
                    title: cap[2].trim().to_string(),
                    start: whole.start(),
                    body_start: whole.end(),
                }
            })
            .collect()
    }

    fn extract_summary(&self, body: &str) -> String {
        match self.summary_label.captures(body) {
            Some(cap) => cap[1].trim().to_string(),
            None => String::new(),
        }
    }

    fn extract_budget(&self, body: &str) -> BudgetField {
        let remainder = match self.budget_label.captures(body) {
            Some(cap) => cap[1].trim().to_string(),
            None => return BudgetField::Missing,
        };
        let parsed = self
            .amount_token
            .find(&remainder)
            .and_then(|token| parse_amount(token.as_str()));
        match parsed {
            Some(value) => BudgetField::Value(value),
            None => BudgetField::Unparsable(remainder),
        }
    }

    // Multi-line capture: everything after the label up to the end of the
    // day body (the body already ends at the next marker).
    fn extract_cultural_detail(&self, body: &str) -> String {
        match self.cultural_label.captures(body) {
            Some(cap) => cap[1].trim().to_string(),
            None => String::new(),
        }
    }

    fn extract_declared_total(&self, raw_text: &str) -> Option<f64> {
        let cap = self.declared_total_label.captures(raw_text)?;
        let remainder = cap[1].trim().to_string();
        self.amount_token
            .find(&remainder)
            .and_then(|token| parse_amount(token.as_str()))
    }
}

// Sample file path (the actual file is stored in the samples directory)
pub const SAMPLE_ITINERARY_PATH: &str = "samples/itinerary_sample.txt";

// Helper to load the sample itinerary text
pub fn load_sample_itinerary() -> std::io::Result<String> {
    std::fs::read_to_string(SAMPLE_ITINERARY_PATH)
}

// A small sample for inline testing
pub const SMALL_SAMPLE_ITINERARY: &str = "\
Day 1: Walk through the old town
Summary: Guided walk past the cathedral and the market square
Estimated budget: 100
Historical/cultural detail: The old town kept its medieval street plan
through two reconstructions.
Day 2: Beach and coastal villages
Summary: Morning at the beach, afternoon drive along the coast
Estimated budget: 50,5
Historical/cultural detail: The coastal villages grew around tuna fishing.
Total estimated budget: 150,50
";

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ItineraryResult {
        ItineraryParser::new().parse(text)
    }

    #[test]
    fn test_parse_small_sample() {
        let result = parse(SMALL_SAMPLE_ITINERARY);

        assert!(result.is_structured());
        assert_eq!(result.days.len(), 2);

        let first = &result.days[0];
        assert_eq!(first.day_number, 1);
        assert_eq!(first.title, "Walk through the old town");
        assert_eq!(
            first.summary,
            "Guided walk past the cathedral and the market square"
        );
        assert_eq!(first.estimated_budget, 100.0);
        assert!(first.cultural_detail.starts_with("The old town"));
        assert!(first.cultural_detail.ends_with("reconstructions."));

        let second = &result.days[1];
        assert_eq!(second.day_number, 2);
        assert_eq!(second.estimated_budget, 50.5);
        // The trailing total line belongs to the last day's body and stays
        // inside its multi-line cultural detail capture.
        assert!(second
            .cultural_detail
            .starts_with("The coastal villages grew around tuna fishing."));

        assert_eq!(result.computed_total, 150.5);
        assert_eq!(result.declared_total, Some(150.5));
        assert!(result.discrepancy.is_none());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_two_block_end_to_end_example() {
        let input = "Day 1: Walk\nSummary: nice walk\nEstimated budget: 100\n\
                     Historical/cultural detail: old town\nDay 2: Beach\nSummary: relax\n\
                     Estimated budget: 50,5\nHistorical/cultural detail: coast";
        let result = parse(input);

        assert_eq!(result.days.len(), 2);
        assert_eq!(result.days[0].estimated_budget, 100.0);
        assert_eq!(result.days[1].estimated_budget, 50.5);
        assert_eq!(result.computed_total, 150.5);
        assert_eq!(result.declared_total, None);
    }

    #[test]
    fn test_unstructured_input_is_preserved_verbatim() {
        let input = "We could not produce an itinerary for this request.\nTry again later.";
        let result = parse(input);

        assert!(!result.is_structured());
        assert!(result.days.is_empty());
        assert_eq!(result.raw_text, input);
        assert_eq!(result.computed_total, 0.0);
        assert_eq!(result.declared_total, None);
    }

    #[test]
    fn test_missing_summary_defaults_to_empty() {
        let input = "Day 1: Museum morning\n\
                     Estimated budget: 30\n\
                     Historical/cultural detail: Opened in 1884.\n\
                     Day 2: Market visit\n\
                     Summary: Browse the stalls\n\
                     Estimated budget: 10";
        let result = parse(input);

        assert_eq!(result.days.len(), 2);
        assert_eq!(result.days[0].summary, "");
        assert_eq!(result.days[0].estimated_budget, 30.0);
        assert_eq!(result.days[0].cultural_detail, "Opened in 1884.");
        // The malformed first day does not affect its neighbour.
        assert_eq!(result.days[1].summary, "Browse the stalls");
        assert_eq!(result.computed_total, 40.0);
    }

    #[test]
    fn test_unparsable_budget_defaults_to_zero_with_warning() {
        let input = "Day 1: Free walking day\n\
                     Summary: No planned spending\n\
                     Estimated budget: depends on souvenirs\n\
                     Day 2: Boat trip\n\
                     Estimated budget: 75";
        let result = parse(input);

        assert_eq!(result.days.len(), 2);
        assert_eq!(result.days[0].estimated_budget, 0.0);
        assert_eq!(result.days[1].estimated_budget, 75.0);
        assert_eq!(result.computed_total, 75.0);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].day_index, 0);
        assert!(result.warnings[0].message.contains("souvenirs"));
    }

    #[test]
    fn test_missing_budget_is_a_quiet_default() {
        let input = "Day 1: Rest day\nSummary: Sleep in";
        let result = parse(input);

        assert_eq!(result.days[0].estimated_budget, 0.0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_day_numbers_keep_source_order() {
        let input = "Day 3: Third first\nEstimated budget: 1\n\
                     Day 1: Then the first\nEstimated budget: 2\n\
                     Day 7: And a gap\nEstimated budget: 3";
        let result = parse(input);

        let numbers: Vec<u32> = result.days.iter().map(|d| d.day_number).collect();
        assert_eq!(numbers, vec![3, 1, 7]);
        assert_eq!(result.computed_total, 6.0);
    }

    #[test]
    fn test_invalid_day_number_is_skipped_with_warning() {
        let input = "Day 1: Fine day\nEstimated budget: 20\n\
                     Day 0: Broken ordinal\nEstimated budget: 999\n\
                     Day 99999999999: Overflowing ordinal\nEstimated budget: 999\n\
                     Day 2: Another fine day\nEstimated budget: 30";
        let result = parse(input);

        assert_eq!(result.days.len(), 2);
        assert_eq!(result.days[0].day_number, 1);
        assert_eq!(result.days[1].day_number, 2);
        // Skipped blocks never contribute to the total.
        assert_eq!(result.computed_total, 50.0);
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.warnings[0].day_index, 1);
        assert_eq!(result.warnings[1].day_index, 2);
    }

    #[test]
    fn test_markers_are_case_insensitive() {
        let input = "DAY 1: Shouting\nEstimated budget: 5\nday 2: whispering\nestimated budget: 7";
        let result = parse(input);

        assert_eq!(result.days.len(), 2);
        assert_eq!(result.computed_total, 12.0);
    }

    #[test]
    fn test_cultural_detail_is_multiline_and_stops_at_next_marker() {
        let input = "Day 1: Cathedral quarter\n\
                     Historical/cultural detail: Construction started in 1248.\n\
                     It halted for three centuries before completion.\n\
                     Day 2: River walk\n\
                     Historical/cultural detail: The quays are 19th century.";
        let result = parse(input);

        assert_eq!(result.days.len(), 2);
        assert!(result.days[0]
            .cultural_detail
            .contains("halted for three centuries"));
        assert!(!result.days[0].cultural_detail.contains("River walk"));
        assert!(!result.days[0].cultural_detail.contains("19th century"));
        assert_eq!(result.days[1].cultural_detail, "The quays are 19th century.");
    }

    #[test]
    fn test_declared_total_within_tolerance_is_not_a_discrepancy() {
        let input = "Day 1: A\nEstimated budget: 100\nTotal estimated budget: 100,80";
        let result = parse(input);

        assert_eq!(result.computed_total, 100.0);
        assert_eq!(result.declared_total, Some(100.8));
        assert!(result.discrepancy.is_none());
    }

    #[test]
    fn test_declared_total_mismatch_surfaces_both_values() {
        let input = "Day 1: A\nEstimated budget: 100\n\
                     Day 2: B\nEstimated budget: 50\n\
                     Total estimated budget: 400";
        let result = parse(input);

        // The computed value stays authoritative; the declared value is
        // surfaced as an advisory, never silently picked.
        assert_eq!(result.computed_total, 150.0);
        assert_eq!(result.declared_total, Some(400.0));
        let discrepancy = result.discrepancy.expect("mismatch beyond tolerance");
        assert_eq!(discrepancy.computed, 150.0);
        assert_eq!(discrepancy.declared, 400.0);
    }

    #[test]
    fn test_total_label_does_not_leak_into_day_budget() {
        let input = "Day 1: Only day\nTotal estimated budget: 500";
        let result = parse(input);

        assert_eq!(result.days.len(), 1);
        assert_eq!(result.days[0].estimated_budget, 0.0);
        assert_eq!(result.computed_total, 0.0);
        assert_eq!(result.declared_total, Some(500.0));
    }

    #[test]
    fn test_load_sample_itinerary() {
        let text = load_sample_itinerary();
        assert!(
            text.is_ok(),
            "Failed to load sample itinerary: {:?}",
            text.err()
        );

        let result = parse(&text.unwrap());
        assert_eq!(result.days.len(), 3);
        assert_eq!(result.computed_total, 265.5);
        assert_eq!(result.declared_total, Some(265.5));
        assert!(result.discrepancy.is_none());
        assert!(result.warnings.is_empty());
    }
}
