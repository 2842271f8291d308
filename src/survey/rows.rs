//! Typed rows for the two survey sheets.

use super::columns::{answer_column, sheet_reference};
use super::SurveyRow;
use crate::stimuli::word_order::OrderItem;
use crate::stimuli::Phrase;
use crate::store::Cell;

pub const CAN_BOTH_BE_RIGHT: &str = "They can both be right.";
pub const ONE_MUST_BE_WRONG: &str = "One of them must be wrong.";
pub const WORD_ORDER_QUESTION: &str = "Please select on the scale which word order you prefer.";

/// One multiple-choice faultless-disagreement question with tally formulas
#[derive(Debug, Clone, PartialEq)]
pub struct FaultlessRow {
    pub phrase: Phrase,
    /// Worksheet the form writes responses into
    pub answers_worksheet: String,
}

impl FaultlessRow {
    pub fn new(phrase: Phrase, answers_worksheet: impl Into<String>) -> Self {
        Self {
            phrase,
            answers_worksheet: answers_worksheet.into(),
        }
    }

    fn count_formula(&self, index: usize, option: &str) -> String {
        let col = answer_column(index);
        format!(
            "=COUNTIF({}!{}:{}, \"{}\")",
            sheet_reference(&self.answers_worksheet),
            col,
            col,
            option
        )
    }
}

impl SurveyRow for FaultlessRow {
    fn header() -> &'static [&'static str] {
        &[
            "question_type",
            "phrase",
            "option_1",
            "option_2",
            "required",
            "category",
            "type",
            "yes",
            "no",
            "total",
            "percent_yes",
        ]
    }

    fn cells(&self, index: usize) -> Vec<Cell> {
        // yes/no/total live in H/I/J; row 1 is the header
        let row = index + 2;
        vec![
            Cell::text("multiple choice"),
            Cell::text(&self.phrase.text),
            Cell::text(CAN_BOTH_BE_RIGHT),
            Cell::text(ONE_MUST_BE_WRONG),
            Cell::Bool(true),
            Cell::text(&self.phrase.category),
            Cell::text(&self.phrase.kind),
            Cell::text(self.count_formula(index, CAN_BOTH_BE_RIGHT)),
            Cell::text(self.count_formula(index, ONE_MUST_BE_WRONG)),
            Cell::text(format!("=SUM(H{},I{})", row, row)),
            Cell::text(format!("=H{}/J{}", row, row)),
        ]
    }
}

/// One 1–5 scale question comparing two adjective orders
#[derive(Debug, Clone, PartialEq)]
pub struct WordOrderRow {
    pub item: OrderItem,
}

impl WordOrderRow {
    pub fn new(item: OrderItem) -> Self {
        Self { item }
    }
}

impl SurveyRow for WordOrderRow {
    fn header() -> &'static [&'static str] {
        &["question", "type", "required", "start", "end"]
    }

    fn cells(&self, _index: usize) -> Vec<Cell> {
        vec![
            Cell::text(WORD_ORDER_QUESTION),
            Cell::text("scale"),
            Cell::Bool(true),
            Cell::text(self.item.scale_spec()),
            Cell::Empty,
        ]
    }
}
