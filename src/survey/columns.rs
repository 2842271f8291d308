//! Spreadsheet column letters.

/// Zero-based column index to letters: 0 → A, 25 → Z, 26 → AA, 52 → BA.
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Column of the answer sheet holding responses to question `question_index`.
///
/// Column A of a form's answer sheet is the submission timestamp, so the
/// first question lands in B.
pub fn answer_column(question_index: usize) -> String {
    column_letter(question_index + 1)
}

/// Sheet reference for a formula, quoted when the title needs it
pub fn sheet_reference(worksheet: &str) -> String {
    if worksheet.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        worksheet.to_string()
    } else {
        format!("'{}'", worksheet.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter_overflow() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(51), "AZ");
        assert_eq!(column_letter(52), "BA");
        assert_eq!(column_letter(77), "BZ");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_answer_column_skips_timestamp() {
        assert_eq!(answer_column(0), "B");
        assert_eq!(answer_column(24), "Z");
        assert_eq!(answer_column(25), "AA");
        assert_eq!(answer_column(44), "AT");
    }

    #[test]
    fn test_sheet_reference() {
        assert_eq!(sheet_reference("Faultless_Disagreement_Answers"), "Faultless_Disagreement_Answers");
        assert_eq!(sheet_reference("Form Responses 1"), "'Form Responses 1'");
    }
}
