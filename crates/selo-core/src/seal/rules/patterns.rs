//! Common regex patterns for seal text cleanup and extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Normalization
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    pub static ref NORMALIZE_DISALLOWED: Regex = Regex::new(
        r"[^\w\sÀ-ÿ:.\-]"
    ).unwrap();

    // Seal labels that end a performer name on single-line OCR
    pub static ref NAME_NEXT_LABEL: Regex = Regex::new(
        r"(?i)\s(?:Emol\b|Tx\.?\s*Judic|C[óo]digo\s+de\b|Quantidade\b|Selo\s+de\b|ISSQN\b|ISS\b|Total\s*:|R\$|https?:)"
    ).unwrap();

    // Performer name cleanup, applied to the end of the name only
    pub static ref NAME_LOWERCASE_SUFFIX: Regex = Regex::new(
        r"\s*-\s*[a-z][a-z\s]*$"
    ).unwrap();

    pub static ref NAME_SHORT_WORD_RUN: Regex = Regex::new(
        r"\s+[a-z]{1,3}(?:\s+[a-z]{1,3})*\s*$"
    ).unwrap();

    pub static ref NAME_TRAILING_DIGITS: Regex = Regex::new(
        r"(?:\s+\d+)+\s*$"
    ).unwrap();

    pub static ref NAME_DISALLOWED: Regex = Regex::new(
        r"[^\w\sÀ-ÿ\-.]"
    ).unwrap();

    // Act codes: any "digits(code)" group on one line whose code starts with a digit
    pub static ref ANY_CODE_GROUP: Regex = Regex::new(
        r"\d+[ \t]*\([ \t]*(\d[^)\n]*?)[ \t]*\)"
    ).unwrap();

    // Bare "R$ amount" figures (Brazilian format: 1.234,56 or 50,73)
    pub static ref BARE_AMOUNT: Regex = Regex::new(
        r"R\$\s*(\d{1,3}(?:\.\d{3})+,\d{2}|\d+(?:[,.]\d{2})?)"
    ).unwrap();

    // Well-formed Brazilian amounts
    pub static ref BRL_THOUSANDS: Regex = Regex::new(
        r"^\d{1,3}(?:\.\d{3})+$"
    ).unwrap();
}
