//! Text normalization shared by the seal extractors.

use super::patterns::{NORMALIZE_DISALLOWED, WHITESPACE_RUN};

/// Normalize raw OCR text for label-adjacency matching.
///
/// Every character outside word characters, accented Latin letters,
/// whitespace, `:`, `.` and `-` becomes a space, then whitespace runs collapse
/// to a single space and the ends are trimmed. Stripping happens before
/// collapsing so the result is a fixed point: `normalize(normalize(x)) ==
/// normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let allowed = NORMALIZE_DISALLOWED.replace_all(raw, " ");
    WHITESPACE_RUN.replace_all(&allowed, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_and_strips() {
        assert_eq!(
            normalize("  EMOL.:  R$ 50,73\n\tISS:  R$ 1,42  "),
            "EMOL.: R 50 73 ISS: R 1 42"
        );
    }

    #[test]
    fn test_preserves_diacritics() {
        assert_eq!(
            normalize("CÓDIGO DE SEGURANÇA: 0471.1314.0274.7824"),
            "CÓDIGO DE SEGURANÇA: 0471.1314.0274.7824"
        );
        assert_eq!(normalize("Praticado(s) por: JOÃO"), "Praticado s por: JOÃO");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            "R$ 1.234,56 | Total: (x) ",
            "SELO DE CONSULTA:\r\n ABC12345 \u{a0}@@ fim",
            "\u{0}\u{1}\u{fffd}garbage\u{fffd}",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
        assert_eq!(normalize("$$$ ### ***"), "");
    }
}
