/// Lowercases for keyword matching. Dotted capital `İ` folds to plain `i` so that
/// `İnternet` matches `internet`.
pub fn fold_case(text: &str) -> String {
    text.chars()
        .flat_map(|ch| match ch {
            'İ' => 'i'.to_lowercase(),
            other => other.to_lowercase(),
        })
        .collect()
}

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::{contains_any, fold_case};

    #[test]
    fn dotted_capital_i_folds_to_plain_i() {
        assert_eq!(fold_case("İnternet"), "internet");
        assert_eq!(fold_case("ŞİFREMİ UNUTTUM"), "şifremi unuttum");
        assert_eq!(fold_case("BYE"), "bye");
    }

    #[test]
    fn matches_any_needle() {
        assert!(contains_any("fatura bilgisi", &["paket", "fatura"]));
        assert!(!contains_any("hava durumu", &["paket", "fatura"]));
    }
}
