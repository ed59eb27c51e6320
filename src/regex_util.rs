//! Lazily compiled static regex patterns.
//!
//! Every pattern literal in the crate goes through [`static_regex!`] so an
//! invalid pattern panics with the pattern text on first use instead of a
//! bare `.unwrap()`.

/// Declare a module-private function returning `&'static regex::Regex`,
/// backed by a `std::sync::OnceLock`. The calling module must have
/// `use regex::Regex;` in scope.
///
/// ```ignore
/// use regex::Regex;
/// use crate::regex_util::static_regex;
///
/// static_regex!(fn int_pattern, r"^[+-]?\d+$");
/// assert!(int_pattern().is_match("-17"));
/// ```
macro_rules! static_regex {
    (fn $fname:ident, $pattern:expr) => {
        fn $fname() -> &'static Regex {
            static STORE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
            STORE.get_or_init(|| {
                Regex::new($pattern).expect(concat!("BUG: invalid static regex: ", $pattern))
            })
        }
    };
}
pub(crate) use static_regex;
