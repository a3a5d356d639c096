// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lowering configuration.

/// Environment variable that turns on debug dumps of failed declarations.
pub const DEBUG_ENV: &str = "STANZA_DEBUG";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LowerOptions {
    /// Attach a full dump of the declaration to every construction failure.
    pub debug: bool,
}

impl LowerOptions {
    /// Load options from the environment.
    ///
    /// Reads `STANZA_DEBUG`; any value other than empty, `0` or `false`
    /// enables debug dumps.
    pub fn from_env() -> Self {
        let debug = std::env::var(DEBUG_ENV)
            .map(|v| is_truthy(&v))
            .unwrap_or(false);
        LowerOptions { debug }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_quiet() {
        assert!(!LowerOptions::default().debug);
        assert!(LowerOptions::default().with_debug(true).debug);
    }

    #[test]
    fn truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy("yes"));
        assert!(is_truthy(" TRUE "));
        assert!(!is_truthy(""));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("False"));
    }

    #[test]
    fn from_env_reads_debug_switch() {
        std::env::set_var(DEBUG_ENV, "1");
        assert!(LowerOptions::from_env().debug);

        std::env::set_var(DEBUG_ENV, "0");
        assert!(!LowerOptions::from_env().debug);

        std::env::remove_var(DEBUG_ENV);
        assert_eq!(LowerOptions::from_env(), LowerOptions::default());
    }
}
