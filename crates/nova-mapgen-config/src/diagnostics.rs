use serde::de::DeserializeOwned;

use crate::OptionsScope;

/// Diagnostics produced while loading a generator config.
///
/// Loading is "best effort": callers always get a `GeneratorConfig` when deserialization
/// succeeds, plus a set of diagnostics describing issues that may impact generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    /// Keys present in the input TOML that were not recognized, as dotted paths (for example
    /// `defaults.null_value_check_strategyy`).
    pub unknown_keys: Vec<String>,
    pub warnings: Vec<ConfigWarning>,
}

impl ConfigDiagnostics {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unknown_keys.is_empty() && self.warnings.is_empty()
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `logging.level` is neither a level nor a valid `EnvFilter` directive string.
    LoggingLevelInvalid { value: String, directives: String },
    /// An implementation name without the class-name placeholder makes every mapper in the
    /// compilation unit share one implementation class name.
    ImplementationNameWithoutPlaceholder { value: String },
    /// A key no config section declares. `suggestion` is the closest known key of the same
    /// section, if one is close enough to be a likely typo.
    UnknownOption {
        key: String,
        suggestion: Option<String>,
    },
}

const ROOT_KEYS: &[&str] = &["defaults", "logging", "suppress_generator_timestamp", "verbose"];
const LOGGING_KEYS: &[&str] = &["level", "json"];

/// Largest edit distance still reported as a likely typo.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Deserialize `text`, collecting the dotted path of every key the target type ignored.
pub(crate) fn parse_toml<T: DeserializeOwned>(
    text: &str,
) -> Result<(T, Vec<String>), toml::de::Error> {
    let mut unknown = Vec::<String>::new();
    let deserializer = toml::de::Deserializer::new(text);
    let value = serde_ignored::deserialize(deserializer, |path| {
        // Root paths render with a leading `.`.
        unknown.push(path.to_string().trim_start_matches('.').to_owned());
    })?;
    unknown.sort();
    unknown.dedup();
    Ok((value, unknown))
}

pub(crate) fn unknown_option_warnings(unknown_keys: &[String]) -> Vec<ConfigWarning> {
    unknown_keys
        .iter()
        .map(|key| ConfigWarning::UnknownOption {
            key: key.clone(),
            suggestion: suggest(key),
        })
        .collect()
}

fn suggest(key: &str) -> Option<String> {
    let (section, name, known) = match key.split_once('.') {
        None => ("", key, ROOT_KEYS),
        Some(("defaults", name)) => ("defaults.", name, OptionsScope::KEYS),
        Some(("logging", name)) => ("logging.", name, LOGGING_KEYS),
        Some(_) => return None,
    };
    known
        .iter()
        .map(|candidate| (levenshtein(name, candidate), *candidate))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| format!("{section}{candidate}"))
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
