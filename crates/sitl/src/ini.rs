//! INI persistence for the parameter store.
//!
//! One section per mission, keys in lower case:
//!
//! ```ini
//! [plan20]
//! log = true
//! run = false
//! print = true
//! ```
//!
//! Section `plan20` and key `run` map to the parameter `PLAN20_RUN`.
//! A missing file is not an error: the store starts empty and the
//! missions seed their defaults, which [`save`] then writes back.

use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use rover_plan_core::parameters::{ParamName, ParamValue, ParameterStore};

use crate::error::SitlError;

/// Load `path` into a new store. A missing file yields an empty store.
pub fn load(path: &Path) -> Result<ParameterStore, SitlError> {
    match fs::read_to_string(path) {
        Ok(text) => {
            log::debug!("loading configuration from {}", path.display());
            parse(&text)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("no configuration at {}, using defaults", path.display());
            Ok(ParameterStore::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Parse INI text into a store (not marked dirty)
pub fn parse(text: &str) -> Result<ParameterStore, SitlError> {
    let mut store = ParameterStore::new();
    let mut section: Option<String> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let name = rest.strip_suffix(']').ok_or_else(|| SitlError::Config {
                line: line_no,
                reason: "unterminated section header".to_string(),
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(SitlError::Config {
                    line: line_no,
                    reason: "empty section name".to_string(),
                });
            }
            section = Some(name.to_ascii_uppercase());
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| SitlError::Config {
            line: line_no,
            reason: format!("expected `key = value`, got `{line}`"),
        })?;
        let prefix = section.as_deref().ok_or_else(|| SitlError::Config {
            line: line_no,
            reason: "key outside of any section".to_string(),
        })?;

        let name = format!("{}_{}", prefix, key.trim().to_ascii_uppercase());
        let param_name = ParamName::try_from(name.as_str()).map_err(|_| SitlError::Config {
            line: line_no,
            reason: format!("parameter name too long: {name}"),
        })?;
        let value = ParamValue::parse(value).map_err(|e| SitlError::Config {
            line: line_no,
            reason: e.to_string(),
        })?;
        store
            .insert_raw(param_name, value)
            .map_err(|e| SitlError::Parameter {
                name,
                source_error: e,
            })?;
    }

    Ok(store)
}

/// Render the store as INI text, sections in first-seen order
pub fn render(store: &ParameterStore) -> String {
    let mut sections: Vec<(String, Vec<(String, String)>)> = Vec::new();

    for (name, value) in store.iter_all() {
        let (prefix, key) = name.split_once('_').unwrap_or(("GENERAL", name.as_str()));
        let section = prefix.to_ascii_lowercase();
        let entry = (key.to_ascii_lowercase(), value.to_string());
        match sections.iter_mut().find(|(s, _)| *s == section) {
            Some((_, entries)) => entries.push(entry),
            None => sections.push((section, vec![entry])),
        }
    }

    let mut text = String::new();
    for (i, (section, entries)) in sections.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        let _ = writeln!(text, "[{section}]");
        for (key, value) in entries {
            let _ = writeln!(text, "{key} = {value}");
        }
    }
    text
}

/// Write the store to `path` and clear its dirty flag
pub fn save(store: &mut ParameterStore, path: &Path) -> Result<(), SitlError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render(store))?;
    store.clear_dirty();
    log::debug!("configuration saved to {}", path.display());
    Ok(())
}

/// Write the store back only if something changed since loading
pub fn save_if_dirty(store: &mut ParameterStore, path: &Path) -> Result<bool, SitlError> {
    if !store.is_dirty() {
        return Ok(false);
    }
    save(store, path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections() {
        let store = parse(
            "; mission switches\n\
             [plan20]\n\
             log = true\n\
             run = false\n\
             speed = 0.25\n\
             \n\
             [plan24]\n\
             obst_ch = 2\n",
        )
        .unwrap();

        assert_eq!(store.get("PLAN20_LOG"), Some(&ParamValue::Bool(true)));
        assert_eq!(store.get("PLAN20_RUN"), Some(&ParamValue::Bool(false)));
        assert_eq!(store.get_f32("PLAN20_SPEED", 0.0), 0.25);
        assert_eq!(store.get_u32("PLAN24_OBST_CH", 0), 2);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let err = parse("[plan20]\nrun false\n").unwrap_err();
        assert!(matches!(err, SitlError::Config { line: 2, .. }));

        let err = parse("run = true\n").unwrap_err();
        assert!(matches!(err, SitlError::Config { line: 1, .. }));

        let err = parse("[plan20\n").unwrap_err();
        assert!(matches!(err, SitlError::Config { line: 1, .. }));
    }

    #[test]
    fn test_render_groups_by_mission() {
        let mut store = ParameterStore::new();
        store.register("PLAN20_LOG", ParamValue::Bool(true)).unwrap();
        store.register("PLAN24_RUN", ParamValue::Bool(true)).unwrap();
        store.register("PLAN20_RUN", ParamValue::Bool(false)).unwrap();

        assert_eq!(
            render(&store),
            "[plan20]\nlog = true\nrun = false\n\n[plan24]\nrun = true\n"
        );
    }

    #[test]
    fn test_render_then_parse_keeps_values() {
        let mut store = ParameterStore::new();
        store.register("PLAN24_OBST_DIST", ParamValue::Float(0.08)).unwrap();
        store.register("PLAN24_POLL_US", ParamValue::Int(2000)).unwrap();

        let reloaded = parse(&render(&store)).unwrap();
        assert_eq!(reloaded.get_f32("PLAN24_OBST_DIST", 0.0), 0.08);
        assert_eq!(reloaded.get_u32("PLAN24_POLL_US", 0), 2000);
    }

    #[test]
    fn test_whole_float_stays_float() {
        let mut store = ParameterStore::new();
        store.register("PLAN20_TURN_RATE", ParamValue::Float(1.0)).unwrap();

        let text = render(&store);
        assert_eq!(text, "[plan20]\nturn_rate = 1.0\n");

        let mut reloaded = parse(&text).unwrap();
        assert_eq!(reloaded.get("PLAN20_TURN_RATE"), Some(&ParamValue::Float(1.0)));
        reloaded.set_str("PLAN20_TURN_RATE", "0.5").unwrap();
        assert_eq!(reloaded.get_f32("PLAN20_TURN_RATE", 0.0), 0.5);
    }
}
