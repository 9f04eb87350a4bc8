//! Cytoscape desktop style export → Cytoscape.js stylesheet.
//!
//! The desktop app exports `[{"title": ..., "style": [{"selector", "css"}]}]`;
//! the browser wants `[{"selector", "style"}]`. Desktop also formats numbers
//! in selectors and mappers with thousands separators (`1,873`), which
//! Cytoscape.js cannot parse.

use serde_json::{json, Map, Value};

use cdk46kb_config::PathsConfig;

use crate::assets::NETWORK_FOLDER;
use crate::error::Result;
use crate::output::write_bytes;
use crate::report::StepReport;

pub const DESKTOP_STYLES: &str = "styles.json";
pub const WEB_STYLE: &str = "style.json";

/// Drop every comma that sits between two digits.
pub fn strip_thousands_separators(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    for (i, c) in chars.iter().enumerate() {
        let between_digits = *c == ','
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
        if !between_digits {
            out.push(*c);
        }
    }
    out
}

fn fix_css(css: &Map<String, Value>) -> Map<String, Value> {
    css.iter()
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => Value::String(strip_thousands_separators(s)),
                other => other.clone(),
            };
            (k.clone(), v)
        })
        .collect()
}

/// Convert the first style set of a desktop export.
pub fn convert_desktop_styles(doc: &Value) -> std::result::Result<Value, String> {
    let rules = doc
        .get(0)
        .and_then(|set| set.get("style"))
        .and_then(Value::as_array)
        .ok_or("expected an array whose first element has a `style` list")?;

    let mut converted = Vec::with_capacity(rules.len());
    for (i, rule) in rules.iter().enumerate() {
        let selector = rule
            .get("selector")
            .and_then(Value::as_str)
            .ok_or_else(|| format!("style rule {} has no selector", i))?;
        let css = rule.get("css").and_then(Value::as_object).cloned().unwrap_or_default();
        converted.push(json!({
            "selector": strip_thousands_separators(selector),
            "style": fix_css(&css),
        }));
    }
    Ok(Value::Array(converted))
}

pub fn stage_styles(paths: &PathsConfig) -> Result<Vec<StepReport>> {
    let src = paths.raw_dir.join(NETWORK_FOLDER).join(DESKTOP_STYLES);
    let dest = paths.network_dir().join(WEB_STYLE);

    let text = match std::fs::read_to_string(&src) {
        Ok(t) => t,
        Err(e) => {
            return Ok(vec![StepReport::skipped("styles", WEB_STYLE, format!("cannot read {}: {}", src.display(), e))]);
        }
    };
    let converted = serde_json::from_str::<Value>(&text)
        .map_err(|e| e.to_string())
        .and_then(|doc| convert_desktop_styles(&doc));
    let converted = match converted {
        Ok(v) => v,
        Err(reason) => {
            return Ok(vec![StepReport::skipped("styles", WEB_STYLE, format!("{}: {}", src.display(), reason))]);
        }
    };

    let count = converted.as_array().map_or(0, Vec::len);
    let body = serde_json::to_string_pretty(&converted).unwrap_or_default();
    write_bytes(&dest, body.as_bytes())?;
    Ok(vec![StepReport::done("styles", WEB_STYLE, format!("converted {} style rules", count))])
}
