//! Placeholder substitution for menu labels.
//!
//! Templates look like "Volume: {volume:.0}%". The player is routinely in
//! states where properties are absent (idle, no file loaded), so any
//! substitution failure returns the raw template instead of erroring.

use crate::properties::PlayerSnapshot;
use serde_json::Value;
use tracing::warn;

/// Substitute `{name}` / `{name:.N}` placeholders from the snapshot.
/// On any failure the template is returned unchanged and the reason logged.
pub fn render(template: &str, snapshot: &PlayerSnapshot) -> String {
    match try_render(template, snapshot) {
        Ok(rendered) => rendered,
        Err(reason) => {
            warn!("template {:?}: {}", template, reason);
            template.to_string()
        }
    }
}

fn try_render(template: &str, snapshot: &PlayerSnapshot) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c != '{' {
            out.push(c);
            continue;
        }
        let mut body = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) => body.push(c),
                None => return Err("unterminated placeholder".to_string()),
            }
        }
        let (name, precision) = parse_placeholder(&body)?;
        let value = snapshot
            .get(name)
            .ok_or_else(|| format!("unknown field {:?}", name))?;
        out.push_str(&format_value(name, value, precision)?);
    }
    Ok(out)
}

fn parse_placeholder(body: &str) -> Result<(&str, Option<usize>), String> {
    match body.split_once(':') {
        None => Ok((body, None)),
        Some((name, spec)) => {
            let digits = spec
                .strip_prefix('.')
                .ok_or_else(|| format!("unsupported format spec {:?}", spec))?;
            let precision = digits
                .parse()
                .map_err(|_| format!("unsupported format spec {:?}", spec))?;
            Ok((name, Some(precision)))
        }
    }
}

fn format_value(name: &str, value: &Value, precision: Option<usize>) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(if *b { "yes" } else { "no" }.to_string()),
        Value::Number(n) => match precision {
            Some(p) => n
                .as_f64()
                .map(|f| format!("{:.*}", p, f))
                .ok_or_else(|| format!("field {:?} is not a finite number", name)),
            None => Ok(n.to_string()),
        },
        Value::Null => Err(format!("field {:?} is unset", name)),
        _ => Err(format!("field {:?} has no text form", name)),
    }
}
