//! Config command handlers.

use super::CommandResult;
use crate::cli::ConfigCommands;
use anyhow::{bail, Context};
use nimbus_joystick::ConfigStore;
use serde_json::Value;

pub fn run(store: &mut ConfigStore, command: ConfigCommands) -> CommandResult {
    match command {
        ConfigCommands::Get { key } => get(store, key.as_deref()),
        ConfigCommands::Set { key, value } => set(store, &key, &value),
        ConfigCommands::Validate => {
            store.validate()?;
            println!("Configuration OK");
            Ok(())
        }
        ConfigCommands::Path => {
            println!("Config:   {}", store.config_path().display());
            println!("Profiles: {}", store.profiles().dir().display());
            Ok(())
        }
    }
}

fn get(store: &ConfigStore, key: Option<&str>) -> CommandResult {
    let value = match key {
        None => store.tree(),
        Some(key) => store
            .get(key)
            .with_context(|| format!("No value at {key}"))?,
    };
    match value {
        Value::String(s) => println!("{s}"),
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }
    Ok(())
}

/// Parse a CLI value: JSON when it parses, otherwise a plain string
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn set(store: &mut ConfigStore, key: &str, raw: &str) -> CommandResult {
    if key.trim().is_empty() {
        bail!("Empty key");
    }
    let value = parse_value(raw);
    let previous = store.get(key).cloned();
    store.set(key, value);

    if let Err(e) = store.validate() {
        match previous {
            Some(v) => store.set(key, v),
            None => {
                store.remove(key);
            }
        }
        bail!("Not saved: {e}");
    }
    store.save()?;
    println!("{key} = {}", store.get(key).map(Value::to_string).unwrap_or_default());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value(r#"{"a":1}"#), json!({ "a": 1 }));
        assert_eq!(parse_value("slider1"), json!("slider1"));
    }
}
