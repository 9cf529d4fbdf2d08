//! Profile command handlers.

use super::CommandResult;
use crate::cli::ProfileCommands;
use anyhow::Context;
use nimbus_joystick::ConfigStore;

pub fn run(store: &mut ConfigStore, command: ProfileCommands) -> CommandResult {
    match command {
        ProfileCommands::List => list(store),
        ProfileCommands::Show { id } => show(store, &id),
        ProfileCommands::Switch { id } => {
            store.switch_profile(&id)?;
            store.save()?;
            println!("Switched to profile {id}");
            Ok(())
        }
        ProfileCommands::Save => {
            store.save_current_profile()?;
            println!("Saved current configuration to profile {}", store.current_profile_id());
            Ok(())
        }
        ProfileCommands::Reset { id } => {
            store.reset_profile(&id)?;
            store.save()?;
            println!("Reset profile {id}");
            Ok(())
        }
        ProfileCommands::Duplicate { source, name } => {
            let new_id = store.duplicate_profile(&source, &name)?;
            println!("Created profile {new_id}");
            Ok(())
        }
        ProfileCommands::Create { name, description } => {
            let new_id = store.create_profile_as(&name, &description)?;
            store.save()?;
            println!("Created profile {new_id} (now current)");
            Ok(())
        }
        ProfileCommands::Delete { id } => {
            store.delete_profile(&id)?;
            store.save()?;
            println!("Deleted profile {id}");
            Ok(())
        }
    }
}

fn list(store: &ConfigStore) -> CommandResult {
    let current = store.current_profile_id();
    let profiles = store.list_profiles();
    if profiles.is_empty() {
        println!("No profiles in {}", store.profiles().dir().display());
        return Ok(());
    }

    println!("  {:<20} {:<24} {:<12} Description", "Id", "Name", "Layout");
    for p in profiles {
        let marker = if p.id == current { '*' } else { ' ' };
        let name = if p.builtin {
            format!("{} (built-in)", p.name)
        } else {
            p.name
        };
        println!(
            "{} {:<20} {:<24} {:<12} {}",
            marker, p.id, name, p.layout_type, p.description
        );
    }
    Ok(())
}

fn show(store: &ConfigStore, id: &str) -> CommandResult {
    let profile = store
        .load_profile(id)
        .with_context(|| format!("Profile {id} not found or unreadable"))?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}
