use clap::Subcommand;
use rounds_core::{Database, Settings};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a setting
    Get {
        /// Setting key: active_preset, theme_mode, keep_screen_on
        key: String,
    },
    /// Set a setting
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let settings = Settings::new(&db);

    match action {
        SettingsAction::Get { key } => match settings.get(&key)? {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown or unset setting: {key}").into()),
        },
        SettingsAction::Set { key, value } => {
            if key == "active_preset" {
                let id: i64 = value.parse().map_err(|_| format!("'{value}' is not an id"))?;
                if db.preset_by_id(id)?.is_none() {
                    return Err(format!("preset {id} not found").into());
                }
            }
            settings.set(&key, &value)?;
            println!("ok");
        }
        SettingsAction::List { json } => {
            let entries = settings.list()?;
            if json {
                let map: serde_json::Map<String, serde_json::Value> = entries
                    .into_iter()
                    .map(|(k, v)| {
                        (
                            k.to_string(),
                            v.map(serde_json::Value::String)
                                .unwrap_or(serde_json::Value::Null),
                        )
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                for (key, value) in entries {
                    println!("{key} = {}", value.as_deref().unwrap_or("(unset)"));
                }
            }
        }
    }
    Ok(())
}
