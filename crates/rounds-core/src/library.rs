//! Preset library: the stored presets plus which one is active.
//!
//! Every mutation is written through to the database immediately, so the
//! in-memory list and storage never disagree.

use crate::error::{CoreError, Result, ValidationError};
use crate::preset::{Adjust, Preset, PresetField, ADJUST_STEP_SECS};
use crate::storage::{Database, Settings};

pub struct PresetLibrary {
    db: Database,
    presets: Vec<Preset>,
    active_id: i64,
    adjust_step_secs: u64,
}

impl PresetLibrary {
    /// Load the library, seeding the default preset into an empty database.
    ///
    /// The active preset comes from settings; a missing or stale id falls
    /// back to the first preset.
    pub fn open(db: Database) -> Result<Self> {
        if db.preset_count()? == 0 {
            let id = db.insert_preset(&Preset::default_preset())?;
            tracing::info!(id, "seeded default preset");
        }
        let presets = db.all_presets()?;
        let first = presets
            .first()
            .map(|p| p.id)
            .ok_or_else(|| ValidationError::EmptyCollection("presets".into()))?;

        let stored = Settings::new(&db).active_preset()?;
        let active_id = match stored {
            Some(id) if presets.iter().any(|p| p.id == id) => id,
            _ => {
                Settings::new(&db).set_active_preset(first)?;
                first
            }
        };

        Ok(Self {
            db,
            presets,
            active_id,
            adjust_step_secs: ADJUST_STEP_SECS,
        })
    }

    pub fn with_adjust_step(mut self, step_secs: u64) -> Self {
        self.adjust_step_secs = step_secs.max(1);
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn get(&self, id: i64) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn active(&self) -> &Preset {
        // `presets` is never empty: `open` seeds it and `delete` keeps one.
        self.get(self.active_id).unwrap_or(&self.presets[0])
    }

    pub fn active_id(&self) -> i64 {
        self.active_id
    }

    pub fn set_active(&mut self, id: i64) -> Result<&Preset> {
        self.require(id)?;
        Settings::new(&self.db).set_active_preset(id)?;
        self.active_id = id;
        tracing::info!(id, "active preset changed");
        Ok(self.active())
    }

    /// Store a new preset and return it with its id.
    pub fn create(&mut self, preset: Preset) -> Result<&Preset> {
        preset.validate()?;
        let id = self.db.insert_preset(&preset)?;
        self.presets.push(Preset { id, ..preset });
        tracing::info!(id, "preset created");
        self.require(id)
    }

    /// Step a field of the active preset, persisting only real changes.
    pub fn adjust_active(&mut self, field: PresetField, direction: Adjust) -> Result<bool> {
        let step = self.adjust_step_secs;
        let idx = self.index_of(self.active_id)?;
        let mut updated = self.presets[idx].clone();
        if !updated.adjust_by(field, direction, step) {
            return Ok(false);
        }
        self.db.update_preset(&updated)?;
        tracing::debug!(id = updated.id, field = %field, "preset adjusted");
        self.presets[idx] = updated;
        Ok(true)
    }

    /// Replace a stored preset's values, keeping its id.
    pub fn update(&mut self, preset: Preset) -> Result<&Preset> {
        preset.validate()?;
        let idx = self.index_of(preset.id)?;
        self.db.update_preset(&preset)?;
        self.presets[idx] = preset;
        Ok(&self.presets[idx])
    }

    pub fn rename(&mut self, id: i64, name: &str) -> Result<&Preset> {
        let idx = self.index_of(id)?;
        let renamed = Preset {
            name: name.trim().to_string(),
            ..self.presets[idx].clone()
        };
        renamed.validate()?;
        self.db.update_preset(&renamed)?;
        self.presets[idx] = renamed;
        Ok(&self.presets[idx])
    }

    /// Copy a preset as "<name> (Copy)" and make the copy active.
    pub fn duplicate(&mut self, id: i64) -> Result<&Preset> {
        let source = self.require(id)?;
        let copy = Preset {
            id: 0,
            name: source.copy_name(),
            ..source.clone()
        };
        let new_id = self.db.insert_preset(&copy)?;
        self.presets.push(Preset { id: new_id, ..copy });
        tracing::info!(from = id, id = new_id, "preset duplicated");
        self.set_active(new_id)
    }

    /// Delete a preset. The last remaining preset cannot be deleted.
    ///
    /// Deleting the active preset activates the first one left.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        let idx = self.index_of(id)?;
        if self.presets.len() == 1 {
            return Err(ValidationError::invalid("preset", "cannot delete the last preset").into());
        }
        self.db.delete_preset(id)?;
        self.presets.remove(idx);
        tracing::info!(id, "preset deleted");

        if self.active_id == id {
            let first = self.presets[0].id;
            self.set_active(first)?;
        }
        Ok(())
    }

    fn index_of(&self, id: i64) -> Result<usize> {
        self.presets
            .iter()
            .position(|p| p.id == id)
            .ok_or(CoreError::NotFound { kind: "preset", id })
    }

    fn require(&self, id: i64) -> Result<&Preset> {
        self.get(id).ok_or(CoreError::NotFound { kind: "preset", id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> PresetLibrary {
        PresetLibrary::open(Database::open_memory().unwrap()).unwrap()
    }

    #[test]
    fn empty_database_is_seeded() {
        let lib = library();
        assert_eq!(lib.presets().len(), 1);
        assert_eq!(lib.active().name, "Default");
        assert_eq!(
            Settings::new(lib.database()).active_preset().unwrap(),
            Some(lib.active_id())
        );
    }

    #[test]
    fn stale_active_id_falls_back_to_first() {
        let db = Database::open_memory().unwrap();
        Settings::new(&db).set_active_preset(99).unwrap();
        let lib = PresetLibrary::open(db).unwrap();
        assert_eq!(lib.active().name, "Default");
    }

    #[test]
    fn adjust_persists_changes() {
        let mut lib = library();
        assert!(lib
            .adjust_active(PresetField::RoundLength, Adjust::Increment)
            .unwrap());
        let stored = lib.database().preset_by_id(lib.active_id()).unwrap().unwrap();
        assert_eq!(stored.round_length_secs, 185);
    }

    #[test]
    fn adjust_respects_configured_step() {
        let mut lib = library().with_adjust_step(30);
        lib.adjust_active(PresetField::Rest, Adjust::Decrement).unwrap();
        assert_eq!(lib.active().rest_secs, 30);
        assert!(!lib.adjust_active(PresetField::Rest, Adjust::Decrement).unwrap());
    }

    #[test]
    fn duplicate_becomes_active() {
        let mut lib = library();
        let original = lib.active_id();
        let copy = lib.duplicate(original).unwrap().clone();
        assert_eq!(copy.name, "Default (Copy)");
        assert_ne!(copy.id, original);
        assert_eq!(lib.active_id(), copy.id);
        assert_eq!(lib.presets().len(), 2);
    }

    #[test]
    fn cannot_delete_last_preset() {
        let mut lib = library();
        let id = lib.active_id();
        assert!(lib.delete(id).is_err());
        assert_eq!(lib.presets().len(), 1);
    }

    #[test]
    fn deleting_active_activates_first_remaining() {
        let mut lib = library();
        let first = lib.active_id();
        let copy = lib.duplicate(first).unwrap().id;
        lib.delete(copy).unwrap();
        assert_eq!(lib.active_id(), first);
        assert!(lib.database().preset_by_id(copy).unwrap().is_none());
    }

    #[test]
    fn rename_rejects_blank_names() {
        let mut lib = library();
        let id = lib.active_id();
        assert!(lib.rename(id, "  ").is_err());
        assert_eq!(lib.rename(id, " Heavy Bag ").unwrap().name, "Heavy Bag");
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut lib = library();
        assert!(matches!(
            lib.set_active(404),
            Err(CoreError::NotFound { id: 404, .. })
        ));
        assert!(lib.duplicate(404).is_err());
    }
}
