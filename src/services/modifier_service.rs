use chrono::Utc;
use validator::Validate;

use crate::auth::{access::require_any_role, CurrentUser};
use crate::errors::AppError;
use crate::models::{CreateModifierRequest, Modifier, Role, UpdateModifierRequest};
use crate::store::{Collection, SharedDatabase};

const EDITORS: &[Role] = &[Role::Admin, Role::Instructor];

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Modifier with ID {} not found.", id))
}

fn duplicate(name: &str) -> AppError {
    AppError::Duplicate(format!("A modifier named '{}' already exists.", name))
}

#[derive(Debug, Clone)]
pub struct ModifierService {
    db: SharedDatabase,
}

impl ModifierService {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    pub async fn create_modifier(
        &self,
        actor: &CurrentUser,
        request: CreateModifierRequest,
    ) -> Result<Modifier, AppError> {
        request.validate()?;
        require_any_role(actor, EDITORS)?;

        let mut db = self.db.write().await;
        if db.modifier_name_taken(&request.name, None) {
            return Err(duplicate(&request.name));
        }

        let now = Utc::now();
        let modifier = Modifier {
            id: db.next_id(Collection::Modifiers),
            name: request.name,
            description: request.description,
            created_at: now,
            updated_at: now,
        };
        db.modifiers.push(modifier.clone());

        tracing::info!(modifier_id = modifier.id, created_by = actor.id, "Modifier created");
        Ok(modifier)
    }

    pub async fn list_modifiers(&self) -> Vec<Modifier> {
        self.db.read().await.modifiers.clone()
    }

    pub async fn get_modifier(&self, id: i64) -> Result<Modifier, AppError> {
        let db = self.db.read().await;
        db.modifier(id).cloned().ok_or_else(|| not_found(id))
    }

    pub async fn update_modifier(
        &self,
        actor: &CurrentUser,
        id: i64,
        request: UpdateModifierRequest,
    ) -> Result<Modifier, AppError> {
        request.validate()?;
        require_any_role(actor, EDITORS)?;

        let mut db = self.db.write().await;
        if let Some(name) = &request.name {
            if db.modifier_name_taken(name, Some(id)) {
                return Err(duplicate(name));
            }
        }

        let modifier = db
            .modifiers
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found(id))?;

        if let Some(name) = request.name {
            modifier.name = name;
        }
        if let Some(description) = request.description {
            modifier.description = Some(description);
        }
        modifier.updated_at = Utc::now();

        tracing::info!(modifier_id = id, updated_by = actor.id, "Modifier updated");
        Ok(modifier.clone())
    }

    pub async fn delete_modifier(&self, actor: &CurrentUser, id: i64) -> Result<(), AppError> {
        require_any_role(actor, EDITORS)?;

        let mut db = self.db.write().await;
        if db.modifier(id).is_none() {
            return Err(not_found(id));
        }

        let references = db.modifier_references(id);
        if references > 0 {
            tracing::warn!(modifier_id = id, references, "Modifier delete blocked");
            return Err(AppError::InUse(format!(
                "Cannot delete modifier {}: it is applied in {} workout plan item(s) or session execution(s).",
                id, references
            )));
        }

        db.modifiers.retain(|m| m.id != id);
        tracing::info!(modifier_id = id, deleted_by = actor.id, "Modifier deleted");
        Ok(())
    }
}
