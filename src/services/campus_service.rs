use crate::dto::campus_dto::{CreateCampusPayload, UpdateCampusPayload};
use crate::error::{Error, Result};
use crate::models::campus::Campus;
use crate::models::user::User;
use crate::services::authorization::require_admin;
use crate::store::Store;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct CampusService {
    store: Arc<dyn Store>,
}

impl CampusService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Campus>> {
        self.store.find_campuses().await
    }

    pub async fn get(&self, campus_id: Uuid) -> Result<Campus> {
        self.store
            .find_campus(campus_id)
            .await?
            .ok_or_else(|| Error::NotFound("Campus not found".to_string()))
    }

    pub async fn create(
        &self,
        actor: &User,
        payload: CreateCampusPayload,
        now: DateTime<Utc>,
    ) -> Result<Campus> {
        require_admin(actor, "Only admins can manage campuses")?;
        payload.validate()?;

        let name = required_text(&payload.name, "name")?;
        let location = required_text(&payload.location, "location")?;
        self.ensure_name_free(&name, None).await?;

        let campus = Campus {
            id: Uuid::new_v4(),
            name,
            location,
            description: payload.description.unwrap_or_default().trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_campus(&campus).await?;

        tracing::info!(campus = %campus.id, name = %campus.name, "campus created");
        Ok(campus)
    }

    pub async fn update(
        &self,
        actor: &User,
        campus_id: Uuid,
        payload: UpdateCampusPayload,
        now: DateTime<Utc>,
    ) -> Result<Campus> {
        require_admin(actor, "Only admins can manage campuses")?;
        payload.validate()?;
        let mut campus = self.get(campus_id).await?;

        if let Some(name) = payload.name.as_deref() {
            let name = required_text(name, "name")?;
            self.ensure_name_free(&name, Some(campus.id)).await?;
            campus.name = name;
        }
        if let Some(location) = payload.location.as_deref() {
            campus.location = required_text(location, "location")?;
        }
        if let Some(description) = payload.description {
            campus.description = description.trim().to_string();
        }
        campus.updated_at = now;

        self.store.save_campus(&campus).await?;
        tracing::info!(campus = %campus.id, "campus updated");
        Ok(campus)
    }

    /// Jobs keep the campus name they were posted with.
    pub async fn delete(&self, actor: &User, campus_id: Uuid) -> Result<()> {
        require_admin(actor, "Only admins can manage campuses")?;
        if !self.store.delete_campus(campus_id).await? {
            return Err(Error::NotFound("Campus not found".to_string()));
        }
        tracing::info!(campus = %campus_id, "campus deleted");
        Ok(())
    }

    async fn ensure_name_free(&self, name: &str, except: Option<Uuid>) -> Result<()> {
        match self.store.find_campus_by_name(name).await? {
            Some(existing) if Some(existing.id) != except => Err(Error::AlreadyExists(
                "Campus with this name already exists".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

fn required_text(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::BadRequest(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, at, student};
    use crate::store::MemoryStore;
    use tokio_test::{assert_err, assert_ok};

    fn payload(name: &str) -> CreateCampusPayload {
        CreateCampusPayload {
            name: name.into(),
            location: "Shimla".into(),
            description: None,
        }
    }

    #[tokio::test]
    async fn names_are_unique_ignoring_case() {
        let service = CampusService::new(Arc::new(MemoryStore::new()));
        let admin = admin();

        let created = assert_ok!(service.create(&admin, payload(" BCA Himachal "), at(2025, 1, 1)).await);
        assert_eq!(created.name, "BCA Himachal");

        let err = assert_err!(service.create(&admin, payload("bca himachal"), at(2025, 1, 1)).await);
        assert!(matches!(err, Error::AlreadyExists(_)));

        let blank = assert_err!(service.create(&admin, payload("   "), at(2025, 1, 1)).await);
        assert_eq!(blank.kind(), "validation_error");
    }

    #[tokio::test]
    async fn students_read_but_cannot_write() {
        let service = CampusService::new(Arc::new(MemoryStore::new()));
        let admin = admin();
        let student = student("Raj Kumar");

        let campus = assert_ok!(service.create(&admin, payload("Pune"), at(2025, 1, 1)).await);
        let err = assert_err!(service.create(&student, payload("Delhi"), at(2025, 1, 1)).await);
        assert!(matches!(err, Error::Forbidden(_)));
        assert!(service.delete(&student, campus.id).await.is_err());

        assert_eq!(assert_ok!(service.list().await), vec![campus.clone()]);
        assert_eq!(assert_ok!(service.get(campus.id).await), campus);
    }

    #[tokio::test]
    async fn rename_keeps_own_name_and_delete_is_final() {
        let service = CampusService::new(Arc::new(MemoryStore::new()));
        let admin = admin();
        let pune = assert_ok!(service.create(&admin, payload("Pune"), at(2025, 1, 1)).await);
        assert_ok!(service.create(&admin, payload("Delhi"), at(2025, 1, 1)).await);

        let renamed = assert_ok!(
            service
                .update(
                    &admin,
                    pune.id,
                    UpdateCampusPayload {
                        name: Some("PUNE".into()),
                        ..Default::default()
                    },
                    at(2025, 1, 2),
                )
                .await
        );
        assert_eq!(renamed.name, "PUNE");

        let clash = UpdateCampusPayload {
            name: Some("delhi".into()),
            ..Default::default()
        };
        assert!(service.update(&admin, pune.id, clash, at(2025, 1, 3)).await.is_err());

        assert_ok!(service.delete(&admin, pune.id).await);
        let err = assert_err!(service.get(pune.id).await);
        assert!(matches!(err, Error::NotFound(_)));
    }
}
