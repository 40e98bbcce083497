use crate::dto::auth_dto::{AuthResponse, LoginPayload, SignupPayload};
use crate::dto::user_dto::{CreateUserPayload, UpdateUserPayload, UserListQuery};
use crate::error::{Error, Result};
use crate::models::user::{Role, User};
use crate::services::authorization::{require_admin, require_admin_or_self};
use crate::store::{Store, UserFilter};
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::TokenKeys;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

const BAD_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
    tokens: TokenKeys,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, tokens: TokenKeys) -> Self {
        Self { store, tokens }
    }

    /// Self-registration always yields a student account.
    pub async fn signup(&self, payload: SignupPayload, now: DateTime<Utc>) -> Result<AuthResponse> {
        payload.validate()?;
        let user = self.register(payload, Role::Student, now).await?;

        let token = self.tokens.issue(&user, now)?;
        Ok(AuthResponse {
            success: true,
            token,
            user,
        })
    }

    /// Admin-only account creation, the one path that can mint another admin.
    pub async fn create(
        &self,
        actor: &User,
        payload: CreateUserPayload,
        now: DateTime<Utc>,
    ) -> Result<User> {
        require_admin(actor, "Only admins can create accounts")?;
        payload.validate()?;
        let role = payload.role.unwrap_or(Role::Student);
        self.register(payload.account, role, now).await
    }

    /// Startup bootstrap of the first admin. Re-running with the same email is a no-op;
    /// an existing student under that email is never promoted.
    pub async fn ensure_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<User> {
        let account = SignupPayload {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            ..Default::default()
        };
        account.validate()?;

        let lowered = email.trim().to_lowercase();
        if let Some(existing) = self.store.find_user_by_email(&lowered).await? {
            if existing.is_admin() {
                return Ok(existing);
            }
            return Err(Error::AlreadyExists(format!(
                "{} is registered as a student",
                lowered
            )));
        }
        self.register(account, Role::Admin, now).await
    }

    async fn register(&self, payload: SignupPayload, role: Role, now: DateTime<Utc>) -> Result<User> {
        let email = payload.email.trim().to_lowercase();
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(Error::AlreadyExists("Email is already registered".to_string()));
        }

        let mut user = User {
            id: Uuid::new_v4(),
            name: payload.name.trim().to_string(),
            email,
            password_hash: hash_password(&payload.password)?,
            role,
            branch: payload.branch,
            year: payload.year,
            cgpa: payload.cgpa,
            skills: payload.skills,
            campus: payload.campus,
            created_at: now,
            updated_at: now,
        };
        if role == Role::Admin {
            user.branch = None;
            user.year = None;
            user.cgpa = None;
            user.skills.clear();
            user.campus = None;
        }

        self.store.insert_user(&user).await?;
        tracing::info!(user = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, payload: LoginPayload, now: DateTime<Utc>) -> Result<AuthResponse> {
        payload.validate()?;
        let email = payload.email.trim().to_lowercase();

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            return Err(Error::Unauthorized(BAD_CREDENTIALS.to_string()));
        };
        if !verify_password(&payload.password, &user.password_hash) {
            tracing::warn!(user = %user.id, "failed login attempt");
            return Err(Error::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        let token = self.tokens.issue(&user, now)?;
        tracing::info!(user = %user.id, "user logged in");
        Ok(AuthResponse {
            success: true,
            token,
            user,
        })
    }

    pub async fn get(&self, actor: &User, user_id: Uuid) -> Result<User> {
        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        require_admin_or_self(actor, user.id, "Not authorized to view this user")?;
        Ok(user)
    }

    pub async fn update(
        &self,
        actor: &User,
        user_id: Uuid,
        payload: UpdateUserPayload,
        now: DateTime<Utc>,
    ) -> Result<User> {
        require_admin_or_self(actor, user_id, "Not authorized to update this user")?;
        payload.validate()?;

        let mut user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

        if let Some(name) = payload.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = payload.email {
            let email = email.trim().to_lowercase();
            if email != user.email {
                if let Some(holder) = self.store.find_user_by_email(&email).await? {
                    if holder.id != user.id {
                        return Err(Error::AlreadyExists("Email is already registered".to_string()));
                    }
                }
                user.email = email;
            }
        }
        if user.is_student() {
            if let Some(branch) = payload.branch {
                user.branch = Some(branch);
            }
            if let Some(year) = payload.year {
                user.year = Some(year);
            }
            if let Some(cgpa) = payload.cgpa {
                user.cgpa = Some(cgpa);
            }
            if let Some(skills) = payload.skills {
                user.skills = skills;
            }
            if let Some(campus) = payload.campus {
                user.campus = Some(campus);
            }
        }
        user.updated_at = now;

        self.store.save_user(&user).await?;
        tracing::info!(user = %user.id, actor = %actor.id, "user profile updated");
        Ok(user)
    }

    pub async fn list(&self, actor: &User, query: UserListQuery) -> Result<Vec<User>> {
        require_admin(actor, "Only admins can list users")?;
        let filter = UserFilter {
            role: query.role,
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        };
        self.store.find_users(&filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::at;
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;
    use tokio_test::{assert_err, assert_ok};

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryStore::new()), TokenKeys::new("test-secret", 30))
    }

    fn signup(email: &str) -> SignupPayload {
        SignupPayload {
            name: "Raj Kumar".into(),
            email: email.into(),
            password: "hunter22".into(),
            branch: Some("Computer Science".into()),
            year: Some(4),
            cgpa: Some(Decimal::new(85, 1)),
            skills: vec!["React".into()],
            campus: Some("BCA Himachal".into()),
        }
    }

    fn login(email: &str, password: &str) -> LoginPayload {
        LoginPayload {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn signup_then_login() {
        let service = service();
        let created = assert_ok!(service.signup(signup("Raj@Example.com"), at(2025, 1, 1)).await);
        assert_eq!(created.user.role, Role::Student);
        assert_eq!(created.user.email, "raj@example.com");
        assert_ne!(created.user.password_hash, "hunter22");

        let session = assert_ok!(service.login(login("raj@example.com", "hunter22"), at(2025, 1, 2)).await);
        assert_eq!(session.user.id, created.user.id);
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn bad_credentials_are_indistinguishable() {
        let service = service();
        assert_ok!(service.signup(signup("raj@example.com"), at(2025, 1, 1)).await);

        let wrong_password = assert_err!(service.login(login("raj@example.com", "nope123"), at(2025, 1, 2)).await);
        let unknown = assert_err!(service.login(login("who@example.com", "hunter22"), at(2025, 1, 2)).await);
        assert_eq!(wrong_password.to_string(), unknown.to_string());
        assert_eq!(unknown.kind(), "unauthorized");
    }

    #[tokio::test]
    async fn duplicate_email_and_short_password() {
        let service = service();
        assert_ok!(service.signup(signup("raj@example.com"), at(2025, 1, 1)).await);

        let err = assert_err!(service.signup(signup("RAJ@example.com"), at(2025, 1, 1)).await);
        assert!(matches!(err, Error::AlreadyExists(_)));

        let mut weak = signup("new@example.com");
        weak.password = "123".into();
        let err = assert_err!(service.signup(weak, at(2025, 1, 1)).await);
        assert_eq!(err.kind(), "validation_error");
    }

    async fn bootstrap_admin(service: &UserService) -> User {
        assert_ok!(
            service
                .ensure_admin("Placement Cell", "admin@example.com", "hunter22", at(2025, 1, 1))
                .await
        )
    }

    #[tokio::test]
    async fn signup_ignores_a_requested_admin_role() {
        let service = service();
        let body = serde_json::json!({
            "name": "Raj Kumar",
            "email": "raj@example.com",
            "password": "hunter22",
            "role": "Admin"
        });
        let payload: SignupPayload = assert_ok!(serde_json::from_value(body));
        let created = assert_ok!(service.signup(payload, at(2025, 1, 1)).await);
        assert_eq!(created.user.role, Role::Student);

        let err = assert_err!(service.list(&created.user, UserListQuery::default()).await);
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn bootstrap_admin_is_idempotent_and_never_promotes() {
        let service = service();
        let admin = bootstrap_admin(&service).await;
        assert!(admin.is_admin());
        assert_eq!(admin.branch, None);
        assert!(admin.skills.is_empty());
        assert_eq!(bootstrap_admin(&service).await.id, admin.id);

        assert_ok!(service.signup(signup("raj@example.com"), at(2025, 1, 1)).await);
        let err = assert_err!(
            service
                .ensure_admin("Raj", "RAJ@example.com", "hunter22", at(2025, 1, 2))
                .await
        );
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn only_admins_create_accounts_with_a_role() {
        let service = service();
        let admin = bootstrap_admin(&service).await;
        let raj = assert_ok!(service.signup(signup("raj@example.com"), at(2025, 1, 1)).await).user;

        let second_admin = CreateUserPayload {
            account: signup("officer@example.com"),
            role: Some(Role::Admin),
        };
        let err = assert_err!(service.create(&raj, second_admin.clone(), at(2025, 1, 2)).await);
        assert!(matches!(err, Error::Forbidden(_)));

        let officer = assert_ok!(service.create(&admin, second_admin, at(2025, 1, 2)).await);
        assert_eq!(officer.role, Role::Admin);
        assert_eq!(officer.cgpa, None);

        let defaulted = CreateUserPayload {
            account: signup("priya@example.com"),
            role: None,
        };
        let priya = assert_ok!(service.create(&admin, defaulted, at(2025, 1, 2)).await);
        assert_eq!(priya.role, Role::Student);
        assert_eq!(priya.branch.as_deref(), Some("Computer Science"));
    }

    #[tokio::test]
    async fn users_update_only_themselves_unless_admin() {
        let service = service();
        let raj = assert_ok!(service.signup(signup("raj@example.com"), at(2025, 1, 1)).await).user;
        let priya = assert_ok!(service.signup(signup("priya@example.com"), at(2025, 1, 1)).await).user;
        let admin = bootstrap_admin(&service).await;

        let change = UpdateUserPayload {
            cgpa: Some(Decimal::new(90, 1)),
            ..Default::default()
        };
        let err = assert_err!(service.update(&priya, raj.id, change.clone(), at(2025, 1, 2)).await);
        assert!(matches!(err, Error::Forbidden(_)));

        let updated = assert_ok!(service.update(&raj, raj.id, change.clone(), at(2025, 1, 2)).await);
        assert_eq!(updated.cgpa, Some(Decimal::new(90, 1)));
        assert_ok!(service.update(&admin, priya.id, change, at(2025, 1, 2)).await);

        let taken = UpdateUserPayload {
            email: Some("priya@example.com".into()),
            ..Default::default()
        };
        let err = assert_err!(service.update(&raj, raj.id, taken, at(2025, 1, 3)).await);
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn only_admins_list_users() {
        let service = service();
        let raj = assert_ok!(service.signup(signup("raj@example.com"), at(2025, 1, 1)).await).user;
        let admin = bootstrap_admin(&service).await;

        assert!(service.list(&raj, UserListQuery::default()).await.is_err());
        let students = assert_ok!(
            service
                .list(
                    &admin,
                    UserListQuery {
                        role: Some(Role::Student),
                        search: None
                    }
                )
                .await
        );
        assert_eq!(students, vec![raj]);
    }
}
