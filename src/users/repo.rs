use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::{Collection, Database};
use tracing::instrument;

use crate::error::{ApiError, ApiResult};
use crate::users::entity::User;

/// Data-access contract for the user collection. The Mongo-backed
/// repository is the production implementation; tests substitute an
/// in-memory store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user and returns the canonical stored form. Duplicate
    /// emails are rejected with `Conflict`.
    async fn create(&self, user: User) -> ApiResult<User>;

    async fn get_all(&self) -> ApiResult<Vec<User>>;

    async fn get_by_id(&self, id: &ObjectId) -> ApiResult<User>;

    /// Whole-record replace. Rejects an email already owned by a different
    /// record; keeping one's own email is fine.
    async fn update_by_id(&self, id: &ObjectId, user: User) -> ApiResult<User>;

    async fn delete_by_id(&self, id: &ObjectId) -> ApiResult<()>;
}

/// Gateway for the `users` collection. Holds the injected database handle;
/// every store failure is wrapped into `ApiError::Store` here.
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(db: Database) -> Self {
        let collection = db.collection::<User>("users");
        Self { collection }
    }

    pub fn parse_id(id: &str) -> ApiResult<ObjectId> {
        ObjectId::parse_str(id).map_err(|_| ApiError::Validation(format!("Invalid user id: {id}")))
    }

    fn id_filter(id: &ObjectId) -> Document {
        doc! { "_id": *id }
    }

    fn email_filter(email: &str) -> Document {
        doc! { "email": email }
    }

    async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let user = self
            .collection
            .find_one(Self::email_filter(email))
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    /// Re-fetches by the id the store generated for the insert. The email
    /// uniqueness check is check-then-insert and can race with a
    /// concurrent create.
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: User) -> ApiResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(ApiError::Conflict("Email already exists".into()));
        }

        let result = self.collection.insert_one(&user).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| ApiError::Store("User not created".into()))?;

        let created = self
            .collection
            .find_one(Self::id_filter(&id))
            .await?
            .ok_or_else(|| ApiError::Store("User not created".into()))?;

        tracing::info!(user_id = %id, "user created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> ApiResult<Vec<User>> {
        let cursor = self.collection.find(doc! {}).await?;
        let users: Vec<User> = cursor.try_collect().await?;
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &ObjectId) -> ApiResult<User> {
        self.collection
            .find_one(Self::id_filter(id))
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn update_by_id(&self, id: &ObjectId, mut user: User) -> ApiResult<User> {
        if let Some(existing) = self.find_by_email(&user.email).await? {
            if existing.id != Some(*id) {
                return Err(ApiError::Conflict("Email already exists".into()));
            }
        }

        user.id = Some(*id);
        let result = self
            .collection
            .replace_one(Self::id_filter(id), &user)
            .await?;
        if result.matched_count == 0 {
            return Err(ApiError::NotFound("User not found".into()));
        }

        tracing::info!(user_id = %id, "user updated");
        self.get_by_id(id).await
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &ObjectId) -> ApiResult<()> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;
        if result.deleted_count == 0 {
            return Err(ApiError::NotFound("User not found".into()));
        }
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}
