/// Transactional identity store
///
/// The only component allowed to mutate account and profile rows. Every
/// cross-table write runs inside one transaction scope: either both rows
/// change or neither does. Login uniqueness is enforced by the database
/// constraint; the `exists` pre-check is advisory and a concurrent
/// duplicate insert loses with `Conflict`, never a second row.
use crate::error::IdentityResult;
use crate::models::{Account, NewUser, Profile, Role, UserUpdate};
use crypto::CredentialHasher;
use database_layer::{DatabasePool, StoreError};
use tracing::{debug, info};

#[derive(Clone)]
pub struct UserStore {
    pool: DatabasePool,
    hasher: CredentialHasher,
}

const ACCOUNT_COLUMNS: &str = "id, login, credential_digest, credential_salt, role, active";

impl UserStore {
    pub fn new(pool: DatabasePool, hasher: CredentialHasher) -> Self {
        Self { pool, hasher }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Fetch an account by login, credentials included (for verification
    /// inside this crate only).
    pub async fn find_by_login(&self, login: &str) -> IdentityResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE login = $1"
        ))
        .bind(login)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(account)
    }

    /// Fetch an account by id. Used by the auth gate to re-check that a
    /// token's subject still exists.
    pub async fn find_by_id(&self, id: i64) -> IdentityResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(account)
    }

    /// Whether a login is already taken, optionally ignoring one account
    /// (the account being updated).
    pub async fn exists(&self, login: &str, exclude_id: Option<i64>) -> IdentityResult<bool> {
        let count: i64 = match exclude_id {
            Some(id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE login = $1 AND id <> $2")
                    .bind(login)
                    .bind(id)
                    .fetch_one(self.pool.pool())
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE login = $1")
                    .bind(login)
                    .fetch_one(self.pool.pool())
                    .await?
            }
        };
        Ok(count > 0)
    }

    /// Fetch an account together with its profile.
    pub async fn get_with_profile(&self, id: i64) -> IdentityResult<(Account, Profile)> {
        let account = self.find_by_id(id).await?.ok_or(StoreError::NotFound)?;
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT id, account_id, name, full_name, register_number, photo_path
             FROM profiles WHERE account_id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?
        .ok_or(StoreError::NotFound)?;
        Ok((account, profile))
    }

    /// Profiles of active accounts holding `role`. The join is for
    /// filtering only; no account columns are projected.
    pub async fn list_active_users(&self, role: Role) -> IdentityResult<Vec<Profile>> {
        let profiles = sqlx::query_as::<_, Profile>(
            "SELECT p.id, p.account_id, p.name, p.full_name, p.register_number, p.photo_path
             FROM profiles p
             INNER JOIN accounts a ON a.id = p.account_id
             WHERE a.active = TRUE AND a.role = $1
             ORDER BY p.name",
        )
        .bind(role.as_str())
        .fetch_all(self.pool.pool())
        .await?;
        Ok(profiles)
    }

    /// Create an account and its profile in one transaction.
    ///
    /// A failure at any step rolls the whole pair back; no partial
    /// account/profile pair is ever observable.
    pub async fn create_user(&self, new: &NewUser) -> IdentityResult<i64> {
        let credential = self.hasher.derive(&new.password)?;

        let mut tx = self.pool.begin().await?;

        let account_id: i64 = sqlx::query_scalar(
            "INSERT INTO accounts (login, credential_digest, credential_salt, role, active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&new.login)
        .bind(&credential.digest)
        .bind(&credential.salt)
        .bind(new.role.as_str())
        .bind(new.active)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO profiles (account_id, name, full_name, register_number)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(account_id)
        .bind(&new.profile.name)
        .bind(&new.profile.full_name)
        .bind(&new.profile.register_number)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(account_id, login = %new.login, "account created");
        Ok(account_id)
    }

    /// Update a profile and its owning account in one transaction.
    ///
    /// Keyed by profile id; the owning account id is resolved from the
    /// profile row itself, so a caller can never redirect the account-side
    /// write to a different account. When no password is given the stored
    /// credential columns are left untouched.
    pub async fn update_user(&self, profile_id: i64, update: &UserUpdate) -> IdentityResult<i64> {
        let mut tx = self.pool.begin().await?;

        let account_id: i64 = sqlx::query_scalar(
            "UPDATE profiles SET name = $2, full_name = $3, register_number = $4
             WHERE id = $1
             RETURNING account_id",
        )
        .bind(profile_id)
        .bind(&update.profile.name)
        .bind(&update.profile.full_name)
        .bind(&update.profile.register_number)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound)?;

        if let Some(password) = &update.password {
            let credential = self.hasher.derive(password)?;
            sqlx::query(
                "UPDATE accounts
                 SET login = $2, credential_digest = $3, credential_salt = $4, role = $5, active = $6
                 WHERE id = $1",
            )
            .bind(account_id)
            .bind(&update.login)
            .bind(&credential.digest)
            .bind(&credential.salt)
            .bind(update.role.as_str())
            .bind(update.active)
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query(
                "UPDATE accounts SET login = $2, role = $3, active = $4
                 WHERE id = $1",
            )
            .bind(account_id)
            .bind(&update.login)
            .bind(update.role.as_str())
            .bind(update.active)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(account_id, profile_id, "account and profile updated");
        Ok(account_id)
    }

    /// Record the path handed back by the upload collaborator.
    ///
    /// Single-row and idempotent, so it deliberately runs outside any
    /// transaction.
    pub async fn update_photo_path(
        &self,
        account_id: i64,
        path: Option<&str>,
    ) -> IdentityResult<()> {
        let result = sqlx::query("UPDATE profiles SET photo_path = $2 WHERE account_id = $1")
            .bind(account_id)
            .bind(path)
            .execute(self.pool.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound.into());
        }
        Ok(())
    }

    /// Delete an account; the profile goes with it via cascade.
    /// Irreversible; there is no soft delete.
    pub async fn remove_user(&self, id: i64) -> IdentityResult<()> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(self.pool.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound.into());
        }

        info!(account_id = id, "account removed");
        Ok(())
    }
}
