use crate::domain::context::{Caller, Role, User};
use crate::repo::UserStore;
use anyhow::{Context, Result};
use sqlx::{PgPool, Row};

#[derive(Clone)]
pub struct UsersRepo {
    pub pool: PgPool,
}

fn parse_role(raw: &str) -> Result<Role> {
    Role::parse(raw).with_context(|| format!("unknown role {raw}"))
}

#[async_trait::async_trait]
impl UserStore for UsersRepo {
    async fn find_caller_by_token(&self, token: &str) -> Result<Option<Caller>> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.role
            FROM access_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token = $1 AND t.expires_at > now() AND u.is_active = true
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| -> Result<Caller> {
            let role: String = r.try_get("role")?;
            Ok(Caller {
                user_id: r.try_get("id")?,
                role: parse_role(&role)?,
            })
        })
        .transpose()
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, username, role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| -> Result<User> {
            let role: String = r.try_get("role")?;
            Ok(User {
                id: r.try_get("id")?,
                username: r.try_get("username")?,
                role: parse_role(&role)?,
            })
        })
        .transpose()
    }

    async fn activate_premium(&self, user_id: i64) -> Result<bool> {
        let res = sqlx::query("UPDATE applicants SET is_premium = true WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(res.rows_affected() > 0)
    }
}
