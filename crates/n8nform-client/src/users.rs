//! User endpoints

use crate::client::{Client, NO_BODY};
use crate::error::{ClientError, Result};
use crate::model::{CreateUserRequest, CreateUserResult, ListResponse, UpdateRoleRequest, User};
use reqwest::Method;

fn user_path(id: &str) -> String {
    format!("/users/{}", id)
}

impl Client {
    /// Create a single user through the bulk endpoint.
    ///
    /// The creation response lacks most fields, so the user is read back
    /// afterwards. Some releases omit the role from that read; the requested
    /// role is kept in that case.
    pub async fn create_user(&self, email: &str, role: &str) -> Result<User> {
        let request = [CreateUserRequest {
            email: email.to_string(),
            role: role.to_string(),
        }];

        let results: Vec<CreateUserResult> = self
            .request_json(Method::POST, "/users", Some(&request))
            .await?;

        let first = results
            .into_iter()
            .next()
            .ok_or(ClientError::EmptyUserResponse)?;
        if !first.error.is_empty() {
            return Err(ClientError::BatchItem(first.error));
        }
        tracing::info!("Created user {} ({})", first.user.email, first.user.id);

        let mut user = self.get_user(&first.user.id).await?;
        if user.role().is_empty() && !role.is_empty() {
            user.set_role(role);
        }
        user.invite_accept_url = first.user.invite_accept_url;

        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Result<User> {
        self.request_json(Method::GET, &user_path(id), NO_BODY)
            .await
    }

    /// Change a user's role and return the refreshed user. The email address
    /// cannot be changed through the API.
    pub async fn update_user_role(&self, id: &str, role: &str) -> Result<User> {
        if !role.is_empty() {
            self.request(
                Method::PATCH,
                &format!("{}/role", user_path(id)),
                Some(&UpdateRoleRequest {
                    new_role_name: role,
                }),
            )
            .await?;
        }

        let mut user = self.get_user(id).await?;
        if user.role().is_empty() && !role.is_empty() {
            user.set_role(role);
        }

        Ok(user)
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.request(Method::DELETE, &user_path(id), NO_BODY)
            .await?;
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let list: ListResponse<User> = self.request_json(Method::GET, "/users", NO_BODY).await?;
        Ok(list.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_wraps_request_in_list_and_reads_back() {
        let transport = Arc::new(MockTransport::new());
        transport
            .respond(
                Method::POST,
                "/api/v1/users",
                json!([{"user": {"id": "u1", "email": "a@example.com", "inviteAcceptUrl": "https://invite"}, "error": ""}]),
            )
            .respond(
                Method::GET,
                "/api/v1/users/u1",
                json!({"id": "u1", "email": "a@example.com", "role": "global:admin", "isPending": true, "createdAt": "2024-01-01"}),
            );
        let client = Client::new(transport.clone());

        let user = client
            .create_user("a@example.com", "global:admin")
            .await
            .unwrap();

        assert_eq!(user.role(), "global:admin");
        assert!(user.is_pending);
        assert_eq!(user.invite_accept_url, "https://invite");
        assert_eq!(
            transport.calls_to(Method::POST, "/api/v1/users")[0].body,
            Some(json!([{"email": "a@example.com", "role": "global:admin"}]))
        );
    }

    #[tokio::test]
    async fn test_create_keeps_requested_role_when_read_back_is_empty() {
        let transport = Arc::new(MockTransport::new());
        transport
            .respond(
                Method::POST,
                "/api/v1/users",
                json!([{"user": {"id": "u1", "email": "a@example.com"}}]),
            )
            .respond(
                Method::GET,
                "/api/v1/users/u1",
                json!({"id": "u1", "email": "a@example.com"}),
            );
        let client = Client::new(transport);

        let user = client
            .create_user("a@example.com", "global:member")
            .await
            .unwrap();
        assert_eq!(user.role(), "global:member");
    }

    #[tokio::test]
    async fn test_create_item_error_is_fatal() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(
            Method::POST,
            "/api/v1/users",
            json!([{"user": {"id": "", "email": "a@example.com"}, "error": "email already taken"}]),
        );
        let client = Client::new(transport.clone());

        let err = client
            .create_user("a@example.com", "global:member")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API error: email already taken");
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_create_empty_response() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::POST, "/api/v1/users", json!([]));
        let client = Client::new(transport);

        let err = client.create_user("a@example.com", "").await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyUserResponse));
    }

    #[tokio::test]
    async fn test_update_role_uses_role_endpoint() {
        let transport = Arc::new(MockTransport::new());
        transport
            .respond_empty(Method::PATCH, "/api/v1/users/u1/role")
            .respond(
                Method::GET,
                "/api/v1/users/u1",
                json!({"id": "u1", "email": "a@example.com", "globalRole": ""}),
            );
        let client = Client::new(transport.clone());

        let user = client.update_user_role("u1", "global:admin").await.unwrap();
        assert_eq!(user.role(), "global:admin");
        assert_eq!(
            transport.calls_to(Method::PATCH, "/api/v1/users/u1/role")[0].body,
            Some(json!({"newRoleName": "global:admin"}))
        );
    }
}
