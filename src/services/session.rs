//! Session store
//!
//! Sessions carry the capability granted at login and the reservation cart.
//! They are explicit request-scoped context: created by a shared-secret
//! login, destroyed at logout, held only in process memory (the cart is
//! ephemeral by design).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use rand::RngCore;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{cart::CartLine, Cart, Role},
};

/// Cheap copy of a session handed to request handlers
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub token: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl SessionInfo {
    /// Gate for operator-only actions (item CRUD, ledger override, bulk return)
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator capability required".to_string(),
            ))
        }
    }
}

struct SessionEntry {
    role: Role,
    created_at: DateTime<Utc>,
    cart: Cart,
}

#[derive(Clone, Default)]
pub struct SessionService {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl SessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exchange a shared secret for a session token. The admin secret grants
    /// the Admin role, the member secret grants Member; anything else fails.
    pub fn login(&self, secret: &str, auth: &AuthConfig) -> AppResult<SessionInfo> {
        let role = if secret == auth.admin_secret {
            Role::Admin
        } else if secret == auth.member_secret {
            Role::Member
        } else {
            return Err(AppError::Authentication("Invalid secret".to_string()));
        };

        let token = generate_token();
        let created_at = Utc::now();
        self.sessions.write().unwrap().insert(
            token.clone(),
            SessionEntry {
                role,
                created_at,
                cart: Cart::new(),
            },
        );

        Ok(SessionInfo {
            token,
            role,
            created_at,
        })
    }

    /// Destroy a session together with its cart
    pub fn logout(&self, token: &str) {
        self.sessions.write().unwrap().remove(token);
    }

    /// Look up a session by token
    pub fn get(&self, token: &str) -> Option<SessionInfo> {
        self.sessions.read().unwrap().get(token).map(|entry| SessionInfo {
            token: token.to_string(),
            role: entry.role,
            created_at: entry.created_at,
        })
    }

    /// Run a closure against the session's cart
    pub fn with_cart<R>(&self, token: &str, f: impl FnOnce(&mut Cart) -> R) -> AppResult<R> {
        let mut sessions = self.sessions.write().unwrap();
        let entry = sessions
            .get_mut(token)
            .ok_or_else(|| AppError::Authentication("Session expired".to_string()))?;
        Ok(f(&mut entry.cart))
    }

    /// Current cart lines in insertion order
    pub fn cart_lines(&self, token: &str) -> AppResult<Vec<CartLine>> {
        self.with_cart(token, |cart| cart.lines())
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthConfig {
        AuthConfig {
            admin_secret: "adm".to_string(),
            member_secret: "mem".to_string(),
        }
    }

    #[test]
    fn login_maps_secret_to_role() {
        let service = SessionService::new();
        let admin = service.login("adm", &auth()).unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.require_admin().is_ok());

        let member = service.login("mem", &auth()).unwrap();
        assert_eq!(member.role, Role::Member);
        assert!(member.require_admin().is_err());

        assert!(service.login("nope", &auth()).is_err());
    }

    #[test]
    fn tokens_are_unique_and_resolvable() {
        let service = SessionService::new();
        let a = service.login("mem", &auth()).unwrap();
        let b = service.login("mem", &auth()).unwrap();
        assert_ne!(a.token, b.token);
        assert!(service.get(&a.token).is_some());
        assert!(service.get("unknown").is_none());
    }

    #[test]
    fn logout_destroys_session_and_cart() {
        let service = SessionService::new();
        let session = service.login("mem", &auth()).unwrap();
        service.logout(&session.token);
        assert!(service.get(&session.token).is_none());
        assert!(service.cart_lines(&session.token).is_err());
    }

    #[test]
    fn carts_are_scoped_per_session() {
        use crate::models::enums::{Category, ItemState};
        use crate::models::Item;

        let item = Item {
            id: 7,
            name: "Tripod".to_string(),
            category: Category::Camera as i16,
            location: None,
            total_quantity: 2,
            borrowed_quantity: 0,
            state: ItemState::Normal as i16,
            image_url: None,
            created_at: None,
            updated_at: None,
        };

        let service = SessionService::new();
        let a = service.login("mem", &auth()).unwrap();
        let b = service.login("mem", &auth()).unwrap();

        service.with_cart(&a.token, |cart| cart.add(&item)).unwrap();
        assert_eq!(service.cart_lines(&a.token).unwrap().len(), 1);
        assert!(service.cart_lines(&b.token).unwrap().is_empty());
    }
}
