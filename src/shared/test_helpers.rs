#[cfg(test)]
use crate::features::auth::model::{AuthenticatedUser, UserRole};

#[cfg(test)]
use axum::{extract::Request, middleware::Next, Router};

#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
pub fn create_user(role: UserRole) -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::new_v4(),
        session_id: Uuid::new_v4(),
        email: format!("{}@example.com", role),
        display_name: format!("Test {}", role),
        role,
    }
}

/// Place `user` in the request extensions the way the access gate does
#[cfg(test)]
pub fn with_auth(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}

#[cfg(test)]
pub fn with_admin_auth(router: Router) -> Router {
    with_auth(router, create_user(UserRole::Admin))
}

#[cfg(test)]
pub fn with_user_auth(router: Router) -> Router {
    with_auth(router, create_user(UserRole::User))
}

#[cfg(test)]
pub fn with_plumber_auth(router: Router) -> Router {
    with_auth(router, create_user(UserRole::Plumber))
}
