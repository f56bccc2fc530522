//! Paths reachable without a session.
//!
//! Everything else requires a valid bearer session; the access gate in
//! `core::middleware` enforces it. Handlers under a public prefix that need a
//! caller (e.g. `POST /api/news`) still extract `AuthenticatedUser` and fail
//! with 401 on their own.

/// Paths matched exactly
const PUBLIC_PATHS: &[&str] = &[
    "/health",
    "/api/auth/register",
    "/api/auth/register/plumber",
    "/api/auth/login",
    "/api/auth/password-reset",
    "/api/auth/password-reset/confirm",
    "/api/reports/approved",
];

/// Paths matched together with everything below them
const PUBLIC_PREFIXES: &[&str] = &[
    "/swagger-ui",
    "/api-docs",
    "/api/news",
    "/api/plumbers",
    "/api/map",
];

pub fn is_public_path(path: &str) -> bool {
    let path = match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    };

    PUBLIC_PATHS.contains(&path)
        || PUBLIC_PREFIXES.iter().any(|prefix| {
            path == *prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_public_paths() {
        assert!(is_public_path("/health"));
        assert!(is_public_path("/api/auth/login"));
        assert!(is_public_path("/api/auth/register/plumber"));
        assert!(is_public_path("/api/auth/password-reset/confirm"));
        assert!(is_public_path("/api/reports/approved"));
        assert!(is_public_path("/api/reports/approved/"));
    }

    #[test]
    fn test_public_prefixes() {
        assert!(is_public_path("/api/news"));
        assert!(is_public_path("/api/news/0191e2a0-0000-7000-8000-000000000000"));
        assert!(is_public_path("/api/plumbers/options"));
        assert!(is_public_path("/api/map/markers"));
        assert!(is_public_path("/swagger-ui/index.html"));
        assert!(is_public_path("/api-docs/openapi.json"));
    }

    #[test]
    fn test_protected_paths() {
        assert!(!is_public_path("/"));
        assert!(!is_public_path("/api/auth/me"));
        assert!(!is_public_path("/api/auth/logout"));
        assert!(!is_public_path("/api/reports"));
        assert!(!is_public_path("/api/reports/mine"));
        assert!(!is_public_path("/api/users/me"));
        assert!(!is_public_path("/api/admin/dashboard"));
        // prefix must end on a segment boundary
        assert!(!is_public_path("/api/newsletter"));
        assert!(!is_public_path("/api/mapping"));
    }
}
