use crate::models::Role;

/// Every in-app destination and its path form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Register,
    Login,
    SetRole,
    Dashboard(Role),
    ClaimDetail(Role, i64),
    CreateClaim,
    NotFound,
}

/// Declared access requirement of a route, consulted by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub guest_only: bool,
    pub role: Option<Role>,
}

impl RouteMeta {
    const PUBLIC: Self = Self {
        requires_auth: false,
        guest_only: false,
        role: None,
    };

    const GUEST: Self = Self {
        requires_auth: false,
        guest_only: true,
        role: None,
    };

    const AUTHENTICATED: Self = Self {
        requires_auth: true,
        guest_only: false,
        role: None,
    };

    const fn role_only(role: Role) -> Self {
        Self {
            requires_auth: true,
            guest_only: false,
            role: Some(role),
        }
    }
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let pathname = path.split(['?', '#']).next().unwrap_or_default();
        let mut paths = pathname.split('/').collect::<Vec<_>>();
        paths.retain(|p| !p.is_empty());

        match paths.as_slice() {
            [] => Route::Home,
            ["register"] => Route::Register,
            ["login"] => Route::Login,
            ["set-role"] => Route::SetRole,
            ["employee", "claim", "create"] => Route::CreateClaim,
            [role, "dashboard"] => {
                if let Ok(role) = role.parse() {
                    Route::Dashboard(role)
                } else {
                    Route::NotFound
                }
            }
            [role, "claims", id] => {
                // detail views exist for the three reviewing roles only
                match (role.parse(), id.parse()) {
                    (Ok(role @ (Role::Supervisor | Role::Manager | Role::Hr)), Ok(id)) => {
                        Route::ClaimDetail(role, id)
                    }
                    _ => Route::NotFound,
                }
            }
            _ => Route::NotFound,
        }
    }

    pub fn url(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Register => "/register".to_string(),
            Route::Login => "/login".to_string(),
            Route::SetRole => "/set-role".to_string(),
            Route::Dashboard(role) => format!("/{role}/dashboard"),
            Route::ClaimDetail(role, id) => format!("/{role}/claims/{id}"),
            Route::CreateClaim => "/employee/claim/create".to_string(),
            Route::NotFound => "/notfound".to_string(),
        }
    }

    pub fn meta(&self) -> RouteMeta {
        match self {
            Route::Home | Route::NotFound => RouteMeta::PUBLIC,
            Route::Register | Route::Login => RouteMeta::GUEST,
            Route::SetRole => RouteMeta::AUTHENTICATED,
            Route::Dashboard(role) => RouteMeta::role_only(*role),
            Route::ClaimDetail(role, _) => RouteMeta::role_only(*role),
            Route::CreateClaim => RouteMeta::role_only(Role::Employee),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/set-role"), Route::SetRole);
        assert_eq!(Route::parse("/hr/dashboard"), Route::Dashboard(Role::Hr));
        assert_eq!(
            Route::parse("/supervisor/claims/42"),
            Route::ClaimDetail(Role::Supervisor, 42)
        );
        assert_eq!(Route::parse("/employee/claim/create"), Route::CreateClaim);
        assert_eq!(Route::parse("/login?next=%2Fhr%2Fdashboard"), Route::Login);
    }

    #[test]
    fn test_parse_rejects_unknown_paths() {
        assert_eq!(Route::parse("/intern/dashboard"), Route::NotFound);
        assert_eq!(Route::parse("/supervisor/claims/abc"), Route::NotFound);
        // only reviewing roles have detail views
        assert_eq!(Route::parse("/employee/claims/1"), Route::NotFound);
        assert_eq!(Route::parse("/account/claims/1"), Route::NotFound);
        assert_eq!(Route::parse("/login/extra"), Route::NotFound);
    }

    #[test]
    fn test_url_round_trip() {
        let routes = [
            Route::Home,
            Route::Register,
            Route::Login,
            Route::SetRole,
            Route::Dashboard(Role::Account),
            Route::ClaimDetail(Role::Manager, 7),
            Route::CreateClaim,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.url()), route);
        }
    }

    #[test]
    fn test_meta() {
        assert_eq!(Route::Home.meta(), RouteMeta::PUBLIC);
        assert!(Route::Login.meta().guest_only);
        assert!(Route::SetRole.meta().requires_auth);
        assert_eq!(Route::SetRole.meta().role, None);
        assert_eq!(
            Route::Dashboard(Role::Manager).meta().role,
            Some(Role::Manager)
        );
        assert_eq!(Route::CreateClaim.meta().role, Some(Role::Employee));
    }
}
