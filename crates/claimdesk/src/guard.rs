use crate::error::Error;
use crate::models::User;
use crate::route::Route;
use crate::session::SessionStore;

/// Outcome of a navigation attempt. `Abort` is the terminal state for
/// a redirect that would target the destination already being
/// navigated to, so a denied navigation can never loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(Route),
    Abort,
}

/// Runs before every navigation. Restores the session first when a
/// token is persisted but no identity is loaded, so the decision sees
/// the latest known identity.
pub async fn check(session: &mut SessionStore, to: &Route) -> Result<GuardOutcome, Error> {
    if session.user.is_none() && session.has_token() {
        session.restore_session().await?;
    }
    Ok(decide(session.user.as_ref(), to))
}

/// Where a signed-in user belongs: their dashboard, or role selection
/// while no role is assigned yet.
fn home_of(user: &User) -> Route {
    match user.role {
        Some(role) => Route::Dashboard(role),
        None => Route::SetRole,
    }
}

/// The decision table, evaluated in order, first match wins.
pub fn decide(user: Option<&User>, to: &Route) -> GuardOutcome {
    let meta = to.meta();

    // signed-in user with a role never lands on the public home page
    if let Some(role) = user.and_then(|u| u.role) {
        if *to == Route::Home {
            return GuardOutcome::Redirect(Route::Dashboard(role));
        }
    }

    if meta.requires_auth && user.is_none() {
        return if *to == Route::Login {
            GuardOutcome::Allow
        } else {
            GuardOutcome::Redirect(Route::Login)
        };
    }

    if meta.guest_only {
        if let Some(user) = user {
            let destination = home_of(user);
            return if *to == destination {
                GuardOutcome::Allow
            } else {
                GuardOutcome::Redirect(destination)
            };
        }
    }

    if let Some(required) = meta.role {
        if user.and_then(|u| u.role) != Some(required) {
            let destination = match user {
                Some(user) => home_of(user),
                None => Route::Login,
            };
            return if *to == destination {
                GuardOutcome::Abort
            } else {
                GuardOutcome::Redirect(destination)
            };
        }
    }

    GuardOutcome::Allow
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::Role;

    fn user(role: Option<Role>) -> User {
        User {
            id: 1,
            name: "Ade".to_string(),
            email: "ade@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_home_redirects_to_own_dashboard() {
        for role in [Role::Employee, Role::Supervisor, Role::Hr] {
            assert_eq!(
                decide(Some(&user(Some(role))), &Route::Home),
                GuardOutcome::Redirect(Route::Dashboard(role))
            );
        }
    }

    #[test]
    fn test_home_unchanged_without_role() {
        assert_eq!(decide(Some(&user(None)), &Route::Home), GuardOutcome::Allow);
        assert_eq!(decide(None, &Route::Home), GuardOutcome::Allow);
    }

    #[test]
    fn test_unauthenticated_protected_navigation_redirects_to_login_once() {
        assert_eq!(
            decide(None, &Route::SetRole),
            GuardOutcome::Redirect(Route::Login)
        );
        assert_eq!(
            decide(None, &Route::Dashboard(Role::Manager)),
            GuardOutcome::Redirect(Route::Login)
        );
        // following the redirect terminates: login itself is allowed
        assert_eq!(decide(None, &Route::Login), GuardOutcome::Allow);
    }

    #[test]
    fn test_guest_only_routes_bounce_signed_in_users() {
        let hr = user(Some(Role::Hr));
        assert_eq!(
            decide(Some(&hr), &Route::Login),
            GuardOutcome::Redirect(Route::Dashboard(Role::Hr))
        );
        assert_eq!(
            decide(Some(&hr), &Route::Register),
            GuardOutcome::Redirect(Route::Dashboard(Role::Hr))
        );
        // a signed-in user with no role goes to role selection instead
        assert_eq!(
            decide(Some(&user(None)), &Route::Login),
            GuardOutcome::Redirect(Route::SetRole)
        );
    }

    #[test]
    fn test_role_mismatch_redirects_to_own_dashboard() {
        let supervisor = user(Some(Role::Supervisor));
        assert_eq!(
            decide(Some(&supervisor), &Route::Dashboard(Role::Employee)),
            GuardOutcome::Redirect(Route::Dashboard(Role::Supervisor))
        );
        assert_eq!(
            decide(Some(&supervisor), &Route::ClaimDetail(Role::Hr, 3)),
            GuardOutcome::Redirect(Route::Dashboard(Role::Supervisor))
        );
        assert_eq!(
            decide(Some(&supervisor), &Route::CreateClaim),
            GuardOutcome::Redirect(Route::Dashboard(Role::Supervisor))
        );
    }

    #[test]
    fn test_role_mismatch_converges() {
        // every mismatch redirect lands on a destination the guard then
        // allows, so a denied navigation settles in one hop
        let cases = [
            (user(Some(Role::Manager)), Route::Dashboard(Role::Hr)),
            (user(Some(Role::Account)), Route::CreateClaim),
            (user(None), Route::Dashboard(Role::Employee)),
        ];
        for (user, to) in &cases {
            let GuardOutcome::Redirect(destination) = decide(Some(user), to) else {
                panic!("expected a redirect for {to:?}");
            };
            assert_eq!(decide(Some(user), &destination), GuardOutcome::Allow);
        }
    }

    #[test]
    fn test_roleless_user_sent_to_role_selection() {
        assert_eq!(
            decide(Some(&user(None)), &Route::Dashboard(Role::Account)),
            GuardOutcome::Redirect(Route::SetRole)
        );
        assert_eq!(
            decide(Some(&user(None)), &Route::SetRole),
            GuardOutcome::Allow
        );
    }

    #[test]
    fn test_matching_role_allowed() {
        let manager = user(Some(Role::Manager));
        assert_eq!(
            decide(Some(&manager), &Route::Dashboard(Role::Manager)),
            GuardOutcome::Allow
        );
        assert_eq!(
            decide(Some(&manager), &Route::ClaimDetail(Role::Manager, 9)),
            GuardOutcome::Allow
        );
        assert_eq!(
            decide(Some(&user(Some(Role::Employee))), &Route::CreateClaim),
            GuardOutcome::Allow
        );
    }
}
