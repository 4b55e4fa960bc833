use uuid::Uuid;

/// Page routes of the application shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRoute {
    Home,
    Login,
    Subscriptions,
    Chef(Uuid),
    AuthCallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Allow,
    RedirectTo(&'static str),
}

impl AppRoute {
    pub fn path(&self) -> String {
        match self {
            AppRoute::Home => "/".to_string(),
            AppRoute::Login => "/login".to_string(),
            AppRoute::Subscriptions => "/subscriptions".to_string(),
            AppRoute::Chef(chef_id) => format!("/chef/{}", chef_id),
            AppRoute::AuthCallback => "/auth/callback".to_string(),
        }
    }

    /// Signed-out users only see the login page and the callback; signed-in
    /// users never see the login page.
    pub fn guard(&self, authenticated: bool) -> RouteAccess {
        match (self, authenticated) {
            (AppRoute::AuthCallback, _) => RouteAccess::Allow,
            (AppRoute::Login, false) => RouteAccess::Allow,
            (AppRoute::Login, true) => RouteAccess::RedirectTo("/"),
            (_, true) => RouteAccess::Allow,
            (_, false) => RouteAccess::RedirectTo("/login"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_matrix() {
        let chef = AppRoute::Chef(Uuid::nil());
        let cases = [
            (AppRoute::Home, false, RouteAccess::RedirectTo("/login")),
            (AppRoute::Home, true, RouteAccess::Allow),
            (AppRoute::Subscriptions, false, RouteAccess::RedirectTo("/login")),
            (AppRoute::Subscriptions, true, RouteAccess::Allow),
            (chef, false, RouteAccess::RedirectTo("/login")),
            (chef, true, RouteAccess::Allow),
            (AppRoute::Login, false, RouteAccess::Allow),
            (AppRoute::Login, true, RouteAccess::RedirectTo("/")),
            (AppRoute::AuthCallback, false, RouteAccess::Allow),
            (AppRoute::AuthCallback, true, RouteAccess::Allow),
        ];

        for (route, authenticated, expected) in cases {
            assert_eq!(
                route.guard(authenticated),
                expected,
                "{} (authenticated: {authenticated})",
                route.path()
            );
        }
    }

    #[test]
    fn chef_path_embeds_id() {
        assert_eq!(
            AppRoute::Chef(Uuid::nil()).path(),
            "/chef/00000000-0000-0000-0000-000000000000"
        );
    }
}
