//! Navigation targets of the client.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// A place the user can be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    CreateProject,
    /// The editor for one project.
    Project(String),
    /// The progress tracker for one project.
    Progress(String),
    Pricing,
    PaymentSuccess(Option<String>),
    Admin,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::CreateProject => "/create".to_string(),
            Route::Project(id) => format!("/project/{}", urlencoding::encode(id)),
            Route::Progress(id) => format!("/progress/{}", urlencoding::encode(id)),
            Route::Pricing => "/pricing".to_string(),
            Route::PaymentSuccess(Some(session_id)) => {
                format!(
                    "/payment/success?session_id={}",
                    urlencoding::encode(session_id)
                )
            }
            Route::PaymentSuccess(None) => "/payment/success".to_string(),
            Route::Admin => "/admin".to_string(),
        }
    }

    /// Routes that need a signed-in user.
    pub fn is_protected(&self) -> bool {
        !matches!(
            self,
            Route::Home | Route::Login | Route::Register | Route::Pricing
        )
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_routes() {
        assert_eq!(Route::Project("p-1".to_string()).path(), "/project/p-1");
        assert_eq!(Route::Progress("p-1".to_string()).to_string(), "/progress/p-1");
        assert_eq!(
            Route::PaymentSuccess(Some("cs_1".to_string())).path(),
            "/payment/success?session_id=cs_1"
        );
    }

    #[test]
    fn test_route_parameters_are_encoded() {
        assert_eq!(
            Route::PaymentSuccess(Some("cs_1&admin=1 x".to_string())).path(),
            "/payment/success?session_id=cs_1%26admin%3D1%20x"
        );
        assert_eq!(Route::Project("a/b".to_string()).path(), "/project/a%2Fb");
    }

    #[test]
    fn test_protected_routes() {
        assert!(Route::Dashboard.is_protected());
        assert!(Route::Admin.is_protected());
        assert!(!Route::Pricing.is_protected());
        assert!(!Route::Login.is_protected());
    }
}
