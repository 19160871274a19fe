use emd_hunter_shared::UserIdentity;

use crate::action::{ActionState, Submission};
use crate::error::ApiResult;
use crate::notice::Notice;

use super::missing_fields;

/// 登录表单
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginView {
    pub email: String,
    pub password: String,
    pub submit: ActionState,
}

impl LoginView {
    pub fn is_submitting(&self) -> bool {
        self.submit.is_pending()
    }

    /// 返回 `(email, password)`
    pub fn begin_submit(&mut self) -> Submission<(String, String)> {
        if self.is_submitting() {
            return Submission::InFlight;
        }

        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            let err = missing_fields();
            self.submit.fail(err.clone());
            return Submission::Rejected(err);
        }

        let credentials = (email.to_string(), self.password.clone());
        self.submit.begin();
        Submission::Ready(credentials)
    }

    pub fn finish_submit(&mut self, result: &ApiResult<UserIdentity>) -> Notice {
        match result {
            Ok(_) => {
                self.submit.succeed();
                self.password.clear();
                Notice::success("Welcome back!")
            }
            Err(e) => {
                self.submit.fail(e.clone());
                Notice::from_error(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, ApiErrorKind};

    fn filled() -> LoginView {
        LoginView {
            email: " hunter@example.com ".into(),
            password: "secret123".into(),
            ..Default::default()
        }
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut view = LoginView::default();
        match view.begin_submit() {
            Submission::Rejected(e) => assert_eq!(e.kind, ApiErrorKind::Validation),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!view.is_submitting());
    }

    #[test]
    fn double_submit_is_refused() {
        let mut view = filled();
        assert_eq!(
            view.begin_submit().ready(),
            Some(("hunter@example.com".to_string(), "secret123".to_string()))
        );
        assert_eq!(view.begin_submit(), Submission::InFlight);
    }

    #[test]
    fn failure_shows_backend_message() {
        let mut view = filled();
        view.begin_submit();
        let notice = view.finish_submit(&Err(ApiError::invalid_credentials("Invalid credentials")));
        assert_eq!(notice, Notice::error("Invalid credentials"));
        assert!(!view.is_submitting());
        assert_eq!(view.password, "secret123");
    }

    #[test]
    fn success_greets_user() {
        let mut view = filled();
        view.begin_submit();
        let user = UserIdentity {
            id: "u1".into(),
            name: "Hunter".into(),
            email: "hunter@example.com".into(),
            created_at: None,
        };
        assert_eq!(view.finish_submit(&Ok(user)), Notice::success("Welcome back!"));
        assert!(view.password.is_empty());
    }
}
