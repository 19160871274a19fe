use emd_hunter_shared::UserIdentity;

use crate::action::{ActionState, Submission};
use crate::error::ApiResult;
use crate::notice::Notice;

use super::missing_fields;

/// 注册请求所需的字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// 注册表单
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterView {
    pub name: String,
    pub email: String,
    pub password: String,
    pub submit: ActionState,
}

impl RegisterView {
    pub fn is_submitting(&self) -> bool {
        self.submit.is_pending()
    }

    pub fn begin_submit(&mut self) -> Submission<Registration> {
        if self.is_submitting() {
            return Submission::InFlight;
        }

        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() || email.is_empty() || self.password.is_empty() {
            let err = missing_fields();
            self.submit.fail(err.clone());
            return Submission::Rejected(err);
        }

        let registration = Registration {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        };
        self.submit.begin();
        Submission::Ready(registration)
    }

    pub fn finish_submit(&mut self, result: &ApiResult<UserIdentity>) -> Notice {
        match result {
            Ok(_) => {
                self.submit.succeed();
                self.password.clear();
                Notice::success("Account created! Welcome to EMD Hunter.")
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
    use crate::error::ApiError;

    #[test]
    fn all_fields_are_required() {
        let mut view = RegisterView {
            email: "jane@example.com".into(),
            password: "secret123".into(),
            ..Default::default()
        };
        assert!(matches!(view.begin_submit(), Submission::Rejected(_)));

        view.name = "Jane Doe".into();
        let registration = view.begin_submit().ready().unwrap();
        assert_eq!(registration.name, "Jane Doe");
        assert!(view.is_submitting());
    }

    #[test]
    fn duplicate_account_message_is_shown() {
        let mut view = RegisterView {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            password: "secret123".into(),
            ..Default::default()
        };
        view.begin_submit();
        let notice = view.finish_submit(&Err(ApiError::duplicate_account("Email already registered")));
        assert_eq!(notice.message, "Email already registered");
        assert!(view.submit.error().is_some());
    }
}
