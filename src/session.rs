//! Sign-in state.
//!
//! Identity is delegated to a hosted provider when a usable publishable key is
//! configured; otherwise a local demo session stands in. The choice is made
//! once at startup and the resulting [`Session`] is the single owner of the
//! signed-in flag. A local session starts signed out on every launch.

use tracing::info;

use crate::config::AuthConfig;

const PLACEHOLDER_KEY: &str = "your_clerk_publishable_key_here";
const LOCAL_USER_ID: &str = "local-demo-user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// How the session establishes identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityStrategy {
    /// The hosted provider has authenticated `Account`.
    Hosted(Account),
    /// Demo mode: sign in and out locally.
    Local,
}

impl IdentityStrategy {
    /// Pick the strategy from configuration.
    #[must_use]
    pub fn detect(config: &AuthConfig) -> Self {
        if is_usable_key(config.publishable_key.as_deref()) {
            let account = Account {
                id: config.account_id.clone().unwrap_or_else(|| config.email.clone()),
                name: config.name.clone(),
                email: config.email.clone(),
            };
            info!(account = %account.email, "Using hosted identity");
            Self::Hosted(account)
        } else {
            info!("No usable publishable key, using local demo session");
            Self::Local
        }
    }
}

fn is_usable_key(key: Option<&str>) -> bool {
    key.map(str::trim)
        .is_some_and(|key| !key.is_empty() && key != PLACEHOLDER_KEY && key.starts_with("pk_"))
}

#[derive(Debug, Clone)]
pub struct Session {
    strategy: IdentityStrategy,
    local_account: Option<Account>,
}

impl Session {
    #[must_use]
    pub const fn new(strategy: IdentityStrategy) -> Self {
        Self {
            strategy,
            local_account: None,
        }
    }

    #[must_use]
    pub const fn is_hosted(&self) -> bool {
        matches!(self.strategy, IdentityStrategy::Hosted(_))
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.account().is_some()
    }

    #[must_use]
    pub const fn account(&self) -> Option<&Account> {
        match &self.strategy {
            IdentityStrategy::Hosted(account) => Some(account),
            IdentityStrategy::Local => self.local_account.as_ref(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.account().map(|account| account.id.as_str())
    }

    /// Sign in to the local demo session. Hosted sessions are unaffected.
    pub fn sign_in(&mut self) {
        if self.is_hosted() {
            return;
        }
        info!("Signed in to demo session");
        self.local_account = Some(Account {
            id: LOCAL_USER_ID.to_string(),
            name: "Demo User".to_string(),
            email: "demo@campus.edu".to_string(),
        });
    }

    pub fn sign_out(&mut self) {
        if self.local_account.take().is_some() {
            info!("Signed out of demo session");
        }
    }

    /// Flip the local demo session between signed in and out.
    pub fn toggle(&mut self) {
        if self.local_account.is_some() {
            self.sign_out();
        } else {
            self.sign_in();
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        match (&self.strategy, self.account()) {
            (IdentityStrategy::Hosted(_), Some(account)) => account.email.clone(),
            (IdentityStrategy::Local, Some(account)) => format!("{} (demo)", account.name),
            (_, None) => "Signed out".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: Option<&str>) -> AuthConfig {
        AuthConfig {
            publishable_key: key.map(ToString::to_string),
            account_id: None,
            name: "Alex".to_string(),
            email: "alex@university.edu".to_string(),
        }
    }

    #[test]
    fn test_detect_strategy() {
        assert!(matches!(
            IdentityStrategy::detect(&config(Some("pk_test_abc"))),
            IdentityStrategy::Hosted(_)
        ));
        assert_eq!(IdentityStrategy::detect(&config(None)), IdentityStrategy::Local);
        assert_eq!(
            IdentityStrategy::detect(&config(Some(PLACEHOLDER_KEY))),
            IdentityStrategy::Local
        );
        assert_eq!(
            IdentityStrategy::detect(&config(Some("sk_live_secret"))),
            IdentityStrategy::Local
        );
        assert_eq!(IdentityStrategy::detect(&config(Some("  "))), IdentityStrategy::Local);
    }

    #[test]
    fn test_hosted_session_is_signed_in() {
        let mut session = Session::new(IdentityStrategy::detect(&config(Some("pk_live_1"))));
        assert!(session.is_signed_in());
        assert_eq!(session.user_id(), Some("alex@university.edu"));

        session.sign_out();
        assert!(session.is_signed_in());
    }

    #[test]
    fn test_local_session_lifecycle() {
        let mut session = Session::new(IdentityStrategy::Local);
        assert!(!session.is_signed_in());
        assert_eq!(session.label(), "Signed out");

        session.toggle();
        assert!(session.is_signed_in());
        assert_eq!(session.user_id(), Some(LOCAL_USER_ID));
        assert_eq!(session.label(), "Demo User (demo)");

        session.toggle();
        assert!(!session.is_signed_in());
    }
}
