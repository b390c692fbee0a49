// src/services/session_guard.rs

use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};
use serde::de::IgnoredAny;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    clients::{CredentialStore, Navigator},
    common::error::SessionFault,
};

/// Verdadeiro só quando o token é um JWT com `exp` vencido.
/// Tokens opacos ou sem `exp` passam: quem decide é o servidor.
pub fn token_expired(token: &str, leeway_secs: u64) -> bool {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_aud = false;
    validation.leeway = leeway_secs;
    // `exp` é exigido e conferido pela Validation; o resto das claims não interessa aqui

    match decode::<IgnoredAny>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(_) => false,
        Err(e) => matches!(e.kind(), ErrorKind::ExpiredSignature),
    }
}

/// Falhas de sessão (não de fonte): limpa o token e manda para o login, uma vez só.
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    logged_out: Arc<AtomicBool>,
    leeway_secs: u64,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn CredentialStore>, navigator: Arc<dyn Navigator>, leeway_secs: u64) -> Self {
        Self {
            store,
            navigator,
            logged_out: Arc::new(AtomicBool::new(false)),
            leeway_secs,
        }
    }

    /// Token que autoriza o lote inteiro, ou a falha de sessão que impede a coleta.
    pub async fn authorize(&self) -> Result<String, SessionFault> {
        let token = self
            .store
            .get_token()
            .await
            .filter(|token| !token.trim().is_empty())
            .ok_or(SessionFault::MissingToken)?;

        if token_expired(&token, self.leeway_secs) {
            return Err(SessionFault::TokenExpired);
        }

        // Token válido: sessão viva de novo
        self.logged_out.store(false, Ordering::SeqCst);
        Ok(token)
    }

    /// Retorna `true` se os efeitos colaterais rodaram agora; `false` se já estava deslogado.
    pub async fn expire(&self, fault: &SessionFault) -> bool {
        if self.logged_out.swap(true, Ordering::SeqCst) {
            tracing::debug!("Sessão já encerrada, ignorando: {}", fault);
            return false;
        }

        tracing::error!("🔒 Sessão encerrada: {}", fault);
        self.store.remove_token().await;
        self.navigator.redirect_to_login();
        true
    }

    /// Fluxo de login: guarda o novo token e rearma o guard.
    pub async fn resume(&self, token: String) {
        self.store.set_token(token).await;
        self.logged_out.store(false, Ordering::SeqCst);
        tracing::info!("🔑 Nova sessão registrada");
    }

    pub fn is_logged_out(&self) -> bool {
        self.logged_out.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::fakes::{RecordingCredentialStore, RecordingNavigator};
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn jwt(expires_in_secs: i64) -> String {
        let exp = Utc::now().timestamp() + expires_in_secs;
        encode(
            &Header::default(),
            &json!({ "sub": "gerente-1", "exp": exp }),
            &EncodingKey::from_secret(b"segredo-do-backend"),
        )
        .unwrap()
    }

    fn guard(store: Arc<RecordingCredentialStore>, navigator: Arc<RecordingNavigator>) -> SessionGuard {
        SessionGuard::new(store, navigator, 0)
    }

    #[test]
    fn detects_expired_jwt_only() {
        assert!(token_expired(&jwt(-3600), 0));
        assert!(!token_expired(&jwt(3600), 0));
        assert!(!token_expired("token-opaco-do-backend", 0));
    }

    #[test]
    fn jwt_without_exp_is_left_to_the_backend() {
        let token = encode(
            &Header::default(),
            &json!({ "sub": "gerente-1", "lojas": ["loja-7"] }),
            &EncodingKey::from_secret(b"segredo-do-backend"),
        )
        .unwrap();

        assert!(!token_expired(&token, 0));
    }

    #[tokio::test]
    async fn authorizes_with_valid_token() {
        let store = Arc::new(RecordingCredentialStore::with_token(&jwt(3600)));
        let navigator = Arc::new(RecordingNavigator::default());

        assert!(guard(store.clone(), navigator.clone()).authorize().await.is_ok());
        assert_eq!(store.removals(), 0);
    }

    #[tokio::test]
    async fn missing_and_expired_tokens_are_session_faults() {
        let navigator = Arc::new(RecordingNavigator::default());

        let empty = Arc::new(RecordingCredentialStore::default());
        assert_eq!(
            guard(empty, navigator.clone()).authorize().await,
            Err(SessionFault::MissingToken)
        );

        let expired = Arc::new(RecordingCredentialStore::with_token(&jwt(-60)));
        assert_eq!(
            guard(expired, navigator).authorize().await,
            Err(SessionFault::TokenExpired)
        );
    }

    #[tokio::test]
    async fn expire_is_idempotent_until_resumed() {
        let store = Arc::new(RecordingCredentialStore::with_token("abc"));
        let navigator = Arc::new(RecordingNavigator::default());
        let guard = guard(store.clone(), navigator.clone());

        assert!(guard.expire(&SessionFault::TokenExpired).await);
        assert!(!guard.expire(&SessionFault::MissingToken).await);
        assert_eq!(store.removals(), 1);
        assert_eq!(navigator.redirects(), 1);
        assert!(guard.is_logged_out());

        guard.resume("novo-token".into()).await;
        assert!(!guard.is_logged_out());
        assert_eq!(guard.authorize().await.as_deref(), Ok("novo-token"));

        assert!(guard.expire(&SessionFault::MissingToken).await);
        assert_eq!(store.removals(), 2);
        assert_eq!(navigator.redirects(), 2);
    }
}
