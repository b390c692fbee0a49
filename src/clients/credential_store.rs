// src/clients/credential_store.rs

use async_trait::async_trait;
use tokio::sync::RwLock;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get_token(&self) -> Option<String>;
    async fn set_token(&self, token: String);
    async fn remove_token(&self);
}

/// Guarda o token só em memória. Persistir fica com quem embute o serviço.
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            token: RwLock::new(initial.filter(|token| !token.trim().is_empty())),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    async fn set_token(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    async fn remove_token(&self) {
        self.token.write().await.take();
    }
}
