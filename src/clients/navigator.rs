// src/clients/navigator.rs

use serde::Serialize;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationEvent {
    Login,
}

/// Navegação das telas. Fire-and-forget: ninguém espera retorno.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// Publica os eventos num canal broadcast; a camada de telas escuta.
pub struct BroadcastNavigator {
    tx: broadcast::Sender<NavigationEvent>,
}

impl BroadcastNavigator {
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<NavigationEvent>) {
        let (tx, rx) = broadcast::channel(capacity);
        (Self { tx }, rx)
    }
}

impl Navigator for BroadcastNavigator {
    fn redirect_to_login(&self) {
        // Sem ouvintes o envio falha, e tudo bem
        let _ = self.tx.send(NavigationEvent::Login);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn redirect_reaches_subscribers() {
        let (navigator, mut rx) = BroadcastNavigator::new(4);
        navigator.redirect_to_login();

        assert_eq!(rx.recv().await.unwrap(), NavigationEvent::Login);
    }

    #[test]
    fn redirect_without_listeners_does_not_panic() {
        let (navigator, rx) = BroadcastNavigator::new(4);
        drop(rx);
        navigator.redirect_to_login();
    }
}
