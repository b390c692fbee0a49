// src/services/filter_state.rs

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::watch;

use crate::models::filter::{Filter, LocationFilter, Period};

/// Dono do filtro atual. Cada setter troca o Filter inteiro de uma vez;
/// quem assinou vê o novo valor assim que o setter retorna.
#[derive(Clone)]
pub struct FilterState {
    tx: Arc<watch::Sender<Filter>>,
}

impl FilterState {
    pub fn new(initial: Filter) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> Filter {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Filter> {
        self.tx.subscribe()
    }

    pub fn set_date(&self, date: NaiveDate) -> Filter {
        self.update(|filter| filter.with_date(date))
    }

    pub fn set_period(&self, period: Period) -> Filter {
        self.update(|filter| filter.with_period(period))
    }

    pub fn set_location(&self, location_id: LocationFilter) -> Filter {
        self.update(|filter| filter.with_location(location_id))
    }

    pub fn replace(&self, filter: Filter) -> Filter {
        self.update(|_| filter)
    }

    // Só notifica se o valor mudou de fato
    fn update<F>(&self, build: F) -> Filter
    where
        F: FnOnce(&Filter) -> Filter,
    {
        let mut accepted = None;
        self.tx.send_if_modified(|current| {
            let next = build(current);
            let changed = next != *current;
            if changed {
                *current = next;
            }
            accepted = Some(current.clone());
            changed
        });
        accepted.unwrap_or_else(|| self.current())
    }
}
